//! Field and array expansion.
//!
//! Every source text becomes one rendition per locale: the source locale keeps
//! the text verbatim, empty text stays empty, and every other locale gets the
//! translator's output. Locales are processed sequentially in set order.

use serde_json::Value;
use tracing::debug;

use crate::capability::Translator;
use crate::error::{CapabilityError, LocaleError, PipelineError};
use crate::i18n::{resolve, Locale, LocaleSet};
use crate::record::{localized_key, Record, RecordView};

/// One locale's rendering of a source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendition {
    pub locale: Locale,
    pub key: String,
    pub value: String,
    /// Whether the value came from the translator.
    pub machine_translated: bool,
}

impl Rendition {
    /// Append the locale's machine-translation notice. Verbatim and empty
    /// renditions are left alone.
    pub fn annotate(&mut self) {
        if self.machine_translated && !self.value.is_empty() {
            self.value.push(' ');
            self.value.push_str(self.locale.config().strings.ai_notice);
        }
    }
}

/// A list field whose elements expand into per-locale item records.
///
/// Items are keyed by `item_prefix` + locale, never by the source array name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArraySpec {
    pub source: &'static str,
    pub output: &'static str,
    pub item_prefix: &'static str,
}

async fn localize(
    text: &str,
    key_prefix: &str,
    locales: &LocaleSet,
    source: Locale,
    translator: &dyn Translator,
) -> Result<Vec<Rendition>, CapabilityError> {
    let unresolved = |e: LocaleError| CapabilityError::InvalidInput {
        capability: "translation",
        detail: e.to_string(),
    };
    let source_tag = resolve(source.code()).map_err(unresolved)?;
    let mut renditions = Vec::with_capacity(locales.len());

    for locale in locales.iter() {
        let (value, machine_translated) = if locale == source {
            (text.to_string(), false)
        } else if text.is_empty() {
            (String::new(), false)
        } else {
            let target_tag = resolve(locale.code()).map_err(unresolved)?;
            let translated = translator.translate(text, source_tag, target_tag).await?;
            (translated, true)
        };

        renditions.push(Rendition {
            locale,
            key: localized_key(key_prefix, locale),
            value,
            machine_translated,
        });
    }

    Ok(renditions)
}

/// Expand the scalar field `field` into one rendition per locale.
pub async fn expand_field(
    field: &str,
    record: &RecordView<'_>,
    locales: &LocaleSet,
    source: Locale,
    translator: &dyn Translator,
) -> Result<Vec<Rendition>, PipelineError> {
    let text = record.text(field)?;
    let renditions = localize(text, field, locales, source, translator).await?;

    debug!(
        "Expanded field '{}' from {} into {} locales",
        field,
        source,
        renditions.len()
    );
    Ok(renditions)
}

/// Expand every element of the list field named by `spec`.
///
/// The output has one item record per input element, in input order.
pub async fn expand_array(
    spec: &ArraySpec,
    record: &RecordView<'_>,
    locales: &LocaleSet,
    source: Locale,
    translator: &dyn Translator,
) -> Result<Vec<Record>, PipelineError> {
    let elements = record.text_list(spec.source)?;
    let mut items = Vec::with_capacity(elements.len());

    for element in elements {
        let renditions = localize(element, spec.item_prefix, locales, source, translator).await?;
        let item: Record = renditions
            .into_iter()
            .map(|rendition| (rendition.key, Value::String(rendition.value)))
            .collect();
        items.push(item);
    }

    debug!(
        "Expanded array '{}' into {} '{}' items",
        spec.source,
        items.len(),
        spec.output
    );
    Ok(items)
}
