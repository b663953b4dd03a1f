//! Pipeline orchestrator.
//!
//! A `Pipeline` pairs one immutable `PipelineShape` with the locale set, the
//! moderation settings and the capability handles. Each `run` is independent:
//!
//! ```text
//! Start -> Translating -> (Moderating) -> ArrayTranslating -> (Captioning) -> Pruned
//! ```
//!
//! `Moderating` may end the run with `PipelineOutcome::Aborted`; any stage may
//! fail with a `PipelineError`. No partial record is ever returned.

use std::fmt;

use anyhow::{bail, Result};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::caption::{augment_caption, ALT_FIELD};
use crate::capability::Capabilities;
use crate::config::Config;
use crate::error::PipelineError;
use crate::expand::{expand_array, expand_field, ArraySpec, Rendition};
use crate::i18n::{Locale, LocaleSet};
use crate::moderation::{moderate, GateDecision, ModerationAbort, ModerationPolicy};
use crate::record::{localized_key, prune, Record, RecordBuilder, RecordView};

/// Which fields a route expands and which optional steps apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineShape {
    pub name: &'static str,
    pub fields: Vec<&'static str>,
    pub arrays: Vec<ArraySpec>,
    /// Scalar field whose rendering in the moderation locale is classified
    pub moderation_field: Option<&'static str>,
    /// Field holding an image URL to caption
    pub image_field: Option<&'static str>,
}

impl PipelineShape {
    pub fn event() -> Self {
        Self {
            name: "event",
            fields: vec!["name", "description"],
            arrays: vec![ArraySpec {
                source: "shiftDirections",
                output: "shiftTranslations",
                item_prefix: "addressDescription",
            }],
            moderation_field: Some("description"),
            image_field: Some("imageUrl"),
        }
    }

    pub fn report() -> Self {
        Self::fields_only("report", vec!["report"])
    }

    pub fn organisation() -> Self {
        Self::fields_only("organisation", vec!["description"])
    }

    pub fn faq() -> Self {
        Self::fields_only("faq", vec!["question", "answer"])
    }

    fn fields_only(name: &'static str, fields: Vec<&'static str>) -> Self {
        Self {
            name,
            fields,
            arrays: Vec::new(),
            moderation_field: None,
            image_field: None,
        }
    }

    /// Every input key the shape consumes; none of them survive into the output.
    pub fn consumed(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .copied()
            .chain(self.arrays.iter().map(|array| array.source))
            .chain(self.image_field)
            .collect()
    }
}

/// Progress of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Translating,
    Moderating,
    ArrayTranslating,
    Captioning,
    Pruned,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::Translating => "translating",
            Stage::Moderating => "moderating",
            Stage::ArrayTranslating => "array translating",
            Stage::Captioning => "captioning",
            Stage::Pruned => "pruned",
        };
        f.write_str(name)
    }
}

/// Successful end states of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    Completed(Record),
    Aborted(ModerationAbort),
}

#[derive(Debug, Clone)]
struct ModerationGate {
    field: &'static str,
    locale: Locale,
    policy: ModerationPolicy,
}

pub struct Pipeline {
    shape: PipelineShape,
    locales: LocaleSet,
    moderation: Option<ModerationGate>,
    append_ai_notice: bool,
    capabilities: Capabilities,
}

impl Pipeline {
    /// Bind a shape to the configured locales, moderation policy and capabilities.
    pub fn new(shape: PipelineShape, config: &Config, capabilities: Capabilities) -> Result<Self> {
        let moderation = match shape.moderation_field {
            Some(field) if config.moderation_enabled => {
                if !shape.fields.contains(&field) {
                    bail!(
                        "{} pipeline moderates '{}', which it does not expand",
                        shape.name,
                        field
                    );
                }
                if !config.locales.contains(config.moderation_locale) {
                    bail!(
                        "{} pipeline moderates in {}, which is not a configured locale",
                        shape.name,
                        config.moderation_locale
                    );
                }
                Some(ModerationGate {
                    field,
                    locale: config.moderation_locale,
                    policy: ModerationPolicy::new(config.blocked_labels.clone()),
                })
            }
            _ => None,
        };

        Ok(Self {
            shape,
            locales: config.locales.clone(),
            moderation,
            append_ai_notice: config.append_ai_notice,
            capabilities,
        })
    }

    pub fn shape(&self) -> &PipelineShape {
        &self.shape
    }

    pub fn moderates(&self) -> bool {
        self.moderation.is_some()
    }

    /// Expand one input record.
    pub async fn run(&self, input: &Value) -> Result<PipelineOutcome, PipelineError> {
        let mut stage = Stage::Start;
        let result = self.execute(input, &mut stage).await;

        match &result {
            Ok(PipelineOutcome::Completed(_)) => {
                info!("{} pipeline completed", self.shape.name)
            }
            Ok(PipelineOutcome::Aborted(abort)) => info!(
                "{} pipeline aborted by moderation ({})",
                self.shape.name, abort.verdict.label
            ),
            Err(e) if e.is_input_error() => {
                info!("{} pipeline rejected input: {}", self.shape.name, e)
            }
            Err(e) => warn!(
                "{} pipeline failed while {}: {}",
                self.shape.name, stage, e
            ),
        }

        result
    }

    fn enter(&self, stage: &mut Stage, next: Stage) {
        debug!("{} pipeline: {} -> {}", self.shape.name, stage, next);
        *stage = next;
    }

    async fn execute(
        &self,
        input: &Value,
        stage: &mut Stage,
    ) -> Result<PipelineOutcome, PipelineError> {
        let record = RecordView::new(input)?;
        let source = record.source_locale()?;
        if !self.locales.contains(source) {
            return Err(PipelineError::MalformedInput(format!(
                "unsupported language '{}'",
                source
            )));
        }

        // Reject incomplete records before any capability call
        for field in &self.shape.fields {
            record.text(field)?;
        }
        for array in &self.shape.arrays {
            record.text_list(array.source)?;
        }
        let image_url = self
            .shape
            .image_field
            .map(|field| record.text(field))
            .transpose()?;

        let consumed = self.shape.consumed();
        let translator = self.capabilities.translator.as_ref();

        self.enter(stage, Stage::Translating);
        let mut renditions: Vec<Rendition> = Vec::new();
        for field in &self.shape.fields {
            renditions
                .extend(expand_field(field, &record, &self.locales, source, translator).await?);
        }

        if let Some(gate) = &self.moderation {
            self.enter(stage, Stage::Moderating);
            let target = localized_key(gate.field, gate.locale);
            let text = renditions
                .iter()
                .find(|rendition| rendition.key == target)
                .map(|rendition| rendition.value.as_str())
                .unwrap_or_default();

            let decision =
                moderate(text, self.capabilities.classifier.as_ref(), &gate.policy).await?;
            if let GateDecision::Abort(abort) = decision {
                return Ok(PipelineOutcome::Aborted(abort));
            }
        }

        // `alt` is only ever produced by captioning
        let mut reserved = consumed.clone();
        if self.shape.image_field.is_some() {
            reserved.push(ALT_FIELD);
        }
        let mut output = RecordBuilder::new(record.passthrough(&reserved));
        for mut rendition in renditions {
            if self.append_ai_notice {
                rendition.annotate();
            }
            output.insert_text(rendition.key, rendition.value);
        }

        self.enter(stage, Stage::ArrayTranslating);
        for array in &self.shape.arrays {
            let items = expand_array(array, &record, &self.locales, source, translator).await?;
            output.insert_items(array.output, items);
        }

        if let Some(url) = image_url {
            self.enter(stage, Stage::Captioning);
            let caption = augment_caption(
                url,
                self.capabilities.fetcher.as_ref(),
                self.capabilities.captioner.as_ref(),
            )
            .await?;
            if let Some(alt) = caption {
                output.insert_text(ALT_FIELD.to_string(), alt);
            }
        }

        let mut expanded = output.build();
        prune(&mut expanded, &consumed);
        self.enter(stage, Stage::Pruned);

        Ok(PipelineOutcome::Completed(expanded))
    }
}
