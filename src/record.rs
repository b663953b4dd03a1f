//! Record access and assembly.
//!
//! Input records are read through an immutable `RecordView`; output records
//! are accumulated by a `RecordBuilder`. Nothing mutates the input.

use serde_json::{Map, Value};

use crate::error::PipelineError;
use crate::i18n::Locale;

/// A JSON object keyed by field name.
pub type Record = Map<String, Value>;

/// Key naming the record's source locale.
pub const LANGUAGE_FIELD: &str = "language";

/// Output key of a localized value: `description` + `EN` -> `descriptionEN`.
pub fn localized_key(prefix: &str, locale: Locale) -> String {
    format!("{}{}", prefix, locale.code())
}

/// Read-only, typed access to an input record.
#[derive(Debug, Clone, Copy)]
pub struct RecordView<'a> {
    fields: &'a Record,
}

impl<'a> RecordView<'a> {
    pub fn new(value: &'a Value) -> Result<Self, PipelineError> {
        value
            .as_object()
            .map(|fields| Self { fields })
            .ok_or_else(|| PipelineError::MalformedInput("expected a JSON object".to_string()))
    }

    /// The validated source locale named by `language`.
    pub fn source_locale(&self) -> Result<Locale, PipelineError> {
        let code = self.text(LANGUAGE_FIELD)?;
        Locale::from_code(code)
            .map_err(|_| PipelineError::MalformedInput(format!("unsupported language '{}'", code)))
    }

    /// A required string field.
    pub fn text(&self, name: &str) -> Result<&'a str, PipelineError> {
        match self.fields.get(name) {
            None => Err(PipelineError::MissingField(name.to_string())),
            Some(Value::String(value)) => Ok(value),
            Some(_) => Err(PipelineError::MalformedInput(format!(
                "field '{}' must be a string",
                name
            ))),
        }
    }

    /// A required list of strings. An empty list is valid; an absent key is not.
    pub fn text_list(&self, name: &str) -> Result<Vec<&'a str>, PipelineError> {
        let malformed = || {
            PipelineError::MalformedInput(format!("field '{}' must be a list of strings", name))
        };

        match self.fields.get(name) {
            None => Err(PipelineError::MissingField(name.to_string())),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| item.as_str().ok_or_else(malformed))
                .collect(),
            Some(_) => Err(malformed()),
        }
    }

    /// Copy every field not consumed by the pipeline.
    pub fn passthrough(&self, consumed: &[&str]) -> Record {
        self.fields
            .iter()
            .filter(|(key, _)| key.as_str() != LANGUAGE_FIELD && !consumed.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

/// Accumulates an output record.
#[derive(Debug, Default)]
pub struct RecordBuilder {
    fields: Record,
}

impl RecordBuilder {
    pub fn new(base: Record) -> Self {
        Self { fields: base }
    }

    pub fn insert_text(&mut self, key: String, value: String) -> &mut Self {
        self.fields.insert(key, Value::String(value));
        self
    }

    pub fn insert_items(&mut self, key: &str, items: Vec<Record>) -> &mut Self {
        self.fields.insert(
            key.to_string(),
            Value::Array(items.into_iter().map(Value::Object).collect()),
        );
        self
    }

    pub fn build(self) -> Record {
        self.fields
    }
}

/// Remove `language` and every consumed source field. Running it twice is a no-op.
pub fn prune(record: &mut Record, consumed: &[&str]) {
    record.remove(LANGUAGE_FIELD);
    for name in consumed {
        record.remove(*name);
    }
}
