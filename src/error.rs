//! Error types for the localization pipeline.
//!
//! `PipelineError` separates client mistakes (a missing or malformed field,
//! reported in-body) from backend faults (capability or network failures,
//! reported as server errors). A moderation abort is not an error and lives
//! in `crate::moderation`.

use thiserror::Error;

/// Lookup failures in the locale codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocaleError {
    #[error("unknown locale code '{0}'")]
    Unknown(String),

    #[error("locale set must contain at least one locale")]
    EmptySet,
}

/// Failure reported by a translation, captioning or classification backend.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("{capability} request failed: {source}")]
    Transport {
        capability: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{capability} backend error ({status}): {body}")]
    Backend {
        capability: &'static str,
        status: u16,
        body: String,
    },

    #[error("{capability} returned an unexpected response: {detail}")]
    InvalidResponse {
        capability: &'static str,
        detail: String,
    },

    #[error("{capability} rejected its input: {detail}")]
    InvalidInput {
        capability: &'static str,
        detail: String,
    },
}

impl CapabilityError {
    /// Which capability failed ("translation", "captioning" or "moderation").
    pub fn capability(&self) -> &'static str {
        match self {
            CapabilityError::Transport { capability, .. }
            | CapabilityError::Backend { capability, .. }
            | CapabilityError::InvalidResponse { capability, .. }
            | CapabilityError::InvalidInput { capability, .. } => capability,
        }
    }
}

/// Failure while downloading a referenced image.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("image fetch from {url} timed out")]
    Timeout { url: String },

    #[error("image fetch from {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("image at {url} exceeds the {limit} byte limit")]
    TooLarge { url: String, limit: u64 },

    #[error("image fetch from {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Everything that can fail a pipeline invocation.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A required key is absent from the input record.
    #[error("Missing key: '{0}'")]
    MissingField(String),

    /// The input is not a JSON object, or a field has the wrong type or value.
    #[error("Invalid JSON data: {0}")]
    MalformedInput(String),

    #[error(transparent)]
    Capability(#[from] CapabilityError),

    #[error(transparent)]
    Network(#[from] NetworkError),
}

impl PipelineError {
    /// Whether the caller caused the failure and can fix it by resubmitting.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PipelineError::MissingField(_) | PipelineError::MalformedInput(_)
        )
    }

    /// Message safe to return to the caller.
    ///
    /// Input errors are reported in full. Backend failures only name the
    /// failing step; their detail (URLs, upstream bodies) stays in the logs.
    pub fn client_message(&self) -> String {
        match self {
            PipelineError::MissingField(_) | PipelineError::MalformedInput(_) => self.to_string(),
            PipelineError::Capability(e) => format!("{} service failed", e.capability()),
            PipelineError::Network(_) => "image fetch failed".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message_quotes_key() {
        let err = PipelineError::MissingField("description".to_string());
        assert_eq!(err.to_string(), "Missing key: 'description'");
    }

    #[test]
    fn test_malformed_input_message() {
        let err = PipelineError::MalformedInput("field 'name' must be a string".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid JSON data: field 'name' must be a string"
        );
    }

    #[test]
    fn test_backend_error_message_includes_status() {
        let err = PipelineError::from(CapabilityError::Backend {
            capability: "translation",
            status: 503,
            body: "model loading".to_string(),
        });
        let message = err.to_string();
        assert!(message.contains("translation"));
        assert!(message.contains("503"));
        assert!(message.contains("model loading"));
    }

    #[test]
    fn test_client_message_hides_backend_detail() {
        let err = PipelineError::from(CapabilityError::Backend {
            capability: "translation",
            status: 503,
            body: "internal trace at 10.0.0.5".to_string(),
        });
        assert_eq!(err.client_message(), "translation service failed");

        let err = PipelineError::from(NetworkError::Status {
            url: "http://internal.example.com/a.png".into(),
            status: 404,
        });
        assert_eq!(err.client_message(), "image fetch failed");

        let err = PipelineError::MissingField("report".into());
        assert_eq!(err.client_message(), "Missing key: 'report'");
    }

    #[test]
    fn test_is_input_error() {
        assert!(PipelineError::MissingField("x".into()).is_input_error());
        assert!(PipelineError::MalformedInput("x".into()).is_input_error());
        assert!(!PipelineError::from(NetworkError::Timeout {
            url: "http://example.com/a.png".into()
        })
        .is_input_error());
        assert!(!PipelineError::from(CapabilityError::InvalidResponse {
            capability: "captioning",
            detail: "empty".into()
        })
        .is_input_error());
    }

    #[test]
    fn test_locale_error_messages() {
        assert_eq!(
            LocaleError::Unknown("FR".into()).to_string(),
            "unknown locale code 'FR'"
        );
        assert!(LocaleError::EmptySet.to_string().contains("at least one"));
    }
}
