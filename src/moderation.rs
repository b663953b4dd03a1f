//! Moderation gate.
//!
//! The gate classifies one already-localized rendering and aborts the pipeline
//! when the top label is blocked. The confidence score is reported but never
//! part of the decision.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::capability::Classifier;
use crate::error::CapabilityError;

/// HTTP status and `error_code` of a moderation abort.
pub const ABORT_STATUS: u16 = 420;

/// Message returned with a moderation abort.
pub const ABORT_MESSAGE: &str = "Inappropriate content";

/// Fixed set of labels a classifier may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModerationLabel {
    Acceptable,
    Inappropriate,
    Offensive,
    Violent,
}

impl ModerationLabel {
    pub const ALL: [ModerationLabel; 4] = [
        ModerationLabel::Acceptable,
        ModerationLabel::Inappropriate,
        ModerationLabel::Offensive,
        ModerationLabel::Violent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationLabel::Acceptable => "acceptable",
            ModerationLabel::Inappropriate => "inappropriate",
            ModerationLabel::Offensive => "offensive",
            ModerationLabel::Violent => "violent",
        }
    }

    /// Every label except `acceptable`.
    pub fn default_blocked() -> Vec<ModerationLabel> {
        vec![
            ModerationLabel::Inappropriate,
            ModerationLabel::Offensive,
            ModerationLabel::Violent,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown moderation label '{0}'")]
pub struct UnknownLabel(pub String);

impl FromStr for ModerationLabel {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        ModerationLabel::ALL
            .into_iter()
            .find(|label| label.as_str() == normalized)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

impl fmt::Display for ModerationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier output: the top label and its confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub label: ModerationLabel,
    pub score: f32,
}

/// Terminal outcome of a blocked record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModerationAbort {
    pub verdict: Verdict,
}

impl ModerationAbort {
    pub fn status(&self) -> u16 {
        ABORT_STATUS
    }

    pub fn body(&self) -> AbortBody {
        AbortBody {
            error_code: ABORT_STATUS,
            message: ABORT_MESSAGE,
        }
    }
}

/// Response body of a moderation abort. Carries no record data.
#[derive(Debug, Serialize)]
pub struct AbortBody {
    pub error_code: u16,
    pub message: &'static str,
}

/// Result of running the gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GateDecision {
    Pass,
    Abort(ModerationAbort),
}

/// Labels that abort the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModerationPolicy {
    blocked: Vec<ModerationLabel>,
}

impl ModerationPolicy {
    pub fn new(blocked: Vec<ModerationLabel>) -> Self {
        Self { blocked }
    }

    pub fn is_blocked(&self, label: ModerationLabel) -> bool {
        self.blocked.contains(&label)
    }
}

impl Default for ModerationPolicy {
    fn default() -> Self {
        Self::new(ModerationLabel::default_blocked())
    }
}

/// Classify `text` and decide whether the record may proceed.
///
/// Empty text carries nothing to moderate and passes without a classifier call.
pub async fn moderate(
    text: &str,
    classifier: &dyn Classifier,
    policy: &ModerationPolicy,
) -> Result<GateDecision, CapabilityError> {
    if text.is_empty() {
        debug!("Moderation target is empty, skipping classification");
        return Ok(GateDecision::Pass);
    }

    let verdict = classifier.classify(text).await?;
    debug!(
        "Moderation verdict: {} (score {:.3})",
        verdict.label, verdict.score
    );

    if policy.is_blocked(verdict.label) {
        warn!(
            "Record rejected by moderation: label '{}' (score {:.3})",
            verdict.label, verdict.score
        );
        return Ok(GateDecision::Abort(ModerationAbort { verdict }));
    }

    Ok(GateDecision::Pass)
}
