//! Deterministic capability doubles for unit tests.
//!
//! Every double records its calls so tests can assert both what was returned
//! and whether a capability was reached at all.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::capability::{Captioner, Classifier, ImageFetcher, Translator};
use crate::error::{CapabilityError, NetworkError};
use crate::moderation::{ModerationLabel, Verdict};

/// A decodable 1x1 red PNG.
pub const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d,
    0x49, 0x48, 0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01,
    0x08, 0x02, 0x00, 0x00, 0x00, 0x90, 0x77, 0x53, 0xde, 0x00, 0x00, 0x00,
    0x0c, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0xf8, 0xcf, 0xc0, 0x00,
    0x00, 0x03, 0x01, 0x01, 0x00, 0xc9, 0xfe, 0x92, 0xef, 0x00, 0x00, 0x00,
    0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append the target tag: "hello" -> "hello_pl_PL"
    Suffix,
    /// Fail every call with a backend error
    Error,
}

/// Translator that records `(text, source_tag, target_tag)` for every call.
pub struct MockTranslator {
    mode: MockMode,
    calls: Mutex<Vec<(String, String, String)>>,
}

impl MockTranslator {
    pub fn new(mode: MockMode) -> Self {
        Self {
            mode,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        source_tag: &str,
        target_tag: &str,
    ) -> Result<String, CapabilityError> {
        self.calls.lock().unwrap().push((
            text.to_string(),
            source_tag.to_string(),
            target_tag.to_string(),
        ));
        match self.mode {
            MockMode::Suffix => Ok(format!("{}_{}", text, target_tag)),
            MockMode::Error => Err(CapabilityError::Backend {
                capability: "translation",
                status: 503,
                body: "mock translator unavailable".to_string(),
            }),
        }
    }
}

/// Classifier that always returns the same verdict.
pub struct FixedClassifier {
    verdict: Verdict,
    calls: Mutex<Vec<String>>,
}

impl FixedClassifier {
    pub fn new(label: ModerationLabel, score: f32) -> Self {
        Self {
            verdict: Verdict { label, score },
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Classifier for FixedClassifier {
    async fn classify(&self, text: &str) -> Result<Verdict, CapabilityError> {
        self.calls.lock().unwrap().push(text.to_string());
        Ok(self.verdict)
    }
}

pub struct FailingClassifier;

#[async_trait]
impl Classifier for FailingClassifier {
    async fn classify(&self, _text: &str) -> Result<Verdict, CapabilityError> {
        Err(CapabilityError::Backend {
            capability: "moderation",
            status: 500,
            body: "mock classifier unavailable".to_string(),
        })
    }
}

/// Captioner that returns a fixed caption and records the mime types it saw.
pub struct MockCaptioner {
    caption: String,
    calls: Mutex<Vec<String>>,
}

impl MockCaptioner {
    pub fn new(caption: &str) -> Self {
        Self {
            caption: caption.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Captioner for MockCaptioner {
    async fn caption(&self, _image: &[u8], mime: &str) -> Result<String, CapabilityError> {
        self.calls.lock().unwrap().push(mime.to_string());
        Ok(self.caption.clone())
    }
}

/// Fetcher that serves fixed bytes, or fails with a status error.
pub struct MockFetcher {
    body: Option<Vec<u8>>,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn serving(body: &[u8]) -> Self {
        Self {
            body: Some(body.to_vec()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn not_found() -> Self {
        Self {
            body: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, NetworkError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.body.clone().ok_or_else(|| NetworkError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}
