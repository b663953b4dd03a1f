//! External capabilities consumed by the pipeline.
//!
//! Each capability is a narrow async trait so the pipeline can be driven by the
//! production HTTP backends or by deterministic test doubles. Handles are
//! built once at startup and shared read-only across requests.

mod fetch;
mod inference;
#[cfg(test)]
pub(crate) mod mock;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::config::Config;
use crate::error::{CapabilityError, NetworkError};
use crate::moderation::Verdict;

pub use fetch::HttpImageFetcher;
pub use inference::InferenceClient;

/// Translate text between two capability locale tags (e.g., "pl_PL" -> "en_XX").
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source_tag: &str,
        target_tag: &str,
    ) -> Result<String, CapabilityError>;
}

/// Produce a short caption for an encoded image.
#[async_trait]
pub trait Captioner: Send + Sync {
    async fn caption(&self, image: &[u8], mime: &str) -> Result<String, CapabilityError>;
}

/// Classify text into one of the moderation labels.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Verdict, CapabilityError>;
}

/// Download the bytes behind a URL.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, NetworkError>;
}

/// The set of capability handles injected into every pipeline.
#[derive(Clone)]
pub struct Capabilities {
    pub translator: Arc<dyn Translator>,
    pub captioner: Arc<dyn Captioner>,
    pub classifier: Arc<dyn Classifier>,
    pub fetcher: Arc<dyn ImageFetcher>,
}

impl Capabilities {
    /// Build the production handles: one inference client for the three model
    /// capabilities and a separate fetcher with its own timeout.
    pub fn from_config(config: &Config) -> Result<Self> {
        let model_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .context("Failed to build inference HTTP client")?;
        let fetch_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.image_fetch_timeout_secs))
            .build()
            .context("Failed to build image fetch HTTP client")?;

        let inference = Arc::new(InferenceClient::new(model_client, config));

        Ok(Self {
            translator: inference.clone(),
            captioner: inference.clone(),
            classifier: inference,
            fetcher: Arc::new(HttpImageFetcher::new(fetch_client, config.max_image_bytes)),
        })
    }
}
