use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capability::{Captioner, Classifier, Translator};
use crate::config::Config;
use crate::error::CapabilityError;
use crate::moderation::{ModerationLabel, Verdict};

const TRANSLATION: &str = "translation";
const CAPTIONING: &str = "captioning";
const MODERATION: &str = "moderation";

/// Translation request: `{"inputs": ..., "parameters": {"src_lang", "tgt_lang"}}`
#[derive(Debug, Serialize)]
struct TranslationRequest<'a> {
    inputs: &'a str,
    parameters: TranslationParameters<'a>,
}

#[derive(Debug, Serialize)]
struct TranslationParameters<'a> {
    src_lang: &'a str,
    tgt_lang: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslationOutput {
    translation_text: String,
}

#[derive(Debug, Deserialize)]
struct CaptionOutput {
    generated_text: String,
}

/// Zero-shot classification over the fixed moderation labels
#[derive(Debug, Serialize)]
struct ClassificationRequest<'a> {
    inputs: &'a str,
    parameters: ClassificationParameters,
}

#[derive(Debug, Serialize)]
struct ClassificationParameters {
    candidate_labels: Vec<&'static str>,
}

/// Labels and scores, sorted by descending score
#[derive(Debug, Deserialize)]
struct ClassificationOutput {
    labels: Vec<String>,
    scores: Vec<f32>,
}

/// Client for a Hugging Face style inference API.
///
/// Each capability posts to `{base_url}/{model}` with an optional bearer
/// token. Timeouts come from the `reqwest::Client` the caller builds.
pub struct InferenceClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
    translation_model: String,
    caption_model: String,
    moderation_model: String,
}

impl InferenceClient {
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.inference_api_url.trim_end_matches('/').to_string(),
            token: config.inference_api_token.clone(),
            translation_model: config.translation_model.clone(),
            caption_model: config.caption_model.clone(),
            moderation_model: config.moderation_model.clone(),
        }
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/{}", self.base_url, model)
    }

    /// Send a prepared request and return the body of a successful response.
    async fn send(
        &self,
        capability: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, CapabilityError> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|source| CapabilityError::Transport { capability, source })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            return Err(CapabilityError::Backend {
                capability,
                status,
                body,
            });
        }

        Ok(response)
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        capability: &'static str,
        response: reqwest::Response,
    ) -> Result<T, CapabilityError> {
        response
            .json()
            .await
            .map_err(|e| CapabilityError::InvalidResponse {
                capability,
                detail: e.to_string(),
            })
    }
}

#[async_trait]
impl Translator for InferenceClient {
    async fn translate(
        &self,
        text: &str,
        source_tag: &str,
        target_tag: &str,
    ) -> Result<String, CapabilityError> {
        debug!("Translating {} chars {} -> {}", text.len(), source_tag, target_tag);

        let payload = TranslationRequest {
            inputs: text,
            parameters: TranslationParameters {
                src_lang: source_tag,
                tgt_lang: target_tag,
            },
        };
        let request = self
            .client
            .post(self.model_url(&self.translation_model))
            .json(&payload);

        let response = self.send(TRANSLATION, request).await?;
        let outputs: Vec<TranslationOutput> = Self::parse(TRANSLATION, response).await?;

        outputs
            .into_iter()
            .next()
            .map(|output| output.translation_text)
            .ok_or_else(|| CapabilityError::InvalidResponse {
                capability: TRANSLATION,
                detail: "response contained no translations".to_string(),
            })
    }
}

#[async_trait]
impl Captioner for InferenceClient {
    async fn caption(&self, image: &[u8], mime: &str) -> Result<String, CapabilityError> {
        debug!("Captioning {} byte {} image", image.len(), mime);

        let request = self
            .client
            .post(self.model_url(&self.caption_model))
            .header(CONTENT_TYPE, mime)
            .body(image.to_vec());

        let response = self.send(CAPTIONING, request).await?;
        let outputs: Vec<CaptionOutput> = Self::parse(CAPTIONING, response).await?;

        outputs
            .into_iter()
            .next()
            .map(|output| output.generated_text.trim().to_string())
            .ok_or_else(|| CapabilityError::InvalidResponse {
                capability: CAPTIONING,
                detail: "response contained no captions".to_string(),
            })
    }
}

#[async_trait]
impl Classifier for InferenceClient {
    async fn classify(&self, text: &str) -> Result<Verdict, CapabilityError> {
        let payload = ClassificationRequest {
            inputs: text,
            parameters: ClassificationParameters {
                candidate_labels: ModerationLabel::ALL.iter().map(|l| l.as_str()).collect(),
            },
        };
        let request = self
            .client
            .post(self.model_url(&self.moderation_model))
            .json(&payload);

        let response = self.send(MODERATION, request).await?;
        let output: ClassificationOutput = Self::parse(MODERATION, response).await?;

        let (label, score) = output
            .labels
            .first()
            .zip(output.scores.first())
            .ok_or_else(|| CapabilityError::InvalidResponse {
                capability: MODERATION,
                detail: "response contained no labels".to_string(),
            })?;

        let label = label
            .parse::<ModerationLabel>()
            .map_err(|e| CapabilityError::InvalidResponse {
                capability: MODERATION,
                detail: e.to_string(),
            })?;

        Ok(Verdict {
            label,
            score: *score,
        })
    }
}
