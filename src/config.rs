use anyhow::{bail, Context, Result};

use crate::i18n::{Locale, LocaleSet};
use crate::moderation::ModerationLabel;

pub const DEFAULT_INFERENCE_API_URL: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_TRANSLATION_MODEL: &str = "facebook/mbart-large-50-many-to-many-mmt";
pub const DEFAULT_CAPTION_MODEL: &str = "microsoft/git-base-coco";
pub const DEFAULT_MODERATION_MODEL: &str = "facebook/bart-large-mnli";
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,
    pub api_key: Option<String>,

    // Inference backend
    pub inference_api_url: String,
    pub inference_api_token: Option<String>,
    pub translation_model: String,
    pub caption_model: String,
    pub moderation_model: String,

    // Moderation
    pub moderation_enabled: bool,
    pub moderation_locale: Locale,
    pub blocked_labels: Vec<ModerationLabel>,

    // Localization
    pub locales: LocaleSet,
    pub append_ai_notice: bool,

    // Timeouts
    pub http_timeout_secs: u64,
    pub image_fetch_timeout_secs: u64,

    // Largest image body the fetcher will buffer
    pub max_image_bytes: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            api_key: None,
            inference_api_url: DEFAULT_INFERENCE_API_URL.to_string(),
            inference_api_token: None,
            translation_model: DEFAULT_TRANSLATION_MODEL.to_string(),
            caption_model: DEFAULT_CAPTION_MODEL.to_string(),
            moderation_model: DEFAULT_MODERATION_MODEL.to_string(),
            moderation_enabled: true,
            moderation_locale: Locale::ENGLISH,
            blocked_labels: ModerationLabel::default_blocked(),
            locales: LocaleSet::all(),
            append_ai_notice: false,
            http_timeout_secs: 60,
            image_fetch_timeout_secs: 10,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let locales = match optional_var("LOCALES") {
            Some(raw) => LocaleSet::from_codes(&split_list(&raw))
                .with_context(|| format!("Invalid LOCALES value: '{}'", raw))?,
            None => defaults.locales,
        };

        let moderation_locale = match optional_var("MODERATION_LOCALE") {
            Some(raw) => Locale::from_code(&raw)
                .with_context(|| format!("Invalid MODERATION_LOCALE value: '{}'", raw))?,
            None => defaults.moderation_locale,
        };

        let blocked_labels = match optional_var("MODERATION_BLOCKED_LABELS") {
            Some(raw) => split_list(&raw)
                .iter()
                .map(|label| label.parse::<ModerationLabel>())
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("Invalid MODERATION_BLOCKED_LABELS value: '{}'", raw))?,
            None => defaults.blocked_labels,
        };

        let config = Self {
            // Server
            port: parse_var("PORT", defaults.port)?,
            api_key: optional_var("API_KEY"),

            // Inference backend
            inference_api_url: optional_var("INFERENCE_API_URL")
                .unwrap_or(defaults.inference_api_url),
            inference_api_token: optional_var("INFERENCE_API_TOKEN"),
            translation_model: optional_var("TRANSLATION_MODEL")
                .unwrap_or(defaults.translation_model),
            caption_model: optional_var("CAPTION_MODEL").unwrap_or(defaults.caption_model),
            moderation_model: optional_var("MODERATION_MODEL")
                .unwrap_or(defaults.moderation_model),

            // Moderation
            moderation_enabled: parse_bool_var("MODERATION_ENABLED", defaults.moderation_enabled)?,
            moderation_locale,
            blocked_labels,

            // Localization
            locales,
            append_ai_notice: parse_bool_var("APPEND_AI_NOTICE", defaults.append_ai_notice)?,

            // Timeouts
            http_timeout_secs: parse_var("HTTP_TIMEOUT_SECS", defaults.http_timeout_secs)?,
            image_fetch_timeout_secs: parse_var(
                "IMAGE_FETCH_TIMEOUT_SECS",
                defaults.image_fetch_timeout_secs,
            )?,

            max_image_bytes: parse_var("MAX_IMAGE_BYTES", defaults.max_image_bytes)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject combinations that would make a pipeline unusable.
    pub fn validate(&self) -> Result<()> {
        if self.moderation_enabled && !self.locales.contains(self.moderation_locale) {
            bail!(
                "MODERATION_LOCALE '{}' is not one of the configured LOCALES",
                self.moderation_locale
            );
        }
        if self.http_timeout_secs == 0 || self.image_fetch_timeout_secs == 0 {
            bail!("Timeouts must be at least one second");
        }
        if self.max_image_bytes == 0 {
            bail!("MAX_IMAGE_BYTES must be greater than zero");
        }
        Ok(())
    }
}

/// Read a variable, treating an empty value as unset.
fn optional_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_var(name) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("Invalid {} value: '{}'", name, raw)),
        None => Ok(default),
    }
}

fn parse_bool_var(name: &str, default: bool) -> Result<bool> {
    match optional_var(name) {
        Some(raw) => match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => bail!("Invalid {} value: '{}'", name, raw),
        },
        None => Ok(default),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
