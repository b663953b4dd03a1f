//! Locale type and the locale codec.
//!
//! `Locale` can only be constructed from a registered code, so every value in
//! circulation already knows its code. `resolve` is the code-to-tag lookup
//! the expanders use when calling the translation capability.

use std::fmt;

use crate::error::LocaleError;
use crate::i18n::registry::{ENGLISH, POLISH, RUSSIAN, UKRAINIAN};
use crate::i18n::{LocaleConfig, LocaleRegistry};

/// A validated locale.
#[derive(Debug, Clone, Copy)]
pub struct Locale {
    config: &'static LocaleConfig,
}

impl Locale {
    pub const POLISH: Locale = Locale { config: &POLISH };
    pub const ENGLISH: Locale = Locale { config: &ENGLISH };
    pub const UKRAINIAN: Locale = Locale { config: &UKRAINIAN };
    pub const RUSSIAN: Locale = Locale { config: &RUSSIAN };

    /// Create a Locale from an application code such as "PL".
    ///
    /// # Returns
    /// * `Ok(Locale)` if the code is registered
    /// * `Err(LocaleError::Unknown)` otherwise
    pub fn from_code(code: &str) -> Result<Locale, LocaleError> {
        LocaleRegistry::get()
            .get_by_code(code)
            .map(|config| Locale { config })
            .ok_or_else(|| LocaleError::Unknown(code.to_string()))
    }

    /// Application code (e.g., "UA").
    pub fn code(&self) -> &'static str {
        self.config.code
    }

    /// Tag understood by the translation capability (e.g., "uk_UA").
    pub fn capability_tag(&self) -> &'static str {
        self.config.capability_tag
    }

    /// Full registry entry for this locale.
    pub fn config(&self) -> &'static LocaleConfig {
        self.config
    }
}

impl PartialEq for Locale {
    fn eq(&self, other: &Self) -> bool {
        self.config.code == other.config.code
    }
}

impl Eq for Locale {}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Map an application locale code to its translation-capability tag.
pub fn resolve(code: &str) -> Result<&'static str, LocaleError> {
    Locale::from_code(code).map(|locale| locale.capability_tag())
}

/// Ordered set of locales every record is expanded into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSet {
    locales: Vec<Locale>,
}

impl LocaleSet {
    /// Every registered locale, in registry order.
    pub fn all() -> Self {
        Self {
            locales: LocaleRegistry::get()
                .list_all()
                .into_iter()
                .map(|config| Locale { config })
                .collect(),
        }
    }

    /// Build a set from codes, keeping their order and dropping repeats.
    pub fn from_codes<S: AsRef<str>>(codes: &[S]) -> Result<Self, LocaleError> {
        let mut locales: Vec<Locale> = Vec::with_capacity(codes.len());
        for code in codes {
            let locale = Locale::from_code(code.as_ref())?;
            if !locales.contains(&locale) {
                locales.push(locale);
            }
        }
        if locales.is_empty() {
            return Err(LocaleError::EmptySet);
        }
        Ok(Self { locales })
    }

    pub fn contains(&self, locale: Locale) -> bool {
        self.locales.contains(&locale)
    }

    pub fn iter(&self) -> impl Iterator<Item = Locale> + '_ {
        self.locales.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.locales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locales.is_empty()
    }
}

impl Default for LocaleSet {
    fn default() -> Self {
        Self::all()
    }
}
