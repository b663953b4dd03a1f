//! Locale registry: single source of truth for all supported locales.
//!
//! The registry pairs every application locale code with the tag the
//! translation capability expects. The table is static and immutable.

use crate::i18n::LocaleStrings;

/// Configuration for a supported locale.
#[derive(Debug, Clone)]
pub struct LocaleConfig {
    /// Application locale code as it appears in records (e.g., "PL", "UA")
    pub code: &'static str,

    /// Locale tag understood by the translation capability (e.g., "pl_PL")
    pub capability_tag: &'static str,

    /// Localized strings attached to output records
    pub strings: LocaleStrings,
}

/// Global locale registry singleton.
pub struct LocaleRegistry {
    locales: &'static [LocaleConfig],
}

static REGISTRY: LocaleRegistry = LocaleRegistry { locales: &LOCALES };

impl LocaleRegistry {
    /// Get the global locale registry instance.
    pub fn get() -> &'static LocaleRegistry {
        &REGISTRY
    }

    /// Get a locale configuration by its application code.
    ///
    /// Codes are matched exactly; records always carry upper-case codes.
    pub fn get_by_code(&self, code: &str) -> Option<&LocaleConfig> {
        self.locales.iter().find(|locale| locale.code == code)
    }

    /// Get all locales in registry order.
    pub fn list_all(&self) -> Vec<&LocaleConfig> {
        self.locales.iter().collect()
    }
}

pub(crate) const POLISH: LocaleConfig = LocaleConfig {
    code: "PL",
    capability_tag: "pl_PL",
    strings: LocaleStrings::polish(),
};

pub(crate) const ENGLISH: LocaleConfig = LocaleConfig {
    code: "EN",
    capability_tag: "en_XX",
    strings: LocaleStrings::english(),
};

pub(crate) const UKRAINIAN: LocaleConfig = LocaleConfig {
    code: "UA",
    capability_tag: "uk_UA",
    strings: LocaleStrings::ukrainian(),
};

pub(crate) const RUSSIAN: LocaleConfig = LocaleConfig {
    code: "RU",
    capability_tag: "ru_RU",
    strings: LocaleStrings::russian(),
};

/// Supported locales. Registry order is the default output order of every
/// expanded field.
static LOCALES: [LocaleConfig; 4] = [POLISH, ENGLISH, UKRAINIAN, RUSSIAN];
