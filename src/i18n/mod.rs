//! Locale support for record expansion.
//!
//! - `registry`: the fixed table of supported locales and their capability tags
//! - `locale`: validated `Locale` values, the ordered `LocaleSet`, and `resolve`
//! - `strings`: localized strings written into output records
//!
//! # Example
//!
//! ```rust,ignore
//! use content_localizer::i18n::{resolve, LocaleSet};
//!
//! assert_eq!(resolve("UA")?, "uk_UA");
//! let locales = LocaleSet::from_codes(&["PL", "EN"])?;
//! ```

mod locale;
mod registry;
mod strings;

pub use locale::{resolve, Locale, LocaleSet};
pub use registry::{LocaleConfig, LocaleRegistry};
pub use strings::LocaleStrings;
