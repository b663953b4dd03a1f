//! Content localization service.
//!
//! Expands content records into every configured locale, gates events
//! through a moderation classifier and captions their images.

pub mod caption;
pub mod capability;
pub mod config;
pub mod error;
pub mod expand;
pub mod i18n;
pub mod moderation;
pub mod pipeline;
pub mod record;
pub mod security;
pub mod server;
