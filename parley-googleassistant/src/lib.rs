//! Google Assistant conversational actions backend.
//!
//! Writes an Actions SDK project: intents under `custom/intents`, types under
//! `custom/types`, localized settings under `settings`, plus the manifest,
//! project settings, webhook and action registry.

mod converter;
mod locales;
mod phrase;
mod platform;

pub mod files;

pub use converter::GoogleAssistantConverter;
pub use locales::SUPPORTED_LOCALES;
pub use phrase::{from_native_phrase, to_native_phrase};
pub use platform::GoogleAssistantPlatform;

/// Key of Google Assistant values in the canonical model.
pub const PLATFORM_KEY: &str = "googleAssistant";

/// Webhook name used when none is configured.
pub const DEFAULT_WEBHOOK: &str = "Parley";
