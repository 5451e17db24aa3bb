//! Alexa skill backend.
//!
//! Converts canonical models to Alexa interaction models under
//! `skill-package/interactionModels/custom/<locale>.json` and back, and
//! generates the ASK CLI project files (`skill.json`, `ask-resources.json`,
//! `.ask/ask-states.json`).

mod converter;
mod locales;
mod native;
mod platform;

pub mod files;

pub use converter::AlexaConverter;
pub use locales::SUPPORTED_LOCALES;
pub use native::{AlexaIntent, AlexaModel, InteractionModel, LanguageModel, Slot, SlotType};
pub use platform::AlexaPlatform;

/// Key of Alexa-specific values in the canonical model.
pub const PLATFORM_KEY: &str = "alexa";

/// Path segments of the interaction model directory.
pub const MODEL_DIR: [&str; 3] = ["skill-package", "interactionModels", "custom"];
