//! Project files of an Actions SDK project.

mod manifest;
mod settings;
mod webhook;

pub use manifest::Manifest;
pub use settings::{SETTINGS, Settings};
pub use webhook::Webhook;
