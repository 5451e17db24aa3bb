//! `parley.toml` parsing and validation.
//!
//! The project file declares the project metadata, the locale resolution
//! tables, canonical-model overrides and one typed section per platform.
//! Stage overlays (`[stages.<name>]`) are merged over the root before the
//! file is typed.

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;
mod project;

pub use error::{Error, Result};
pub use project::{
    AlexaConfig, GoogleAssistantConfig, LocaleTable, PlatformSettings, Platforms, ProjectConfig,
    ProjectFile, ProjectSection,
};
