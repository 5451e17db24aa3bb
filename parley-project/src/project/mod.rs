//! Project configuration types and parsing for parley.toml files.

mod file;
mod locales;
mod parse;
mod platform;
mod stage;
mod validate;

use std::path::PathBuf;

pub use file::ProjectFile;
use indexmap::IndexMap;
pub use locales::LocaleTable;
pub use platform::{AlexaConfig, GoogleAssistantConfig, PlatformSettings, Platforms};
use serde::Deserialize;

/// Root configuration of parley.toml
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ProjectConfig {
    /// Project metadata
    pub project: ProjectSection,

    /// Project-wide locale resolution table
    #[serde(default)]
    pub locales: LocaleTable,

    /// Project-level canonical-model override fragment
    #[serde(default)]
    pub model: Option<toml::Table>,

    /// Per-platform configuration
    #[serde(default)]
    pub platforms: Platforms,

    /// Stage overlays, merged over the root when a stage is selected
    #[serde(default)]
    pub stages: IndexMap<String, toml::Table>,
}

impl ProjectConfig {
    /// The settings of a platform by id, if configured.
    pub fn platform(&self, id: &str) -> Option<&dyn PlatformSettings> {
        match id {
            "alexa" => self.platforms.alexa.as_ref().map(|c| c as &dyn PlatformSettings),
            "googleassistant" => self
                .platforms
                .googleassistant
                .as_ref()
                .map(|c| c as &dyn PlatformSettings),
            _ => None,
        }
    }

    /// The locale resolution table for a platform.
    ///
    /// A table declared on the platform wins over the project-wide one.
    pub fn locale_table(&self, platform: &str) -> &LocaleTable {
        self.platform(platform)
            .and_then(|settings| settings.locales())
            .unwrap_or(&self.locales)
    }
}

/// The `[project]` section
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ProjectSection {
    /// Project name, used as display name fallback
    pub name: String,

    /// Webhook endpoint the platforms call
    pub endpoint: Option<String>,

    /// Root directory of the generated platform files
    #[serde(default = "default_build_directory")]
    pub build_directory: PathBuf,

    /// Directory holding one canonical model file per locale
    #[serde(default = "default_models_directory")]
    pub models_directory: PathBuf,
}

fn default_build_directory() -> PathBuf {
    PathBuf::from("build")
}

fn default_models_directory() -> PathBuf {
    PathBuf::from("models")
}
