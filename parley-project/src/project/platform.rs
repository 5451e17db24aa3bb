//! Typed per-platform configuration.

use indexmap::IndexMap;
use serde::Deserialize;

use super::LocaleTable;

/// Settings every platform section understands.
pub trait PlatformSettings {
    /// Explicitly configured default locale.
    fn default_locale(&self) -> Option<&str>;

    /// Platform-specific locale resolution table.
    fn locales(&self) -> Option<&LocaleTable>;

    /// Plugin-level canonical-model override fragment.
    fn model(&self) -> Option<&toml::Table>;

    /// User file overrides keyed by `/`-separated relative path.
    fn files(&self) -> &IndexMap<String, toml::Value>;
}

/// The `[platforms]` table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Platforms {
    pub alexa: Option<AlexaConfig>,
    pub googleassistant: Option<GoogleAssistantConfig>,
}

impl Platforms {
    /// Ids of the configured platforms, in a fixed order.
    pub fn configured(&self) -> Vec<&'static str> {
        let mut ids = Vec::new();
        if self.alexa.is_some() {
            ids.push("alexa");
        }
        if self.googleassistant.is_some() {
            ids.push("googleassistant");
        }
        ids
    }
}

/// `[platforms.alexa]`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AlexaConfig {
    pub default_locale: Option<String>,
    pub locales: Option<LocaleTable>,
    pub model: Option<toml::Table>,
    #[serde(default)]
    pub files: IndexMap<String, toml::Value>,

    /// Skill id written to `.ask/ask-states.json`
    pub skill_id: Option<String>,
    /// ASK CLI profile name
    #[serde(default = "default_ask_profile")]
    pub ask_profile: String,
}

fn default_ask_profile() -> String {
    "default".to_string()
}

/// `[platforms.googleassistant]`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct GoogleAssistantConfig {
    pub default_locale: Option<String>,
    pub locales: Option<LocaleTable>,
    pub model: Option<toml::Table>,
    #[serde(default)]
    pub files: IndexMap<String, toml::Value>,

    /// Actions console project id
    pub project_id: Option<String>,
    /// Name of the webhook handling intents
    #[serde(default = "default_webhook")]
    pub webhook: String,
}

fn default_webhook() -> String {
    "Parley".to_string()
}

impl PlatformSettings for AlexaConfig {
    fn default_locale(&self) -> Option<&str> {
        self.default_locale.as_deref()
    }

    fn locales(&self) -> Option<&LocaleTable> {
        self.locales.as_ref()
    }

    fn model(&self) -> Option<&toml::Table> {
        self.model.as_ref()
    }

    fn files(&self) -> &IndexMap<String, toml::Value> {
        &self.files
    }
}

impl PlatformSettings for GoogleAssistantConfig {
    fn default_locale(&self) -> Option<&str> {
        self.default_locale.as_deref()
    }

    fn locales(&self) -> Option<&LocaleTable> {
        self.locales.as_ref()
    }

    fn model(&self) -> Option<&toml::Table> {
        self.model.as_ref()
    }

    fn files(&self) -> &IndexMap<String, toml::Value> {
        &self.files
    }
}
