use parley_build::{FileContent, GeneratedFile};
use serde_json::json;

/// Path of the project settings.
pub const SETTINGS: &str = "settings/settings.yaml";

/// `settings/settings.yaml`, holding the project id, the default locale and
/// the default locale's display name.
pub struct Settings<'a> {
    pub default_locale: &'a str,
    pub display_name: &'a str,
}

impl GeneratedFile for Settings<'_> {
    fn path(&self) -> &str {
        SETTINGS
    }

    fn content(&self) -> FileContent {
        FileContent::Data(json!({
            "defaultLocale": self.default_locale,
            "localizedSettings": {
                "displayName": self.display_name,
                "pronunciation": self.display_name,
            },
        }))
    }
}
