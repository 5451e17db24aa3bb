use std::path::Path;

use parley_build::{
    Error, FileTree, ModelConverter, NativeFileInformation, Platform, ProjectFilesInput, Result,
    SupportedLocales,
};
use serde_json::json;
use tracing::debug;

use crate::{
    AlexaConverter, MODEL_DIR, PLATFORM_KEY, SUPPORTED_LOCALES,
    files::{AskResources, AskStates, SKILL_JSON, SkillJson},
};

/// Alexa skill platform.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlexaPlatform {
    converter: AlexaConverter,
}

impl AlexaPlatform {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Platform for AlexaPlatform {
    fn id(&self) -> &'static str {
        "alexa"
    }

    fn display_name(&self) -> &'static str {
        "Alexa Skill"
    }

    fn supported_locales(&self) -> SupportedLocales {
        SUPPORTED_LOCALES
    }

    fn converter(&self) -> &dyn ModelConverter {
        &self.converter
    }

    fn project_files(&self, tree: &mut FileTree, input: &ProjectFilesInput<'_>) -> Result<()> {
        let config = input.config;
        let settings = config.platforms.alexa.as_ref();
        let profile = settings.map_or("default", |s| s.ask_profile.as_str());

        let locales = input
            .state
            .resolved_locales
            .iter()
            .map(|locale| {
                let name = input
                    .models
                    .get(locale)
                    .and_then(|model| model.invocation.for_platform(PLATFORM_KEY))
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or(config.project.name.as_str());
                (locale.as_str(), name)
            })
            .collect();

        let mut defaults = FileTree::new()
            .with(&SkillJson { locales })
            .with(&AskResources { profile });
        if let Some(skill_id) = settings.and_then(|s| s.skill_id.as_deref()) {
            defaults = defaults.with(&AskStates { profile, skill_id });
        }
        tree.merge_defaults(defaults);

        if let Some(endpoint) = config.project.endpoint.as_deref() {
            let endpoint = if endpoint.starts_with("arn:") {
                json!({ "uri": endpoint })
            } else {
                json!({ "uri": endpoint, "sslCertificateType": "Wildcard" })
            };
            tree.set_if_missing(SKILL_JSON, &["manifest", "apis", "custom", "endpoint"], endpoint);
        }
        Ok(())
    }

    fn native_locales(&self, root: &Path) -> Result<Vec<String>> {
        let dir = MODEL_DIR.iter().fold(root.to_path_buf(), |dir, segment| dir.join(segment));
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&dir).map_err(|e| Error::filesystem(&dir, e))?;
        let mut locales = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| Error::filesystem(&dir, e))?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                locales.push(stem.to_string());
            }
        }
        locales.sort();
        debug!(path = %dir.display(), ?locales, "found interaction models");
        Ok(locales)
    }

    fn read_native(
        &self,
        root: &Path,
        locale: &str,
        _default_locale: &str,
    ) -> Result<Vec<NativeFileInformation>> {
        let path = AlexaConverter::model_path(locale);
        let segments: Vec<&str> = path.iter().map(String::as_str).collect();
        Ok(NativeFileInformation::read(root, &segments)?
            .into_iter()
            .collect())
    }
}
