use std::path::Path;

use parley_build::{
    BuildContext, Error, FileTree, ModelConverter, NativeFileInformation, Platform, PlatformState,
    ProjectFilesInput, Result, SupportedLocales,
};
use parley_project::ProjectConfig;
use serde_json::json;
use tracing::{debug, warn};

use crate::{
    GoogleAssistantConverter, PLATFORM_KEY, SUPPORTED_LOCALES,
    converter::settings_path,
    files::{Manifest, SETTINGS, Settings, Webhook},
};

/// Google Assistant conversational actions platform.
#[derive(Debug, Clone, Default)]
pub struct GoogleAssistantPlatform {
    converter: GoogleAssistantConverter,
}

impl GoogleAssistantPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// A platform using the webhook configured in `[platforms.googleassistant]`.
    pub fn from_config(config: &ProjectConfig) -> Self {
        match &config.platforms.googleassistant {
            Some(settings) => Self {
                converter: GoogleAssistantConverter::new(settings.webhook.as_str()),
            },
            None => Self::default(),
        }
    }
}

impl Platform for GoogleAssistantPlatform {
    fn id(&self) -> &'static str {
        "googleassistant"
    }

    fn display_name(&self) -> &'static str {
        "Google Conversational Action"
    }

    fn supported_locales(&self) -> SupportedLocales {
        SUPPORTED_LOCALES
    }

    fn converter(&self) -> &dyn ModelConverter {
        &self.converter
    }

    /// Forward builds need a project id, from `--project-id` or the config.
    fn validate(&self, ctx: &BuildContext, state: &mut PlatformState) -> Result<()> {
        let configured = ctx
            .config
            .platforms
            .googleassistant
            .as_ref()
            .and_then(|settings| settings.project_id.clone());
        state.project_id = ctx.flags.project_id.clone().or(configured);

        if state.project_id.is_none() && !ctx.flags.reverse {
            return Err(Error::configuration(
                "could not find a project id for the Google Conversational Action",
                Some("pass --project-id or set project-id in [platforms.googleassistant]"),
            ));
        }
        Ok(())
    }

    fn project_files(&self, tree: &mut FileTree, input: &ProjectFilesInput<'_>) -> Result<()> {
        let config = input.config;
        let default_locale = input.state.default_locale.as_str();
        let display_name = input
            .models
            .get(default_locale)
            .and_then(|model| model.invocation.for_platform(PLATFORM_KEY))
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(config.project.name.as_str());

        let mut defaults = FileTree::new().with(&Manifest).with(&Settings {
            default_locale,
            display_name,
        });
        match config.project.endpoint.as_deref() {
            Some(endpoint) => {
                defaults = defaults.with(&Webhook::new(self.converter.webhook(), endpoint));
            }
            None => debug!("no endpoint configured, skipping webhook file"),
        }
        tree.merge_defaults(defaults);

        if let Some(project_id) = &input.state.project_id {
            tree.set_if_missing(SETTINGS, &["projectId"], json!(project_id));
        }
        Ok(())
    }

    /// The default locale first, then every locale with its own settings or
    /// intents directory.
    fn native_locales(&self, root: &Path) -> Result<Vec<String>> {
        let mut locales = Vec::new();
        match self.native_default_locale(root) {
            Ok(Some(default)) => locales.push(default),
            Ok(None) => {}
            Err(err) => warn!(error = %err, "skipping unreadable base settings"),
        }
        let mut localized = subdirectories(&root.join("settings"))?;
        localized.extend(subdirectories(&root.join("custom").join("intents"))?);
        localized.sort();
        for locale in localized {
            if !locales.contains(&locale) {
                locales.push(locale);
            }
        }
        Ok(locales)
    }

    fn native_default_locale(&self, root: &Path) -> Result<Option<String>> {
        let settings = NativeFileInformation::read(root, &["settings", "settings.yaml"])?;
        Ok(settings
            .as_ref()
            .and_then(NativeFileInformation::value)
            .and_then(|value| value["defaultLocale"].as_str())
            .map(str::to_string))
    }

    fn read_native(
        &self,
        root: &Path,
        locale: &str,
        default_locale: &str,
    ) -> Result<Vec<NativeFileInformation>> {
        let mut files = Vec::new();
        for dir in [["custom", "intents"], ["custom", "types"]] {
            read_yaml_dir(root, &dir, &mut files)?;
            if locale != default_locale {
                read_yaml_dir(root, &[dir[0], dir[1], locale], &mut files)?;
            }
        }

        let settings = if locale == default_locale {
            vec!["settings".to_string(), "settings.yaml".to_string()]
        } else {
            settings_path(locale)
        };
        let segments: Vec<&str> = settings.iter().map(String::as_str).collect();
        files.extend(NativeFileInformation::read(root, &segments)?);

        debug!(locale, files = files.len(), "read native files");
        Ok(files)
    }
}

/// Names of the directories directly below `dir`, sorted.
fn subdirectories(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let entries = std::fs::read_dir(dir).map_err(|e| Error::filesystem(dir, e))?;
    let mut names = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::filesystem(dir, e))?.path();
        if !path.is_dir() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Read every `.yaml` file directly below `segments`, sorted by name.
fn read_yaml_dir(root: &Path, segments: &[&str], files: &mut Vec<NativeFileInformation>) -> Result<()> {
    let dir = segments.iter().fold(root.to_path_buf(), |dir, segment| dir.join(segment));
    if !dir.is_dir() {
        return Ok(());
    }
    let entries = std::fs::read_dir(&dir).map_err(|e| Error::filesystem(&dir, e))?;
    let mut names: Vec<String> = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::filesystem(&dir, e))?.path();
        if path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("yaml") {
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();

    for name in names {
        let mut path = segments.to_vec();
        path.push(name.as_str());
        files.extend(NativeFileInformation::read(root, &path)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_build::BuildFlags;

    fn ctx(toml: &str, flags: BuildFlags) -> BuildContext {
        BuildContext::new(toml.parse().unwrap(), ".", flags)
    }

    #[test]
    fn test_project_id_from_flag_wins() {
        let ctx = ctx(
            "[project]\nname = \"a\"\n[platforms.googleassistant]\nproject-id = \"from-config\"\n",
            BuildFlags {
                project_id: Some("from-flag".into()),
                ..BuildFlags::default()
            },
        );
        let mut state = PlatformState::default();

        GoogleAssistantPlatform::new().validate(&ctx, &mut state).unwrap();

        assert_eq!(state.project_id.as_deref(), Some("from-flag"));
    }

    #[test]
    fn test_missing_project_id() {
        let ctx = ctx("[project]\nname = \"a\"\n", BuildFlags::default());
        let mut state = PlatformState::default();

        let err = GoogleAssistantPlatform::new()
            .validate(&ctx, &mut state)
            .unwrap_err();

        assert_eq!(err.kind(), "configuration");
    }

    #[test]
    fn test_webhook_from_config() {
        let config: ProjectConfig =
            "[project]\nname = \"a\"\n[platforms.googleassistant]\nwebhook = \"Hook\"\n"
                .parse()
                .unwrap();
        assert_eq!(
            GoogleAssistantPlatform::from_config(&config).converter.webhook(),
            "Hook"
        );
    }

    #[test]
    fn test_display_name_falls_back_to_project() {
        let config: ProjectConfig = "[project]\nname = \"my-app\"\n".parse().unwrap();
        let state = PlatformState {
            resolved_locales: vec!["en".into()],
            default_locale: "en".into(),
            project_id: Some("p".into()),
        };
        let models = Default::default();
        let mut tree = FileTree::new();

        GoogleAssistantPlatform::new()
            .project_files(
                &mut tree,
                &ProjectFilesInput {
                    config: &config,
                    state: &state,
                    models: &models,
                },
            )
            .unwrap();

        let Some(parley_build::FileContent::Data(settings)) = tree.get(SETTINGS) else {
            panic!("settings missing");
        };
        assert_eq!(
            settings,
            &json!({
                "defaultLocale": "en",
                "localizedSettings": {"displayName": "my-app", "pronunciation": "my-app"},
                "projectId": "p"
            })
        );
        assert!(tree.get("webhooks/Parley.yaml").is_none());
    }
}
