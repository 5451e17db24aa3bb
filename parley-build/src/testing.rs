//! An in-memory platform for exercising the pipeline in tests.
//!
//! The test platform writes one `<locale>/model.json` per locale holding the
//! serialized canonical model, a `project.json` project file, and a
//! `registry.json` action registry mapping intent names to locales.

use std::path::Path;

use parley_model::CanonicalModel;
use serde_json::json;

use crate::{
    ActionRegistry, Error, FileContent, FileTree, ModelConverter, NativeFileInformation, Platform,
    ProjectFilesInput, Result, SupportedLocales,
};

const MODEL_FILE: &str = "model.json";

/// Locales accepted by [`TestPlatform::default`].
pub const TEST_LOCALES: SupportedLocales = SupportedLocales {
    locales: &["en", "en-US", "en-GB", "de-DE"],
    generic: false,
    docs_url: "https://example.com/test-locales",
};

/// Converter storing the canonical model verbatim.
#[derive(Debug, Default, Clone, Copy)]
pub struct TestConverter;

impl ModelConverter for TestConverter {
    fn platform_key(&self) -> &'static str {
        "test"
    }

    fn to_native(
        &self,
        model: &CanonicalModel,
        locale: &str,
        _default_locale: &str,
    ) -> Result<Vec<NativeFileInformation>> {
        let value = serde_json::to_value(model)
            .map_err(|e| Error::conversion("test", locale, e.to_string(), None))?;
        Ok(vec![NativeFileInformation::structured(
            [locale, MODEL_FILE],
            value,
        )])
    }

    fn supports_reverse(&self) -> bool {
        true
    }

    fn from_native(&self, files: &[NativeFileInformation], locale: &str) -> Result<CanonicalModel> {
        let value = files
            .iter()
            .find(|file| file.file_name() == MODEL_FILE)
            .and_then(NativeFileInformation::value)
            .ok_or_else(|| Error::conversion("test", locale, "model.json is missing", None))?;
        serde_json::from_value(value.clone())
            .map_err(|e| Error::conversion("test", locale, e.to_string(), None))
    }

    fn register(&self, file: &NativeFileInformation, registry: &mut ActionRegistry) {
        let Some(locale) = file.path.first() else {
            return;
        };
        let Some(intents) = file.value().and_then(|v| v["intents"].as_array()) else {
            return;
        };
        for intent in intents {
            if let Some(name) = intent["name"].as_str() {
                registry.insert(&["intents", name], json!(locale));
            }
        }
    }

    fn registry_path(&self) -> Option<&'static str> {
        Some("registry.json")
    }
}

/// A platform backed by [`TestConverter`].
#[derive(Debug, Clone)]
pub struct TestPlatform {
    pub supported: SupportedLocales,
    converter: TestConverter,
}

impl Default for TestPlatform {
    fn default() -> Self {
        Self {
            supported: TEST_LOCALES,
            converter: TestConverter,
        }
    }
}

impl Platform for TestPlatform {
    fn id(&self) -> &'static str {
        "test"
    }

    fn display_name(&self) -> &'static str {
        "Test Platform"
    }

    fn supported_locales(&self) -> SupportedLocales {
        self.supported
    }

    fn converter(&self) -> &dyn ModelConverter {
        &self.converter
    }

    fn project_files(&self, tree: &mut FileTree, input: &ProjectFilesInput<'_>) -> Result<()> {
        let mut defaults = FileTree::new();
        defaults.insert(
            "project.json",
            FileContent::Data(json!({
                "name": input.config.project.name,
                "defaultLocale": input.state.default_locale,
                "locales": input.state.resolved_locales,
            })),
        );
        tree.merge_defaults(defaults);

        if let Some(model) = input.models.get(&input.state.default_locale) {
            if let Some(invocation) = model.invocation.for_platform("test") {
                tree.set_if_missing("project.json", &["invocation"], json!(invocation));
            }
        }
        Ok(())
    }

    fn native_locales(&self, root: &Path) -> Result<Vec<String>> {
        if !root.is_dir() {
            return Ok(Vec::new());
        }
        let entries = std::fs::read_dir(root).map_err(|e| Error::filesystem(root, e))?;
        let mut locales = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| Error::filesystem(root, e))?.path();
            if !path.join(MODEL_FILE).is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                locales.push(name.to_string());
            }
        }
        locales.sort();
        Ok(locales)
    }

    fn read_native(
        &self,
        root: &Path,
        locale: &str,
        _default_locale: &str,
    ) -> Result<Vec<NativeFileInformation>> {
        Ok(NativeFileInformation::read(root, &[locale, MODEL_FILE])?
            .into_iter()
            .collect())
    }
}
