//! Canonical model files on disk.
//!
//! One JSON file per locale token lives in the models directory, e.g.
//! `models/en.json` or `models/en-US.json`.

use std::path::{Path, PathBuf};

use parley_core::{FileFormat, toml_to_json, write_file};
use parley_model::CanonicalModel;
use parley_project::{LocaleTable, ProjectConfig};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{Error, Result, merge::merge_model};

/// Overrides applied on top of every loaded model.
#[derive(Debug, Clone, Default)]
pub struct ModelOverrides {
    /// `[model]` in the project file.
    pub project: Option<Value>,
    /// `[platforms.<id>.model]`.
    pub plugin: Option<Value>,
}

impl ModelOverrides {
    /// Only the project-level `[model]` fragment.
    pub fn for_project(config: &ProjectConfig) -> Self {
        Self {
            project: config.model.as_ref().map(table_to_json),
            plugin: None,
        }
    }

    /// The override fragments a project declares for a platform.
    pub fn from_config(config: &ProjectConfig, platform: &str) -> Self {
        Self {
            plugin: config
                .platform(platform)
                .and_then(|settings| settings.model())
                .map(table_to_json),
            ..Self::for_project(config)
        }
    }
}

fn table_to_json(table: &toml::Table) -> Value {
    toml_to_json(&toml::Value::Table(table.clone()))
}

/// Reads and writes canonical model files.
#[derive(Debug, Clone)]
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the model file for a locale token.
    pub fn path_for(&self, locale: &str) -> PathBuf {
        self.dir.join(format!("{}.json", locale))
    }

    /// Locale tokens that have a model file, sorted.
    pub fn locales(&self) -> Result<Vec<String>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let entries = std::fs::read_dir(&self.dir).map_err(|e| Error::filesystem(&self.dir, e))?;

        let mut locales = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| Error::filesystem(&self.dir, e))?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                locales.push(stem.to_string());
            }
        }
        locales.sort();
        Ok(locales)
    }

    /// The model file used for a concrete locale.
    ///
    /// `<code>.json` wins; otherwise the file of a table token whose entry
    /// lists the code.
    pub fn find(&self, code: &str, table: &LocaleTable) -> Option<PathBuf> {
        let exact = self.path_for(code);
        if exact.is_file() {
            return Some(exact);
        }
        table
            .iter()
            .filter(|(_, codes)| codes.iter().any(|c| c == code))
            .map(|(token, _)| self.path_for(token))
            .find(|path| path.is_file())
    }

    /// Load, merge and validate the model for a concrete locale.
    ///
    /// Returns `None` when no model file exists for it.
    pub fn load(
        &self,
        code: &str,
        table: &LocaleTable,
        overrides: &ModelOverrides,
    ) -> Result<Option<CanonicalModel>> {
        let Some(path) = self.find(code, table) else {
            return Ok(None);
        };
        debug!(locale = code, path = %path.display(), "loading model");

        let raw = read_json(&path)?;
        let merged = merge_model(raw, overrides.project.as_ref(), overrides.plugin.as_ref());
        let model: CanonicalModel = serde_json::from_value(merged)
            .map_err(|e| Error::model_validation(&path, e.to_string()))?;

        let issues = model.validate();
        if !issues.is_empty() {
            let message = issues
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(Error::model_validation(&path, message));
        }
        Ok(Some(model))
    }

    /// The raw model stored under a locale token, if any.
    pub fn load_existing(&self, locale: &str) -> Result<Option<Value>> {
        let path = self.path_for(locale);
        if !path.is_file() {
            return Ok(None);
        }
        read_json(&path).map(Some)
    }

    /// Write a model, copying an existing file to `<locale>.json.bak` first
    /// when `backup` is set.
    ///
    /// Returns the backup path if one was made.
    pub fn save(&self, locale: &str, model: &Value, backup: bool) -> Result<Option<PathBuf>> {
        let path = self.path_for(locale);
        let mut backup_path = None;
        if backup && path.is_file() {
            let target = self.dir.join(format!("{}.json.bak", locale));
            std::fs::copy(&path, &target).map_err(|e| Error::filesystem(&target, e))?;
            warn!(path = %target.display(), "backed up existing model");
            backup_path = Some(target);
        }

        let rendered = FileFormat::Json
            .render(model)
            .map_err(|e| Error::parse(&path, e))?;
        write_file(&path, &rendered).map_err(|e| Error::filesystem(&path, e))?;
        debug!(path = %path.display(), "wrote model");
        Ok(backup_path)
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::filesystem(path, e))?;
    serde_json::from_str(&text).map_err(|e| Error::parse(path, e))
}
