//! Converting canonical models to native files and back.

use std::path::{Path, PathBuf};

use parley_core::{FileFormat, write_file};
use parley_model::CanonicalModel;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::{
    Error, Result,
    merge::{merge_deep, merge_reverse},
};

/// Content of a native file.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeContent {
    /// Serialized as JSON or YAML by extension.
    Structured(Value),
    /// Written verbatim.
    Text(String),
}

/// A native file relative to the platform directory.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeFileInformation {
    /// Path segments; the last one is the file name.
    pub path: Vec<String>,
    pub content: NativeContent,
}

impl NativeFileInformation {
    pub fn new<I, S>(path: I, content: NativeContent) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            content,
        }
    }

    pub fn structured<I, S>(path: I, value: Value) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(path, NativeContent::Structured(value))
    }

    pub fn file_name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }

    /// Path relative to the platform directory.
    pub fn relative_path(&self) -> PathBuf {
        self.path.iter().collect()
    }

    pub fn format(&self) -> FileFormat {
        FileFormat::from_path(self.file_name())
    }

    /// Structured content, if any.
    pub fn value(&self) -> Option<&Value> {
        match &self.content {
            NativeContent::Structured(value) => Some(value),
            NativeContent::Text(_) => None,
        }
    }

    /// Serialize the content according to the file extension.
    pub fn render(&self) -> Result<String> {
        match &self.content {
            NativeContent::Text(text) => Ok(text.clone()),
            NativeContent::Structured(value) => self
                .format()
                .render(value)
                .map_err(|e| Error::parse(self.relative_path(), e)),
        }
    }

    /// Read and parse the file at `path` below `root`.
    ///
    /// Returns `None` if the file does not exist.
    pub fn read(root: &Path, path: &[&str]) -> Result<Option<Self>> {
        let relative: PathBuf = path.iter().collect();
        let full = root.join(&relative);
        if !full.is_file() {
            return Ok(None);
        }

        let text = std::fs::read_to_string(&full).map_err(|e| Error::filesystem(&full, e))?;
        let content = match FileFormat::from_path(&relative) {
            FileFormat::Text => NativeContent::Text(text),
            format => NativeContent::Structured(
                format.parse(&text).map_err(|e| Error::parse(&full, e))?,
            ),
        };
        Ok(Some(Self::new(path.iter().copied(), content)))
    }

    /// Write the file below `root`, replacing any existing file.
    pub fn write(&self, root: &Path) -> Result<PathBuf> {
        let path = root.join(self.relative_path());
        let rendered = self.render()?;
        write_file(&path, &rendered).map_err(|e| Error::filesystem(&path, e))?;
        debug!(path = %path.display(), "wrote native file");
        Ok(path)
    }
}

/// Auxiliary metadata collected from native files while a platform builds.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRegistry {
    path: String,
    value: Value,
}

impl ActionRegistry {
    /// An empty registry written to `path` (relative, `/`-separated).
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            value: Value::Object(Map::new()),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Set `value` at the nested key path, creating maps along the way.
    pub fn insert(&mut self, keys: &[&str], value: Value) {
        let Some((last, parents)) = keys.split_last() else {
            return;
        };
        let mut current = &mut self.value;
        for key in parents {
            if !current.get(*key).is_some_and(Value::is_object) {
                if let Value::Object(map) = current {
                    map.insert(key.to_string(), Value::Object(Map::new()));
                }
            }
            current = match current {
                Value::Object(map) => match map.get_mut(*key) {
                    Some(next) => next,
                    None => return,
                },
                _ => return,
            };
        }
        if let Value::Object(map) = current {
            map.insert(last.to_string(), value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.as_object().is_none_or(Map::is_empty)
    }

    /// Merge with the user-configured registry and write it below `root`.
    ///
    /// User values win. Nothing is written if both are empty.
    pub fn write(self, root: &Path, user: Option<&Value>) -> Result<Option<PathBuf>> {
        if self.is_empty() && user.is_none() {
            return Ok(None);
        }
        let mut value = self.value;
        if let Some(user) = user {
            merge_deep(&mut value, user);
        }
        let file = NativeFileInformation::structured(self.path.split('/'), value);
        file.write(root).map(Some)
    }
}

/// Converts between the canonical model and a platform's native files.
pub trait ModelConverter: Send + Sync {
    /// Key used for per-platform values in the canonical model.
    fn platform_key(&self) -> &'static str;

    /// Produce the native files of one locale.
    fn to_native(
        &self,
        model: &CanonicalModel,
        locale: &str,
        default_locale: &str,
    ) -> Result<Vec<NativeFileInformation>>;

    fn supports_reverse(&self) -> bool {
        false
    }

    /// Parse the native files of one locale back into a canonical model.
    fn from_native(&self, _files: &[NativeFileInformation], locale: &str) -> Result<CanonicalModel> {
        Err(Error::conversion(
            self.platform_key(),
            locale,
            "reverse conversion is not supported",
            Some("edit the canonical model files directly"),
        ))
    }

    /// Record registry metadata for a produced file.
    fn register(&self, _file: &NativeFileInformation, _registry: &mut ActionRegistry) {}

    /// Relative path of the action registry, for platforms that keep one.
    fn registry_path(&self) -> Option<&'static str> {
        None
    }
}

/// Convert and write the native files of one locale.
///
/// Every produced file is fed to the converter's registry hook.
pub fn build_locale(
    converter: &dyn ModelConverter,
    model: &CanonicalModel,
    locale: &str,
    default_locale: &str,
    root: &Path,
    mut registry: Option<&mut ActionRegistry>,
) -> Result<Vec<PathBuf>> {
    let files = converter.to_native(model, locale, default_locale)?;
    if files.is_empty() && !model.is_empty() {
        return Err(Error::conversion(
            converter.platform_key(),
            locale,
            "the converter produced no files for a non-empty model",
            Some("this is a converter defect, please report it"),
        ));
    }

    let mut written = Vec::with_capacity(files.len());
    for file in &files {
        if let Some(registry) = registry.as_deref_mut() {
            converter.register(file, registry);
        }
        written.push(file.write(root)?);
    }
    info!(platform = converter.platform_key(), locale, files = written.len(), "built locale");
    Ok(written)
}

/// Convert native files back and merge the result into `existing`.
///
/// Without an existing model the result is merged into
/// [`CanonicalModel::empty`].
pub fn reverse_locale(
    converter: &dyn ModelConverter,
    files: &[NativeFileInformation],
    locale: &str,
    existing: Option<Value>,
) -> Result<Value> {
    let platform = converter.platform_key();
    if !converter.supports_reverse() {
        return Err(Error::conversion(
            platform,
            locale,
            "reverse conversion is not supported",
            Some("edit the canonical model files directly"),
        ));
    }
    if files.is_empty() {
        return Err(Error::conversion(
            platform,
            locale,
            "no native files found",
            Some("run a forward build first or check the build directory"),
        ));
    }

    let parsed = converter.from_native(files, locale)?;
    if parsed.is_empty() && parsed.invocation.is_blank() && parsed.extensions.is_empty() {
        return Err(Error::conversion(
            platform,
            locale,
            "the native files hold no usable model data",
            None,
        ));
    }

    let mut incoming = to_value(&parsed, platform, locale)?;
    if parsed.invocation.is_blank() {
        if let Value::Object(map) = &mut incoming {
            map.remove("invocation");
        }
    }

    let mut base = match existing {
        Some(value) => value,
        None => to_value(&CanonicalModel::empty(), platform, locale)?,
    };
    merge_reverse(&mut base, &incoming, platform);
    Ok(base)
}

fn to_value(model: &CanonicalModel, platform: &str, locale: &str) -> Result<Value> {
    serde_json::to_value(model)
        .map_err(|e| Error::conversion(platform, locale, e.to_string(), None))
}
