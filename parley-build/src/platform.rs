//! The contract every platform backend implements.

use std::path::Path;

use indexmap::IndexMap;
use parley_model::CanonicalModel;
use parley_project::ProjectConfig;

use crate::{BuildContext, FileTree, ModelConverter, NativeFileInformation, PlatformState, Result};

/// Locales a platform accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedLocales {
    /// Every accepted code, generic (`en`) and regional (`en-US`).
    pub locales: &'static [&'static str],
    /// Whether generic language codes exist alongside regional ones.
    pub generic: bool,
    /// Where the platform documents its locales.
    pub docs_url: &'static str,
}

impl SupportedLocales {
    pub fn contains(&self, locale: &str) -> bool {
        self.locales.contains(&locale)
    }
}

/// Inputs available when generating project files.
#[derive(Debug, Clone, Copy)]
pub struct ProjectFilesInput<'a> {
    pub config: &'a ProjectConfig,
    pub state: &'a PlatformState,
    /// Canonical models that loaded successfully, keyed by concrete locale.
    pub models: &'a IndexMap<String, CanonicalModel>,
}

/// A target platform.
pub trait Platform: Send + Sync + 'static {
    /// Identifier used on the command line and in `[platforms.<id>]`.
    fn id(&self) -> &'static str;

    /// Human readable name, e.g. "Alexa Skill".
    fn display_name(&self) -> &'static str;

    /// Output directory below the build directory.
    fn directory(&self) -> String {
        format!("platform.{}", self.id())
    }

    fn supported_locales(&self) -> SupportedLocales;

    fn converter(&self) -> &dyn ModelConverter;

    /// Check platform-specific required values and record them in `state`.
    fn validate(&self, _ctx: &BuildContext, _state: &mut PlatformState) -> Result<()> {
        Ok(())
    }

    /// Merge this platform's default project files into `tree`.
    ///
    /// `tree` already holds the user's file overrides, which must win.
    fn project_files(&self, tree: &mut FileTree, input: &ProjectFilesInput<'_>) -> Result<()>;

    /// Locales that have native files under `root`.
    fn native_locales(&self, root: &Path) -> Result<Vec<String>>;

    /// The default locale recorded in the native files, if the platform keeps one.
    fn native_default_locale(&self, _root: &Path) -> Result<Option<String>> {
        Ok(None)
    }

    /// Read the native files of one locale.
    fn read_native(
        &self,
        root: &Path,
        locale: &str,
        default_locale: &str,
    ) -> Result<Vec<NativeFileInformation>>;
}
