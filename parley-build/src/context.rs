//! Shared state handed to every hook.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use indexmap::IndexMap;
use parley_project::ProjectConfig;

use crate::task::Task;

/// Command line flags that drive a build.
#[derive(Debug, Clone, Default)]
pub struct BuildFlags {
    /// Requested locale tokens (`--locale`).
    pub locales: Vec<String>,
    /// Platform filter (`--platform`). Empty means every configured platform.
    pub platforms: Vec<String>,
    /// Remove each platform's build directory before building.
    pub clean: bool,
    /// Overwrite canonical models without keeping a backup.
    pub force: bool,
    /// Import native files back into canonical models.
    pub reverse: bool,
    /// Stage overlay applied to the project file.
    pub stage: Option<String>,
    /// Project id override for platforms that need one.
    pub project_id: Option<String>,
    /// Build directory override.
    pub build_directory: Option<PathBuf>,
}

/// Values a platform settled on during `before.build`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlatformState {
    pub resolved_locales: Vec<String>,
    pub default_locale: String,
    pub project_id: Option<String>,
}

/// Context shared by all hooks of one build.
#[derive(Debug)]
pub struct BuildContext {
    pub flags: BuildFlags,
    pub config: Arc<ProjectConfig>,
    project_dir: PathBuf,
    platforms: IndexMap<String, PlatformState>,
    tasks: Vec<Task>,
    uninstalled: Vec<String>,
}

impl BuildContext {
    pub fn new(config: ProjectConfig, project_dir: impl Into<PathBuf>, flags: BuildFlags) -> Self {
        Self {
            flags,
            config: Arc::new(config),
            project_dir: project_dir.into(),
            platforms: IndexMap::new(),
            tasks: Vec::new(),
            uninstalled: Vec::new(),
        }
    }

    /// Directory holding `parley.toml`.
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Root of all platform build output.
    pub fn build_directory(&self) -> PathBuf {
        match &self.flags.build_directory {
            Some(dir) => self.project_dir.join(dir),
            None => self.project_dir.join(&self.config.project.build_directory),
        }
    }

    /// Directory of the canonical model files.
    pub fn models_directory(&self) -> PathBuf {
        self.project_dir.join(&self.config.project.models_directory)
    }

    /// Output directory of one platform.
    pub fn platform_dir(&self, directory: &str) -> PathBuf {
        self.build_directory().join(directory)
    }

    /// True when the `--platform` filter is empty or names `id`.
    pub fn platform_selected(&self, id: &str) -> bool {
        self.flags.platforms.is_empty() || self.flags.platforms.iter().any(|p| p == id)
    }

    pub fn state(&self, platform: &str) -> Option<&PlatformState> {
        self.platforms.get(platform)
    }

    pub fn set_state(&mut self, platform: impl Into<String>, state: PlatformState) {
        self.platforms.insert(platform.into(), state);
    }

    /// Request removal of every hook owned by `plugin`.
    ///
    /// Applied by the registry as soon as the current handler returns.
    pub fn uninstall(&mut self, plugin: impl Into<String>) {
        self.uninstalled.push(plugin.into());
    }

    pub(crate) fn take_uninstalled(&mut self) -> Vec<String> {
        std::mem::take(&mut self.uninstalled)
    }

    /// Queue a top-level task for the runner.
    pub fn push_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub(crate) fn take_tasks(&mut self) -> Vec<Task> {
        std::mem::take(&mut self.tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ProjectConfig {
        "[project]\nname = \"demo\"\n".parse().unwrap()
    }

    #[test]
    fn test_directories() {
        let ctx = BuildContext::new(config(), "/work/app", BuildFlags::default());
        assert_eq!(ctx.build_directory(), PathBuf::from("/work/app/build"));
        assert_eq!(ctx.models_directory(), PathBuf::from("/work/app/models"));
        assert_eq!(
            ctx.platform_dir("platform.alexa"),
            PathBuf::from("/work/app/build/platform.alexa")
        );
    }

    #[test]
    fn test_build_directory_override() {
        let flags = BuildFlags {
            build_directory: Some("out".into()),
            ..BuildFlags::default()
        };
        let ctx = BuildContext::new(config(), "/work/app", flags);
        assert_eq!(ctx.build_directory(), PathBuf::from("/work/app/out"));
    }

    #[test]
    fn test_platform_filter() {
        let mut ctx = BuildContext::new(config(), ".", BuildFlags::default());
        assert!(ctx.platform_selected("alexa"));

        ctx.flags.platforms = vec!["googleassistant".into()];
        assert!(!ctx.platform_selected("alexa"));
        assert!(ctx.platform_selected("googleassistant"));
    }

    #[test]
    fn test_uninstall_requests_drain() {
        let mut ctx = BuildContext::new(config(), ".", BuildFlags::default());
        ctx.uninstall("alexa");
        assert_eq!(ctx.take_uninstalled(), vec!["alexa"]);
        assert!(ctx.take_uninstalled().is_empty());
    }
}
