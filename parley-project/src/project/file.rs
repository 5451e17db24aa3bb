use std::path::{Path, PathBuf};

use super::ProjectConfig;
use crate::Result;

/// A parley.toml file with both raw content and parsed configuration.
pub struct ProjectFile {
    path: PathBuf,
    content: String,
    config: ProjectConfig,
}

impl ProjectFile {
    /// Open and parse a parley.toml file, applying `stage` if given.
    pub fn open(path: impl AsRef<Path>, stage: Option<&str>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Box::new(crate::Error::Io {
                path: path.clone(),
                source: e,
            })
        })?;
        let filename = path.display().to_string();
        let config = ProjectConfig::from_str_with_filename(&content, &filename, stage)?;

        Ok(Self {
            path,
            content,
            config,
        })
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory the project lives in; relative paths resolve against it.
    pub fn project_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Get the raw content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get the parsed configuration.
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Consume the file, keeping only the configuration.
    pub fn into_config(self) -> ProjectConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_open_project_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("parley.toml");
        std::fs::write(&path, "[project]\nname = \"my-app\"\n").unwrap();

        let file = ProjectFile::open(&path, None).unwrap();
        assert_eq!(file.config().project.name, "my-app");
        assert_eq!(file.project_dir(), temp.path());
        assert!(file.content().contains("my-app"));
    }

    #[test]
    fn test_project_dir_of_bare_filename() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("parley.toml");
        std::fs::write(&path, "[project]\nname = \"my-app\"\n").unwrap();

        let file = ProjectFile {
            path: PathBuf::from("parley.toml"),
            content: String::new(),
            config: ProjectFile::open(&path, None).unwrap().into_config(),
        };
        assert_eq!(file.project_dir(), Path::new("."));
    }
}
