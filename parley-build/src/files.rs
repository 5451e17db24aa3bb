//! Project file trees.
//!
//! A [`FileTree`] maps `/`-separated relative paths to file contents. It is
//! first filled from the user's `files` overrides; platforms then merge their
//! defaults underneath without clobbering anything the user set.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use parley_core::{FileFormat, toml_to_json, write_file};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{Error, Result};

/// Content of one file in the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum FileContent {
    /// Written verbatim.
    Text(String),
    /// Serialized by file extension.
    Data(Value),
}

/// A node of a [`FileTree`].
#[derive(Debug, Clone, PartialEq)]
pub enum FileNode {
    Dir(FileTree),
    File(FileContent),
}

/// A project file a platform contributes by default.
pub trait GeneratedFile {
    /// `/`-separated path relative to the platform directory.
    fn path(&self) -> &str;

    fn content(&self) -> FileContent;
}

/// Hierarchical set of files to materialize under a platform directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileTree {
    entries: IndexMap<String, FileNode>,
}

impl FileTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from user-declared file overrides.
    ///
    /// String values become text files, everything else structured data.
    pub fn from_overrides(files: &IndexMap<String, toml::Value>) -> Self {
        let mut tree = Self::new();
        for (path, value) in files {
            let content = match value {
                toml::Value::String(text) => FileContent::Text(text.clone()),
                other => FileContent::Data(toml_to_json(other)),
            };
            tree.insert(path, content);
        }
        tree
    }

    /// Insert a file, replacing whatever is at `path`.
    pub fn insert(&mut self, path: &str, content: FileContent) {
        let mut segments: Vec<&str> = split(path).collect();
        let Some(name) = segments.pop() else {
            return;
        };

        let mut dir = self;
        for segment in segments {
            let node = dir
                .entries
                .entry(segment.to_string())
                .or_insert_with(|| FileNode::Dir(FileTree::new()));
            if !matches!(node, FileNode::Dir(_)) {
                *node = FileNode::Dir(FileTree::new());
            }
            dir = match node {
                FileNode::Dir(tree) => tree,
                FileNode::File(_) => return,
            };
        }
        dir.entries.insert(name.to_string(), FileNode::File(content));
    }

    /// Add a generated file, replacing whatever is at its path.
    pub fn with(mut self, file: &dyn GeneratedFile) -> Self {
        self.insert(file.path(), file.content());
        self
    }

    /// The content of the file at `path`.
    pub fn get(&self, path: &str) -> Option<&FileContent> {
        let mut segments: Vec<&str> = split(path).collect();
        let name = segments.pop()?;
        let mut dir = self;
        for segment in segments {
            match dir.entries.get(segment)? {
                FileNode::Dir(tree) => dir = tree,
                FileNode::File(_) => return None,
            }
        }
        match dir.entries.get(name)? {
            FileNode::File(content) => Some(content),
            FileNode::Dir(_) => None,
        }
    }

    fn get_mut(&mut self, path: &str) -> Option<&mut FileContent> {
        let mut segments: Vec<&str> = split(path).collect();
        let name = segments.pop()?;
        let mut dir = self;
        for segment in segments {
            match dir.entries.get_mut(segment)? {
                FileNode::Dir(tree) => dir = tree,
                FileNode::File(_) => return None,
            }
        }
        match dir.entries.get_mut(name)? {
            FileNode::File(content) => Some(content),
            FileNode::Dir(_) => None,
        }
    }

    /// Merge platform defaults underneath the current contents.
    ///
    /// Values already present win. Maps recurse, arrays are concatenated
    /// current-first without duplicates, missing files are added.
    pub fn merge_defaults(&mut self, defaults: FileTree) {
        for (name, default) in defaults.entries {
            let Some(current) = self.entries.get_mut(&name) else {
                self.entries.insert(name, default);
                continue;
            };
            match (current, default) {
                (FileNode::Dir(current), FileNode::Dir(default)) => {
                    current.merge_defaults(default);
                }
                (
                    FileNode::File(FileContent::Data(current)),
                    FileNode::File(FileContent::Data(default)),
                ) => merge_under(current, default),
                _ => {}
            }
        }
    }

    /// Whether `file` exists and, when `keys` is non-empty, holds a value at
    /// that key path.
    pub fn has(&self, file: &str, keys: &[&str]) -> bool {
        match self.get(file) {
            None => false,
            Some(_) if keys.is_empty() => true,
            Some(FileContent::Text(_)) => false,
            Some(FileContent::Data(value)) => lookup(value, keys).is_some(),
        }
    }

    /// Set `keys` in the structured `file` to `value` unless already present.
    ///
    /// Creates the file and any intermediate maps as needed. Returns false if
    /// nothing was written: the value existed, the file is text, or an
    /// intermediate key holds a non-map value.
    pub fn set_if_missing(&mut self, file: &str, keys: &[&str], value: Value) -> bool {
        if self.has(file, keys) {
            return false;
        }
        let Some((last, parents)) = keys.split_last() else {
            self.insert(file, FileContent::Data(value));
            return true;
        };

        if self.get(file).is_none() {
            self.insert(file, FileContent::Data(Value::Object(Map::new())));
        }
        let Some(FileContent::Data(root)) = self.get_mut(file) else {
            return false;
        };

        let mut current = root;
        for key in parents {
            let Value::Object(map) = current else {
                return false;
            };
            current = map
                .entry(key.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        match current {
            Value::Object(map) => {
                map.insert(last.to_string(), value);
                true
            }
            _ => false,
        }
    }

    /// All files with their `/`-separated paths, depth-first in insertion order.
    pub fn files(&self) -> Vec<(String, &FileContent)> {
        let mut files = Vec::new();
        self.collect("", &mut files);
        files
    }

    fn collect<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a FileContent)>) {
        for (name, node) in &self.entries {
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", prefix, name)
            };
            match node {
                FileNode::Dir(tree) => tree.collect(&path, out),
                FileNode::File(content) => out.push((path, content)),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write every file under `root`, creating directories as needed.
    ///
    /// Returns the written paths.
    pub fn write(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for (relative, content) in self.files() {
            let path = root.join(&relative);
            let rendered = match content {
                FileContent::Text(text) => text.clone(),
                FileContent::Data(value) => FileFormat::from_path(&relative)
                    .render(value)
                    .map_err(|e| Error::parse(&path, e))?,
            };
            write_file(&path, &rendered).map_err(|e| Error::filesystem(&path, e))?;
            debug!(path = %path.display(), "wrote project file");
            written.push(path);
        }
        Ok(written)
    }
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty() && *segment != ".")
}

fn lookup<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().try_fold(value, |current, key| current.get(*key))
}

/// Merge `default` underneath `current`: current values win.
fn merge_under(current: &mut Value, default: Value) {
    match (current, default) {
        (Value::Object(current), Value::Object(default)) => {
            for (key, value) in default {
                match current.get_mut(&key) {
                    Some(existing) => merge_under(existing, value),
                    None => {
                        current.insert(key, value);
                    }
                }
            }
        }
        (Value::Array(current), Value::Array(default)) => {
            for item in default {
                if !current.contains(&item) {
                    current.push(item);
                }
            }
        }
        _ => {}
    }
}
