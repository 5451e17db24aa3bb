use parley_build::{FileContent, GeneratedFile};
use serde_json::json;

/// `manifest.yaml`
pub struct Manifest;

impl GeneratedFile for Manifest {
    fn path(&self) -> &str {
        "manifest.yaml"
    }

    fn content(&self) -> FileContent {
        FileContent::Data(json!({ "version": "1.0" }))
    }
}
