use parley_build::{FileContent, GeneratedFile};
use serde_json::json;

/// `ask-resources.json`, read by the ASK CLI to locate the skill package.
pub struct AskResources<'a> {
    pub profile: &'a str,
}

impl GeneratedFile for AskResources<'_> {
    fn path(&self) -> &str {
        "ask-resources.json"
    }

    fn content(&self) -> FileContent {
        FileContent::Data(json!({
            "askcliResourcesVersion": "2020-03-31",
            "profiles": {
                self.profile: {
                    "skillMetadata": {
                        "src": "./skill-package"
                    }
                }
            }
        }))
    }
}
