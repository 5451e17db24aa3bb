use parley_build::{FileContent, GeneratedFile};
use serde_json::json;

/// `.ask/ask-states.json`, binding the project to an existing skill.
pub struct AskStates<'a> {
    pub profile: &'a str,
    pub skill_id: &'a str,
}

impl GeneratedFile for AskStates<'_> {
    fn path(&self) -> &str {
        ".ask/ask-states.json"
    }

    fn content(&self) -> FileContent {
        FileContent::Data(json!({
            "askcliStatesVersion": "2020-03-31",
            "profiles": {
                self.profile: {
                    "skillId": self.skill_id
                }
            }
        }))
    }
}
