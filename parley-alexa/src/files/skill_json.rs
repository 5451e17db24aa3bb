use parley_build::{FileContent, GeneratedFile};
use serde_json::{Map, Value, json};

/// Path of the skill manifest.
pub const SKILL_JSON: &str = "skill-package/skill.json";

/// `skill-package/skill.json`
pub struct SkillJson<'a> {
    /// `(locale, skill name)` pairs for the publishing information.
    pub locales: Vec<(&'a str, &'a str)>,
}

impl GeneratedFile for SkillJson<'_> {
    fn path(&self) -> &str {
        SKILL_JSON
    }

    fn content(&self) -> FileContent {
        let locales: Map<String, Value> = self
            .locales
            .iter()
            .map(|(locale, name)| {
                (
                    locale.to_string(),
                    json!({
                        "name": name,
                        "summary": "Sample Short Description",
                        "description": "Sample Full Description",
                        "examplePhrases": [format!("Alexa open {}", name)],
                        "keywords": [],
                    }),
                )
            })
            .collect();
        let privacy: Map<String, Value> = self
            .locales
            .iter()
            .map(|(locale, _)| {
                (
                    locale.to_string(),
                    json!({"privacyPolicyUrl": "", "termsOfUseUrl": ""}),
                )
            })
            .collect();

        FileContent::Data(json!({
            "manifest": {
                "publishingInformation": {
                    "locales": locales,
                    "isAvailableWorldwide": true,
                    "testingInstructions": "Sample Testing Instructions.",
                    "category": "EDUCATION_AND_REFERENCE",
                    "distributionCountries": [],
                },
                "apis": {
                    "custom": {},
                },
                "manifestVersion": "1.0",
                "privacyAndCompliance": {
                    "allowsPurchases": false,
                    "usesPersonalInfo": false,
                    "isChildDirected": false,
                    "isExportCompliant": true,
                    "containsAds": false,
                    "locales": privacy,
                },
            }
        }))
    }
}
