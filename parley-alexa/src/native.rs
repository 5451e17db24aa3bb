//! Serde types of the Alexa interaction model file.
//!
//! Fields without a canonical counterpart are kept in `other` so they survive
//! a reverse build.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Root of `skill-package/interactionModels/custom/<locale>.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlexaModel {
    pub interaction_model: InteractionModel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionModel {
    pub language_model: LanguageModel,
    /// `dialog`, `prompts` and anything else next to the language model.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageModel {
    #[serde(default)]
    pub invocation_name: String,
    #[serde(default)]
    pub intents: Vec<AlexaIntent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<SlotType>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlexaIntent {
    pub name: String,
    #[serde(default)]
    pub samples: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<Slot>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl AlexaIntent {
    /// Built-in intent without samples.
    pub fn builtin(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn is_builtin(&self) -> bool {
        self.name.starts_with("AMAZON.")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotType {
    pub name: String,
    #[serde(default)]
    pub values: Vec<SlotTypeValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotTypeValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: SlotValueName,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotValueName {
    pub value: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
}
