//! Canonical model types.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{ModelIssue, placeholders};

/// Platform-agnostic language model for one locale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalModel {
    /// Invocation name, either shared or per platform.
    #[serde(default)]
    pub invocation: Invocation,
    /// Intents in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub intents: Vec<Intent>,
    /// Custom input (slot/entity) types in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_types: Vec<InputTypeDef>,
    /// Unrecognized top-level sections, usually platform-specific.
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl CanonicalModel {
    /// A model holding only an empty invocation placeholder.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if the model declares no intents and no input types.
    pub fn is_empty(&self) -> bool {
        self.intents.is_empty() && self.input_types.is_empty()
    }

    /// Intent names in declaration order.
    pub fn intent_names(&self) -> impl Iterator<Item = &str> {
        self.intents.iter().map(|intent| intent.name.as_str())
    }

    /// The platform-specific section stored under `key`, if any.
    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extensions.get(key)
    }

    /// Check the model for structural problems.
    ///
    /// Returns every issue found; an empty list means the model is valid.
    pub fn validate(&self) -> Vec<ModelIssue> {
        let mut issues = Vec::new();

        if self.invocation.is_blank() && !self.is_empty() {
            issues.push(ModelIssue::new("invocation name is empty").at("invocation"));
        }

        let mut seen = HashSet::new();
        for (index, intent) in self.intents.iter().enumerate() {
            if intent.name.trim().is_empty() {
                issues.push(
                    ModelIssue::new("intent name is empty").at(format!("intents[{}]", index)),
                );
                continue;
            }
            if !seen.insert(intent.name.as_str()) {
                issues.push(
                    ModelIssue::new(format!("duplicate intent '{}'", intent.name))
                        .at(format!("intents.{}", intent.name)),
                );
            }
            for phrase in &intent.phrases {
                for name in placeholders(phrase) {
                    if !intent.inputs.iter().any(|input| input.name == name) {
                        issues.push(
                            ModelIssue::new(format!(
                                "phrase '{}' references undeclared input '{}'",
                                phrase, name
                            ))
                            .at(format!("intents.{}", intent.name)),
                        );
                    }
                }
            }
        }

        let mut seen_types = HashSet::new();
        for ty in &self.input_types {
            if !seen_types.insert(ty.name.as_str()) {
                issues.push(
                    ModelIssue::new(format!("duplicate input type '{}'", ty.name))
                        .at(format!("inputTypes.{}", ty.name)),
                );
            }
        }

        issues
    }
}

/// Invocation name of the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Invocation {
    /// One name for every platform.
    Text(String),
    /// Names keyed by platform (e.g. `{"alexa": "my skill"}`).
    PerPlatform(IndexMap<String, String>),
}

impl Default for Invocation {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl Invocation {
    /// The invocation name to use for the given platform key.
    pub fn for_platform(&self, key: &str) -> Option<&str> {
        match self {
            Self::Text(name) => Some(name.as_str()),
            Self::PerPlatform(names) => names.get(key).map(String::as_str),
        }
    }

    /// Returns true if no non-empty name is set.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(name) => name.trim().is_empty(),
            Self::PerPlatform(names) => names.values().all(|name| name.trim().is_empty()),
        }
    }
}

/// An intent: something the user can ask for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub phrases: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<IntentInput>,
    /// Platform-specific intent settings.
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Intent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a phrase.
    pub fn phrase(mut self, phrase: impl Into<String>) -> Self {
        self.phrases.push(phrase.into());
        self
    }

    /// Add an input.
    pub fn input(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.inputs.push(IntentInput {
            name: name.into(),
            ty: InputTypeRef::Name(ty.into()),
        });
        self
    }
}

/// A named input (slot) of an intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentInput {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: InputTypeRef,
}

/// Reference to an input type, either shared or per platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputTypeRef {
    Name(String),
    PerPlatform(IndexMap<String, String>),
}

impl InputTypeRef {
    /// The type name for the given platform key.
    ///
    /// Per-platform references without an entry for `key` yield `None`.
    pub fn for_platform(&self, key: &str) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name.as_str()),
            Self::PerPlatform(names) => names.get(key).map(String::as_str),
        }
    }
}

/// A custom input type with its values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputTypeDef {
    pub name: String,
    #[serde(default)]
    pub values: Vec<InputTypeValue>,
}

/// One value of a custom input type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputTypeValue {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub synonyms: Vec<String>,
}
