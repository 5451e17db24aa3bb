//! Canonical model <-> Actions SDK files.
//!
//! Files of the default locale live at the base paths
//! (`custom/intents/<Intent>.yaml`); every other locale gets a subdirectory
//! (`custom/intents/<locale>/<Intent>.yaml`). Intent parameters are only
//! declared in the base files.

use std::collections::HashMap;

use parley_build::{ActionRegistry, Error, ModelConverter, NativeFileInformation, Result};
use parley_model::{
    CanonicalModel, InputTypeDef, InputTypeRef, InputTypeValue, Intent, IntentInput, Invocation,
};
use serde_json::{Map, Value, json};

use crate::{DEFAULT_WEBHOOK, PLATFORM_KEY, from_native_phrase, to_native_phrase};

const INTENTS_DIR: [&str; 2] = ["custom", "intents"];
const TYPES_DIR: [&str; 2] = ["custom", "types"];

/// Converts canonical models to and from Actions SDK files.
#[derive(Debug, Clone)]
pub struct GoogleAssistantConverter {
    webhook: String,
}

impl Default for GoogleAssistantConverter {
    fn default() -> Self {
        Self::new(DEFAULT_WEBHOOK)
    }
}

impl GoogleAssistantConverter {
    /// A converter registering intents with the given webhook handler.
    pub fn new(webhook: impl Into<String>) -> Self {
        Self {
            webhook: webhook.into(),
        }
    }

    pub fn webhook(&self) -> &str {
        &self.webhook
    }
}

/// Path segments of a file in `dir`, in a locale subdirectory unless it is
/// the default locale.
fn localized_path(dir: &[&str], locale: &str, default_locale: &str, file: &str) -> Vec<String> {
    let mut path: Vec<String> = dir.iter().map(|segment| segment.to_string()).collect();
    if locale != default_locale {
        path.push(locale.to_string());
    }
    path.push(file.to_string());
    path
}

/// Path segments of the localized settings of a non-default locale.
pub(crate) fn settings_path(locale: &str) -> Vec<String> {
    vec!["settings".into(), locale.into(), "settings.yaml".into()]
}

fn intent_file(intent: &Intent, locale: &str, is_default: bool) -> Result<Value> {
    let mut content = Map::new();
    let phrases: Vec<String> = intent.phrases.iter().map(|p| to_native_phrase(p)).collect();
    content.insert("trainingPhrases".into(), json!(phrases));

    if is_default && !intent.inputs.is_empty() {
        let parameters = intent
            .inputs
            .iter()
            .map(|input| {
                let ty = input.ty.for_platform(PLATFORM_KEY).ok_or_else(|| {
                    Error::conversion(
                        PLATFORM_KEY,
                        locale,
                        format!(
                            "input '{}' of intent '{}' has no type for googleAssistant",
                            input.name, intent.name
                        ),
                        Some("add a \"googleAssistant\" entry to the input's type"),
                    )
                })?;
                Ok(json!({"name": input.name, "type": {"name": ty}}))
            })
            .collect::<Result<Vec<_>>>()?;
        content.insert("parameters".into(), Value::Array(parameters));
    }

    if let Some(Value::Object(extra)) = intent.extensions.get(PLATFORM_KEY) {
        for (key, value) in extra {
            content.entry(key.clone()).or_insert_with(|| value.clone());
        }
    }
    Ok(Value::Object(content))
}

fn type_file(ty: &InputTypeDef, is_default: bool) -> Value {
    let entities: Map<String, Value> = ty
        .values
        .iter()
        .map(|value| {
            let key = value.id.clone().unwrap_or_else(|| value.value.clone());
            let mut synonyms = vec![value.value.clone()];
            synonyms.extend(value.synonyms.iter().cloned());
            (key, json!({ "synonyms": synonyms }))
        })
        .collect();

    if is_default {
        json!({"synonym": {"matchType": "EXACT_MATCH", "entities": entities}})
    } else {
        json!({"synonym": {"entities": entities}})
    }
}

impl ModelConverter for GoogleAssistantConverter {
    fn platform_key(&self) -> &'static str {
        PLATFORM_KEY
    }

    /// The default locale's display name goes to `settings/settings.yaml`,
    /// which belongs to the project files.
    fn to_native(
        &self,
        model: &CanonicalModel,
        locale: &str,
        default_locale: &str,
    ) -> Result<Vec<NativeFileInformation>> {
        let is_default = locale == default_locale;
        let mut files = Vec::new();

        for intent in &model.intents {
            files.push(NativeFileInformation::structured(
                localized_path(&INTENTS_DIR, locale, default_locale, &format!("{}.yaml", intent.name)),
                intent_file(intent, locale, is_default)?,
            ));
        }
        for ty in &model.input_types {
            files.push(NativeFileInformation::structured(
                localized_path(&TYPES_DIR, locale, default_locale, &format!("{}.yaml", ty.name)),
                type_file(ty, is_default),
            ));
        }

        if !is_default {
            if let Some(name) = model
                .invocation
                .for_platform(PLATFORM_KEY)
                .filter(|name| !name.trim().is_empty())
            {
                files.push(NativeFileInformation::structured(
                    settings_path(locale),
                    json!({"localizedSettings": {"displayName": name, "pronunciation": name}}),
                ));
            }
        }
        Ok(files)
    }

    fn supports_reverse(&self) -> bool {
        true
    }

    fn from_native(&self, files: &[NativeFileInformation], locale: &str) -> Result<CanonicalModel> {
        let native = NativeFiles::sort(files, locale);
        let mut model = CanonicalModel::empty();

        if let Some(settings) = native.settings {
            let name = settings
                .pointer("/localizedSettings/displayName")
                .and_then(Value::as_str)
                .unwrap_or_default();
            model.invocation = Invocation::Text(name.to_string());
        }

        let custom_types: Vec<&str> = native.types.iter().map(|(name, _)| *name).collect();
        for (name, content) in &native.intents {
            model.intents.push(reverse_intent(
                name,
                content,
                native.parameters.get(name).copied(),
                &custom_types,
                locale,
            )?);
        }
        for (name, content) in &native.types {
            model.input_types.push(reverse_type(name, content));
        }
        Ok(model)
    }

    fn register(&self, file: &NativeFileInformation, registry: &mut ActionRegistry) {
        if !file.path.starts_with(&INTENTS_DIR.map(String::from)) {
            return;
        }
        let Some(intent) = file.file_name().strip_suffix(".yaml") else {
            return;
        };
        registry.insert(
            &["custom", intent, "handler", "webhookHandler"],
            json!(self.webhook),
        );
    }

    fn registry_path(&self) -> Option<&'static str> {
        Some("actions/actions.yaml")
    }
}

/// Native files of one locale, keyed by intent or type name.
#[derive(Default)]
struct NativeFiles<'a> {
    intents: Vec<(&'a str, &'a Value)>,
    types: Vec<(&'a str, &'a Value)>,
    /// Base intent files, which carry the parameters.
    parameters: HashMap<&'a str, &'a Value>,
    settings: Option<&'a Value>,
}

impl<'a> NativeFiles<'a> {
    /// Pick the localized file where one exists, the base file otherwise.
    fn sort(files: &'a [NativeFileInformation], locale: &str) -> Self {
        let mut base_intents = Vec::new();
        let mut local_intents = Vec::new();
        let mut base_types = Vec::new();
        let mut local_types = Vec::new();
        let mut base_settings = None;
        let mut local_settings = None;

        for file in files {
            let Some(value) = file.value() else {
                continue;
            };
            let segments: Vec<&str> = file.path.iter().map(String::as_str).collect();
            let stem = file.file_name().strip_suffix(".yaml");
            match (segments.as_slice(), stem) {
                (["custom", "intents", _], Some(name)) => base_intents.push((name, value)),
                (["custom", "intents", dir, _], Some(name)) if *dir == locale => {
                    local_intents.push((name, value))
                }
                (["custom", "types", _], Some(name)) => base_types.push((name, value)),
                (["custom", "types", dir, _], Some(name)) if *dir == locale => {
                    local_types.push((name, value))
                }
                (["settings", "settings.yaml"], _) => base_settings = Some(value),
                (["settings", dir, "settings.yaml"], _) if *dir == locale => {
                    local_settings = Some(value)
                }
                _ => {}
            }
        }

        let parameters = base_intents.iter().copied().collect();
        Self {
            intents: if local_intents.is_empty() {
                base_intents
            } else {
                local_intents
            },
            types: if local_types.is_empty() {
                base_types
            } else {
                local_types
            },
            parameters,
            settings: local_settings.or(base_settings),
        }
    }
}

fn reverse_intent(
    name: &str,
    content: &Value,
    base: Option<&Value>,
    custom_types: &[&str],
    locale: &str,
) -> Result<Intent> {
    let Value::Object(fields) = content else {
        return Err(Error::conversion(
            PLATFORM_KEY,
            locale,
            format!("intent '{}' is not a mapping", name),
            None,
        ));
    };

    let phrases = fields
        .get("trainingPhrases")
        .and_then(Value::as_array)
        .map(|phrases| {
            phrases
                .iter()
                .filter_map(Value::as_str)
                .map(from_native_phrase)
                .collect()
        })
        .unwrap_or_default();

    let parameters = base
        .or(Some(content))
        .and_then(|value| value.get("parameters"))
        .and_then(Value::as_array);
    let inputs = parameters
        .into_iter()
        .flatten()
        .filter_map(|parameter| {
            let name = parameter["name"].as_str()?;
            let ty = parameter.pointer("/type/name").and_then(Value::as_str)?;
            let ty = if custom_types.contains(&ty) {
                InputTypeRef::Name(ty.to_string())
            } else {
                InputTypeRef::PerPlatform([(PLATFORM_KEY.to_string(), ty.to_string())].into_iter().collect())
            };
            Some(IntentInput {
                name: name.to_string(),
                ty,
            })
        })
        .collect();

    let extra: Map<String, Value> = fields
        .iter()
        .filter(|(key, _)| !matches!(key.as_str(), "trainingPhrases" | "parameters"))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    let mut extensions = Map::new();
    if !extra.is_empty() {
        extensions.insert(PLATFORM_KEY.to_string(), Value::Object(extra));
    }

    Ok(Intent {
        name: name.to_string(),
        phrases,
        inputs,
        extensions,
    })
}

fn reverse_type(name: &str, content: &Value) -> InputTypeDef {
    let values = content
        .pointer("/synonym/entities")
        .and_then(Value::as_object)
        .map(|entities| {
            entities
                .iter()
                .map(|(key, entity)| {
                    let mut synonyms: Vec<String> = entity["synonyms"]
                        .as_array()
                        .map(|list| list.iter().filter_map(Value::as_str).map(str::to_string).collect())
                        .unwrap_or_default();
                    let value = if synonyms.is_empty() {
                        key.clone()
                    } else {
                        synonyms.remove(0)
                    };
                    InputTypeValue {
                        id: (*key != value).then(|| key.clone()),
                        value,
                        synonyms,
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    InputTypeDef {
        name: name.to_string(),
        values,
    }
}
