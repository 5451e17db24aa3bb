//! Canonical model <-> Alexa interaction model.

use parley_build::{Error, ModelConverter, NativeFileInformation, Result, merge::merge_with_arrays};
use parley_model::{
    CanonicalModel, InputTypeDef, InputTypeRef, InputTypeValue, Intent, IntentInput, Invocation,
};
use serde_json::{Map, Value, json};

use crate::{
    MODEL_DIR, PLATFORM_KEY,
    native::{AlexaIntent, AlexaModel, InteractionModel, LanguageModel, Slot, SlotType, SlotTypeValue, SlotValueName},
};

/// Intents every skill must declare.
const REQUIRED_BUILTINS: [&str; 3] = ["AMAZON.CancelIntent", "AMAZON.HelpIntent", "AMAZON.StopIntent"];

/// Converts canonical models to and from Alexa interaction models.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlexaConverter;

impl AlexaConverter {
    /// Path segments of the interaction model of `locale`.
    pub fn model_path(locale: &str) -> Vec<String> {
        MODEL_DIR
            .iter()
            .map(|segment| segment.to_string())
            .chain([format!("{}.json", locale)])
            .collect()
    }

    fn language_model(&self, model: &CanonicalModel, locale: &str) -> Result<LanguageModel> {
        let mut intents = Vec::with_capacity(model.intents.len() + REQUIRED_BUILTINS.len());
        for intent in &model.intents {
            intents.push(convert_intent(intent, locale)?);
        }

        let extension_intents = extension_intent_names(model);
        for builtin in REQUIRED_BUILTINS {
            let declared = intents.iter().any(|intent| intent.name == builtin)
                || extension_intents.iter().any(|name| name == builtin);
            if !declared {
                intents.push(AlexaIntent::builtin(builtin));
            }
        }

        let types = model
            .input_types
            .iter()
            .map(|ty| SlotType {
                name: ty.name.clone(),
                values: ty
                    .values
                    .iter()
                    .map(|value| SlotTypeValue {
                        id: value.id.clone(),
                        name: SlotValueName {
                            value: value.value.clone(),
                            synonyms: value.synonyms.clone(),
                        },
                    })
                    .collect(),
            })
            .collect();

        Ok(LanguageModel {
            invocation_name: model
                .invocation
                .for_platform(PLATFORM_KEY)
                .unwrap_or_default()
                .to_string(),
            intents,
            types,
            other: Map::new(),
        })
    }
}

fn convert_intent(intent: &Intent, locale: &str) -> Result<AlexaIntent> {
    let slots = intent
        .inputs
        .iter()
        .map(|input| {
            let ty = input.ty.for_platform(PLATFORM_KEY).ok_or_else(|| {
                Error::conversion(
                    PLATFORM_KEY,
                    locale,
                    format!(
                        "input '{}' of intent '{}' has no type for alexa",
                        input.name, intent.name
                    ),
                    Some("add an \"alexa\" entry to the input's type"),
                )
            })?;
            Ok(Slot {
                name: input.name.clone(),
                ty: ty.to_string(),
                other: Map::new(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let other = match intent.extensions.get(PLATFORM_KEY) {
        Some(Value::Object(fields)) => fields.clone(),
        _ => Map::new(),
    };

    Ok(AlexaIntent {
        name: intent.name.clone(),
        samples: intent.phrases.clone(),
        slots,
        other,
    })
}

/// Intent names declared in the `alexa` extension of the model.
fn extension_intent_names(model: &CanonicalModel) -> Vec<String> {
    model
        .extension(PLATFORM_KEY)
        .and_then(|ext| ext.pointer("/interactionModel/languageModel/intents"))
        .and_then(Value::as_array)
        .map(|intents| {
            intents
                .iter()
                .filter_map(|intent| intent["name"].as_str())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

impl ModelConverter for AlexaConverter {
    fn platform_key(&self) -> &'static str {
        PLATFORM_KEY
    }

    fn to_native(
        &self,
        model: &CanonicalModel,
        locale: &str,
        _default_locale: &str,
    ) -> Result<Vec<NativeFileInformation>> {
        let native = AlexaModel {
            interaction_model: InteractionModel {
                language_model: self.language_model(model, locale)?,
                other: Map::new(),
            },
        };
        let mut value = serde_json::to_value(&native)
            .map_err(|e| Error::conversion(PLATFORM_KEY, locale, e.to_string(), None))?;
        if let Some(extension) = model.extension(PLATFORM_KEY) {
            merge_with_arrays(&mut value, extension);
        }

        Ok(vec![NativeFileInformation::structured(
            Self::model_path(locale),
            value,
        )])
    }

    fn supports_reverse(&self) -> bool {
        true
    }

    fn from_native(&self, files: &[NativeFileInformation], locale: &str) -> Result<CanonicalModel> {
        let file_name = format!("{}.json", locale);
        let value = files
            .iter()
            .find(|file| file.file_name() == file_name)
            .and_then(NativeFileInformation::value)
            .ok_or_else(|| {
                Error::conversion(
                    PLATFORM_KEY,
                    locale,
                    format!("no interaction model named '{}'", file_name),
                    None,
                )
            })?;
        let native: AlexaModel = serde_json::from_value(value.clone()).map_err(|e| {
            Error::conversion(
                PLATFORM_KEY,
                locale,
                format!("not an Alexa interaction model: {}", e),
                None,
            )
        })?;

        reverse(native, locale)
    }
}

fn reverse(native: AlexaModel, locale: &str) -> Result<CanonicalModel> {
    let InteractionModel {
        language_model,
        other: mut interaction_other,
    } = native.interaction_model;
    let LanguageModel {
        invocation_name,
        intents,
        types,
        other: mut language_other,
    } = language_model;

    let custom_types: Vec<&str> = types.iter().map(|ty| ty.name.as_str()).collect();

    let mut model = CanonicalModel {
        invocation: Invocation::Text(invocation_name),
        ..CanonicalModel::empty()
    };
    let mut kept = Vec::new();
    for intent in intents {
        if intent.is_builtin() && intent.samples.is_empty() {
            kept.push(intent);
            continue;
        }

        let inputs = intent
            .slots
            .into_iter()
            .map(|slot| {
                let ty = if custom_types.contains(&slot.ty.as_str()) {
                    InputTypeRef::Name(slot.ty)
                } else {
                    InputTypeRef::PerPlatform([(PLATFORM_KEY.to_string(), slot.ty)].into_iter().collect())
                };
                IntentInput {
                    name: slot.name,
                    ty,
                }
            })
            .collect();
        let mut extensions = Map::new();
        if !intent.other.is_empty() {
            extensions.insert(PLATFORM_KEY.to_string(), Value::Object(intent.other));
        }
        model.intents.push(Intent {
            name: intent.name,
            phrases: intent.samples,
            inputs,
            extensions,
        });
    }

    model.input_types = types
        .into_iter()
        .map(|ty| InputTypeDef {
            name: ty.name,
            values: ty
                .values
                .into_iter()
                .map(|value| InputTypeValue {
                    value: value.name.value,
                    id: value.id,
                    synonyms: value.name.synonyms,
                })
                .collect(),
        })
        .collect();

    if !kept.is_empty() {
        let kept = serde_json::to_value(kept)
            .map_err(|e| Error::conversion(PLATFORM_KEY, locale, e.to_string(), None))?;
        language_other.insert("intents".to_string(), kept);
    }
    if !language_other.is_empty() {
        interaction_other.insert("languageModel".to_string(), Value::Object(language_other));
    }
    if !interaction_other.is_empty() {
        model.extensions.insert(
            PLATFORM_KEY.to_string(),
            json!({ "interactionModel": interaction_other }),
        );
    }
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> CanonicalModel {
        serde_json::from_value(json!({
            "invocation": "my test app",
            "intents": [
                {"name": "HelloWorldIntent", "phrases": ["hello", "say hello"]},
                {
                    "name": "MyNameIsIntent",
                    "phrases": ["{name}", "my name is {name}"],
                    "inputs": [{"name": "name", "type": {"alexa": "AMAZON.US_FIRST_NAME"}}]
                },
                {"name": "AMAZON.HelpIntent", "phrases": ["what can I do"]}
            ]
        }))
        .unwrap()
    }

    fn language_model(files: &[NativeFileInformation]) -> &Value {
        &files[0].value().unwrap()["interactionModel"]["languageModel"]
    }

    #[test]
    fn test_model_path() {
        assert_eq!(
            AlexaConverter::model_path("en-US").join("/"),
            "skill-package/interactionModels/custom/en-US.json"
        );
    }

    #[test]
    fn test_builtins_added_when_missing() {
        let files = AlexaConverter.to_native(&model(), "en-US", "en-US").unwrap();

        let names: Vec<&str> = language_model(&files)["intents"]
            .as_array()
            .unwrap()
            .iter()
            .map(|intent| intent["name"].as_str().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                "HelloWorldIntent",
                "MyNameIsIntent",
                "AMAZON.HelpIntent",
                "AMAZON.CancelIntent",
                "AMAZON.StopIntent"
            ]
        );
    }

    #[test]
    fn test_slot_types_per_platform() {
        let files = AlexaConverter.to_native(&model(), "en-US", "en-US").unwrap();
        assert_eq!(
            language_model(&files)["intents"][1]["slots"],
            json!([{"name": "name", "type": "AMAZON.US_FIRST_NAME"}])
        );
    }

    #[test]
    fn test_missing_slot_type_is_conversion_error() {
        let model: CanonicalModel = serde_json::from_value(json!({
            "invocation": "app",
            "intents": [{
                "name": "CityIntent",
                "phrases": ["to {city}"],
                "inputs": [{"name": "city", "type": {"googleAssistant": "actions.type.City"}}]
            }]
        }))
        .unwrap();

        let err = AlexaConverter.to_native(&model, "en-US", "en-US").unwrap_err();

        assert_eq!(err.kind(), "conversion");
        assert!(err.to_string().contains("input 'city' of intent 'CityIntent'"));
    }

    #[test]
    fn test_extension_is_merged() {
        let mut model = model();
        model.extensions.insert(
            "alexa".into(),
            json!({"interactionModel": {"dialog": {"intents": []}, "languageModel": {"modelConfiguration": {"fallbackIntentSensitivity": {"level": "LOW"}}}}}),
        );

        let files = AlexaConverter.to_native(&model, "en-US", "en-US").unwrap();
        let root = files[0].value().unwrap();

        assert_eq!(root["interactionModel"]["dialog"], json!({"intents": []}));
        assert_eq!(
            root["interactionModel"]["languageModel"]["modelConfiguration"]["fallbackIntentSensitivity"]["level"],
            "LOW"
        );
        assert_eq!(root["interactionModel"]["languageModel"]["invocationName"], "my test app");
    }

    #[test]
    fn test_reverse_keeps_unmapped_fields() {
        let native = json!({
            "interactionModel": {
                "languageModel": {
                    "invocationName": "my test app",
                    "intents": [
                        {"name": "HelloWorldIntent", "samples": ["hello"]},
                        {"name": "CityIntent", "samples": ["to {city}"], "slots": [{"name": "city", "type": "City"}]},
                        {"name": "AMAZON.StopIntent", "samples": []}
                    ],
                    "types": [{"name": "City", "values": [{"id": "ber", "name": {"value": "berlin", "synonyms": ["bärlin"]}}]}]
                },
                "dialog": {"delegationStrategy": "ALWAYS"}
            }
        });
        let files = vec![NativeFileInformation::structured(
            AlexaConverter::model_path("en-US"),
            native,
        )];

        let model = AlexaConverter.from_native(&files, "en-US").unwrap();

        assert_eq!(model.invocation, Invocation::Text("my test app".into()));
        assert_eq!(
            model.intent_names().collect::<Vec<_>>(),
            vec!["HelloWorldIntent", "CityIntent"]
        );
        assert_eq!(model.intents[1].inputs[0].ty, InputTypeRef::Name("City".into()));
        assert_eq!(model.input_types[0].values[0].id.as_deref(), Some("ber"));
        assert_eq!(
            model.extension("alexa"),
            Some(&json!({
                "interactionModel": {
                    "dialog": {"delegationStrategy": "ALWAYS"},
                    "languageModel": {"intents": [{"name": "AMAZON.StopIntent", "samples": []}]}
                }
            }))
        );
    }

    #[test]
    fn test_reverse_rejects_foreign_content() {
        let files = vec![NativeFileInformation::structured(
            AlexaConverter::model_path("en-US"),
            json!({"manifest": {}}),
        )];

        let err = AlexaConverter.from_native(&files, "en-US").unwrap_err();

        assert!(err.to_string().contains("not an Alexa interaction model"));
    }

    #[test]
    fn test_forward_after_reverse_is_stable() {
        let files = AlexaConverter.to_native(&model(), "en-US", "en-US").unwrap();
        let reversed = AlexaConverter.from_native(&files, "en-US").unwrap();
        let again = AlexaConverter.to_native(&reversed, "en-US", "en-US").unwrap();

        assert_eq!(files[0].value(), again[0].value());
    }
}
