//! End-to-end builds of the Google Assistant platform against a temporary
//! project.

use std::{fs, path::Path};

use parley_build::{BuildContext, BuildFlags, BuildOutcome, Driver, PlatformPlugin, TaskStatus};
use parley_core::write_file;
use parley_googleassistant::GoogleAssistantPlatform;
use parley_project::ProjectFile;
use serde_json::{Value, json};
use tempfile::TempDir;

const PROJECT: &str = r#"
[project]
name = "my-app"
endpoint = "https://example.com/webhook"

[platforms.googleassistant]
project-id = "my-project-123"
"#;

fn project(toml: &str, models: &[(&str, Value)]) -> TempDir {
    let temp = TempDir::new().unwrap();
    write_file(&temp.path().join("parley.toml"), toml).unwrap();
    for (locale, model) in models {
        write_file(
            &temp.path().join("models").join(format!("{}.json", locale)),
            &model.to_string(),
        )
        .unwrap();
    }
    temp
}

fn model(invocation: &str, hello: &str) -> Value {
    json!({
        "invocation": invocation,
        "intents": [
            {"name": "HelloWorldIntent", "phrases": [hello]},
            {
                "name": "MyNameIsIntent",
                "phrases": ["my name is {name}"],
                "inputs": [{"name": "name", "type": {"googleAssistant": "actions.type.Name"}}]
            }
        ]
    })
}

fn build(dir: &Path, flags: BuildFlags) -> parley_build::Result<(BuildContext, BuildOutcome)> {
    let file = ProjectFile::open(dir.join("parley.toml"), None)?;
    let config = file.into_config();
    let platform = GoogleAssistantPlatform::from_config(&config);
    let mut ctx = BuildContext::new(config, dir, flags);
    let outcome = Driver::new()
        .plugin(PlatformPlugin::new(platform))
        .run(&mut ctx)?;
    Ok((ctx, outcome))
}

fn read_yaml(dir: &Path, path: &str) -> serde_yaml::Value {
    let text = fs::read_to_string(dir.join("build/platform.googleassistant").join(path)).unwrap();
    serde_yaml::from_str(&text).unwrap()
}

fn yaml(value: Value) -> serde_yaml::Value {
    serde_yaml::to_value(value).unwrap()
}

#[test]
fn test_default_and_localized_files() {
    let temp = project(
        PROJECT,
        &[("en", model("my app", "hello")), ("de", model("meine app", "hallo"))],
    );

    let (ctx, outcome) = build(temp.path(), BuildFlags::default()).unwrap();

    assert!(outcome.succeeded());
    let state = ctx.state("googleassistant").unwrap();
    assert_eq!(state.default_locale, "en");
    assert_eq!(state.project_id.as_deref(), Some("my-project-123"));

    assert_eq!(
        read_yaml(temp.path(), "custom/intents/MyNameIsIntent.yaml"),
        yaml(json!({
            "trainingPhrases": ["my name is ($name 'name' auto=true)"],
            "parameters": [{"name": "name", "type": {"name": "actions.type.Name"}}]
        }))
    );
    assert_eq!(
        read_yaml(temp.path(), "custom/intents/de/HelloWorldIntent.yaml"),
        yaml(json!({"trainingPhrases": ["hallo"]}))
    );
    assert_eq!(
        read_yaml(temp.path(), "settings/de/settings.yaml"),
        yaml(json!({"localizedSettings": {"displayName": "meine app", "pronunciation": "meine app"}}))
    );
}

#[test]
fn test_project_files() {
    let temp = project(PROJECT, &[("en", model("my app", "hello"))]);

    build(temp.path(), BuildFlags::default()).unwrap();

    assert_eq!(
        read_yaml(temp.path(), "manifest.yaml"),
        yaml(json!({"version": "1.0"}))
    );
    assert_eq!(
        read_yaml(temp.path(), "settings/settings.yaml"),
        yaml(json!({
            "defaultLocale": "en",
            "localizedSettings": {"displayName": "my app", "pronunciation": "my app"},
            "projectId": "my-project-123"
        }))
    );
    assert_eq!(
        read_yaml(temp.path(), "webhooks/Parley.yaml"),
        yaml(json!({
            "handlers": [{"name": "Parley"}],
            "httpsEndpoint": {"baseUrl": "https://example.com/webhook"}
        }))
    );
}

#[test]
fn test_action_registry() {
    let temp = project(PROJECT, &[("en", model("my app", "hello"))]);

    build(temp.path(), BuildFlags::default()).unwrap();

    assert_eq!(
        read_yaml(temp.path(), "actions/actions.yaml"),
        yaml(json!({
            "custom": {
                "HelloWorldIntent": {"handler": {"webhookHandler": "Parley"}},
                "MyNameIsIntent": {"handler": {"webhookHandler": "Parley"}}
            }
        }))
    );
}

#[test]
fn test_project_id_flag_overrides_config() {
    let temp = project(PROJECT, &[("en", model("my app", "hello"))]);
    let flags = BuildFlags {
        project_id: Some("other-project".into()),
        ..BuildFlags::default()
    };

    build(temp.path(), flags).unwrap();

    assert_eq!(
        read_yaml(temp.path(), "settings/settings.yaml")["projectId"],
        yaml(json!("other-project"))
    );
}

#[test]
fn test_missing_project_id() {
    let temp = project(
        "[project]\nname = \"my-app\"\n",
        &[("en", model("my app", "hello"))],
    );

    let err = build(temp.path(), BuildFlags::default()).unwrap_err();

    assert_eq!(err.kind(), "configuration");
    assert!(!temp.path().join("build").exists());
}

#[test]
fn test_configured_default_locale_must_have_a_model() {
    let toml = format!("{}default-locale = \"en\"\n", PROJECT);
    let temp = project(&toml, &[("de", model("meine app", "hallo"))]);

    let err = build(temp.path(), BuildFlags::default()).unwrap_err();

    assert_eq!(err.kind(), "configuration");
    assert!(err.to_string().contains("'en'"));
    assert!(!temp.path().join("build").exists());
}

#[test]
fn test_regional_locale_needs_generic() {
    let temp = project(PROJECT, &[("en-US", model("my app", "hello"))]);

    let err = build(temp.path(), BuildFlags::default()).unwrap_err();

    assert_eq!(err.kind(), "unsupported-locale");
    assert!(err.to_string().contains("en-US"));
}

#[test]
fn test_reverse_build_restores_models() {
    let temp = project(
        PROJECT,
        &[("en", model("my app", "hello")), ("de", model("meine app", "hallo"))],
    );
    build(temp.path(), BuildFlags::default()).unwrap();
    fs::remove_dir_all(temp.path().join("models")).unwrap();

    let flags = BuildFlags {
        reverse: true,
        ..BuildFlags::default()
    };
    let (ctx, outcome) = build(temp.path(), flags).unwrap();

    assert!(outcome.succeeded());
    assert_eq!(ctx.state("googleassistant").unwrap().resolved_locales, vec!["en", "de"]);
    let read = |locale: &str| -> Value {
        serde_json::from_str(
            &fs::read_to_string(temp.path().join("models").join(format!("{}.json", locale)))
                .unwrap(),
        )
        .unwrap()
    };
    let en = read("en");
    assert_eq!(en["invocation"], "my app");
    assert_eq!(en["intents"][0], json!({"name": "HelloWorldIntent", "phrases": ["hello"]}));

    let de = read("de");
    assert_eq!(de["invocation"], "meine app");
    assert_eq!(de["intents"][1]["phrases"], json!(["my name is {name}"]));
    assert_eq!(
        de["intents"][1]["inputs"],
        json!([{"name": "name", "type": {"googleAssistant": "actions.type.Name"}}])
    );
}

#[test]
fn test_reverse_with_broken_base_settings() {
    let temp = project(
        PROJECT,
        &[("en", model("my app", "hello")), ("de", model("meine app", "hallo"))],
    );
    build(temp.path(), BuildFlags::default()).unwrap();
    write_file(
        &temp.path().join("build/platform.googleassistant/settings/settings.yaml"),
        "{ defaultLocale: [en",
    )
    .unwrap();

    let flags = BuildFlags {
        reverse: true,
        ..BuildFlags::default()
    };
    let (_, outcome) = build(temp.path(), flags).unwrap();

    assert!(!outcome.succeeded());
    assert!(matches!(
        outcome.reports[0].find("de").unwrap().status,
        TaskStatus::Failed { kind: "conversion", .. }
    ));
}
