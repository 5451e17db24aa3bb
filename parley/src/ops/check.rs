//! Check operation - project, model and locale validation.

use parley_build::{BuildContext, BuildFlags, ModelOverrides, ModelStore, Result, prepare_state};
use parley_project::{LocaleTable, ProjectFile};

use crate::{
    platforms,
    reports::{CheckReport, LocaleCheck, ModelCheck, PlatformCheck, PlatformSummary},
};

/// Execute the check operation.
///
/// Loads every model file and resolves every configured platform's locales
/// the way a forward build would. Writes nothing.
pub fn check(file: &ProjectFile, project_id: Option<String>) -> Result<CheckReport> {
    let config = file.config();
    let flags = BuildFlags {
        project_id,
        ..BuildFlags::default()
    };
    let scratch = BuildContext::new(config.clone(), file.project_dir(), flags.clone());
    let store = ModelStore::new(scratch.models_directory());

    let overrides = ModelOverrides::for_project(config);
    let models = store
        .locales()?
        .into_iter()
        .map(|locale| {
            let problem = store
                .load(&locale, &LocaleTable::default(), &overrides)
                .err()
                .map(|err| err.to_string());
            ModelCheck { locale, problem }
        })
        .collect();

    let mut checks = Vec::new();
    for known in platforms::selected(config, &[])? {
        let platform = known.platform(config);
        let ctx = BuildContext::new(config.clone(), file.project_dir(), flags.clone());
        let result = prepare_state(platform.as_ref(), &ctx).map(|state| {
            let table = config.locale_table(platform.id());
            let overrides = ModelOverrides::from_config(config, platform.id());
            let locales = state
                .resolved_locales
                .iter()
                .map(|locale| LocaleCheck {
                    locale: locale.clone(),
                    problem: match store.load(locale, table, &overrides) {
                        Ok(Some(_)) => None,
                        Ok(None) => Some("no model file".to_string()),
                        Err(err) => Some(err.to_string()),
                    },
                })
                .collect();
            PlatformSummary {
                default_locale: state.default_locale,
                locales,
            }
        });

        checks.push(PlatformCheck {
            name: platform.display_name().to_string(),
            result: result.map_err(|err| err.to_string()),
        });
    }

    Ok(CheckReport {
        config_path: file.path().to_path_buf(),
        models,
        platforms: checks,
    })
}

#[cfg(test)]
mod tests {
    use parley_core::write_file;
    use tempfile::TempDir;

    use super::*;

    fn project(toml: &str, models: &[(&str, &str)]) -> (TempDir, ProjectFile) {
        let temp = TempDir::new().unwrap();
        write_file(&temp.path().join("parley.toml"), toml).unwrap();
        for (locale, model) in models {
            write_file(&temp.path().join(format!("models/{}.json", locale)), model).unwrap();
        }
        let file = ProjectFile::open(temp.path().join("parley.toml"), None).unwrap();
        (temp, file)
    }

    #[test]
    fn test_valid_project() {
        let (temp, file) = project(
            "[project]\nname = \"a\"\n[platforms.alexa]\n",
            &[("en-US", r#"{"invocation": "my app"}"#)],
        );

        let report = check(&file, None).unwrap();

        assert!(report.is_valid());
        assert_eq!(report.models.len(), 1);
        let summary = report.platforms[0].result.as_ref().unwrap();
        assert_eq!(summary.default_locale, "en-US");
        assert_eq!(summary.locales[0].locale, "en-US");
        assert!(!temp.path().join("build").exists());
    }

    #[test]
    fn test_invalid_model() {
        let (_temp, file) = project(
            "[project]\nname = \"a\"\n[platforms.alexa]\n",
            &[(
                "en-US",
                r#"{"invocation": "app", "intents": [{"name": "A", "phrases": ["{x}"]}]}"#,
            )],
        );

        let report = check(&file, None).unwrap();

        assert!(!report.is_valid());
        assert!(report.models[0].problem.as_ref().unwrap().contains("en-US.json"));
    }

    #[test]
    fn test_platform_problems() {
        let (_temp, file) = project(
            "[project]\nname = \"a\"\n[platforms.googleassistant]\n",
            &[("en", r#"{"invocation": "my app"}"#)],
        );

        let report = check(&file, None).unwrap();
        assert!(!report.is_valid());
        assert!(report.platforms[0].result.as_ref().unwrap_err().contains("project id"));

        let report = check(&file, Some("my-project".into())).unwrap();
        assert!(report.is_valid());
    }
}
