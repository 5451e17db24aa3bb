//! Project parsing from files and strings.

use std::{path::Path, str::FromStr};

use super::{ProjectConfig, stage::merge_tables, validate::ParseContext};
use crate::{Error, Result, error::SourceContext};

impl FromStr for ProjectConfig {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        parse_project(s, "parley.toml", None)
    }
}

impl ProjectConfig {
    /// Parse a parley.toml file from the given path.
    pub fn from_file(path: impl AsRef<Path>, stage: Option<&str>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        parse_project(&content, &path.display().to_string(), stage)
    }

    /// Parse parley.toml content with a custom filename for error reporting.
    pub fn from_str_with_filename(
        content: &str,
        filename: &str,
        stage: Option<&str>,
    ) -> Result<Self> {
        parse_project(content, filename, stage)
    }
}

/// Parse a project from content, applying the stage overlay if one is selected.
pub fn parse_project(content: &str, filename: &str, stage: Option<&str>) -> Result<ProjectConfig> {
    let source_ctx = SourceContext::new(content, filename);
    // Typed parse of the raw file first so errors carry spans.
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| source_ctx.parse_error(e))?;

    let config = match stage {
        Some(stage) => apply_stage(content, &config, stage, &source_ctx)?,
        None => config,
    };

    ParseContext::new(content, filename).validate_project(&config)?;
    Ok(config)
}

fn apply_stage(
    content: &str,
    config: &ProjectConfig,
    stage: &str,
    source_ctx: &SourceContext,
) -> Result<ProjectConfig> {
    let Some(overlay) = config.stages.get(stage) else {
        let available = if config.stages.is_empty() {
            "(none)".to_string()
        } else {
            config
                .stages
                .keys()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };
        return Err(Box::new(Error::UnknownStage {
            stage: stage.to_string(),
            available,
        }));
    };

    let mut root: toml::Table = toml::from_str(content).map_err(|e| source_ctx.parse_error(e))?;
    merge_tables(&mut root, overlay);

    toml::Value::Table(root).try_into().map_err(|e: toml::de::Error| {
        Box::new(Error::Stage {
            stage: stage.to_string(),
            message: e.message().to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAGED: &str = r#"
        [project]
        name = "my-app"
        endpoint = "http://localhost:3000"

        [platforms.alexa]
        skill-id = "amzn1.ask.skill.dev"

        [stages.prod.project]
        endpoint = "https://prod.example.com"

        [stages.prod.platforms.alexa]
        skill-id = "amzn1.ask.skill.prod"
    "#;

    #[test]
    fn test_without_stage() {
        let config = parse_project(STAGED, "parley.toml", None).unwrap();
        assert_eq!(
            config.platforms.alexa.unwrap().skill_id.as_deref(),
            Some("amzn1.ask.skill.dev")
        );
    }

    #[test]
    fn test_stage_overlay() {
        let config = parse_project(STAGED, "parley.toml", Some("prod")).unwrap();
        assert_eq!(
            config.project.endpoint.as_deref(),
            Some("https://prod.example.com")
        );
        assert_eq!(config.project.name, "my-app");
        assert_eq!(
            config.platforms.alexa.unwrap().skill_id.as_deref(),
            Some("amzn1.ask.skill.prod")
        );
    }

    #[test]
    fn test_unknown_stage() {
        let err = parse_project(STAGED, "parley.toml", Some("staging")).unwrap_err();
        match *err {
            Error::UnknownStage { stage, available } => {
                assert_eq!(stage, "staging");
                assert_eq!(available, "prod");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_stage_with_invalid_value() {
        let content = r#"
            [project]
            name = "my-app"

            [stages.broken.project]
            build-directory = 42
        "#;
        let err = parse_project(content, "parley.toml", Some("broken")).unwrap_err();
        assert!(matches!(*err, Error::Stage { .. }));
    }

    #[test]
    fn test_parse_error_has_span() {
        let err = parse_project("[project\nname = 1", "parley.toml", None).unwrap_err();
        match *err {
            Error::Parse { span, .. } => assert!(span.is_some()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_file_missing() {
        let err = ProjectConfig::from_file("/nonexistent/parley.toml", None).unwrap_err();
        assert!(matches!(*err, Error::Io { .. }));
    }
}
