//! Structured file formats, selected by file extension.

use std::{fmt, path::Path};

use serde_json::Value;
use thiserror::Error;

/// Error raised while rendering or parsing structured file content.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Serialization format of a file, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Yaml,
    /// Anything else; string values are written verbatim.
    Text,
}

impl FileFormat {
    /// Detect the format from a file name or path.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::Json,
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Text,
        }
    }

    /// Render a structured value in this format.
    ///
    /// JSON is pretty-printed with a trailing newline.
    pub fn render(self, value: &Value) -> Result<String, FormatError> {
        match self {
            Self::Json => Ok(format!("{}\n", serde_json::to_string_pretty(value)?)),
            Self::Yaml => Ok(serde_yaml::to_string(value)?),
            Self::Text => match value {
                Value::String(s) => Ok(s.clone()),
                other => Ok(format!("{}\n", serde_json::to_string_pretty(other)?)),
            },
        }
    }

    /// Parse text in this format into a structured value.
    ///
    /// Text files parse to a plain string value.
    pub fn parse(self, content: &str) -> Result<Value, FormatError> {
        match self {
            Self::Json => Ok(serde_json::from_str(content)?),
            Self::Yaml => Ok(serde_yaml::from_str(content)?),
            Self::Text => Ok(Value::String(content.to_string())),
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Yaml => write!(f, "yaml"),
            Self::Text => write!(f, "text"),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(FileFormat::from_path("skill.json"), FileFormat::Json);
        assert_eq!(
            FileFormat::from_path("custom/intents/HelloIntent.yaml"),
            FileFormat::Yaml
        );
        assert_eq!(FileFormat::from_path("settings.yml"), FileFormat::Yaml);
        assert_eq!(FileFormat::from_path(".gitignore"), FileFormat::Text);
    }

    #[test]
    fn test_render_json_is_pretty() {
        let rendered = FileFormat::Json.render(&json!({"a": 1})).unwrap();
        assert_eq!(rendered, "{\n  \"a\": 1\n}\n");
    }

    #[test]
    fn test_yaml_parse_render() {
        let value = json!({"trainingPhrases": ["hello", "hi"]});
        let rendered = FileFormat::Yaml.render(&value).unwrap();
        assert!(rendered.contains("trainingPhrases:"));
        assert_eq!(FileFormat::Yaml.parse(&rendered).unwrap(), value);
    }

    #[test]
    fn test_text_render_string_verbatim() {
        let rendered = FileFormat::Text.render(&json!("node_modules\n")).unwrap();
        assert_eq!(rendered, "node_modules\n");
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(
            FileFormat::Json.parse("{ not json"),
            Err(FormatError::Json(_))
        ));
    }
}
