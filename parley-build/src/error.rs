use std::path::{Path, PathBuf};

use miette::Diagnostic;
use thiserror::Error;

/// Result type for build operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Everything that can stop a build, a locale, or a single task.
///
/// Every variant carries a machine-readable [`kind`](Error::kind), a human
/// message and, where one exists, a remediation hint rendered by miette.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    /// A required value is missing or inconsistent. Fatal for the whole build.
    #[error("{message}")]
    #[diagnostic(code(parley::configuration))]
    Configuration {
        message: String,
        #[help]
        hint: Option<String>,
    },

    /// A locale the platform cannot build. Fatal for that platform.
    #[error("locale '{locale}' is not supported by {platform}: {detail}")]
    #[diagnostic(
        code(parley::unsupported_locale),
        help("supported locales are listed at {docs}")
    )]
    UnsupportedLocale {
        locale: String,
        platform: String,
        detail: String,
        docs: String,
    },

    /// Forward or reverse conversion failed. Fatal for that locale.
    #[error("{platform} conversion failed for locale '{locale}': {message}")]
    #[diagnostic(code(parley::conversion))]
    Conversion {
        platform: String,
        locale: String,
        message: String,
        #[help]
        hint: Option<String>,
    },

    /// A canonical model that cannot be used. Fatal for that locale.
    #[error("invalid model '{path}': {message}")]
    #[diagnostic(
        code(parley::model_validation),
        help("fix the model file and run the build again")
    )]
    ModelValidation { path: PathBuf, message: String },

    /// Structured native or model content that could not be parsed.
    #[error("failed to parse '{path}': {message}")]
    #[diagnostic(
        code(parley::parse),
        help("the file must be valid JSON or YAML, matching its extension")
    )]
    Parse { path: PathBuf, message: String },

    /// The project file could not be loaded.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Project(parley_project::Error),

    /// An underlying read or write failed.
    #[error("file system error at '{path}'")]
    #[diagnostic(code(parley::filesystem))]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Short machine-readable kind of this error.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Configuration { .. } => "configuration",
            Error::UnsupportedLocale { .. } => "unsupported-locale",
            Error::Conversion { .. } => "conversion",
            Error::ModelValidation { .. } => "model-validation",
            Error::Parse { .. } => "parse",
            Error::Project(_) => "project",
            Error::FileSystem { .. } => "filesystem",
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>, hint: Option<&str>) -> Box<Self> {
        Box::new(Error::Configuration {
            message: message.into(),
            hint: hint.map(str::to_string),
        })
    }

    /// Create an unsupported locale error.
    pub fn unsupported_locale(
        locale: impl Into<String>,
        platform: impl Into<String>,
        detail: impl Into<String>,
        docs: impl Into<String>,
    ) -> Box<Self> {
        Box::new(Error::UnsupportedLocale {
            locale: locale.into(),
            platform: platform.into(),
            detail: detail.into(),
            docs: docs.into(),
        })
    }

    /// Create a conversion error.
    pub fn conversion(
        platform: impl Into<String>,
        locale: impl Into<String>,
        message: impl Into<String>,
        hint: Option<&str>,
    ) -> Box<Self> {
        Box::new(Error::Conversion {
            platform: platform.into(),
            locale: locale.into(),
            message: message.into(),
            hint: hint.map(str::to_string),
        })
    }

    /// Create a model validation error.
    pub fn model_validation(path: impl AsRef<Path>, message: impl Into<String>) -> Box<Self> {
        Box::new(Error::ModelValidation {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        })
    }

    /// Create a parse error for structured content.
    pub fn parse(path: impl AsRef<Path>, message: impl ToString) -> Box<Self> {
        Box::new(Error::Parse {
            path: path.as_ref().to_path_buf(),
            message: message.to_string(),
        })
    }

    /// Wrap an I/O error with the path it happened at.
    pub fn filesystem(path: impl AsRef<Path>, source: std::io::Error) -> Box<Self> {
        Box::new(Error::FileSystem {
            path: path.as_ref().to_path_buf(),
            source,
        })
    }
}

impl From<Box<parley_project::Error>> for Box<Error> {
    fn from(err: Box<parley_project::Error>) -> Self {
        Box::new(Error::Project(*err))
    }
}

#[cfg(test)]
mod tests {
    use miette::Diagnostic;

    use super::*;

    #[test]
    fn test_kinds() {
        assert_eq!(
            Error::configuration("no default locale", None).kind(),
            "configuration"
        );
        assert_eq!(
            Error::unsupported_locale("de-DE", "Alexa", "not supported", "https://x").kind(),
            "unsupported-locale"
        );
        assert_eq!(
            Error::conversion("alexa", "en-US", "no files", None).kind(),
            "conversion"
        );
        assert_eq!(
            Error::model_validation("models/en.json", "bad").kind(),
            "model-validation"
        );
        assert_eq!(
            Error::filesystem("out", std::io::Error::other("disk full")).kind(),
            "filesystem"
        );
        assert_eq!(Error::parse("a.json", "expected value").kind(), "parse");
    }

    #[test]
    fn test_unsupported_locale_message() {
        let err = Error::unsupported_locale(
            "de-DE",
            "Alexa",
            "not in the list of supported locales",
            "https://example.com/locales",
        );
        assert_eq!(
            err.to_string(),
            "locale 'de-DE' is not supported by Alexa: not in the list of supported locales"
        );
        let help = err.help().map(|h| h.to_string());
        assert_eq!(
            help.as_deref(),
            Some("supported locales are listed at https://example.com/locales")
        );
    }

    #[test]
    fn test_configuration_hint() {
        let err = Error::configuration(
            "could not find a project id",
            Some("pass --project-id or set project-id"),
        );
        assert_eq!(
            err.help().map(|h| h.to_string()).as_deref(),
            Some("pass --project-id or set project-id")
        );
    }
}
