//! Validation context and utilities for project parsing.

use miette::SourceSpan;

use super::{LocaleTable, PlatformSettings, ProjectConfig};
use crate::{Result, error::SourceContext};

/// Validation context that carries source information for error spans.
#[derive(Debug, Clone)]
pub(crate) struct ParseContext {
    source: SourceContext,
}

impl ParseContext {
    pub fn new(src: &str, filename: &str) -> Self {
        Self {
            source: SourceContext::new(src, filename),
        }
    }

    /// Find the span of a key or value in the source.
    pub fn find_span(&self, needle: &str) -> Option<SourceSpan> {
        find_key_span(self.source.src(), needle)
    }

    /// Validate the whole project configuration.
    pub fn validate_project(&self, config: &ProjectConfig) -> Result<()> {
        if config.project.name.trim().is_empty() {
            return Err(self
                .source
                .validation_error("project name cannot be empty", self.find_span("name")));
        }

        self.validate_table(&config.locales, "[locales]")?;

        for id in config.platforms.configured() {
            if let Some(settings) = config.platform(id) {
                self.validate_platform(id, settings)?;
            }
        }
        Ok(())
    }

    fn validate_platform(&self, id: &str, settings: &dyn PlatformSettings) -> Result<()> {
        if let Some(locale) = settings.default_locale() {
            self.validate_locale(locale, &format!("platforms.{}.default-locale", id))?;
        }
        if let Some(table) = settings.locales() {
            self.validate_table(table, &format!("[platforms.{}.locales]", id))?;
        }
        for path in settings.files().keys() {
            if let Some(reason) = validate_relative_path(path) {
                return Err(self.source.validation_error(
                    format!("invalid file override '{}' in platforms.{}: {}", path, id, reason),
                    self.find_span(path),
                ));
            }
        }
        Ok(())
    }

    fn validate_table(&self, table: &LocaleTable, context: &str) -> Result<()> {
        for (token, codes) in table.iter() {
            self.validate_locale(token, context)?;
            if codes.is_empty() {
                return Err(self.source.validation_error(
                    format!("locale '{}' in {} must resolve to at least one locale", token, context),
                    self.find_span(token),
                ));
            }
            for code in codes {
                self.validate_locale(code, context)?;
            }
        }
        Ok(())
    }

    fn validate_locale(&self, locale: &str, context: &str) -> Result<()> {
        match validate_locale_code(locale) {
            Some(reason) => Err(self.source.invalid_locale_error(
                locale,
                context,
                reason,
                self.find_span(locale),
            )),
            None => Ok(()),
        }
    }
}

/// Find the span of a key or string value in the TOML source.
///
/// Tries `key =`, `"key"` and `.key]`, in that order.
pub(crate) fn find_key_span(src: &str, needle: &str) -> Option<SourceSpan> {
    let assignment = format!("{} =", needle);
    if let Some(pos) = src
        .match_indices(&assignment)
        .map(|(pos, _)| pos)
        .find(|&pos| pos == 0 || src[..pos].ends_with(char::is_whitespace))
    {
        return Some(SourceSpan::from((pos, needle.len())));
    }

    let quoted = format!("\"{}\"", needle);
    if let Some(pos) = src.find(&quoted) {
        // +1 to skip the opening quote
        return Some(SourceSpan::from((pos + 1, needle.len())));
    }

    let header = format!(".{}]", needle);
    if let Some(pos) = src.find(&header) {
        return Some(SourceSpan::from((pos + 1, needle.len())));
    }

    None
}

/// Validate a locale code such as `en` or `en-US`.
///
/// Returns None if valid, Some(reason) if invalid.
pub(crate) fn validate_locale_code(locale: &str) -> Option<&'static str> {
    if locale.is_empty() {
        return Some("locale cannot be empty");
    }

    let mut parts = locale.split('-');
    let language = parts.next().unwrap_or_default();
    if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_lowercase()) {
        return Some("language must be 2 or 3 lowercase letters");
    }

    if let Some(region) = parts.next() {
        if region.len() < 2 || !region.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Some("region must be at least 2 letters or digits");
        }
    }

    if parts.next().is_some() {
        return Some("locale must have at most one '-' separator");
    }

    None
}

/// Validate a `/`-separated relative file path.
fn validate_relative_path(path: &str) -> Option<&'static str> {
    if path.is_empty() {
        return Some("path cannot be empty");
    }
    if path.starts_with('/') {
        return Some("path must be relative");
    }
    if path.split('/').any(|segment| segment.is_empty() || segment == "..") {
        return Some("path cannot contain empty or '..' segments");
    }
    None
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::Error;

    #[test]
    fn test_valid_locale_codes() {
        assert!(validate_locale_code("en").is_none());
        assert!(validate_locale_code("en-US").is_none());
        assert!(validate_locale_code("es-419").is_none());
        assert!(validate_locale_code("fil-PH").is_none());
    }

    #[test]
    fn test_invalid_locale_codes() {
        assert!(validate_locale_code("").is_some());
        assert!(validate_locale_code("EN").is_some());
        assert!(validate_locale_code("english").is_some());
        assert!(validate_locale_code("en-").is_some());
        assert!(validate_locale_code("en-US-x").is_some());
    }

    #[test]
    fn test_relative_paths() {
        assert!(validate_relative_path("skill-package/skill.json").is_none());
        assert!(validate_relative_path("/etc/passwd").is_some());
        assert!(validate_relative_path("../outside.json").is_some());
        assert!(validate_relative_path("a//b").is_some());
    }

    #[test]
    fn test_find_key_span() {
        let src = "[locales]\nen = [\"en-US\"]\n";
        let span = find_key_span(src, "en").unwrap();
        assert_eq!(span.offset(), 10);
        let span = find_key_span(src, "en-US").unwrap();
        assert_eq!(span.offset(), 17);
        assert!(find_key_span(src, "fr").is_none());
    }

    #[test]
    fn test_empty_locale_entry_rejected() {
        let err = ProjectConfig::from_str(
            r#"
            [project]
            name = "my-app"

            [locales]
            en = []
            "#,
        )
        .unwrap_err();

        match *err {
            Error::Validation { message, span, .. } => {
                assert!(message.contains("must resolve to at least one locale"));
                assert!(span.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_locale_in_platform_table() {
        let err = ProjectConfig::from_str(
            r#"
            [project]
            name = "my-app"

            [platforms.alexa.locales]
            en = ["en_US"]
            "#,
        )
        .unwrap_err();

        assert!(matches!(*err, Error::InvalidLocale { .. }));
    }

    #[test]
    fn test_invalid_file_override() {
        let err = ProjectConfig::from_str(
            r#"
            [project]
            name = "my-app"

            [platforms.alexa.files."../skill.json"]
            manifest = {}
            "#,
        )
        .unwrap_err();

        assert!(matches!(*err, Error::Validation { .. }));
    }
}
