//! Locale resolution.
//!
//! A requested locale token is expanded through the project's
//! [`LocaleTable`] into the concrete codes a platform builds, then checked
//! against the platform's [`SupportedLocales`].

use indexmap::IndexSet;
use parley_core::locale_prefix;
use parley_project::LocaleTable;

use crate::{Error, Result, platform::SupportedLocales};

/// Expand requested tokens into concrete locale codes.
///
/// Tokens with a table entry expand to that entry; other tokens stand for
/// themselves. The result is deduplicated and keeps first-seen order.
pub fn resolve_locales<S: AsRef<str>>(requested: &[S], table: &LocaleTable) -> Vec<String> {
    let mut resolved = IndexSet::new();
    for token in requested {
        let token = token.as_ref();
        match table.get(token) {
            Some(codes) => {
                for code in codes {
                    resolved.insert(code.clone());
                }
            }
            None => {
                resolved.insert(token.to_string());
            }
        }
    }
    resolved.into_iter().collect()
}

/// Check every resolved locale against the platform's supported set.
///
/// Fails on the first offending locale. On platforms with generic locales,
/// a regional code whose language prefix is itself supported also needs
/// that prefix among the resolved codes.
pub fn validate_locales<S: AsRef<str>>(
    resolved: &[S],
    supported: &SupportedLocales,
    platform: &str,
) -> Result<()> {
    for locale in resolved {
        let locale = locale.as_ref();
        if !supported.contains(locale) {
            return Err(Error::unsupported_locale(
                locale,
                platform,
                "not in the list of supported locales",
                supported.docs_url,
            ));
        }

        if !supported.generic {
            continue;
        }

        let prefix = locale_prefix(locale);
        if prefix != locale
            && supported.contains(prefix)
            && !resolved.iter().any(|code| code.as_ref() == prefix)
        {
            return Err(Error::unsupported_locale(
                locale,
                platform,
                format!(
                    "the generic locale '{}' must be built as well, add it to the requested locales or to the locale table",
                    prefix
                ),
                supported.docs_url,
            ));
        }
    }
    Ok(())
}

/// Pick the default locale of a platform build.
///
/// An explicitly configured locale wins, but must be one of the resolved
/// locales. Otherwise the first resolved locale containing "en" is chosen,
/// falling back to the first resolved locale.
pub fn select_default_locale<S: AsRef<str>>(
    resolved: &[S],
    configured: Option<&str>,
) -> Result<String> {
    if let Some(locale) = configured {
        if !resolved.iter().any(|code| code.as_ref() == locale) {
            let codes: Vec<&str> = resolved.iter().map(|code| code.as_ref()).collect();
            return Err(Error::configuration(
                format!(
                    "default locale '{}' is not among the resolved locales ({})",
                    locale,
                    codes.join(", ")
                ),
                Some("add a model for the default locale, or change default-locale"),
            ));
        }
        return Ok(locale.to_string());
    }

    resolved
        .iter()
        .map(|locale| locale.as_ref())
        .find(|locale| locale.contains("en"))
        .or_else(|| resolved.first().map(|locale| locale.as_ref()))
        .map(str::to_string)
        .ok_or_else(|| {
            Error::configuration(
                "could not determine a default locale: no locales were resolved",
                Some("add a model file such as models/en.json, or pass --locale"),
            )
        })
}

/// The table token a concrete locale should be stored under.
///
/// Returns a token only if its entry resolves to exactly `concrete`, so a
/// reverse build of `en-US` with `en = ["en-US"]` writes `models/en.json`.
pub fn generic_locale_for<'a>(concrete: &str, table: &'a LocaleTable) -> Option<&'a str> {
    table
        .iter()
        .find(|(_, codes)| codes.len() == 1 && codes[0] == concrete)
        .map(|(token, _)| token)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALEXA_LIKE: SupportedLocales = SupportedLocales {
        locales: &["en-US", "en-GB", "de-DE"],
        generic: false,
        docs_url: "https://example.com/alexa-locales",
    };

    const GOOGLE_LIKE: SupportedLocales = SupportedLocales {
        locales: &["en", "en-US", "en-GB", "de", "de-DE"],
        generic: true,
        docs_url: "https://example.com/google-locales",
    };

    fn table() -> LocaleTable {
        [("en", vec!["en-US", "en-GB"])].into_iter().collect()
    }

    #[test]
    fn test_resolve_with_table_entry() {
        assert_eq!(resolve_locales(&["en"], &table()), vec!["en-US", "en-GB"]);
    }

    #[test]
    fn test_resolve_concrete_locale_is_identity() {
        assert_eq!(resolve_locales(&["en-US"], &table()), vec!["en-US"]);
        assert_eq!(
            resolve_locales(&["de-DE"], &LocaleTable::default()),
            vec!["de-DE"]
        );
    }

    #[test]
    fn test_resolve_dedups_in_first_seen_order() {
        assert_eq!(
            resolve_locales(&["en-GB", "en", "de-DE", "en-GB"], &table()),
            vec!["en-GB", "en-US", "de-DE"]
        );
    }

    #[test]
    fn test_validate_supported() {
        assert!(validate_locales(&["en-US", "en-GB"], &ALEXA_LIKE, "Alexa").is_ok());
    }

    #[test]
    fn test_validate_unsupported_names_locale() {
        let supported = SupportedLocales {
            locales: &["en-US", "en-GB"],
            generic: false,
            docs_url: "https://example.com/alexa-locales",
        };
        let err = validate_locales(&["de-DE"], &supported, "Alexa").unwrap_err();

        match *err {
            Error::UnsupportedLocale { locale, docs, .. } => {
                assert_eq!(locale, "de-DE");
                assert_eq!(docs, "https://example.com/alexa-locales");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_validate_fails_fast_on_first() {
        let err = validate_locales(&["fr-FR", "it-IT"], &ALEXA_LIKE, "Alexa").unwrap_err();
        assert!(matches!(*err, Error::UnsupportedLocale { ref locale, .. } if locale == "fr-FR"));
    }

    #[test]
    fn test_validate_generic_exact_match_on_alexa_like() {
        let err = validate_locales(&["en"], &ALEXA_LIKE, "Alexa").unwrap_err();
        assert_eq!(err.kind(), "unsupported-locale");
    }

    #[test]
    fn test_validate_requires_generic_prefix() {
        let err = validate_locales(&["en-US"], &GOOGLE_LIKE, "Google Assistant").unwrap_err();
        match *err {
            Error::UnsupportedLocale { locale, detail, .. } => {
                assert_eq!(locale, "en-US");
                assert!(detail.contains("'en'"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(validate_locales(&["en", "en-US"], &GOOGLE_LIKE, "Google Assistant").is_ok());
        assert!(validate_locales(&["en-US", "en"], &GOOGLE_LIKE, "Google Assistant").is_ok());
    }

    #[test]
    fn test_default_locale_prefers_en() {
        let resolved = resolve_locales(&["en"], &table());
        assert_eq!(select_default_locale(&resolved, None).unwrap(), "en-US");
        assert_eq!(
            select_default_locale(&["de-DE", "en-GB"], None).unwrap(),
            "en-GB"
        );
    }

    #[test]
    fn test_default_locale_falls_back_to_first() {
        assert_eq!(
            select_default_locale(&["de-DE", "fr-FR"], None).unwrap(),
            "de-DE"
        );
    }

    #[test]
    fn test_default_locale_configured_wins() {
        assert_eq!(
            select_default_locale(&["en-US", "de-DE"], Some("de-DE")).unwrap(),
            "de-DE"
        );
    }

    #[test]
    fn test_default_locale_configured_must_be_resolved() {
        let err = select_default_locale(&["de"], Some("en")).unwrap_err();
        assert_eq!(err.kind(), "configuration");
        assert!(err.to_string().contains("'en'"));
        assert!(err.to_string().contains("(de)"));
    }

    #[test]
    fn test_default_locale_none_resolved() {
        let empty: [&str; 0] = [];
        let err = select_default_locale(&empty, None).unwrap_err();
        assert_eq!(err.kind(), "configuration");
    }

    #[test]
    fn test_generic_locale_for() {
        let table: LocaleTable = [("en", vec!["en-US"]), ("de", vec!["de-DE", "de-AT"])]
            .into_iter()
            .collect();
        assert_eq!(generic_locale_for("en-US", &table), Some("en"));
        assert_eq!(generic_locale_for("de-DE", &table), None);
        assert_eq!(generic_locale_for("fr-FR", &table), None);
    }
}
