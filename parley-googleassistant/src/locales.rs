use parley_build::SupportedLocales;

/// Locales of conversational actions.
///
/// A regional locale like `en-US` is only valid together with its generic
/// language (`en`).
pub const SUPPORTED_LOCALES: SupportedLocales = SupportedLocales {
    locales: &[
        "da", "de", "de-AT", "de-CH", "de-DE", "en", "en-AU", "en-CA", "en-GB", "en-IN", "en-SG",
        "en-US", "es", "es-419", "es-ES", "fr", "fr-CA", "fr-FR", "hi", "id", "it", "ja", "ko",
        "nl", "no", "pl", "pt", "pt-BR", "ru", "sv", "th", "tr", "zh-HK", "zh-TW",
    ],
    generic: true,
    docs_url: "https://developers.google.com/assistant/console/languages-locales",
};
