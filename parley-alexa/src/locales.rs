use parley_build::SupportedLocales;

/// Locales Alexa accepts. Alexa has no generic language codes.
pub const SUPPORTED_LOCALES: SupportedLocales = SupportedLocales {
    locales: &[
        "ar-SA", "de-DE", "en-AU", "en-CA", "en-GB", "en-IN", "en-US", "es-ES", "es-MX", "es-US",
        "fr-CA", "fr-FR", "hi-IN", "it-IT", "ja-JP", "nl-NL", "pt-BR",
    ],
    generic: false,
    docs_url: "https://developer.amazon.com/en-US/docs/alexa/custom-skills/develop-skills-in-multiple-languages.html",
};
