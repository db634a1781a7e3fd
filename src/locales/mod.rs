//! Language table for the remote autocomplete provider
//!
//! A closed set of supported locale codes. Extending support means adding
//! an enum entry; the table is not user-extensible at runtime.

use std::fmt;

/// Languages the remote provider accepts.
///
/// The on-device provider ignores the language entirely; it searches in
/// the device locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    Arabic,
    Bengali,
    Chinese,
    Czech,
    Danish,
    Dutch,
    #[default]
    English,
    Finnish,
    French,
    German,
    Greek,
    Hebrew,
    Hindi,
    Hungarian,
    Indonesian,
    Italian,
    Japanese,
    Korean,
    Norwegian,
    Polish,
    Portuguese,
    Russian,
    Spanish,
    Swedish,
    Thai,
    Turkish,
    Ukrainian,
    Vietnamese,
}

impl Language {
    /// Locale code sent on the wire
    pub const fn code(&self) -> &'static str {
        match self {
            Language::Arabic => "ar",
            Language::Bengali => "bn",
            Language::Chinese => "zh-CN",
            Language::Czech => "cs",
            Language::Danish => "da",
            Language::Dutch => "nl",
            Language::English => "en",
            Language::Finnish => "fi",
            Language::French => "fr",
            Language::German => "de",
            Language::Greek => "el",
            Language::Hebrew => "iw",
            Language::Hindi => "hi",
            Language::Hungarian => "hu",
            Language::Indonesian => "id",
            Language::Italian => "it",
            Language::Japanese => "ja",
            Language::Korean => "ko",
            Language::Norwegian => "no",
            Language::Polish => "pl",
            Language::Portuguese => "pt",
            Language::Russian => "ru",
            Language::Spanish => "es",
            Language::Swedish => "sv",
            Language::Thai => "th",
            Language::Turkish => "tr",
            Language::Ukrainian => "uk",
            Language::Vietnamese => "vi",
        }
    }

    /// Look up a language by its English name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Language> {
        let lang = match name.to_lowercase().as_str() {
            "arabic" => Language::Arabic,
            "bengali" => Language::Bengali,
            "chinese" => Language::Chinese,
            "czech" => Language::Czech,
            "danish" => Language::Danish,
            "dutch" => Language::Dutch,
            "english" => Language::English,
            "finnish" => Language::Finnish,
            "french" => Language::French,
            "german" => Language::German,
            "greek" => Language::Greek,
            "hebrew" => Language::Hebrew,
            "hindi" => Language::Hindi,
            "hungarian" => Language::Hungarian,
            "indonesian" => Language::Indonesian,
            "italian" => Language::Italian,
            "japanese" => Language::Japanese,
            "korean" => Language::Korean,
            "norwegian" => Language::Norwegian,
            "polish" => Language::Polish,
            "portuguese" => Language::Portuguese,
            "russian" => Language::Russian,
            "spanish" => Language::Spanish,
            "swedish" => Language::Swedish,
            "thai" => Language::Thai,
            "turkish" => Language::Turkish,
            "ukrainian" => Language::Ukrainian,
            "vietnamese" => Language::Vietnamese,
            _ => return None,
        };
        Some(lang)
    }

    /// Look up a language by its locale code
    pub fn from_code(code: &str) -> Option<Language> {
        ALL_LANGUAGES.iter().copied().find(|l| l.code() == code)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// All supported languages, in enum order
pub const ALL_LANGUAGES: &[Language] = &[
    Language::Arabic,
    Language::Bengali,
    Language::Chinese,
    Language::Czech,
    Language::Danish,
    Language::Dutch,
    Language::English,
    Language::Finnish,
    Language::French,
    Language::German,
    Language::Greek,
    Language::Hebrew,
    Language::Hindi,
    Language::Hungarian,
    Language::Indonesian,
    Language::Italian,
    Language::Japanese,
    Language::Korean,
    Language::Norwegian,
    Language::Polish,
    Language::Portuguese,
    Language::Russian,
    Language::Spanish,
    Language::Swedish,
    Language::Thai,
    Language::Turkish,
    Language::Ukrainian,
    Language::Vietnamese,
];
