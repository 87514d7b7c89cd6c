//! Languages a book can carry text in.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A supported book language.
///
/// Declaration order is the iteration order of language-keyed maps, so
/// English (the reference language) comes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    Spanish,
    French,
    Portuguese,
    Swahili,
    Hindi,
    Indonesian,
    Arabic,
    Russian,
    Chinese,
    TokPisin,
    /// The filename did not name a supported language.
    Unknown,
}

impl Language {
    /// Every recognized language (excludes `Unknown`).
    pub const ALL: [Language; 11] = [
        Language::English,
        Language::Spanish,
        Language::French,
        Language::Portuguese,
        Language::Swahili,
        Language::Hindi,
        Language::Indonesian,
        Language::Arabic,
        Language::Russian,
        Language::Chinese,
        Language::TokPisin,
    ];

    /// Detect the language from a document filename without its extension.
    ///
    /// The stem is split on anything that isn't alphanumeric and the last
    /// token naming a language wins, so "Creation - Spanish" and
    /// "creation_es" both resolve to Spanish. Never fails: unrecognized
    /// names yield `Language::Unknown`.
    pub fn from_file_stem(stem: &str) -> Self {
        let lowered = stem.to_lowercase();
        let tokens: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect();

        // "tok pisin" spans two tokens
        for pair in tokens.windows(2).rev() {
            if pair[0] == "tok" && pair[1] == "pisin" {
                return Language::TokPisin;
            }
        }

        tokens
            .iter()
            .rev()
            .map(|t| Self::from_token(t))
            .find(|l| *l != Language::Unknown)
            .unwrap_or(Language::Unknown)
    }

    fn from_token(token: &str) -> Self {
        match token {
            "english" | "en" | "eng" => Language::English,
            "spanish" | "espanol" | "español" | "es" | "spa" => Language::Spanish,
            "french" | "francais" | "français" | "fr" | "fra" => Language::French,
            "portuguese" | "portugues" | "português" | "pt" | "por" => Language::Portuguese,
            "swahili" | "kiswahili" | "sw" | "swa" => Language::Swahili,
            "hindi" | "hi" | "hin" => Language::Hindi,
            "indonesian" | "bahasa" | "id" | "ind" => Language::Indonesian,
            "arabic" | "ar" | "ara" => Language::Arabic,
            "russian" | "ru" | "rus" => Language::Russian,
            "chinese" | "mandarin" | "zh" | "zho" => Language::Chinese,
            "tokpisin" | "tpi" => Language::TokPisin,
            _ => Language::Unknown,
        }
    }

    /// ISO 639 code used for the HTML `lang` attribute.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Spanish => "es",
            Language::French => "fr",
            Language::Portuguese => "pt",
            Language::Swahili => "sw",
            Language::Hindi => "hi",
            Language::Indonesian => "id",
            Language::Arabic => "ar",
            Language::Russian => "ru",
            Language::Chinese => "zh",
            Language::TokPisin => "tpi",
            Language::Unknown => "und",
        }
    }

    pub fn is_known(&self) -> bool {
        *self != Language::Unknown
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::TokPisin => "Tok Pisin",
            other => return write!(f, "{:?}", other),
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_names() {
        assert_eq!(Language::from_file_stem("Creation English"), Language::English);
        assert_eq!(Language::from_file_stem("Creation - Spanish"), Language::Spanish);
        assert_eq!(Language::from_file_stem("creation_francais"), Language::French);
        assert_eq!(Language::from_file_stem("NOAH SWAHILI"), Language::Swahili);
    }

    #[test]
    fn test_language_codes_in_stem() {
        assert_eq!(Language::from_file_stem("creation_es"), Language::Spanish);
        assert_eq!(Language::from_file_stem("creation.pt"), Language::Portuguese);
        assert_eq!(Language::from_file_stem("creation-tpi"), Language::TokPisin);
    }

    #[test]
    fn test_two_word_language() {
        assert_eq!(Language::from_file_stem("Creation Tok Pisin"), Language::TokPisin);
    }

    #[test]
    fn test_last_language_token_wins() {
        // "English" in the story title, Hindi as the document language
        assert_eq!(Language::from_file_stem("English Lessons Hindi"), Language::Hindi);
    }

    #[test]
    fn test_unknown_fallback() {
        assert_eq!(Language::from_file_stem("Creation"), Language::Unknown);
        assert_eq!(Language::from_file_stem(""), Language::Unknown);
        assert_eq!(Language::from_file_stem("Creation Klingon"), Language::Unknown);
        assert!(!Language::Unknown.is_known());
    }

    #[test]
    fn test_display_and_code() {
        assert_eq!(Language::English.to_string(), "English");
        assert_eq!(Language::TokPisin.to_string(), "Tok Pisin");
        assert_eq!(Language::English.code(), "en");
        assert!(Language::ALL.iter().all(|l| l.is_known()));
    }
}
