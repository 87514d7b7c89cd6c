//! Cross-language page alignment.
//!
//! Every language document is expected to hold one text unit per page, in
//! page order. A language whose unit count differs from the reference
//! language is assumed to be out of date and is left out of the book.

use crate::error::{Error, Result};
use crate::language::Language;
use crate::types::{LanguageTextStore, PageEntry};
use log::warn;

/// Builds the page-major text matrix from a language store.
#[derive(Debug, Clone)]
pub struct AlignmentEngine {
    reference: Language,
}

impl Default for AlignmentEngine {
    fn default() -> Self {
        Self {
            reference: Language::English,
        }
    }
}

/// Result of aligning a store.
#[derive(Debug, Clone)]
pub struct Alignment {
    /// One entry per reference-language unit, in page order.
    pub pages: Vec<PageEntry>,

    /// Languages that survived alignment, in iteration order.
    pub languages: Vec<Language>,

    /// Languages dropped because their unit count didn't match.
    pub excluded: Vec<Language>,
}

impl AlignmentEngine {
    /// Create an engine using English as the reference language.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different reference language.
    pub fn with_reference(mut self, language: Language) -> Self {
        self.reference = language;
        self
    }

    pub fn reference(&self) -> Language {
        self.reference
    }

    /// Align every language in the store against the reference language.
    ///
    /// Fails only when the reference language is missing. Desynchronized
    /// languages are removed from the store and reported in `excluded`.
    pub fn align(&self, mut store: LanguageTextStore, project_name: &str) -> Result<Alignment> {
        let reference_len = store
            .get(self.reference)
            .map(<[_]>::len)
            .ok_or_else(|| Error::MissingReferenceLanguage {
                project: project_name.to_string(),
                language: self.reference,
            })?;

        let excluded: Vec<Language> = store
            .iter()
            .filter(|(_, units)| units.len() != reference_len)
            .map(|(language, _)| language)
            .collect();

        for language in &excluded {
            warn!(
                "Excluding {} from {} because it is out of sync with {} ({} units, expected {})",
                language,
                project_name,
                self.reference,
                store.get(*language).map_or(0, <[_]>::len),
                reference_len
            );
            store.remove(*language);
        }

        let pages = (0..reference_len)
            .map(|index| {
                store
                    .iter()
                    .map(|(language, units)| (language, units[index].clone()))
                    .collect::<PageEntry>()
            })
            .collect();

        Ok(Alignment {
            pages,
            languages: store.languages(),
            excluded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TextUnit;

    fn units(count: usize) -> Vec<TextUnit> {
        (0..count).map(|i| TextUnit::body(format!("page {}", i))).collect()
    }

    #[test]
    fn test_equal_lengths_exclude_nothing() {
        let mut store = LanguageTextStore::new();
        store.insert(Language::English, units(4));
        store.insert(Language::Spanish, units(4));
        store.insert(Language::French, units(4));

        let alignment = AlignmentEngine::new().align(store, "Creation").unwrap();

        assert!(alignment.excluded.is_empty());
        assert_eq!(alignment.pages.len(), 4);
        assert!(alignment.pages.iter().all(|p| p.len() == 3));
    }

    #[test]
    fn test_desynced_language_is_excluded_everywhere() {
        let mut store = LanguageTextStore::new();
        store.insert(Language::English, units(3));
        store.insert(Language::French, units(2));
        store.insert(Language::Swahili, units(5));
        store.insert(Language::Spanish, units(3));

        let alignment = AlignmentEngine::new().align(store, "Creation").unwrap();

        assert_eq!(alignment.excluded, vec![Language::French, Language::Swahili]);
        assert_eq!(alignment.languages, vec![Language::English, Language::Spanish]);
        assert_eq!(alignment.pages.len(), 3);
        for page in &alignment.pages {
            assert!(!page.contains(Language::French));
            assert!(!page.contains(Language::Swahili));
        }
    }

    #[test]
    fn test_only_reference_language() {
        let mut store = LanguageTextStore::new();
        store.insert(Language::English, units(3));
        store.insert(Language::French, units(2));

        let alignment = AlignmentEngine::new().align(store, "Creation").unwrap();

        assert_eq!(alignment.languages, vec![Language::English]);
        assert_eq!(alignment.pages[2].get(Language::English).unwrap().text, "page 2");
    }

    #[test]
    fn test_missing_reference_language_fails() {
        let mut store = LanguageTextStore::new();
        store.insert(Language::Spanish, units(3));

        let err = AlignmentEngine::new().align(store, "Creation").unwrap_err();
        assert!(matches!(
            err,
            Error::MissingReferenceLanguage { language: Language::English, .. }
        ));
    }

    #[test]
    fn test_custom_reference_language() {
        let mut store = LanguageTextStore::new();
        store.insert(Language::English, units(2));
        store.insert(Language::Spanish, units(3));

        let alignment = AlignmentEngine::new()
            .with_reference(Language::Spanish)
            .align(store, "Creation")
            .unwrap();

        assert_eq!(alignment.excluded, vec![Language::English]);
        assert_eq!(alignment.pages.len(), 3);
    }

    #[test]
    fn test_empty_reference_yields_no_pages() {
        let mut store = LanguageTextStore::new();
        store.insert(Language::English, Vec::new());

        let alignment = AlignmentEngine::new().align(store, "Creation").unwrap();
        assert!(alignment.pages.is_empty());
        assert_eq!(alignment.languages, vec![Language::English]);
    }
}
