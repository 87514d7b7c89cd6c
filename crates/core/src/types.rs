//! Domain types for extracted book text.

use crate::collab::TextExtractor;
use crate::language::Language;
use log::{debug, error, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// What a unit of extracted text represents on its page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextKind {
    /// The book title (usually the first page).
    Title,
    /// Story text for a content page.
    Body,
    /// A standalone page of source references.
    Reference,
    /// Book-level alternate titles; carries no visual page.
    AlternateTitles,
}

/// One page's worth of text in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextUnit {
    pub kind: TextKind,

    pub text: String,

    /// Citation for the passage, only meaningful for `Body` units.
    pub reference: Option<String>,
}

impl TextUnit {
    pub fn new(kind: TextKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            reference: None,
        }
    }

    pub fn title(text: impl Into<String>) -> Self {
        Self::new(TextKind::Title, text)
    }

    pub fn body(text: impl Into<String>) -> Self {
        Self::new(TextKind::Body, text)
    }

    /// Body text with its source reference.
    pub fn body_with_reference(text: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            kind: TextKind::Body,
            text: text.into(),
            reference: Some(reference.into()),
        }
    }

    pub fn alternate_titles(text: impl Into<String>) -> Self {
        Self::new(TextKind::AlternateTitles, text)
    }

    /// Return a copy of this unit with different text.
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            kind: self.kind,
            text: text.into(),
            reference: self.reference.clone(),
        }
    }
}

/// Extracted text for every language of a project, one unit per page.
#[derive(Debug, Clone, Default)]
pub struct LanguageTextStore {
    units: BTreeMap<Language, Vec<TextUnit>>,
}

impl LanguageTextStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract every document and keep one store entry per detected language.
    ///
    /// Documents whose filename doesn't name a language, repeats of an
    /// already-loaded language, and documents that fail to extract are
    /// skipped with a log message; none of them abort the run.
    pub fn collect<E, P>(extractor: &E, documents: &[P], project_name: &str) -> Self
    where
        E: TextExtractor + ?Sized,
        P: AsRef<Path>,
    {
        let mut store = Self::new();

        for path in documents {
            let path = path.as_ref();
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default();
            let language = Language::from_file_stem(stem);

            if !language.is_known() {
                warn!(
                    "Skipping {} for {}: could not determine its language",
                    path.display(),
                    project_name
                );
                continue;
            }
            if store.contains(language) {
                debug!("Already have {} text, ignoring {}", language, path.display());
                continue;
            }

            match extractor.extract(path) {
                Ok(units) => {
                    debug!("Extracted {} {} units from {}", units.len(), language, path.display());
                    store.insert(language, units);
                }
                Err(e) => {
                    error!(
                        "Could not process {} Word document for {}: {}",
                        language, project_name, e
                    );
                }
            }
        }

        store
    }

    pub fn insert(&mut self, language: Language, units: Vec<TextUnit>) {
        self.units.insert(language, units);
    }

    pub fn contains(&self, language: Language) -> bool {
        self.units.contains_key(&language)
    }

    pub fn get(&self, language: Language) -> Option<&[TextUnit]> {
        self.units.get(&language).map(Vec::as_slice)
    }

    pub fn remove(&mut self, language: Language) -> Option<Vec<TextUnit>> {
        self.units.remove(&language)
    }

    /// Languages present, in iteration order.
    pub fn languages(&self) -> Vec<Language> {
        self.units.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Language, &[TextUnit])> {
        self.units.iter().map(|(l, u)| (*l, u.as_slice()))
    }
}

/// The text of a single page in every aligned language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageEntry {
    units: BTreeMap<Language, TextUnit>,
}

impl PageEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, language: Language, unit: TextUnit) {
        self.units.insert(language, unit);
    }

    pub fn get(&self, language: Language) -> Option<&TextUnit> {
        self.units.get(&language)
    }

    pub fn contains(&self, language: Language) -> bool {
        self.units.contains_key(&language)
    }

    /// Whether any language marks this page as alternate-title metadata.
    pub fn has_alternate_titles(&self) -> bool {
        self.units
            .values()
            .any(|u| u.kind == TextKind::AlternateTitles)
    }

    pub fn languages(&self) -> impl Iterator<Item = Language> + '_ {
        self.units.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Language, &TextUnit)> {
        self.units.iter().map(|(l, u)| (*l, u))
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl FromIterator<(Language, TextUnit)> for PageEntry {
    fn from_iter<I: IntoIterator<Item = (Language, TextUnit)>>(iter: I) -> Self {
        Self {
            units: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PageEntry {
    type Item = (Language, TextUnit);
    type IntoIter = std::collections::btree_map::IntoIter<Language, TextUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Result};
    use std::path::PathBuf;

    /// Extractor that fails for any file containing "broken".
    struct StubExtractor;

    impl TextExtractor for StubExtractor {
        fn extract(&self, path: &Path) -> Result<Vec<TextUnit>> {
            let name = path.to_string_lossy();
            if name.contains("broken") {
                return Err(Error::Extraction {
                    path: path.to_path_buf(),
                    message: "not a zip archive".to_string(),
                });
            }
            Ok(vec![TextUnit::title(name.to_string())])
        }
    }

    #[test]
    fn test_collect_skips_unknown_and_broken() {
        let docs = vec![
            PathBuf::from("Creation English.docx"),
            PathBuf::from("Creation.docx"),
            PathBuf::from("Creation broken French.docx"),
            PathBuf::from("Creation Spanish.docx"),
        ];
        let store = LanguageTextStore::collect(&StubExtractor, &docs, "Creation");

        assert_eq!(store.languages(), vec![Language::English, Language::Spanish]);
    }

    #[test]
    fn test_collect_keeps_first_document_per_language() {
        let docs = vec!["a English.docx", "b English.docx"];
        let store = LanguageTextStore::collect(&StubExtractor, &docs, "Creation");

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(Language::English).unwrap()[0].text, "a English.docx");
    }

    #[test]
    fn test_page_entry_alternate_titles() {
        let mut entry = PageEntry::new();
        entry.insert(Language::English, TextUnit::body("Once"));
        assert!(!entry.has_alternate_titles());

        entry.insert(Language::Spanish, TextUnit::alternate_titles("Otro"));
        assert!(entry.has_alternate_titles());
    }

    #[test]
    fn test_with_text_keeps_kind_and_reference() {
        let unit = TextUnit::body_with_reference("Once", "Gen 1:1");
        let rewritten = unit.with_text("Twice");

        assert_eq!(rewritten.kind, TextKind::Body);
        assert_eq!(rewritten.reference.as_deref(), Some("Gen 1:1"));
        assert_eq!(unit.text, "Once");
    }
}
