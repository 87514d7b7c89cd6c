//! Per-unit rewrites applied to aligned pages.

use crate::language::Language;
use crate::types::{PageEntry, TextKind, TextUnit};
use log::debug;

/// Applies title prefixing, reference prepending, and alternate-title
/// extraction to aligned pages.
#[derive(Debug, Clone)]
pub struct PageTransformer {
    project_code: Option<String>,
    include_references: bool,
    reference: Language,
}

impl Default for PageTransformer {
    fn default() -> Self {
        Self {
            project_code: None,
            include_references: false,
            reference: Language::English,
        }
    }
}

/// Pages ready for assembly plus the book-level text pulled out of them.
#[derive(Debug, Clone)]
pub struct TransformedPages {
    pub pages: Vec<PageEntry>,

    /// The book title, taken from the reference language's title unit
    /// when a project code is set.
    pub title: String,

    pub alternate_titles: Option<String>,
}

impl PageTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix titles with a project code. Blank codes are ignored.
    pub fn with_project_code(mut self, code: Option<impl Into<String>>) -> Self {
        self.project_code = code.map(Into::<String>::into).filter(|c| !c.trim().is_empty());
        self
    }

    /// Prepend each body unit's reference to its text.
    pub fn with_include_references(mut self, include: bool) -> Self {
        self.include_references = include;
        self
    }

    pub fn with_reference(mut self, language: Language) -> Self {
        self.reference = language;
        self
    }

    /// Transform every page.
    ///
    /// `project_title` is the title known from the source project. With a
    /// project code, the prefixed title unit in the reference language
    /// takes precedence over it.
    pub fn transform(&self, pages: Vec<PageEntry>, project_title: &str) -> TransformedPages {
        let mut title = project_title.to_string();
        let mut alternate_titles = None;
        let mut output = Vec::with_capacity(pages.len());

        for page in pages {
            if page.has_alternate_titles() {
                if let Some(unit) = page.get(self.reference) {
                    if unit.kind == TextKind::AlternateTitles {
                        alternate_titles = Some(unit.text.clone());
                    }
                }
                continue;
            }

            let page: PageEntry = page
                .into_iter()
                .map(|(language, unit)| (language, self.transform_unit(unit)))
                .collect();

            // Only a coded title replaces the project's own name
            if let (Some(_), Some(unit)) = (&self.project_code, page.get(self.reference)) {
                if unit.kind == TextKind::Title {
                    debug!("Using {} title '{}' over '{}'", self.reference, unit.text, title);
                    title = unit.text.clone();
                }
            }

            output.push(page);
        }

        TransformedPages {
            pages: output,
            title,
            alternate_titles,
        }
    }

    /// Rewrite a single unit, returning the replacement value.
    pub fn transform_unit(&self, unit: TextUnit) -> TextUnit {
        match unit.kind {
            TextKind::Title => match &self.project_code {
                Some(code) => {
                    let text = prefix_title(&unit.text, code);
                    unit.with_text(text)
                }
                None => unit,
            },
            TextKind::Body if self.include_references => {
                let text = format!(
                    "{}\n{}",
                    unit.reference.as_deref().unwrap_or_default(),
                    unit.text
                );
                unit.with_text(text)
            }
            _ => unit,
        }
    }
}

/// Prefix a title with the project code unless it already starts with it.
pub fn prefix_title(title: &str, code: &str) -> String {
    if title.starts_with(code) {
        title.to_string()
    } else {
        format!("{} {}", code, title)
    }
}
