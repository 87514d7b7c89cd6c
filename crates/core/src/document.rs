//! Book document assembly.
//!
//! Joins the transformed text pages with the media of the source project's
//! pages. The join is purely positional: text page `i` belongs to content
//! page `i` of the project.

use crate::error::{Error, Result};
use crate::language::Language;
use crate::markup::Element;
use crate::metadata::Metadata;
use crate::project::{Project, ProjectPage};
use crate::sanitize::sanitize_file_name;
use crate::types::{PageEntry, TextKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// An audio file reference, possibly pointing at an identical earlier file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioRef {
    /// Filename as referenced by the project.
    pub file: String,

    /// Canonical file with the same content, when this one is a duplicate.
    pub duplicate_of: Option<String>,
}

impl AudioRef {
    fn resolve(file: &str, duplicates: &HashMap<String, String>) -> Self {
        Self {
            file: file.to_string(),
            duplicate_of: duplicates.get(file).cloned(),
        }
    }

    /// The file the book should actually play.
    pub fn source(&self) -> &str {
        self.duplicate_of.as_deref().unwrap_or(&self.file)
    }
}

/// One page of the book: project media plus text in every language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPage {
    /// 1-based page number.
    pub number: usize,
    pub kind: TextKind,
    pub image: Option<String>,
    pub narration: Option<AudioRef>,
    pub background_audio: Option<AudioRef>,
    pub duration_ms: Option<u64>,
    pub text: Vec<(Language, String)>,
}

impl RenderedPage {
    pub fn text_for(&self, language: Language) -> Option<&str> {
        self.text
            .iter()
            .find(|(l, _)| *l == language)
            .map(|(_, t)| t.as_str())
    }
}

/// The assembled book, ready to be serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentModel {
    pub title: String,
    pub alternate_titles: Option<String>,
    pub pages: Vec<RenderedPage>,
    pub metadata: Metadata,

    /// Language of the book-level title text.
    pub reference: Language,

    /// Where the serialized document is meant to be written.
    pub output_path: PathBuf,
}

/// Builds a `DocumentModel` from transformed pages and the source project.
#[derive(Debug, Clone)]
pub struct DocumentAssembler {
    book_name: String,
    destination: PathBuf,
    duplicates: HashMap<String, String>,
    reference: Language,
}

impl DocumentAssembler {
    /// Create an assembler for a book written into `destination`.
    pub fn new(book_name: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            book_name: book_name.into(),
            destination: destination.into(),
            duplicates: HashMap::new(),
            reference: Language::English,
        }
    }

    /// Audio duplicates found by the audio processor (file -> canonical file).
    pub fn with_duplicates(mut self, duplicates: HashMap<String, String>) -> Self {
        self.duplicates = duplicates;
        self
    }

    pub fn with_reference(mut self, language: Language) -> Self {
        self.reference = language;
        self
    }

    /// Path of the document file inside the destination directory.
    pub fn output_path(&self) -> PathBuf {
        document_path(&self.destination, &self.book_name)
    }

    /// Join the pages with the project's content pages.
    ///
    /// Fails with `Error::Alignment` unless there is exactly one text page
    /// per content page.
    pub fn assemble(
        &self,
        project: &Project,
        pages: Vec<PageEntry>,
        alternate_titles: Option<String>,
    ) -> Result<DocumentModel> {
        let content_pages: Vec<&ProjectPage> = project.content_pages().collect();
        if content_pages.len() != pages.len() {
            return Err(Error::Alignment {
                pages: pages.len(),
                project_pages: content_pages.len(),
            });
        }

        let rendered = pages
            .into_iter()
            .zip(content_pages)
            .enumerate()
            .map(|(index, (entry, media))| self.render_page(index + 1, entry, media))
            .collect();

        Ok(DocumentModel {
            title: self.book_name.clone(),
            alternate_titles,
            pages: rendered,
            metadata: Metadata::default_for(&self.book_name),
            reference: self.reference,
            output_path: self.output_path(),
        })
    }

    fn render_page(&self, number: usize, entry: PageEntry, media: &ProjectPage) -> RenderedPage {
        let kind = entry
            .get(self.reference)
            .or_else(|| entry.iter().next().map(|(_, u)| u))
            .map_or(TextKind::Body, |u| u.kind);

        RenderedPage {
            number,
            kind,
            image: media.image.clone(),
            narration: media
                .narration
                .as_deref()
                .map(|f| AudioRef::resolve(f, &self.duplicates)),
            background_audio: media
                .background_audio
                .as_deref()
                .map(|f| AudioRef::resolve(f, &self.duplicates)),
            duration_ms: media.duration_ms,
            text: entry.into_iter().map(|(l, u)| (l, u.text)).collect(),
        }
    }
}

/// `<dir>/<sanitized name>.htm`
pub fn document_path(directory: &Path, book_name: &str) -> PathBuf {
    directory.join(format!("{}.htm", sanitize_file_name(book_name)))
}

impl DocumentModel {
    /// Languages present on any page, in iteration order.
    pub fn languages(&self) -> Vec<Language> {
        let mut languages: Vec<Language> = self
            .pages
            .iter()
            .flat_map(|p| p.text.iter().map(|(l, _)| *l))
            .collect();
        languages.sort();
        languages.dedup();
        languages
    }

    /// Build the markup tree: the metadata head plus one element per page.
    pub fn to_markup(&self) -> Element {
        let body = Element::new("body")
            .child(self.data_div())
            .children(self.pages.iter().map(page_element));

        Element::new("html")
            .child(self.metadata.to_head().to_element())
            .child(body)
    }

    /// Book-level data Bloom reads from the hidden data div.
    fn data_div(&self) -> Element {
        let mut div = Element::new("div").attr("id", "bloomDataDiv");

        let title_page = self.pages.iter().find(|p| p.kind == TextKind::Title);
        match title_page {
            Some(page) => {
                for (language, text) in &page.text {
                    div = div.child(data_book("bookTitle", *language, text));
                }
            }
            None => div = div.child(data_book("bookTitle", self.reference, &self.title)),
        }

        if let Some(alternate) = &self.alternate_titles {
            div = div.child(data_book("alternateTitles", self.reference, alternate));
        }

        div
    }
}

fn data_book(key: &str, language: Language, text: &str) -> Element {
    Element::new("div")
        .attr("data-book", key)
        .attr("lang", language.code())
        .text(text)
}

fn page_element(page: &RenderedPage) -> Element {
    let class = match page.kind {
        TextKind::Title => "bloom-page cover coverColor",
        TextKind::Reference => "bloom-page credits",
        TextKind::Body | TextKind::AlternateTitles => "bloom-page numberedPage",
    };

    let mut element = Element::new("div")
        .attr("class", class)
        .attr("id", format!("page-{}", page.number))
        .attr("data-page-number", page.number.to_string());
    if let Some(duration) = page.duration_ms {
        element = element.attr("data-duration", duration.to_string());
    }

    let mut image_container = Element::new("div").attr("class", "bloom-imageContainer");
    if let Some(music) = &page.background_audio {
        image_container = image_container.attr("data-backgroundaudio", music.source());
    }
    if let Some(image) = &page.image {
        image_container = image_container.child(Element::new("img").attr("src", image));
    }

    let mut group = Element::new("div").attr("class", "bloom-translationGroup");
    for (index, (language, text)) in page.text.iter().enumerate() {
        let mut editable = Element::new("div")
            .attr("class", "bloom-editable")
            .attr("lang", language.code());
        // Narration is recorded once, against the first language's text
        if index == 0 {
            if let Some(narration) = &page.narration {
                editable = editable.attr("data-narration", narration.source());
            }
        }
        for line in text.lines() {
            editable = editable.child(Element::new("p").text(line));
        }
        group = group.child(editable);
    }

    element.child(
        Element::new("div")
            .attr("class", "marginBox")
            .child(image_container)
            .child(group),
    )
}
