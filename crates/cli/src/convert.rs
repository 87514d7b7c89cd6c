//! Converts one PhotoStory project into a Bloom book directory.
//!
//! Everything that can fail structurally (missing English text, page count
//! mismatches, an existing book) is checked before the book directory is
//! touched, so a failed conversion never leaves a half-written book.

use crate::audio::{is_audio_file, HashingAudioProcessor};
use bloom_core::{
    sanitize_file_name, AlignmentEngine, AudioProcessor, DocumentAssembler, DocumentModel, Error,
    HtmlSerializer, HydrationRequest, Hydrator, Language, LanguageTextStore, NoHydration,
    PageTransformer, Result, TextExtractor,
};
use bloom_docx::DocxExtractor;
use bloom_photostory::{PhotoStoryParser, PROJECT_FILE_NAME};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the book description file Bloom reads tags from.
const META_FILE_NAME: &str = "meta.json";

/// Settings for a conversion run.
#[derive(Debug, Clone, Default)]
pub struct ConversionOptions {
    /// Directory the book directory is created in.
    pub destination: PathBuf,

    /// Overrides the project's own name.
    pub project_name: Option<String>,

    /// Code prefixed to every title.
    pub project_code: Option<String>,

    /// One text document per language.
    pub documents: Vec<PathBuf>,

    /// Replace an existing book with the same name.
    pub overwrite: bool,

    /// Prepend source references to body text.
    pub include_references: bool,

    /// Tags written to meta.json.
    pub tags: Vec<String>,
}

/// What a successful conversion produced.
#[derive(Debug, Clone)]
pub struct ConversionReport {
    pub title: String,
    pub directory: PathBuf,
    pub languages: Vec<Language>,
    pub excluded: Vec<Language>,
    pub hydrated: bool,
}

/// Runs the whole pipeline for a project.
pub struct Converter {
    extractor: Box<dyn TextExtractor>,
    audio: Box<dyn AudioProcessor>,
    hydrator: Box<dyn Hydrator>,
}

impl Default for Converter {
    fn default() -> Self {
        Self {
            extractor: Box::new(DocxExtractor::new()),
            audio: Box::new(HashingAudioProcessor),
            hydrator: Box::new(NoHydration),
        }
    }
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extractor(mut self, extractor: Box<dyn TextExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_hydrator(mut self, hydrator: Box<dyn Hydrator>) -> Self {
        self.hydrator = hydrator;
        self
    }

    /// Convert the project described by `project_xml`.
    pub fn convert(&self, project_xml: &Path, options: &ConversionOptions) -> Result<ConversionReport> {
        let project = PhotoStoryParser::new().parse_file(project_xml)?;
        let source_dir = project_xml.parent().unwrap_or_else(|| Path::new("."));

        let project_name = options
            .project_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| project.name.clone());

        let store = LanguageTextStore::collect(self.extractor.as_ref(), &options.documents, &project_name);
        let alignment = AlignmentEngine::new().align(store, &project_name)?;

        let transformed = PageTransformer::new()
            .with_project_code(options.project_code.clone())
            .with_include_references(options.include_references)
            .transform(alignment.pages, &project_name);
        let title = transformed.title;

        let book_dir = options.destination.join(sanitize_file_name(&title));
        if book_dir.exists() {
            if !options.overwrite {
                return Err(Error::DestinationConflict(book_dir));
            }
            if holds_source(&book_dir, source_dir)? {
                log::warn!(
                    "Refusing to overwrite {}: it holds the project being converted",
                    book_dir.display()
                );
                return Err(Error::DestinationConflict(book_dir));
            }
        }

        let assets = list_files(source_dir)?;
        let audio_files: Vec<String> = assets.iter().filter(|f| is_audio_file(f)).cloned().collect();
        let duplicates = self.audio.find_duplicates(source_dir, &audio_files)?;

        let document = DocumentAssembler::new(&title, &book_dir)
            .with_duplicates(duplicates.clone())
            .assemble(&project, transformed.pages, transformed.alternate_titles)?;

        prepare_directory(&book_dir)?;
        copy_assets(source_dir, &book_dir, &assets, &duplicates)?;
        write_document(&document)?;
        write_meta(&book_dir, &options.tags)?;

        let hydrated = match self.hydrator.hydrate(&HydrationRequest::shellbook(&book_dir)) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Unable to hydrate {}: {}", title, e);
                false
            }
        };

        log::debug!(
            "Converted {} ({})",
            title,
            join_languages(&alignment.languages)
        );

        Ok(ConversionReport {
            title,
            directory: book_dir,
            languages: alignment.languages,
            excluded: alignment.excluded,
            hydrated,
        })
    }
}

/// Comma-separated language names.
pub fn join_languages(languages: &[Language]) -> String {
    languages
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Regular files in the project directory, except the project file itself.
fn list_files(dir: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if !name.eq_ignore_ascii_case(PROJECT_FILE_NAME) {
            files.push(name);
        }
    }
    files.sort();
    Ok(files)
}

/// Whether clearing `book_dir` would delete the project's own files.
fn holds_source(book_dir: &Path, source_dir: &Path) -> Result<bool> {
    let book_dir = fs::canonicalize(book_dir)?;
    let source_dir = fs::canonicalize(source_dir)?;
    Ok(source_dir.starts_with(book_dir))
}

/// Create the book directory, emptying it first if it already exists.
fn prepare_directory(dir: &Path) -> Result<()> {
    if dir.exists() {
        log::debug!("Clearing existing book at {}", dir.display());
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                fs::remove_dir_all(&path)?;
            } else {
                fs::remove_file(&path)?;
            }
        }
    } else {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Copy images and audio, leaving out audio that duplicates another file.
fn copy_assets(
    source_dir: &Path,
    book_dir: &Path,
    assets: &[String],
    duplicates: &HashMap<String, String>,
) -> Result<()> {
    for name in assets {
        if duplicates.contains_key(name) {
            continue;
        }
        fs::copy(source_dir.join(name), book_dir.join(name))?;
    }
    Ok(())
}

fn write_document(document: &DocumentModel) -> Result<()> {
    let html = HtmlSerializer::new().serialize(&document.to_markup());
    fs::write(&document.output_path, html)?;
    Ok(())
}

/// Write meta.json: empty without tags, otherwise `{"tags": [...]}`.
fn write_meta(book_dir: &Path, tags: &[String]) -> Result<()> {
    let path = book_dir.join(META_FILE_NAME);
    if tags.is_empty() {
        fs::write(path, "")?;
    } else {
        let json = serde_json::to_string(&serde_json::json!({ "tags": tags }))
            .map_err(|e| Error::IoError(e.into()))?;
        fs::write(path, json)?;
    }
    Ok(())
}
