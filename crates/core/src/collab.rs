//! Interfaces to the collaborators that surround the conversion core.
//!
//! Document text extraction, audio duplicate detection and the external
//! hydration step all touch the filesystem or other processes; the core only
//! sees them through these traits.

use crate::types::TextUnit;
use crate::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Extracts the ordered page texts from one language's source document.
pub trait TextExtractor {
    fn extract(&self, path: &Path) -> Result<Vec<TextUnit>>;
}

/// Finds audio files whose content duplicates an earlier file.
pub trait AudioProcessor {
    /// Map each duplicate filename to the canonical filename it repeats.
    ///
    /// Files that are not duplicates are absent from the map.
    fn find_duplicates(&self, source_dir: &Path, files: &[String]) -> Result<HashMap<String, String>>;
}

/// Arguments for the post-serialization hydration step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HydrationRequest {
    pub preset: String,
    pub book_path: PathBuf,
    pub vernacular_code: String,
}

impl HydrationRequest {
    /// The shell-book preset with English as the vernacular.
    pub fn shellbook(book_path: impl Into<PathBuf>) -> Self {
        Self {
            preset: "shellbook".to_string(),
            book_path: book_path.into(),
            vernacular_code: "en".to_string(),
        }
    }
}

/// Finalizes a written book directory.
pub trait Hydrator {
    fn hydrate(&self, request: &HydrationRequest) -> Result<()>;
}

/// Hydrator used when no external tool is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHydration;

impl Hydrator for NoHydration {
    fn hydrate(&self, request: &HydrationRequest) -> Result<()> {
        log::debug!("Skipping hydration of {}", request.book_path.display());
        Ok(())
    }
}
