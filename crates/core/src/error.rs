//! Error types for PhotoStory to Bloom conversion.

use crate::language::Language;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting a project.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open, read, or write a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The reference language has no extracted text, so nothing can be aligned.
    #[error("Could not find document with corresponding {language} text for {project}")]
    MissingReferenceLanguage { project: String, language: Language },

    /// The transformed page list does not line up with the project's pages.
    #[error("Page count mismatch: {pages} text pages but {project_pages} project pages")]
    Alignment { pages: usize, project_pages: usize },

    /// The output directory already exists and overwriting was not requested.
    #[error("A book already exists at {}", .0.display())]
    DestinationConflict(PathBuf),

    /// Failed to extract text from a source document.
    #[error("Text extraction error for {}: {message}", .path.display())]
    Extraction { path: PathBuf, message: String },

    /// The slideshow project file could not be understood.
    #[error("Project parsing error: {0}")]
    ProjectParse(String),

    /// The external hydration step failed or could not be launched.
    #[error("Hydration error: {0}")]
    Hydration(String),

    /// ZIP archive error (for DOCX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error (for DOCX and project.xml).
    #[error("XML parsing error: {0}")]
    XmlError(String),
}

impl Error {
    /// Whether this error should stop the conversion of the current project.
    ///
    /// Extraction and hydration failures only affect one language or the
    /// post-processing step; everything else is structural.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::Extraction { .. } | Error::Hydration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_reference_message_names_project_and_language() {
        let err = Error::MissingReferenceLanguage {
            project: "Creation".to_string(),
            language: Language::English,
        };
        assert_eq!(
            err.to_string(),
            "Could not find document with corresponding English text for Creation"
        );
    }

    #[test]
    fn test_fatal_classification() {
        assert!(Error::Alignment { pages: 3, project_pages: 4 }.is_fatal());
        assert!(Error::DestinationConflict(PathBuf::from("out")).is_fatal());
        assert!(!Error::Hydration("exit code 1".to_string()).is_fatal());
        assert!(!Error::Extraction {
            path: PathBuf::from("Creation French.docx"),
            message: "bad zip".to_string(),
        }
        .is_fatal());
    }
}
