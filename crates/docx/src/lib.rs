//! DOCX (Office Open XML) text extraction backend.
//!
//! Reads .docx files, which are ZIP archives containing XML documents, and
//! turns their paragraphs into per-page text units.

pub mod extractor;

pub use extractor::DocxExtractor;
