//! Core domain types, cross-language page alignment, and Bloom document
//! assembly for PhotoStory conversion.

pub mod align;
pub mod collab;
pub mod document;
pub mod error;
pub mod html;
pub mod language;
pub mod markup;
pub mod metadata;
pub mod project;
pub mod sanitize;
pub mod transform;
pub mod types;

pub use align::{Alignment, AlignmentEngine};
pub use collab::{AudioProcessor, HydrationRequest, Hydrator, NoHydration, TextExtractor};
pub use document::{AudioRef, DocumentAssembler, DocumentModel, RenderedPage};
pub use error::{Error, Result};
pub use html::HtmlSerializer;
pub use language::Language;
pub use metadata::Metadata;
pub use project::{Project, ProjectPage};
pub use sanitize::{sanitize_file_name, TextCleaner};
pub use transform::{PageTransformer, TransformedPages};
pub use types::{LanguageTextStore, PageEntry, TextKind, TextUnit};
