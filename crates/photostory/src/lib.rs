//! PhotoStory 3 project parser.
//!
//! Reads the `project.xml` found inside an extracted .wp3 archive and
//! produces the page and media structure of the slideshow.

pub mod parser;

pub use parser::{PhotoStoryParser, PROJECT_FILE_NAME};
