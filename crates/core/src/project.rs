//! The source slideshow project: pages of images with their audio.

use serde::{Deserialize, Serialize};

/// A slideshow project as read from its project file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    /// Project name (falls back to the project directory name).
    pub name: String,

    /// Pages in presentation order.
    pub pages: Vec<ProjectPage>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pages: Vec::new(),
        }
    }

    pub fn add_page(&mut self, page: ProjectPage) {
        self.pages.push(page);
    }

    /// Pages that carry visual content, in order.
    ///
    /// Pages without an image take no part in text alignment.
    pub fn content_pages(&self) -> impl Iterator<Item = &ProjectPage> {
        self.pages.iter().filter(|p| !p.is_excluded())
    }

    /// Every audio file referenced by the project, without repeats.
    pub fn audio_files(&self) -> Vec<&str> {
        let mut files: Vec<&str> = Vec::new();
        for page in &self.pages {
            for file in [page.narration.as_deref(), page.background_audio.as_deref()]
                .into_iter()
                .flatten()
            {
                if !files.contains(&file) {
                    files.push(file);
                }
            }
        }
        files
    }
}

/// A single page of the slideshow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectPage {
    /// Image filename, relative to the project directory.
    pub image: Option<String>,

    /// Narration audio filename.
    pub narration: Option<String>,

    /// Background music playing during this page.
    pub background_audio: Option<String>,

    /// Display duration in milliseconds, if the project specifies one.
    pub duration_ms: Option<u64>,
}

impl ProjectPage {
    pub fn with_image(image: impl Into<String>) -> Self {
        Self {
            image: Some(image.into()),
            ..Self::default()
        }
    }

    pub fn narration(mut self, file: impl Into<String>) -> Self {
        self.narration = Some(file.into());
        self
    }

    pub fn background_audio(mut self, file: impl Into<String>) -> Self {
        self.background_audio = Some(file.into());
        self
    }

    pub fn is_excluded(&self) -> bool {
        self.image.as_deref().map_or(true, |i| i.trim().is_empty())
    }
}
