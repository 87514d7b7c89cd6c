//! PhotoStory project.xml parser implementation.
//!
//! Only the parts that matter for conversion are read: the ordered visual
//! units with their image, narration, and duration, and the music tracks
//! with the visual unit each one starts on. Everything else in the file
//! (motion, transitions, edits) is ignored.

use bloom_core::{Error, Project, ProjectPage, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Name of the project description inside an extracted .wp3 archive.
pub const PROJECT_FILE_NAME: &str = "project.xml";

#[derive(Debug, Deserialize)]
#[serde(rename = "MSPhotoStoryProject")]
struct Ps3Project {
    #[serde(rename = "VisualUnit", default)]
    visual_units: Vec<VisualUnit>,

    #[serde(rename = "MusicTrack", default)]
    music_tracks: Vec<MusicTrack>,
}

#[derive(Debug, Deserialize)]
struct VisualUnit {
    /// Milliseconds.
    #[serde(rename = "@duration", default)]
    duration: Option<u64>,

    #[serde(rename = "Image", default)]
    image: Option<AssetRef>,

    #[serde(rename = "Narration", default)]
    narration: Option<AssetRef>,
}

#[derive(Debug, Deserialize)]
struct MusicTrack {
    /// Index of the visual unit the track starts playing on.
    #[serde(rename = "@startVisualUnit", default)]
    start_visual_unit: usize,

    #[serde(rename = "SoundTrack", default)]
    sound_tracks: Vec<AssetRef>,
}

#[derive(Debug, Deserialize)]
struct AssetRef {
    #[serde(rename = "@path")]
    path: String,
}

impl AssetRef {
    /// The bare filename; projects may store full Windows paths.
    fn file_name(&self) -> Option<String> {
        let name = self
            .path
            .rsplit(['\\', '/'])
            .next()
            .unwrap_or_default()
            .trim();
        (!name.is_empty()).then(|| name.to_string())
    }
}

/// Parser for PhotoStory 3 project files.
#[derive(Debug, Clone, Copy, Default)]
pub struct PhotoStoryParser;

impl PhotoStoryParser {
    /// Create a new PhotoStory parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a project file, naming the project after its directory.
    pub fn parse_file(&self, path: &Path) -> Result<Project> {
        let xml = fs::read_to_string(path)?;
        let name = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("Untitled");
        self.parse_str(&xml, name)
    }

    /// Parse project XML.
    pub fn parse_str(&self, xml: &str, name: &str) -> Result<Project> {
        let ps3: Ps3Project = quick_xml::de::from_str(xml)
            .map_err(|e| Error::ProjectParse(format!("{}: {}", name, e)))?;

        let mut tracks: Vec<(usize, String)> = ps3
            .music_tracks
            .iter()
            .filter_map(|t| {
                t.sound_tracks
                    .first()
                    .and_then(AssetRef::file_name)
                    .map(|file| (t.start_visual_unit, file))
            })
            .collect();
        tracks.sort_by_key(|(start, _)| *start);

        let mut project = Project::new(name);
        for (index, unit) in ps3.visual_units.iter().enumerate() {
            // A track plays until the next one starts
            let background_audio = tracks
                .iter()
                .rev()
                .find(|(start, _)| *start <= index)
                .map(|(_, file)| file.clone());

            project.add_page(ProjectPage {
                image: unit.image.as_ref().and_then(AssetRef::file_name),
                narration: unit.narration.as_ref().and_then(AssetRef::file_name),
                background_audio,
                duration_ms: unit.duration,
            });
        }

        log::debug!(
            "Parsed project '{}': {} pages, {} music tracks",
            name,
            project.pages.len(),
            tracks.len()
        );

        Ok(project)
    }
}
