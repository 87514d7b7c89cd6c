//! Audio file classification and duplicate detection.

use bloom_core::{AudioProcessor, Result};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Extensions treated as audio assets.
const AUDIO_EXTENSIONS: &[&str] = &["wav", "mp3", "wma", "m4a", "ogg"];

/// Whether a filename looks like an audio asset.
pub fn is_audio_file(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| AUDIO_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Finds duplicate audio by SHA-256 of the file contents.
///
/// Files are visited in name order; the first file with a given digest is
/// canonical and every later file with the same digest maps to it.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashingAudioProcessor;

impl AudioProcessor for HashingAudioProcessor {
    fn find_duplicates(&self, source_dir: &Path, files: &[String]) -> Result<HashMap<String, String>> {
        let mut sorted: Vec<&String> = files.iter().collect();
        sorted.sort();
        sorted.dedup();

        let mut canonical_by_digest: HashMap<Vec<u8>, &String> = HashMap::new();
        let mut duplicates = HashMap::new();

        for file in sorted {
            let bytes = match fs::read(source_dir.join(file)) {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    log::warn!("Audio file {} is missing from {}", file, source_dir.display());
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            let digest = Sha256::digest(&bytes).to_vec();

            match canonical_by_digest.get(&digest) {
                Some(canonical) => {
                    log::debug!("{} duplicates {}", file, canonical);
                    duplicates.insert(file.clone(), (*canonical).clone());
                }
                None => {
                    canonical_by_digest.insert(digest, file);
                }
            }
        }

        Ok(duplicates)
    }
}
