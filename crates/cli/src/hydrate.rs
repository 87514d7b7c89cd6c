//! Runs Bloom's command-line hydration on a converted book.

use bloom_core::{Error, HydrationRequest, Hydrator, Result};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

/// Hydrates books by launching the Bloom executable.
#[derive(Debug, Clone)]
pub struct BloomHydrator {
    executable: PathBuf,
}

impl BloomHydrator {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }
}

/// Command-line arguments for a hydration request.
pub fn hydration_args(request: &HydrationRequest) -> Vec<OsString> {
    vec![
        "hydrate".into(),
        "--preset".into(),
        request.preset.clone().into(),
        "--bookpath".into(),
        request.book_path.clone().into_os_string(),
        "--vernacularisocode".into(),
        request.vernacular_code.clone().into(),
    ]
}

impl Hydrator for BloomHydrator {
    fn hydrate(&self, request: &HydrationRequest) -> Result<()> {
        log::debug!(
            "Hydrating {} with {}",
            request.book_path.display(),
            self.executable.display()
        );

        let status = Command::new(&self.executable)
            .args(hydration_args(request))
            .status()
            .map_err(|e| {
                Error::Hydration(format!(
                    "Failed to launch {}: {}",
                    self.executable.display(),
                    e
                ))
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::Hydration(format!(
                "{} exited with {}",
                self.executable.display(),
                status
            )))
        }
    }
}
