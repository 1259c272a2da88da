//! Timestamped artifact directory handling.
//!
//! Each reporting run writes into a freshly created
//! `validation_<timestamp>` directory, never overwritten or merged with
//! a prior run, so historical runs stay individually inspectable.
//! Two runs started the same second would collide on the name; that is
//! an accepted limitation of an interactively driven pipeline, and the
//! collision surfaces as an error rather than a silent merge.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use log::debug;
use tempfile::NamedTempFile;

use crate::error::{TraceError, TraceResult};

/// Writer for one run's artifact directory.
#[derive(Debug)]
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    /// Create a fresh per-run directory under `base`.
    pub fn create(base: &Path) -> TraceResult<Self> {
        std::fs::create_dir_all(base).map_err(|e| {
            TraceError::Artifact(format!("failed to create {}: {e}", base.display()))
        })?;
        let stamp = Local::now().format("%Y%m%d_%H%M%S");
        let dir = base.join(format!("validation_{stamp}"));
        std::fs::create_dir(&dir).map_err(|e| {
            TraceError::Artifact(format!("failed to create {}: {e}", dir.display()))
        })?;
        debug!("created artifact directory {}", dir.display());
        Ok(Self { dir })
    }

    /// The directory this run writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write one artifact in full.
    ///
    /// The content goes to a temporary file in the run directory and is
    /// renamed into place, so a partially written artifact is never
    /// visible under its final name.
    pub fn write(&self, name: &str, contents: &str) -> TraceResult<PathBuf> {
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|e| {
            TraceError::Artifact(format!("failed to stage {name} in {}: {e}", self.dir.display()))
        })?;
        tmp.write_all(contents.as_bytes())
            .map_err(|e| TraceError::Artifact(format!("failed to write {name}: {e}")))?;
        let dest = self.dir.join(name);
        tmp.persist(&dest)
            .map_err(|e| TraceError::Artifact(format!("failed to persist {name}: {e}")))?;
        debug!("wrote artifact {}", dest.display());
        Ok(dest)
    }
}
