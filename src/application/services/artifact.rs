//! Result persistence
//!
//! Writes captured tool output to `<output_dir>/<timestamp><suffix>.txt`.
//! Names carry millisecond precision only, so two runs started within the
//! same millisecond overwrite each other.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};
use tracing::debug;

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{artifact_file_name, Tool};
use crate::infrastructure::traits::FileSystem;

/// Stores scan output as timestamped text files.
pub struct ArtifactStore {
    fs: Arc<dyn FileSystem>,
    output_dir: PathBuf,
}

impl ArtifactStore {
    /// Create a new artifact store rooted at `output_dir`.
    pub fn new(fs: Arc<dyn FileSystem>, output_dir: PathBuf) -> Self {
        Self { fs, output_dir }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path the artifact for `tool` would get at time `at`.
    pub fn artifact_path(&self, tool: Tool, at: &DateTime<Local>) -> PathBuf {
        self.output_dir.join(artifact_file_name(at, tool))
    }

    /// Write `output` verbatim, creating the output directory if needed.
    ///
    /// Existing files with the same name are overwritten. A failed write
    /// is not cleaned up.
    ///
    /// # Returns
    /// Path of the written artifact
    pub fn save(&self, tool: Tool, output: &str, at: &DateTime<Local>) -> ApplicationResult<PathBuf> {
        self.fs
            .create_dir_all(&self.output_dir)
            .with_path_context("create output directory", &self.output_dir)?;

        let path = self.artifact_path(tool, at);
        self.fs
            .write(&path, output)
            .with_path_context("write results", &path)?;

        debug!("save: path={}, bytes={}", path.display(), output.len());
        Ok(path)
    }
}
