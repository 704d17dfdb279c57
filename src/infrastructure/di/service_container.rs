//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{ArtifactStore, ScanService};
use crate::config::Settings;
use crate::domain::Tool;
use crate::infrastructure::traits::{CommandRunner, FileSystem, RealCommandRunner, RealFileSystem};

/// Container holding the I/O implementations shared by all services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Command runner abstraction
    pub cmd: Arc<dyn CommandRunner>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(RealCommandRunner::default()),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        cmd: Arc<dyn CommandRunner>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs, cmd }
    }

    /// Artifact store writing into the configured output directory.
    pub fn artifact_store(&self) -> ArtifactStore {
        ArtifactStore::new(self.fs.clone(), self.settings.output_dir.clone())
    }

    /// Scan service for `tool`.
    pub fn scan_service(&self, tool: Tool) -> ScanService {
        ScanService::new(
            tool,
            self.settings.tool(tool).clone(),
            self.cmd.clone(),
            self.artifact_store(),
        )
    }
}
