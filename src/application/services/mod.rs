//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, CommandRunner)
//! but are themselves concrete structs, not traits.

mod artifact;
mod isolation;
mod scan;

pub use artifact::ArtifactStore;
pub use isolation::probe_isolation;
pub use scan::ScanService;
