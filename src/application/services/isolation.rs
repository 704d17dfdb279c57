//! Runtime isolation probe

use std::path::Path;

use tracing::debug;

use crate::domain::RuntimeIsolation;
use crate::infrastructure::traits::FileSystem;

/// Inspect `venv_dir` once and describe what was found.
pub fn probe_isolation(fs: &dyn FileSystem, venv_dir: &Path) -> RuntimeIsolation {
    if !fs.is_dir(venv_dir) {
        return RuntimeIsolation::Absent;
    }
    let interpreter = fs.is_file(&venv_dir.join("bin").join("python3"));
    debug!(
        "probe_isolation: dir={}, interpreter={}",
        venv_dir.display(),
        interpreter
    );
    RuntimeIsolation::Present { interpreter }
}
