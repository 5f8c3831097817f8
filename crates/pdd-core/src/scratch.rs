//! Run-scoped scratch directory for merge staging.

use std::io;
use std::path::Path;

use tempfile::TempDir;

/// Temporary directory owned by one merge run. Removed with all contents on
/// `close` or drop, so no scratch file outlives the run.
pub struct ScratchArea {
    dir: TempDir,
}

impl ScratchArea {
    /// Creates a fresh scratch directory under the platform temp location.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            dir: tempfile::Builder::new().prefix("pdd-").tempdir()?,
        })
    }

    /// Creates a fresh scratch directory under `parent` (e.g. a directory on
    /// the destination filesystem).
    pub fn new_in(parent: &Path) -> io::Result<Self> {
        Ok(Self {
            dir: tempfile::Builder::new().prefix("pdd-").tempdir_in(parent)?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Removes the directory and everything in it. A removal failure is
    /// logged as a warning; it does not fail an otherwise-finished run.
    pub fn close(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            tracing::warn!(path = %path.display(), error = %e, "could not remove scratch directory");
        }
    }
}
