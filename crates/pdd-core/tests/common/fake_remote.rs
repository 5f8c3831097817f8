//! In-process remote backed by a local directory, for integration tests.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use pdd_core::remote::{base_name, RemoteClient, RemoteError};

/// Serves files out of a local directory. Listing is sorted by file name;
/// fetch copies the file, optionally sleeping first (to force out-of-order
/// completion across workers) or failing (to exercise abort paths).
pub struct FakeRemote {
    root: PathBuf,
    delays_ms: HashMap<String, u64>,
    fail_on: Option<String>,
    fetch_calls: AtomicUsize,
}

impl FakeRemote {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            delays_ms: HashMap::new(),
            fail_on: None,
            fetch_calls: AtomicUsize::new(0),
        }
    }

    /// Sleep `ms` before serving `name`.
    pub fn delay(mut self, name: &str, ms: u64) -> Self {
        self.delays_ms.insert(name.to_string(), ms);
        self
    }

    /// Fail any fetch of `name`.
    pub fn failing_on(mut self, name: &str) -> Self {
        self.fail_on = Some(name.to_string());
        self
    }

    /// Number of fetch calls issued so far.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::Relaxed)
    }
}

impl RemoteClient for FakeRemote {
    fn list(&self, _remote_path: &str) -> Result<Vec<String>, RemoteError> {
        let mut names: Vec<String> = std::fs::read_dir(&self.root)
            .map_err(RemoteError::Io)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        Ok(names
            .into_iter()
            .map(|name| format!("{}/{}", self.root.display(), name))
            .collect())
    }

    fn fetch(&self, remote_id: &str, local_dir: &Path) -> Result<(), RemoteError> {
        self.fetch_calls.fetch_add(1, Ordering::Relaxed);
        let name = base_name(remote_id);
        if let Some(ms) = self.delays_ms.get(name) {
            std::thread::sleep(Duration::from_millis(*ms));
        }
        if self.fail_on.as_deref() == Some(name) {
            return Err(RemoteError::Io(io::Error::new(
                io::ErrorKind::Other,
                "injected transfer failure",
            )));
        }
        std::fs::copy(self.root.join(name), local_dir.join(name)).map_err(RemoteError::Io)?;
        Ok(())
    }
}
