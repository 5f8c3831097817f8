//! Remote filesystem client seam.
//!
//! The engine lists and fetches through this trait; the shipped
//! implementation wraps the `hdfs dfs` command line. The order `list`
//! returns entries in is the order merge mode reproduces in its output.

mod hdfs;

pub use hdfs::HdfsClient;

use std::io;
use std::path::Path;
use std::process::ExitStatus;
use thiserror::Error;

/// Error from a remote client operation.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The client command could not be started at all.
    #[error("cannot run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The client command ran and reported failure.
    #[error("{command} failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    /// Listing output could not be parsed.
    #[error("bad listing line: {0}")]
    Listing(String),

    /// I/O failure inside a client implementation.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Client for an HDFS-like remote filesystem. Calls are synchronous and
/// blocking; one client instance is shared across all fetch workers.
pub trait RemoteClient: Send + Sync {
    /// Enumerates the files directly under `remote_path`, in a stable order.
    fn list(&self, remote_path: &str) -> Result<Vec<String>, RemoteError>;

    /// Transfers one remote file into `local_dir`. The local file is named by
    /// the entry's base name.
    fn fetch(&self, remote_id: &str, local_dir: &Path) -> Result<(), RemoteError>;
}

/// Final path component of a remote identifier.
pub fn base_name(remote_id: &str) -> &str {
    remote_id.rsplit('/').next().unwrap_or(remote_id)
}
