//! Run-fatal error kinds for a fetch job.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::remote::RemoteError;

/// Fatal error for a whole run. Any variant aborts the run; the scratch area
/// is still cleaned up before the error reaches the caller.
#[derive(Debug, Error)]
pub enum JobError {
    /// The remote directory could not be enumerated. Nothing was fetched.
    #[error("cannot list remote directory {path}: {source}")]
    List {
        path: String,
        #[source]
        source: RemoteError,
    },

    /// One entry failed to transfer. Fatal to the run; no retry is attempted.
    #[error("fetch failed for {entry}: {source}")]
    Fetch {
        entry: String,
        #[source]
        source: RemoteError,
    },

    /// The destination is invalid for the selected mode. Checked before any
    /// fetch is issued.
    #[error("{0}")]
    OutputPrecondition(String),

    /// Local create/write/rename failure while assembling the merged output.
    #[error("merge write failed at {path}: {source}")]
    MergeWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The scratch directory could not be created.
    #[error("cannot create scratch directory: {0}")]
    Scratch(#[source] io::Error),

    /// A worker panicked or the result channel closed early.
    #[error("worker pool failed: {0}")]
    Pool(String),
}
