//! Bounded worker pool: drains per-worker chunks, reports completions.
//!
//! Completion order across workers is unordered; each result carries the
//! entry's listing index so the merge side can restore the total order.

mod pool;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;

use crate::error::JobError;
use crate::partition::WorkChunk;
use crate::remote::RemoteClient;

/// A fetched entry: its position in the original listing and the local path
/// that now holds its bytes.
#[derive(Debug)]
pub struct FetchResult {
    pub index: usize,
    pub path: PathBuf,
}

/// Per-entry outcome delivered on the result channel.
pub type FetchOutcome = Result<FetchResult, JobError>;

/// Handle to a set of spawned fetch workers.
pub struct FetchPool {
    handles: Vec<JoinHandle<()>>,
    abort: Arc<AtomicBool>,
}

impl FetchPool {
    /// Spawns one worker thread per chunk, fetching into `dest`. Results
    /// arrive on the returned channel in completion order. A failed fetch is
    /// reported once and stops the other workers from claiming further
    /// entries; in-flight fetches finish.
    pub fn spawn(
        client: Arc<dyn RemoteClient>,
        chunks: Vec<WorkChunk>,
        dest: &Path,
    ) -> (Self, mpsc::Receiver<FetchOutcome>) {
        let abort = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel();
        let mut handles = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let client = Arc::clone(&client);
            let tx = tx.clone();
            let abort = Arc::clone(&abort);
            let dest = dest.to_path_buf();
            handles.push(std::thread::spawn(move || {
                pool::run_worker(client.as_ref(), chunk, &dest, &tx, &abort)
            }));
        }
        (Self { handles, abort }, rx)
    }

    /// Tell workers to stop claiming new entries.
    pub fn abort(&self) {
        self.abort.store(true, Ordering::Relaxed);
    }

    /// Wait for every worker to exit. A panicked worker surfaces as an error
    /// instead of a hang.
    pub fn join(self) -> Result<(), JobError> {
        let mut first: Option<JobError> = None;
        for handle in self.handles {
            if let Err(e) = handle.join() {
                if first.is_none() {
                    first = Some(JobError::Pool(format!("worker panicked: {e:?}")));
                }
            }
        }
        match first {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
