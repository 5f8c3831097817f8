//! Worker loop: walk one chunk in listing order, fetch, report.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;

use crate::error::JobError;
use crate::partition::WorkChunk;
use crate::remote::{self, RemoteClient};

use super::{FetchOutcome, FetchResult};

pub(super) fn run_worker(
    client: &dyn RemoteClient,
    chunk: WorkChunk,
    dest: &Path,
    results: &Sender<FetchOutcome>,
    abort: &AtomicBool,
) {
    for (index, entry) in chunk.indexed() {
        if abort.load(Ordering::Relaxed) {
            break;
        }
        tracing::debug!(index, entry, "fetching");
        match client.fetch(entry, dest) {
            Ok(()) => {
                let path = dest.join(remote::base_name(entry));
                if results.send(Ok(FetchResult { index, path })).is_err() {
                    // Receiver gone: the run is unwinding.
                    break;
                }
            }
            Err(source) => {
                abort.store(true, Ordering::Relaxed);
                let _ = results.send(Err(JobError::Fetch {
                    entry: entry.to_string(),
                    source,
                }));
                break;
            }
        }
    }
}
