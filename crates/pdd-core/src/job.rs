//! One fetch run end to end: preconditions, listing, dispatch, merge or wait.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use crate::error::JobError;
use crate::fetcher::{FetchOutcome, FetchPool};
use crate::merge;
use crate::partition;
use crate::remote::RemoteClient;
use crate::scratch::ScratchArea;

/// Options for one run.
#[derive(Debug, Clone)]
pub struct JobOptions {
    /// Number of concurrent fetch workers.
    pub workers: usize,
    /// Concatenate fetched files into a single output file, in listing order.
    pub merge: bool,
    /// Parent directory for the merge scratch area (platform temp if None).
    pub scratch_dir: Option<PathBuf>,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            workers: 10,
            merge: false,
            scratch_dir: None,
        }
    }
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct JobSummary {
    /// Number of remote entries fetched.
    pub files: usize,
    /// Bytes written to the merged output (merge mode only).
    pub merged_bytes: Option<u64>,
}

/// Fetches every file under `input` into `output`.
///
/// Plain mode: `output` must be an existing directory; fetched files land
/// under their base names. Merge mode: `output` must not exist; fetched bytes
/// are concatenated into it in listing order, staged through a scratch
/// directory that is removed on every exit path. Entries sharing a base name
/// collide (last fetch wins); collisions are not reconciled here.
pub fn run_job(
    client: Arc<dyn RemoteClient>,
    input: &str,
    output: &Path,
    opts: &JobOptions,
) -> Result<JobSummary, JobError> {
    check_output(output, opts.merge)?;

    let entries = client.list(input).map_err(|source| JobError::List {
        path: input.to_string(),
        source,
    })?;
    tracing::info!(input, count = entries.len(), "listed remote directory");

    let chunks = partition::chunk(&entries, opts.workers);

    if opts.merge {
        let scratch = match opts.scratch_dir.as_deref() {
            Some(parent) => ScratchArea::new_in(parent),
            None => ScratchArea::new(),
        }
        .map_err(JobError::Scratch)?;

        let (pool, results) = FetchPool::spawn(client, chunks, scratch.path());
        let merged = merge::merge_results(results, entries.len(), output);
        if merged.is_err() {
            pool.abort();
        }
        let joined = pool.join();
        scratch.close();
        let bytes = merged?;
        joined?;
        tracing::info!(files = entries.len(), bytes, output = %output.display(), "merge complete");
        Ok(JobSummary {
            files: entries.len(),
            merged_bytes: Some(bytes),
        })
    } else {
        let (pool, results) = FetchPool::spawn(client, chunks, output);
        let waited = wait_all(results, entries.len());
        if waited.is_err() {
            pool.abort();
        }
        let joined = pool.join();
        waited?;
        joined?;
        tracing::info!(files = entries.len(), output = %output.display(), "fetch complete");
        Ok(JobSummary {
            files: entries.len(),
            merged_bytes: None,
        })
    }
}

/// Barrier for plain mode: all entries reported, or the first failure.
fn wait_all(results: Receiver<FetchOutcome>, count: usize) -> Result<(), JobError> {
    for _ in 0..count {
        let fetched = results.recv().map_err(|_| {
            JobError::Pool("result channel closed before all entries reported".into())
        })??;
        tracing::debug!(index = fetched.index, path = %fetched.path.display(), "fetched");
    }
    Ok(())
}

fn check_output(output: &Path, merge: bool) -> Result<(), JobError> {
    if merge {
        if output.symlink_metadata().is_ok() {
            return Err(JobError::OutputPrecondition(format!(
                "output file {} already exists",
                output.display()
            )));
        }
        return Ok(());
    }
    match fs::metadata(output) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(JobError::OutputPrecondition(format!(
            "output path {} is not a directory",
            output.display()
        ))),
        Err(_) => Err(JobError::OutputPrecondition(format!(
            "output directory {} does not exist",
            output.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_mode_rejects_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.bin");
        std::fs::write(&output, b"occupied").unwrap();
        let err = check_output(&output, true).unwrap_err();
        assert!(matches!(err, JobError::OutputPrecondition(_)));
    }

    #[test]
    fn merge_mode_accepts_fresh_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check_output(&dir.path().join("out.bin"), true).is_ok());
    }

    #[test]
    fn plain_mode_requires_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check_output(dir.path(), false).is_ok());

        let missing = dir.path().join("missing");
        assert!(matches!(
            check_output(&missing, false),
            Err(JobError::OutputPrecondition(_))
        ));

        let file = dir.path().join("file");
        std::fs::write(&file, b"x").unwrap();
        assert!(matches!(
            check_output(&file, false),
            Err(JobError::OutputPrecondition(_))
        ));
    }
}
