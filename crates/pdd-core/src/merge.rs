//! Ordered reassembly of fetched files into one output file.
//!
//! Results arrive in completion order; output bytes follow listing order.
//! The merge writes to `<output>.part` and renames onto the final path on
//! success, so the output path never names a partially-written file.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;

use crate::error::JobError;
use crate::fetcher::FetchOutcome;

/// Consumes exactly `count` results and writes their bytes to `output` in
/// listing-index order, deleting each scratch file as it is consumed.
/// Returns the number of bytes written. On error the staging file is
/// removed; the scratch directory itself is the caller's to clean up.
pub fn merge_results(
    results: Receiver<FetchOutcome>,
    count: usize,
    output: &Path,
) -> Result<u64, JobError> {
    let staging = staging_path(output);
    let written = write_merged(&results, count, &staging, output);
    if written.is_err() {
        if let Err(e) = fs::remove_file(&staging) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(path = %staging.display(), error = %e, "could not remove staging file");
            }
        }
    }
    written
}

fn write_merged(
    results: &Receiver<FetchOutcome>,
    count: usize,
    staging: &Path,
    output: &Path,
) -> Result<u64, JobError> {
    let file = File::create(staging).map_err(|e| merge_write(staging, e))?;
    let mut out = BufWriter::new(file);

    // Out-of-order arrivals wait here until the run starting at `next` is
    // contiguous, then flush; memory is bounded by the completion skew.
    let mut pending: BTreeMap<usize, PathBuf> = BTreeMap::new();
    let mut next = 0usize;
    let mut total = 0u64;
    for _ in 0..count {
        let fetched = results.recv().map_err(|_| {
            JobError::Pool("result channel closed before all entries reported".into())
        })??;
        pending.insert(fetched.index, fetched.path);
        while let Some(path) = pending.remove(&next) {
            total += append_and_discard(&mut out, &path)?;
            next += 1;
        }
    }
    debug_assert!(pending.is_empty(), "all indices below {count} flushed");

    let file = out
        .into_inner()
        .map_err(|e| merge_write(staging, e.into_error()))?;
    file.sync_all().map_err(|e| merge_write(staging, e))?;
    drop(file);
    fs::rename(staging, output).map_err(|e| merge_write(output, e))?;
    Ok(total)
}

/// Appends one staged file to the output stream, then deletes it so scratch
/// space is freed before the whole merge finishes.
fn append_and_discard(out: &mut BufWriter<File>, path: &Path) -> Result<u64, JobError> {
    let mut src = File::open(path).map_err(|e| merge_write(path, e))?;
    let n = io::copy(&mut src, out).map_err(|e| merge_write(path, e))?;
    drop(src);
    if let Err(e) = fs::remove_file(path) {
        tracing::warn!(path = %path.display(), error = %e, "could not remove staged file after append");
    }
    Ok(n)
}

fn merge_write(path: &Path, source: io::Error) -> JobError {
    JobError::MergeWrite {
        path: path.to_path_buf(),
        source,
    }
}

/// Staging name beside the output: `<output>.part`.
fn staging_path(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("merged"));
    name.push(".part");
    output.with_file_name(name)
}
