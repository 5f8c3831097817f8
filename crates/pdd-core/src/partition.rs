//! Splits the remote listing into contiguous per-worker chunks.

/// Contiguous, order-preserving run of entries assigned to one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkChunk {
    /// Listing index of the first entry.
    pub start: usize,
    /// Entries in listing order.
    pub entries: Vec<String>,
}

impl WorkChunk {
    /// Entries paired with their global listing indices.
    pub fn indexed(&self) -> impl Iterator<Item = (usize, &str)> {
        let start = self.start;
        self.entries
            .iter()
            .enumerate()
            .map(move |(i, e)| (start + i, e.as_str()))
    }
}

/// Splits `entries` into at most `workers` chunks of ceil(N / W) entries; the
/// last chunk may be shorter. Concatenating the chunks in order reproduces
/// `entries` exactly, and no chunk is empty. Empty input yields no chunks; a
/// worker count of 0 is treated as 1.
pub fn chunk(entries: &[String], workers: usize) -> Vec<WorkChunk> {
    if entries.is_empty() {
        return Vec::new();
    }
    let workers = workers.max(1);
    let size = entries.len().div_ceil(workers);
    entries
        .chunks(size)
        .enumerate()
        .map(|(i, c)| WorkChunk {
            start: i * size,
            entries: c.to_vec(),
        })
        .collect()
}
