//! Parallel, chunked, partial-read ingestion pipeline
//!
//! ```text
//! source file ──► split into per-worker byte ranges
//!                    │
//!                    ▼  (one worker per range, no shared state)
//!            ChunkedLineReader ──► ColumnBuffer (thread-local)
//!                    │
//!                    ▼  (single merge barrier)
//!               EventStore (immutable)
//! ```
//!
//! Workers receive disjoint byte sub-ranges of the data region rather than a
//! pre-split line list, so no pass over the file is needed before parsing
//! starts. The boundary-ownership rule of [`reader::ChunkedLineReader`]
//! guarantees each line is parsed by exactly one worker.

pub mod reader;

mod parser;

pub use reader::ChunkedLineReader;

pub(crate) use parser::ColumnBuffer;

use std::fs::File;
use std::path::Path;

use rayon::prelude::*;

use crate::Result;

/// Split `[start, end)` into `parts` contiguous byte ranges.
///
/// Ranges cover the input exactly; when the region is shorter than `parts`
/// some trailing ranges are empty, which the reader treats as "no lines".
pub(crate) fn split_ranges(start: u64, end: u64, parts: usize) -> Vec<(u64, u64)> {
    let parts = parts.max(1) as u64;
    let total = end.saturating_sub(start);
    let chunk = total / parts;
    let remainder = total % parts;

    let mut ranges = Vec::with_capacity(parts as usize);
    let mut cursor = start;
    for i in 0..parts {
        // Spread the remainder over the first ranges.
        let len = chunk + u64::from(i < remainder);
        ranges.push((cursor, cursor + len));
        cursor += len;
    }
    ranges
}

/// Ingest the data region of `path` into one thread-local buffer per worker.
///
/// The header line is skipped; the rest of the file is partitioned into one
/// byte range per pool worker and parsed in parallel. Returns the buffers in
/// range order, ready for the merge barrier.
pub(crate) fn load_columns(path: &Path, pool: &rayon::ThreadPool) -> Result<Vec<ColumnBuffer>> {
    let mut file = File::open(path)?;
    let file_len = file.metadata()?.len();
    let data_start = reader::data_start(&mut file)?;
    drop(file);

    if data_start >= file_len {
        return Ok(Vec::new());
    }

    let workers = pool.current_num_threads();
    log::info!(
        "ingesting {} data bytes with {} workers",
        file_len - data_start,
        workers
    );

    let ranges = split_ranges(data_start, file_len, workers);
    pool.install(|| {
        ranges
            .into_par_iter()
            .map(|(start, end)| parser::parse_range(path, start, end))
            .collect::<Result<Vec<_>>>()
    })
}
