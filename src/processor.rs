//! Processor facade
//!
//! [`CrashDataProcessor`] ties the pipeline together: it owns the worker
//! pool, the immutable [`EventStore`] a load builds, and one wall-clock
//! timing slot per operation. External callers (reporting front ends,
//! benchmarks) drive it through `load` and the three query methods, then
//! read the elapsed times back.
//!
//! The same fixed-size pool runs ingestion and every scan; there is no
//! single-threaded fallback path. Timings live on the instance, not in
//! process-wide state.

use std::path::Path;
use std::time::{Duration, Instant};

use crate::query::{self, QueryKind};
use crate::schema::date_to_epoch;
use crate::store::EventStore;
use crate::{ingest, CrashError, Result};

/// Loads a collision event log and answers count queries against it.
pub struct CrashDataProcessor {
    store: EventStore,
    pool: rayon::ThreadPool,
    load_time: Option<Duration>,
    query_times: [Option<Duration>; QueryKind::COUNT],
}

impl CrashDataProcessor {
    /// Processor with one worker per available hardware thread.
    pub fn new() -> Result<Self> {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::with_workers(workers)
    }

    /// Processor with an explicit worker count.
    ///
    /// Match counts are independent of the worker count; this mainly exists
    /// for benchmarking and for tests that exercise determinism.
    pub fn with_workers(workers: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|i| format!("crashbase-{i}"))
            .build()
            .map_err(|e| CrashError::WorkerPool(e.to_string()))?;

        Ok(Self {
            store: EventStore::default(),
            pool,
            load_time: None,
            query_times: [None; QueryKind::COUNT],
        })
    }

    /// Build the store from a source file, replacing any previous contents.
    ///
    /// Safe to call again (the store is rebuilt from scratch); concurrent
    /// calls on one instance are not supported. On failure the store is
    /// left empty and valid (every subsequent query matches zero records)
    /// and the load timing is cleared, since it described the replaced
    /// store.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let started = Instant::now();

        // Replace first so a failed load never leaves a partial store or a
        // timing that describes a store that no longer exists.
        self.store = EventStore::default();
        self.load_time = None;

        let buffers = ingest::load_columns(path.as_ref(), &self.pool).map_err(|e| {
            log::error!("load of {} failed: {e}", path.as_ref().display());
            e
        })?;
        self.store = EventStore::from_buffers(buffers);
        self.load_time = Some(started.elapsed());

        log::info!(
            "loaded {} records from {} in {:.3}s",
            self.store.len(),
            path.as_ref().display(),
            started.elapsed().as_secs_f64()
        );
        Ok(())
    }

    /// Count crashes whose date lies in `[start, end]`, bounds inclusive.
    ///
    /// Bounds use the ingestion date format (`DD/MM/YYYY`). A malformed
    /// bound returns [`CrashError::InvalidQueryInput`] without scanning and
    /// without touching the recorded timings.
    pub fn query_date_range(&mut self, start: &str, end: &str) -> Result<usize> {
        let start_epoch = date_to_epoch(start).ok_or_else(|| {
            CrashError::InvalidQueryInput(format!(
                "invalid start date {start:?}, expected DD/MM/YYYY"
            ))
        })?;
        let end_epoch = date_to_epoch(end).ok_or_else(|| {
            CrashError::InvalidQueryInput(format!(
                "invalid end date {end:?}, expected DD/MM/YYYY"
            ))
        })?;

        let started = Instant::now();
        let count = self
            .pool
            .install(|| query::count_date_range(&self.store, start_epoch, end_epoch));
        self.query_times[QueryKind::DateRange.slot()] = Some(started.elapsed());
        Ok(count)
    }

    /// Count crashes with `min <= persons injured <= max`.
    pub fn query_injury_range(&mut self, min: i32, max: i32) -> usize {
        let started = Instant::now();
        let count = self
            .pool
            .install(|| query::count_injury_range(&self.store, min, max));
        self.query_times[QueryKind::InjuryRange.slot()] = Some(started.elapsed());
        count
    }

    /// Count crashes within `radius` of `(lat, lon)`, planar degree-space
    /// distance.
    pub fn query_location_radius(&mut self, lat: f32, lon: f32, radius: f32) -> usize {
        let started = Instant::now();
        let count = self
            .pool
            .install(|| query::count_location_radius(&self.store, lat, lon, radius));
        self.query_times[QueryKind::LocationRadius.slot()] = Some(started.elapsed());
        count
    }

    /// Wall time of the last successful load; `None` before the first one.
    pub fn elapsed_load_time(&self) -> Option<Duration> {
        self.load_time
    }

    /// Wall time of the last executed query of `kind`; `None` until that
    /// kind has completed at least once.
    pub fn elapsed_query_time(&self, kind: QueryKind) -> Option<Duration> {
        self.query_times[kind.slot()]
    }

    /// Read-only view of the store, for callers that want to run the
    /// stateless [`crate::query`] scans themselves (possibly concurrently).
    pub fn store(&self) -> &EventStore {
        &self.store
    }
}
