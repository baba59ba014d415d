//! Columnar event store
//!
//! Struct-of-arrays layout: each field lives in its own contiguous vector,
//! and index `i` across all vectors describes the same source record. That
//! positional alignment is the store's central correctness contract.
//!
//! The store is built exactly once per load, by concatenating the ingestion
//! workers' thread-local buffers at a single merge barrier, and is immutable
//! afterwards: all accessors borrow read-only, so any number of scans may run
//! concurrently with no locking.

use crate::ingest::ColumnBuffer;

/// Immutable columnar store of collision records.
///
/// `Default` gives the empty store (N = 0), which is what a failed load
/// leaves behind: valid and queryable, every query matching zero records.
#[derive(Debug, Default)]
pub struct EventStore {
    crash_epoch: Vec<i64>,
    persons_injured: Vec<i32>,
    persons_killed: Vec<i32>,
    latitude: Vec<f32>,
    longitude: Vec<f32>,
    borough: Vec<String>,
    on_street_name: Vec<String>,
    cross_street_name: Vec<String>,
    off_street_name: Vec<String>,
    contributing_factor: Vec<String>,
    vehicle_type: Vec<String>,
}

impl EventStore {
    /// Merge per-worker buffers into one store.
    ///
    /// This is the pipeline's single synchronization barrier: every worker
    /// has finished before it runs, and no write happens after it. Buffers
    /// are appended in worker-index order, preserving each worker's internal
    /// record order; there is no cross-worker ordering guarantee, and none is
    /// needed for order-independent aggregate counts.
    pub(crate) fn from_buffers(buffers: Vec<ColumnBuffer>) -> Self {
        let total: usize = buffers.iter().map(|b| b.len()).sum();
        let mut store = Self::with_capacity(total);

        for mut buffer in buffers {
            store.crash_epoch.append(&mut buffer.crash_epoch);
            store.persons_injured.append(&mut buffer.persons_injured);
            store.persons_killed.append(&mut buffer.persons_killed);
            store.latitude.append(&mut buffer.latitude);
            store.longitude.append(&mut buffer.longitude);
            store.borough.append(&mut buffer.borough);
            store.on_street_name.append(&mut buffer.on_street_name);
            store.cross_street_name.append(&mut buffer.cross_street_name);
            store.off_street_name.append(&mut buffer.off_street_name);
            store.contributing_factor.append(&mut buffer.contributing_factor);
            store.vehicle_type.append(&mut buffer.vehicle_type);
        }

        debug_assert_eq!(store.len(), total);
        store
    }

    /// Preallocate every column to the exact final record count.
    fn with_capacity(capacity: usize) -> Self {
        Self {
            crash_epoch: Vec::with_capacity(capacity),
            persons_injured: Vec::with_capacity(capacity),
            persons_killed: Vec::with_capacity(capacity),
            latitude: Vec::with_capacity(capacity),
            longitude: Vec::with_capacity(capacity),
            borough: Vec::with_capacity(capacity),
            on_street_name: Vec::with_capacity(capacity),
            cross_street_name: Vec::with_capacity(capacity),
            off_street_name: Vec::with_capacity(capacity),
            contributing_factor: Vec::with_capacity(capacity),
            vehicle_type: Vec::with_capacity(capacity),
        }
    }

    /// Number of records (N). Every column has exactly this length.
    pub fn len(&self) -> usize {
        self.crash_epoch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crash_epoch.is_empty()
    }

    /// Crash date as epoch seconds; [`crate::schema::EPOCH_UNKNOWN`] where
    /// the source date failed to parse.
    pub fn crash_epoch(&self) -> &[i64] {
        &self.crash_epoch
    }

    pub fn persons_injured(&self) -> &[i32] {
        &self.persons_injured
    }

    pub fn persons_killed(&self) -> &[i32] {
        &self.persons_killed
    }

    pub fn latitude(&self) -> &[f32] {
        &self.latitude
    }

    pub fn longitude(&self) -> &[f32] {
        &self.longitude
    }

    pub fn borough(&self) -> &[String] {
        &self.borough
    }

    pub fn on_street_name(&self) -> &[String] {
        &self.on_street_name
    }

    pub fn cross_street_name(&self) -> &[String] {
        &self.cross_street_name
    }

    pub fn off_street_name(&self) -> &[String] {
        &self.off_street_name
    }

    pub fn contributing_factor(&self) -> &[String] {
        &self.contributing_factor
    }

    pub fn vehicle_type(&self) -> &[String] {
        &self.vehicle_type
    }
}
