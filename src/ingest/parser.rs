//! Parallel record parser
//!
//! Each ingestion worker owns one private [`ColumnBuffer`] and decodes the
//! lines of its assigned byte range into it. Workers never write to shared
//! state; the buffers are concatenated once at the merge barrier. This is
//! what removes the per-record lock that a shared append vector would need.
//!
//! Field decoding is strictly positional on the comma delimiter, in the
//! fixed source column order (see [`crate::schema`]). Numeric fields that
//! are empty or malformed decode to zero; an unparseable crash date takes
//! the [`EPOCH_UNKNOWN`] sentinel and the record stays in the store.

use std::fs::File;
use std::path::Path;

use crate::ingest::reader::ChunkedLineReader;
use crate::schema::{col, date_to_epoch, EPOCH_UNKNOWN};
use crate::Result;

/// Rough bytes-per-record estimate used to preallocate thread-local buffers
/// from a byte-range length, before the actual line count is known.
const ESTIMATED_RECORD_BYTES: usize = 160;

/// Thread-local columnar accumulation buffer, one per ingestion worker.
#[derive(Debug, Default)]
pub(crate) struct ColumnBuffer {
    pub crash_epoch: Vec<i64>,
    pub persons_injured: Vec<i32>,
    pub persons_killed: Vec<i32>,
    pub latitude: Vec<f32>,
    pub longitude: Vec<f32>,
    pub borough: Vec<String>,
    pub on_street_name: Vec<String>,
    pub cross_street_name: Vec<String>,
    pub off_street_name: Vec<String>,
    pub contributing_factor: Vec<String>,
    pub vehicle_type: Vec<String>,
}

impl ColumnBuffer {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
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

    pub(crate) fn len(&self) -> usize {
        self.crash_epoch.len()
    }

    /// Decode one source line and append it to every column.
    pub(crate) fn push_line(&mut self, line: &str) {
        let mut fields = line.split(',');
        let mut field = || fields.next().unwrap_or("").trim();

        let date = field();
        let _time = field();
        let borough = field();
        let _zip = field();
        let latitude = parse_f32(field());
        let longitude = parse_f32(field());
        let _location = field();
        let on_street = field();
        let cross_street = field();
        let off_street = field();
        let injured = parse_i32(field());
        let killed = parse_i32(field());
        // Pedestrian/cyclist/motorist breakdowns are not scanned; skip them.
        for _ in col::PEDESTRIANS_INJURED..col::CONTRIBUTING_FACTOR_1 {
            field();
        }
        let factor = field();
        // Contributing factors 2-5 and the collision id are not retained.
        for _ in col::CONTRIBUTING_FACTOR_1 + 1..col::VEHICLE_TYPE_1 {
            field();
        }
        let vehicle = field();

        self.crash_epoch
            .push(date_to_epoch(date).unwrap_or(EPOCH_UNKNOWN));
        self.persons_injured.push(injured);
        self.persons_killed.push(killed);
        self.latitude.push(latitude);
        self.longitude.push(longitude);
        self.borough.push(borough.to_string());
        self.on_street_name.push(on_street.to_string());
        self.cross_street_name.push(cross_street.to_string());
        self.off_street_name.push(off_street.to_string());
        self.contributing_factor.push(factor.to_string());
        self.vehicle_type.push(vehicle.to_string());
    }
}

/// Empty or malformed integer token decodes to 0; the record is kept.
#[inline]
fn parse_i32(token: &str) -> i32 {
    token.parse().unwrap_or(0)
}

/// Empty or malformed float token decodes to 0.0; the record is kept.
#[inline]
fn parse_f32(token: &str) -> f32 {
    token.parse().unwrap_or(0.0)
}

/// Parse one byte range of the source file into a fresh thread-local buffer.
///
/// Runs on an ingestion worker; opens its own file handle so workers share
/// no reader state.
pub(crate) fn parse_range(path: &Path, start: u64, end: u64) -> Result<ColumnBuffer> {
    let file = File::open(path)?;
    let mut reader = ChunkedLineReader::new(file, start, end)?;

    let estimated = (end.saturating_sub(start) as usize / ESTIMATED_RECORD_BYTES) + 1;
    let mut buffer = ColumnBuffer::with_capacity(estimated);

    while let Some(line) = reader.next_line()? {
        buffer.push_line(&line);
    }
    Ok(buffer)
}
