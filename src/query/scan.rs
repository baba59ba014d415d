//! Parallel count scans over the columnar store

use rayon::prelude::*;

use crate::schema::EPOCH_UNKNOWN;
use crate::store::EventStore;

/// Count records whose crash epoch is known and inside `[start, end]`.
///
/// Records carrying the [`EPOCH_UNKNOWN`] sentinel never match, whatever the
/// bounds. Bounds are inclusive on both sides.
pub fn count_date_range(store: &EventStore, start_epoch: i64, end_epoch: i64) -> usize {
    store
        .crash_epoch()
        .par_iter()
        .filter(|&&epoch| epoch != EPOCH_UNKNOWN && epoch >= start_epoch && epoch <= end_epoch)
        .count()
}

/// Count records with `min <= persons_injured <= max`.
///
/// No bounds validation beyond the comparison itself; `min > max` matches
/// nothing.
pub fn count_injury_range(store: &EventStore, min: i32, max: i32) -> usize {
    store
        .persons_injured()
        .par_iter()
        .filter(|&&injured| injured >= min && injured <= max)
        .count()
}

/// Count records within `radius` of `(lat, lon)` by planar Euclidean
/// distance.
///
/// Distance is computed in raw latitude/longitude degree units, not as a
/// geodesic ground distance; the radius must be given in the same degree
/// units.
pub fn count_location_radius(store: &EventStore, lat: f32, lon: f32, radius: f32) -> usize {
    store
        .latitude()
        .par_iter()
        .zip(store.longitude().par_iter())
        .filter(|&(&la, &lo)| {
            let dist = ((la - lat).powi(2) + (lo - lon).powi(2)).sqrt();
            dist <= radius
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::ColumnBuffer;
    use crate::schema::{col, date_to_epoch};

    fn record(date: &str, injured: &str, lat: &str, lon: &str) -> String {
        let mut fields = vec![""; 29];
        fields[col::CRASH_DATE] = date;
        fields[col::LATITUDE] = lat;
        fields[col::LONGITUDE] = lon;
        fields[col::PERSONS_INJURED] = injured;
        fields.join(",")
    }

    fn sample_store() -> EventStore {
        let mut buf = ColumnBuffer::default();
        buf.push_line(&record("01/01/2020", "2", "40.0", "-73.0"));
        buf.push_line(&record("02/01/2020", "0", "41.0", "-74.0"));
        buf.push_line(&record("bad-date", "5", "40.0", "-73.0"));
        EventStore::from_buffers(vec![buf])
    }

    fn epoch(date: &str) -> i64 {
        date_to_epoch(date).unwrap()
    }

    #[test]
    fn test_date_range_is_inclusive_both_sides() {
        let store = sample_store();
        let day = epoch("01/01/2020");
        assert_eq!(count_date_range(&store, day, day), 1);
        assert_eq!(
            count_date_range(&store, day, epoch("02/01/2020")),
            2
        );
    }

    #[test]
    fn test_unknown_epoch_never_matches() {
        let store = sample_store();
        // A range covering all of time still excludes the bad-date record.
        assert_eq!(count_date_range(&store, i64::MIN + 1, i64::MAX), 2);
    }

    #[test]
    fn test_injury_range_counts() {
        let store = sample_store();
        assert_eq!(count_injury_range(&store, 0, 2), 2);
        assert_eq!(count_injury_range(&store, 0, 5), 3);
        assert_eq!(count_injury_range(&store, 3, 5), 1);
    }

    #[test]
    fn test_injury_range_inverted_bounds_match_nothing() {
        let store = sample_store();
        assert_eq!(count_injury_range(&store, 4, 1), 0);
    }

    #[test]
    fn test_location_radius_planar_distance() {
        let store = sample_store();
        assert_eq!(count_location_radius(&store, 40.0, -73.0, 0.5), 2);
        // sqrt(2) away from (40, -73): include the third point too.
        assert_eq!(count_location_radius(&store, 40.0, -73.0, 1.5), 3);
        assert_eq!(count_location_radius(&store, 10.0, 10.0, 0.1), 0);
    }

    #[test]
    fn test_scans_over_empty_store_return_zero() {
        let store = EventStore::default();
        assert_eq!(count_date_range(&store, 0, i64::MAX), 0);
        assert_eq!(count_injury_range(&store, 0, 100), 0);
        assert_eq!(count_location_radius(&store, 0.0, 0.0, 1000.0), 0);
    }
}
