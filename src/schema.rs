//! Source schema for the collision event log
//!
//! The log is comma-delimited text: one header line followed by one record
//! per line, 29 fields in fixed positional order. Field decoding is strictly
//! positional; there is no header-driven column mapping.

/// Field positions in the source record, in file order.
pub mod col {
    pub const CRASH_DATE: usize = 0;
    pub const CRASH_TIME: usize = 1;
    pub const BOROUGH: usize = 2;
    pub const ZIP_CODE: usize = 3;
    pub const LATITUDE: usize = 4;
    pub const LONGITUDE: usize = 5;
    pub const LOCATION: usize = 6;
    pub const ON_STREET_NAME: usize = 7;
    pub const CROSS_STREET_NAME: usize = 8;
    pub const OFF_STREET_NAME: usize = 9;
    pub const PERSONS_INJURED: usize = 10;
    pub const PERSONS_KILLED: usize = 11;
    pub const PEDESTRIANS_INJURED: usize = 12;
    pub const PEDESTRIANS_KILLED: usize = 13;
    pub const CYCLISTS_INJURED: usize = 14;
    pub const CYCLISTS_KILLED: usize = 15;
    pub const MOTORISTS_INJURED: usize = 16;
    pub const MOTORISTS_KILLED: usize = 17;
    pub const CONTRIBUTING_FACTOR_1: usize = 18;
    pub const COLLISION_ID: usize = 23;
    pub const VEHICLE_TYPE_1: usize = 24;
}

/// Calendar format of the crash date field and of query date bounds.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Sentinel epoch for records whose date field failed to parse.
///
/// Such records stay in the store (their other columns are valid) but are
/// never matched by a date-range predicate.
pub const EPOCH_UNKNOWN: i64 = i64::MIN;

/// Parse a crash date into UTC-midnight epoch seconds.
///
/// Returns `None` when the token is not a valid calendar date in
/// [`DATE_FORMAT`]; callers decide between [`EPOCH_UNKNOWN`] (ingestion)
/// and a surfaced error (query bounds).
pub fn date_to_epoch(token: &str) -> Option<i64> {
    let date = chrono::NaiveDate::parse_from_str(token.trim(), DATE_FORMAT).ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(midnight.and_utc().timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_to_epoch_known_value() {
        // 01/01/1970 is the epoch origin
        assert_eq!(date_to_epoch("01/01/1970"), Some(0));
        // One day later
        assert_eq!(date_to_epoch("02/01/1970"), Some(86_400));
    }

    #[test]
    fn test_date_to_epoch_day_month_order() {
        // 02/03/2020 is 2 March, not 3 February
        let a = date_to_epoch("02/03/2020").unwrap();
        let b = date_to_epoch("03/02/2020").unwrap();
        assert!(a > b);
    }

    #[test]
    fn test_date_to_epoch_rejects_malformed() {
        assert_eq!(date_to_epoch(""), None);
        assert_eq!(date_to_epoch("not-a-date"), None);
        assert_eq!(date_to_epoch("31/02/2020"), None);
        assert_eq!(date_to_epoch("2020-01-01"), None);
    }

    #[test]
    fn test_date_to_epoch_trims_whitespace() {
        assert_eq!(date_to_epoch(" 01/01/1970 "), Some(0));
    }
}
