//! Shared fixtures for unit tests

use crate::core::{FixedWindowSeries, Resolution};
use time::macros::datetime;
use time::OffsetDateTime;

/// Reference instant used across tests
pub const T0: OffsetDateTime = datetime!(2020-01-01 02:30 UTC);

pub fn res(seconds: i64) -> Resolution {
    Resolution::from_seconds(seconds).unwrap()
}

/// Empty series at `T0` with 5-second buckets and 5 slots
pub fn series_5x5() -> FixedWindowSeries {
    FixedWindowSeries::new(T0, res(5), 5).unwrap()
}
