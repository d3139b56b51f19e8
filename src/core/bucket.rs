//! Bucket alignment
//!
//! Maps an arbitrary instant onto the start of its fixed-width bucket.
//! Buckets are anchored at the Unix epoch, so two series with the same
//! resolution always agree on bucket boundaries.

use crate::{Result, SeriesError};
use std::fmt;
use time::{Duration, OffsetDateTime, UtcOffset};

/// Width of one bucket, in whole seconds. Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Resolution(i64);

impl Resolution {
    /// Five minutes, the resolution of a default series
    pub const FIVE_MINUTES: Self = Self(300);

    /// Create a resolution from a number of seconds.
    ///
    /// # Errors
    /// Returns `InvalidResolution` if `seconds` is zero or negative.
    pub fn from_seconds(seconds: i64) -> Result<Self> {
        if seconds <= 0 {
            return Err(SeriesError::InvalidResolution(seconds));
        }
        Ok(Self(seconds))
    }

    #[inline(always)]
    pub const fn as_seconds(&self) -> i64 {
        self.0
    }

    #[inline(always)]
    pub const fn as_duration(&self) -> Duration {
        Duration::seconds(self.0)
    }

    /// Duration spanned by `count` buckets, saturating at `Duration::MAX`.
    #[inline]
    pub fn times(&self, count: usize) -> Duration {
        self.checked_times(count).unwrap_or(Duration::MAX)
    }

    /// Duration spanned by `count` buckets, or `None` on overflow.
    #[inline]
    pub fn checked_times(&self, count: usize) -> Option<Duration> {
        let count = i64::try_from(count).ok()?;
        self.0.checked_mul(count).map(Duration::seconds)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

/// Align `t` down to the start of its bucket, in UTC.
///
/// `t` is converted to UTC (not relabelled), so instants carrying any
/// offset land in the same bucket as their UTC equivalent. Instants before
/// the epoch floor towards negative infinity.
pub fn normalize(t: OffsetDateTime, resolution: Resolution) -> OffsetDateTime {
    let utc = t.to_offset(UtcOffset::UTC);
    let secs = utc.unix_timestamp();
    let excess = Duration::seconds(secs.rem_euclid(resolution.as_seconds()))
        + Duration::nanoseconds(i64::from(utc.nanosecond()));
    utc.saturating_sub(excess)
}

/// Drop the sub-second part of `t` and express it in UTC.
///
/// Stored start times carry second precision only, matching the encoded form.
pub fn truncate_to_second(t: OffsetDateTime) -> OffsetDateTime {
    let utc = t.to_offset(UtcOffset::UTC);
    utc.saturating_sub(Duration::nanoseconds(i64::from(utc.nanosecond())))
}
