//! Fixed-window series
//!
//! Append-only buffer of optional samples, one per bucket, holding at most
//! `max_points` buckets. Missed buckets are filled with `None`, the oldest
//! buckets are evicted once capacity is exceeded, and a gap wider than the
//! whole window restarts the series at the new sample.
//!
//! Memory use is O(`max_points`) regardless of how much time has elapsed.

use crate::core::bucket::{normalize, truncate_to_second, Resolution};
use crate::{log_series, Result, SeriesError};
use std::iter::{Enumerate, FusedIterator};
use std::num::NonZeroUsize;
use std::ops::Index;
use std::slice;
use time::OffsetDateTime;
use tracing::Level;

/// Default capacity: 20 hours of 5-minute buckets
pub const DEFAULT_MAX_POINTS: NonZeroUsize = match NonZeroUsize::new(20 * 24) {
    Some(n) => n,
    None => panic!("default capacity is zero"),
};

/// What `add` did to the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddOutcome {
    /// Appended after the last bucket, possibly after `None` gap fillers
    Added,
    /// Overwrote the value of the last bucket
    Replaced,
    /// Gap exceeded capacity; the series restarted at the new bucket
    Truncated,
    /// `start_time` moved: leading buckets were evicted, or the first
    /// sample anchored an empty series
    Shifted,
}

impl AddOutcome {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AddOutcome::Added => "added",
            AddOutcome::Replaced => "replaced",
            AddOutcome::Truncated => "truncated",
            AddOutcome::Shifted => "shifted",
        }
    }
}

/// Bounded, time-bucketed sample buffer.
///
/// Bucket `i` covers `start_time + i * resolution`. The start time is kept
/// in UTC at whole-second precision, so two series compare equal exactly
/// when their encoded forms do.
///
/// Every stored bucket has a representable timestamp: `from_parts` rejects
/// windows that run past the supported date range, and `add` only ever
/// moves the last bucket to an instant it was given.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedWindowSeries {
    start_time: OffsetDateTime,
    resolution: Resolution,
    max_points: usize,
    data_points: Vec<Option<f64>>,
}

impl FixedWindowSeries {
    /// Create an empty series anchored at `start_time`.
    ///
    /// # Errors
    /// Returns `InvalidCapacity` if `max_points` is zero.
    pub fn new(
        start_time: OffsetDateTime,
        resolution: Resolution,
        max_points: usize,
    ) -> Result<Self> {
        let max_points =
            NonZeroUsize::new(max_points).ok_or(SeriesError::InvalidCapacity(0))?;
        Ok(Self::empty(start_time, resolution, max_points))
    }

    /// Create an empty series from an already validated shape.
    pub fn empty(
        start_time: OffsetDateTime,
        resolution: Resolution,
        max_points: NonZeroUsize,
    ) -> Self {
        Self {
            start_time: truncate_to_second(start_time),
            resolution,
            max_points: max_points.get(),
            data_points: Vec::new(),
        }
    }

    /// Create an empty series anchored at the current time.
    pub fn starting_now(resolution: Resolution, max_points: usize) -> Result<Self> {
        Self::new(OffsetDateTime::now_utc(), resolution, max_points)
    }

    /// Build a series from previously stored state.
    ///
    /// All fields are checked together; nothing is constructed unless every
    /// one of them is consistent.
    pub fn from_parts(
        start_time: OffsetDateTime,
        resolution: Resolution,
        max_points: usize,
        data_points: Vec<Option<f64>>,
    ) -> Result<Self> {
        if max_points == 0 {
            return Err(SeriesError::InvalidCapacity(0));
        }
        if data_points.len() > max_points {
            return Err(SeriesError::TooManyPoints {
                len: data_points.len(),
                max: max_points,
            });
        }
        if let Some(bad) = data_points.iter().flatten().find(|v| !v.is_finite()) {
            return Err(SeriesError::NonFiniteSample(*bad));
        }

        let start_time = truncate_to_second(start_time);
        if let Some(last_index) = data_points.len().checked_sub(1) {
            let end = resolution
                .checked_times(last_index)
                .and_then(|span| start_time.checked_add(span));
            if end.is_none() {
                return Err(SeriesError::WindowOutOfRange {
                    start: start_time,
                    buckets: data_points.len(),
                });
            }
        }

        Ok(Self {
            start_time,
            resolution,
            max_points,
            data_points,
        })
    }

    #[inline]
    pub fn start_time(&self) -> OffsetDateTime {
        self.start_time
    }

    #[inline]
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    #[inline]
    pub fn max_points(&self) -> usize {
        self.max_points
    }

    /// Stored buckets, oldest first. `None` marks a missed bucket.
    #[inline]
    pub fn data_points(&self) -> &[Option<f64>] {
        &self.data_points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data_points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data_points.is_empty()
    }

    /// Value of bucket `index`: `None` if out of range, `Some(None)` for a gap.
    #[inline]
    pub fn get(&self, index: usize) -> Option<Option<f64>> {
        self.data_points.get(index).copied()
    }

    /// Timestamp of the most recent bucket; `start_time` when empty.
    pub fn end_time(&self) -> OffsetDateTime {
        match self.data_points.len() {
            0 | 1 => self.start_time,
            n => self.start_time + self.resolution.times(n - 1),
        }
    }

    /// True if the bucket containing `when` already holds the last sample.
    pub fn has_current_sample(&self, when: OffsetDateTime) -> bool {
        !self.data_points.is_empty() && self.end_time() == normalize(when, self.resolution)
    }

    pub fn has_current_sample_now(&self) -> bool {
        self.has_current_sample(OffsetDateTime::now_utc())
    }

    /// Record `value` in the bucket containing `when`.
    ///
    /// # Errors
    /// - `NonFiniteSample` if `value` is NaN or infinite
    /// - `OutOfOrderSample` if `when` falls before the last stored bucket
    ///
    /// On error the series is left untouched.
    pub fn add(&mut self, value: f64, when: OffsetDateTime) -> Result<AddOutcome> {
        if !value.is_finite() {
            return Err(SeriesError::NonFiniteSample(value));
        }

        let bucket = normalize(when, self.resolution);
        let last = self.end_time();

        // An empty series has no meaningful start yet
        let distance = if self.data_points.is_empty() {
            0
        } else {
            (bucket - last)
                .whole_seconds()
                .div_euclid(self.resolution.as_seconds())
        };

        if distance < 0 {
            return Err(SeriesError::OutOfOrderSample { last, bucket });
        }

        if distance == 0 {
            return Ok(match self.data_points.last_mut() {
                Some(slot) => {
                    *slot = Some(value);
                    AddOutcome::Replaced
                }
                None => {
                    self.start_time = bucket;
                    self.data_points.push(Some(value));
                    AddOutcome::Shifted
                }
            });
        }

        // A gap that does not even fit in usize is wider than any window
        let gap = match usize::try_from(distance) {
            Ok(gap) if gap <= self.max_points => gap,
            _ => {
                log_series!(
                    Level::DEBUG,
                    from = %last,
                    to = %bucket,
                    buckets = distance,
                    "gap exceeds window, truncating series"
                );
                self.data_points.clear();
                self.data_points.push(Some(value));
                self.start_time = bucket;
                return Ok(AddOutcome::Truncated);
            }
        };

        // Pad the gap; the final slot takes the new value
        self.data_points.resize(self.data_points.len() + gap, None);
        if let Some(slot) = self.data_points.last_mut() {
            *slot = Some(value);
        }

        let trim = self.data_points.len().saturating_sub(self.max_points);
        if trim == 0 {
            return Ok(AddOutcome::Added);
        }

        self.data_points.drain(..trim);
        self.start_time += self.resolution.times(trim);
        log_series!(
            Level::TRACE,
            evicted = trim,
            start = %self.start_time,
            "window shifted"
        );
        Ok(AddOutcome::Shifted)
    }

    /// Record `value` in the bucket containing the current time.
    pub fn add_now(&mut self, value: f64) -> Result<AddOutcome> {
        self.add(value, OffsetDateTime::now_utc())
    }

    /// `(timestamp, value)` for every stored bucket, oldest first.
    ///
    /// Each call starts a fresh pass over the current state.
    pub fn iter_points(&self) -> Points<'_> {
        Points {
            start_time: self.start_time,
            resolution: self.resolution,
            inner: self.data_points.iter().enumerate(),
        }
    }
}

impl Default for FixedWindowSeries {
    /// Empty series starting now, with 5-minute buckets and 480 slots
    fn default() -> Self {
        Self::empty(
            OffsetDateTime::now_utc(),
            Resolution::FIVE_MINUTES,
            DEFAULT_MAX_POINTS,
        )
    }
}

impl Index<usize> for FixedWindowSeries {
    type Output = Option<f64>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data_points[index]
    }
}

impl<'a> IntoIterator for &'a FixedWindowSeries {
    type Item = (OffsetDateTime, Option<f64>);
    type IntoIter = Points<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_points()
    }
}

/// Iterator over `(timestamp, value)` pairs of a series
#[derive(Debug, Clone)]
pub struct Points<'a> {
    start_time: OffsetDateTime,
    resolution: Resolution,
    inner: Enumerate<slice::Iter<'a, Option<f64>>>,
}

impl Points<'_> {
    #[inline]
    fn point(&self, index: usize, value: Option<f64>) -> (OffsetDateTime, Option<f64>) {
        (self.start_time + self.resolution.times(index), value)
    }
}

impl Iterator for Points<'_> {
    type Item = (OffsetDateTime, Option<f64>);

    fn next(&mut self) -> Option<Self::Item> {
        let (i, v) = self.inner.next()?;
        Some(self.point(i, *v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Points<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let (i, v) = self.inner.next_back()?;
        Some(self.point(i, *v))
    }
}

impl ExactSizeIterator for Points<'_> {}

impl FusedIterator for Points<'_> {}
