//! Embedding a series as a record field
//!
//! A `SeriesField` describes the series shape one record field uses and
//! owns the load/store boundary: absent values become a fresh default
//! series, and stored values that fail to decode are logged and replaced
//! by a default rather than failing the whole record.

use crate::core::{FixedWindowSeries, Resolution};
use crate::{log_series, Result, SeriesError};
use serde_json::Value;
use std::num::NonZeroUsize;
use time::OffsetDateTime;
use tracing::Level;

/// Shape and load/store policy of one series-valued field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesField {
    resolution: Resolution,
    max_points: NonZeroUsize,
}

impl SeriesField {
    /// # Errors
    /// Returns `InvalidCapacity` if `max_points` is zero.
    pub fn new(resolution: Resolution, max_points: usize) -> Result<Self> {
        let max_points =
            NonZeroUsize::new(max_points).ok_or(SeriesError::InvalidCapacity(0))?;
        Ok(Self {
            resolution,
            max_points,
        })
    }

    #[inline]
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    #[inline]
    pub fn max_points(&self) -> usize {
        self.max_points.get()
    }

    /// Empty series of this field's shape, starting now.
    pub fn new_default(&self) -> FixedWindowSeries {
        FixedWindowSeries::empty(OffsetDateTime::now_utc(), self.resolution, self.max_points)
    }

    /// Load a stored object. Missing or null values, and values that fail
    /// to decode, yield a default series.
    pub fn load(&self, stored: Option<&Value>) -> FixedWindowSeries {
        match stored {
            None | Some(Value::Null) => self.new_default(),
            Some(object) => self.recover(FixedWindowSeries::from_object(object)),
        }
    }

    /// Load stored JSON text, with the same fallback as `load`.
    pub fn load_text(&self, stored: Option<&str>) -> FixedWindowSeries {
        match stored.map(str::trim) {
            None | Some("") => self.new_default(),
            Some(text) => self.recover(FixedWindowSeries::from_text(text)),
        }
    }

    /// Object to persist; `None` stores a default series.
    pub fn store(&self, series: Option<&FixedWindowSeries>) -> Value {
        match series {
            Some(series) => series.to_object(),
            None => self.new_default().to_object(),
        }
    }

    /// Text to persist; `None` stores a default series.
    pub fn store_text(&self, series: Option<&FixedWindowSeries>) -> String {
        self.store(series).to_string()
    }

    fn recover(&self, decoded: Result<FixedWindowSeries>) -> FixedWindowSeries {
        decoded.unwrap_or_else(|e| {
            log_series!(
                Level::WARN,
                error = %e,
                "Stored value invalid, returning empty series"
            );
            self.new_default()
        })
    }
}
