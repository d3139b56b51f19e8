//! Bounded, time-bucketed sample buffer
//!
//! A `FixedWindowSeries` is meant to live inside a larger record (a row
//! field, a cache entry). It aligns each sample to a fixed-width bucket,
//! fills missed buckets with gaps and drops the oldest buckets once its
//! capacity is exceeded. It encodes to a compact versioned JSON object.

pub mod codec;
pub mod core;
pub mod field;
pub mod infrastructure;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use crate::core::{
    normalize, AddOutcome, FixedWindowSeries, NormalizedSeries, Points, Resolution,
};
pub use field::SeriesField;
pub use infrastructure::config::{Config, LoggingConfig, SeriesSettings};

use thiserror::Error;
use time::OffsetDateTime;

/// Error type for series operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SeriesError {
    #[error("Sample would go back in time: from {last} to {bucket}")]
    OutOfOrderSample {
        last: OffsetDateTime,
        bucket: OffsetDateTime,
    },

    #[error("Unsupported object version: {found}")]
    UnsupportedVersion { found: String },

    #[error("Malformed series object: {0}")]
    MalformedObject(String),

    #[error("Resolution must be a positive number of seconds, got {0}")]
    InvalidResolution(i64),

    #[error("Capacity must be at least one point, got {0}")]
    InvalidCapacity(u64),

    #[error("Sample value must be finite, got {0}")]
    NonFiniteSample(f64),

    #[error("{len} data points exceed capacity of {max}")]
    TooManyPoints { len: usize, max: usize },

    #[error("Window of {buckets} buckets from {start} runs past the supported date range")]
    WindowOutOfRange { start: OffsetDateTime, buckets: usize },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, SeriesError>;
