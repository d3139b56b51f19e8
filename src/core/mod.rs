//! Core series types
//!
//! This module contains the buffer engine itself:
//! - Resolution / normalize: bucket alignment
//! - FixedWindowSeries: bounded bucketed buffer
//! - NormalizedSeries: values scaled for display

pub mod bucket;
pub mod display;
pub mod series;

pub use bucket::{normalize, Resolution};
pub use display::NormalizedSeries;
pub use series::{AddOutcome, FixedWindowSeries, Points, DEFAULT_MAX_POINTS};
