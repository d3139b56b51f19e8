//! Infrastructure - ambient concerns around the series core
//!
//! - Configuration loading
//! - Logging setup

pub mod config;
pub mod logging;

pub use config::{Config, ConfigError};
pub use logging::init_logging;
