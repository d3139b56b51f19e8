//! Object and text encodings of a series
//!
//! The object form is a JSON map tagged with a schema version:
//!
//! ```json
//! {"v": 1, "start": "2020-01-01T02:30:00+00:00", "res": 5, "max": 5, "data": [1.23, null]}
//! ```
//!
//! The text form is that map serialized as JSON. Decoding dispatches on the
//! version field so each schema version keeps its own parser.

pub mod v1;

use crate::core::FixedWindowSeries;
use crate::{Result, SeriesError};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Schema version written by `to_object`
pub const CURRENT_VERSION: u64 = 1;

pub const KEY_VERSION: &str = "v";
pub const KEY_START_TIME: &str = "start";
pub const KEY_RESOLUTION_SECONDS: &str = "res";
pub const KEY_MAX_POINTS: &str = "max";
pub const KEY_DATA_POINTS: &str = "data";

impl FixedWindowSeries {
    /// Encode as a versioned JSON object. Deterministic; start time is
    /// written at second precision.
    pub fn to_object(&self) -> Value {
        v1::encode(self)
    }

    /// Decode a versioned JSON object.
    ///
    /// # Errors
    /// - `UnsupportedVersion` if the version field is missing or unknown
    /// - `MalformedObject` if a required field is missing or mistyped
    /// - the construction errors of `FixedWindowSeries::from_parts` if the
    ///   fields are well-formed but inconsistent
    pub fn from_object(object: &Value) -> Result<Self> {
        let map = object
            .as_object()
            .ok_or_else(|| SeriesError::MalformedObject("expected a JSON object".into()))?;

        let version = map.get(KEY_VERSION);
        match version.and_then(Value::as_u64) {
            Some(1) => v1::decode(object),
            _ => Err(SeriesError::UnsupportedVersion {
                found: version.map_or_else(|| "null".to_string(), Value::to_string),
            }),
        }
    }

    /// Encode as JSON text.
    pub fn to_text(&self) -> String {
        self.to_object().to_string()
    }

    /// Decode JSON text produced by `to_text`.
    pub fn from_text(text: &str) -> Result<Self> {
        let object: Value = serde_json::from_str(text)
            .map_err(|e| SeriesError::MalformedObject(format!("invalid JSON: {}", e)))?;
        Self::from_object(&object)
    }
}

impl fmt::Display for FixedWindowSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl FromStr for FixedWindowSeries {
    type Err = SeriesError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_text(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{series_5x5, T0};
    use serde_json::json;
    use time::Duration;

    fn sample_series() -> FixedWindowSeries {
        let mut s = series_5x5();
        s.add(1.23, T0).unwrap();
        s.add(2.34, T0 + Duration::seconds(5)).unwrap();
        s.add(3.14, T0 + Duration::seconds(10)).unwrap();
        s
    }

    #[test]
    fn test_empty_to_object() {
        assert_eq!(
            series_5x5().to_object(),
            json!({
                "v": 1,
                "start": "2020-01-01T02:30:00+00:00",
                "max": 5,
                "res": 5,
                "data": [],
            })
        );
    }

    #[test]
    fn test_to_object() {
        assert_eq!(
            sample_series().to_object(),
            json!({
                "v": 1,
                "start": "2020-01-01T02:30:00+00:00",
                "max": 5,
                "res": 5,
                "data": [1.23, 2.34, 3.14],
            })
        );
    }

    #[test]
    fn test_object_has_exactly_five_keys() {
        let obj = sample_series().to_object();
        assert_eq!(obj.as_object().unwrap().len(), 5);
    }

    #[test]
    fn test_gaps_encode_as_null() {
        let mut s = series_5x5();
        s.add(1.0, T0).unwrap();
        s.add(2.0, T0 + Duration::seconds(10)).unwrap();
        assert_eq!(s.to_object()["data"], json!([1.0, null, 2.0]));
    }

    #[test]
    fn test_text_round_trip() {
        let s = sample_series();
        let text = s.to_text();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, s.to_object());

        let decoded = FixedWindowSeries::from_text(&text).unwrap();
        assert_eq!(decoded, s);
        assert_eq!(decoded.to_object(), s.to_object());
    }

    #[test]
    fn test_display_and_from_str() {
        let s = sample_series();
        let decoded: FixedWindowSeries = s.to_string().parse().unwrap();
        assert_eq!(decoded, s);
    }

    #[test]
    fn test_decoded_series_keeps_accepting_samples() {
        let mut decoded = FixedWindowSeries::from_object(&sample_series().to_object()).unwrap();
        assert_eq!(decoded.end_time(), T0 + Duration::seconds(10));
        assert!(decoded.add(4.0, T0 + Duration::seconds(15)).is_ok());
        assert_eq!(decoded.len(), 4);
    }

    #[test]
    fn test_missing_version() {
        let err = FixedWindowSeries::from_object(&json!({
            "start": "2020-01-01T02:30:00+00:00", "res": 5, "max": 5, "data": [],
        }))
        .unwrap_err();
        assert_eq!(err, SeriesError::UnsupportedVersion { found: "null".into() });
    }

    #[test]
    fn test_unknown_version() {
        let err = FixedWindowSeries::from_object(&json!({
            "v": 2, "start": "2020-01-01T02:30:00+00:00", "res": 5, "max": 5, "data": [],
        }))
        .unwrap_err();
        assert_eq!(err, SeriesError::UnsupportedVersion { found: "2".into() });

        let err = FixedWindowSeries::from_object(&json!({"v": "1"})).unwrap_err();
        assert_eq!(err, SeriesError::UnsupportedVersion { found: "\"1\"".into() });
    }

    #[test]
    fn test_not_an_object() {
        assert!(matches!(
            FixedWindowSeries::from_object(&json!([1, 2, 3])),
            Err(SeriesError::MalformedObject(_))
        ));
        assert!(matches!(
            FixedWindowSeries::from_text("{not json"),
            Err(SeriesError::MalformedObject(_))
        ));
    }
}
