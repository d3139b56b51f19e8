//! Schema version 1

use super::{
    CURRENT_VERSION, KEY_DATA_POINTS, KEY_MAX_POINTS, KEY_RESOLUTION_SECONDS, KEY_START_TIME,
    KEY_VERSION,
};
use crate::core::{FixedWindowSeries, Resolution};
use crate::{Result, SeriesError};
use serde::Deserialize;
use serde_json::{Map, Value};
use time::format_description::well_known::Rfc3339;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

/// `2020-01-01T02:30:00+00:00`
const START_FORMAT: &[FormatItem<'_>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
);

/// Wire shape of a version 1 object. Unknown keys are ignored.
#[derive(Debug, Deserialize)]
struct RecordV1 {
    start: String,
    res: i64,
    max: u64,
    data: Vec<Option<f64>>,
}

pub(crate) fn encode(series: &FixedWindowSeries) -> Value {
    let data = series
        .data_points()
        .iter()
        .map(|v| v.map_or(Value::Null, Value::from))
        .collect();

    let mut map = Map::with_capacity(5);
    map.insert(KEY_VERSION.to_owned(), Value::from(CURRENT_VERSION));
    map.insert(
        KEY_START_TIME.to_owned(),
        Value::String(format_start(series.start_time())),
    );
    map.insert(
        KEY_RESOLUTION_SECONDS.to_owned(),
        Value::from(series.resolution().as_seconds()),
    );
    map.insert(KEY_MAX_POINTS.to_owned(), Value::from(series.max_points() as u64));
    map.insert(KEY_DATA_POINTS.to_owned(), Value::Array(data));
    Value::Object(map)
}

pub(crate) fn decode(object: &Value) -> Result<FixedWindowSeries> {
    let record = RecordV1::deserialize(object)
        .map_err(|e| SeriesError::MalformedObject(e.to_string()))?;

    let start = parse_start(&record.start)?;
    let resolution = Resolution::from_seconds(record.res)?;
    let max_points = usize::try_from(record.max).map_err(|_| {
        SeriesError::MalformedObject(format!("max out of range: {}", record.max))
    })?;

    FixedWindowSeries::from_parts(start, resolution, max_points, record.data)
}

/// Second precision with an explicit numeric offset. Start times are
/// stored in UTC, so the offset is always `+00:00`.
fn format_start(t: OffsetDateTime) -> String {
    // Every component the description names is present on an OffsetDateTime
    t.to_offset(UtcOffset::UTC)
        .format(START_FORMAT)
        .expect("start format has no components an OffsetDateTime lacks")
}

/// Accepts the encoded form as well as any RFC 3339 timestamp (`Z`,
/// fractional seconds), converting to UTC.
fn parse_start(s: &str) -> Result<OffsetDateTime> {
    OffsetDateTime::parse(s, START_FORMAT)
        .or_else(|_| OffsetDateTime::parse(s, &Rfc3339))
        .map(|t| t.to_offset(UtcOffset::UTC))
        .map_err(|e| SeriesError::MalformedObject(format!("invalid start time {:?}: {}", s, e)))
}
