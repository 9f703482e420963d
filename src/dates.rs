//! Decoding of spreadsheet day-count dates.

use chrono::{Duration, NaiveDate};
use serde_json::Value;

/// Placeholder shown for any attribute the scoring API did not provide.
pub const UNAVAILABLE: &str = "Non disponible";

/// Offset between the upstream day-count and days elapsed since 1900-01-01.
///
/// Day 1 is 1900-01-01 and the source counts a non-existent 1900-02-29.
const DAY_COUNT_OFFSET: i64 = 2;

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Converts a day-count into a `DD/MM/YYYY` string.
///
/// Absent, NaN or out-of-range inputs yield [`UNAVAILABLE`]. Fractional
/// day-counts keep only their whole-day part.
pub fn decode_day_count(value: Option<f64>) -> String {
    let Some(day_count) = value.filter(|v| v.is_finite()) else {
        return UNAVAILABLE.to_string();
    };
    let whole_days = day_count.floor();
    if whole_days.abs() > i32::MAX as f64 {
        return UNAVAILABLE.to_string();
    }

    Duration::try_days(whole_days as i64 - DAY_COUNT_OFFSET)
        .and_then(|offset| epoch().checked_add_signed(offset))
        .map(|date| date.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| UNAVAILABLE.to_string())
}

/// Decodes a day-count carried as a JSON number or numeric string.
pub fn decode_json_day_count(value: Option<&Value>) -> String {
    let day_count = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    decode_day_count(day_count)
}
