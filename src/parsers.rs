//! Decoders for the string-encoded fields of a [`ProductRecord`](crate::ProductRecord).
//!
//! None of these functions fail: malformed input degrades to an empty or
//! partial result and the condition is logged.

use crate::schema::SalesPoint;
use crate::utils::parse_day;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("valid ISO date pattern"));

static DECIMAL_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(\.\d+)?").expect("valid decimal pattern"));

/// Decodes the `Weekly_Sales` JSON payload into dated quantities.
///
/// Dates are truncated to the day. Each entry is read on its own: one with
/// an unreadable date or a non-numeric `CANTIDAD` is skipped, a missing
/// `CANTIDAD` counts as zero. A payload that is not a JSON array yields
/// nothing.
pub fn parse_weekly_sales(raw: &str) -> Vec<SalesPoint> {
    if raw.trim().is_empty() {
        return Vec::new();
    }

    let entries: Vec<Value> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Failed to parse weekly sales payload: {}", e);
            return Vec::new();
        }
    };

    entries.iter().filter_map(weekly_sale).collect()
}

fn weekly_sale(entry: &Value) -> Option<SalesPoint> {
    let Some(raw_date) = entry.get("Date").and_then(Value::as_str) else {
        warn!("Skipping weekly sale without a Date: {}", entry);
        return None;
    };
    let Some(date) = parse_day(raw_date) else {
        warn!("Skipping weekly sale with unreadable date '{}'", raw_date);
        return None;
    };

    let quantity = match entry.get("CANTIDAD") {
        None => 0.0,
        Some(Value::Number(n)) => n.as_f64()?,
        Some(Value::String(text)) => match text.trim().parse::<f64>() {
            Ok(q) => q,
            Err(_) => {
                warn!("Skipping weekly sale on {}: CANTIDAD '{}' is not a number", date, text);
                return None;
            }
        },
        Some(other) => {
            warn!("Skipping weekly sale on {}: CANTIDAD is {}", date, other);
            return None;
        }
    };

    Some(SalesPoint { date, quantity })
}

/// Every `YYYY-MM-DD` token in `raw`, in order of appearance.
pub fn parse_forecast_dates(raw: &str) -> Vec<String> {
    ISO_DATE
        .find_iter(raw)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Every unsigned decimal number in `raw`, in order of appearance.
pub fn parse_forecast_values(raw: &str) -> Vec<f64> {
    DECIMAL_NUMBER
        .find_iter(raw)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect()
}

/// Display form of a possibly JSON-encoded text field.
///
/// Arrays are joined with `", "`, JSON strings are unwrapped, other JSON
/// scalars are rendered as-is. Anything that is not valid JSON is returned
/// verbatim.
pub fn decode_display_field(raw: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(items)) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        Ok(serde_json::Value::String(text)) => text,
        Ok(serde_json::Value::Null) | Err(_) => raw.to_string(),
        Ok(other) => other.to_string(),
    }
}

/// Plain-text rendering of a JSON value: strings without quotes, null empty.
pub fn display_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
