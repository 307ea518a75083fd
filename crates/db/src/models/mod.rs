//! Typed views over ledger rows.
//!
//! Cells are loosely typed (a spreadsheet heritage): ids may be numbers,
//! flags may be `"TRUE"`, timestamps may be RFC 3339 strings or epoch
//! milliseconds. The helpers here absorb those variations.

pub mod lead;
pub mod property;
pub mod user;

use chrono::{DateTime, TimeZone, Utc};
use estate_core::types::{EpochMillis, Row, Timestamp};
use serde_json::Value;

/// String cell; numbers are rendered, anything else is `""`.
pub fn cell_text(row: &Row, column: &str) -> String {
    match row.get(column) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Non-empty string cell.
pub fn cell_opt_text(row: &Row, column: &str) -> Option<String> {
    Some(cell_text(row, column)).filter(|s| !s.is_empty())
}

pub fn cell_bool(row: &Row, column: &str) -> bool {
    match row.get(column) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        _ => false,
    }
}

pub fn cell_i64(row: &Row, column: &str) -> Option<i64> {
    match row.get(column)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Timestamp cell: RFC 3339 string or epoch milliseconds.
pub fn cell_timestamp(row: &Row, column: &str) -> Option<Timestamp> {
    match row.get(column)? {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(from_millis),
        _ => None,
    }
}

fn from_millis(ms: EpochMillis) -> Option<Timestamp> {
    Utc.timestamp_millis_opt(ms).single()
}

/// Render a timestamp the way lock columns store it.
pub fn timestamp_cell(at: Timestamp) -> Value {
    Value::String(at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
}
