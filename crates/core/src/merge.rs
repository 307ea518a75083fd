//! Field-level merge of a partial property payload into a ledger row.
//!
//! For every schema column the value is taken from, in order:
//!
//! 1. `incoming`, when the key is present and not `null`;
//! 2. `existing`, when it holds a value (not `null`, not `""`);
//! 3. the column default.
//!
//! Three columns are derived rather than merged:
//!
//! - `id` -- the existing id always wins; otherwise the incoming one, which
//!   the caller resolves with [`resolve_id`] before merging.
//! - `type` -- `"sale"`/`"rent"` from a recognized incoming category, else
//!   the existing type, else `"sale"`.
//! - `image` -- legacy mirror of `thumbnail`.
//!
//! Columns outside the schema that exist on the stored row are carried over
//! untouched.

use serde_json::Value;

use crate::error::CoreError;
use crate::types::{EpochMillis, Row};

pub const DEFAULT_CATEGORY: &str = "Sale";
pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_STATUS: &str = "Active";
pub const DEFAULT_TYPE: &str = "sale";
pub const DEFAULT_AGENT_NAME: &str = "System";

/// Status a property moves to when soft-deleted.
pub const STATUS_DELETED: &str = "Deleted";

/// Placeholder id sent by clients creating a new property.
pub const NEW_ID: &str = "new";

const RECOGNIZED_TYPES: &[&str] = &["sale", "rent"];

enum Fallback {
    Text(&'static str),
    Zero,
    False,
}

impl Fallback {
    fn value(&self) -> Value {
        match self {
            Self::Text(s) => Value::String((*s).to_string()),
            Self::Zero => Value::from(0),
            Self::False => Value::Bool(false),
        }
    }
}

struct Field {
    column: &'static str,
    /// Alternative incoming keys accepted for this column.
    aliases: &'static [&'static str],
    fallback: Fallback,
}

const fn field(column: &'static str, fallback: Fallback) -> Field {
    Field {
        column,
        aliases: &[],
        fallback,
    }
}

const FIELDS: &[Field] = &[
    field("title", Fallback::Text("")),
    field("price", Fallback::Text("")),
    field("location", Fallback::Text("")),
    field("beds", Fallback::Zero),
    field("baths", Fallback::Zero),
    Field {
        column: "area_sqm",
        aliases: &["area"],
        fallback: Fallback::Zero,
    },
    field("category", Fallback::Text(DEFAULT_CATEGORY)),
    Field {
        column: "long_desc",
        aliases: &["description"],
        fallback: Fallback::Text(""),
    },
    field("thumbnail", Fallback::Text("")),
    field("amenities", Fallback::Text("")),
    field("currency", Fallback::Text(DEFAULT_CURRENCY)),
    field("agent_name", Fallback::Text(DEFAULT_AGENT_NAME)),
    field("agent_phone", Fallback::Text("")),
    field("featured", Fallback::False),
    field("short_desc", Fallback::Text("")),
    field("status", Fallback::Text(DEFAULT_STATUS)),
];

/// Pick the id for a save request: the requested id unless it is missing,
/// blank or [`NEW_ID`], in which case a fresh timestamp-derived id.
pub fn resolve_id(requested: Option<&str>, now_ms: EpochMillis) -> String {
    match requested.map(str::trim) {
        Some(id) if !id.is_empty() && id != NEW_ID => id.to_string(),
        _ => format!("prop_{now_ms}"),
    }
}

/// The `attempt`-th candidate for a generated id: `base` itself first, then
/// `base_1`, `base_2`, ... for ids already taken in the same millisecond.
pub fn candidate_id(base: &str, attempt: u32) -> String {
    match attempt {
        0 => base.to_string(),
        n => format!("{base}_{n}"),
    }
}

/// Merge `incoming` over `existing`, producing the row to persist.
///
/// Fails only when neither side carries an id.
pub fn merge(existing: Option<&Row>, incoming: &Row) -> Result<Row, CoreError> {
    let id = existing
        .and_then(|row| text(row, "id"))
        .or_else(|| text(incoming, "id").filter(|id| *id != NEW_ID))
        .ok_or_else(|| CoreError::Validation("Property id is required".into()))?
        .to_string();

    let mut out = existing.cloned().unwrap_or_default();
    out.insert("id".into(), Value::String(id));

    for f in FIELDS {
        let value = incoming_value(incoming, f.column, f.aliases)
            .or_else(|| existing.and_then(|row| stored_value(row, f.column)))
            .cloned()
            .unwrap_or_else(|| f.fallback.value());
        out.insert(f.column.into(), value);
    }

    out.insert("type".into(), Value::String(derive_type(existing, incoming)));

    let images = incoming_value(incoming, "images", &[])
        .or_else(|| existing.and_then(|row| stored_value(row, "images")))
        .map(|v| join_gallery(&gallery_entries(v)))
        .unwrap_or_default();
    out.insert("images".into(), Value::String(images));

    let image = text(&out, "thumbnail")
        .or_else(|| text(incoming, "image"))
        .or_else(|| existing.and_then(|row| text(row, "image")))
        .unwrap_or_default()
        .to_string();
    out.insert("image".into(), Value::String(image));

    Ok(out)
}

fn derive_type(existing: Option<&Row>, incoming: &Row) -> String {
    if let Some(category) = incoming.get("category").and_then(Value::as_str) {
        let lower = category.trim().to_lowercase();
        if RECOGNIZED_TYPES.contains(&lower.as_str()) {
            return lower;
        }
    }
    existing
        .and_then(|row| text(row, "type"))
        .unwrap_or(DEFAULT_TYPE)
        .to_string()
}

fn incoming_value<'a>(row: &'a Row, column: &str, aliases: &[&str]) -> Option<&'a Value> {
    std::iter::once(column)
        .chain(aliases.iter().copied())
        .find_map(|key| row.get(key).filter(|v| !v.is_null()))
}

fn stored_value<'a>(row: &'a Row, column: &str) -> Option<&'a Value> {
    row.get(column).filter(|v| has_value(v))
}

fn has_value(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Non-empty string cell.
fn text<'a>(row: &'a Row, column: &str) -> Option<&'a str> {
    row.get(column)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Decode a gallery cell or payload into its ordered, non-empty entries.
///
/// Accepts a JSON array, a JSON-array string (legacy rows), or a
/// comma-joined string.
pub fn gallery_entries(value: &Value) -> Vec<String> {
    let raw: Vec<String> = match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Value::String(s) if s.trim_start().starts_with('[') => {
            serde_json::from_str(s).unwrap_or_default()
        }
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };
    raw.into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn join_gallery(entries: &[String]) -> String {
    entries.join(",")
}
