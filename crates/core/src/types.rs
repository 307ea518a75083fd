/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Milliseconds since the Unix epoch, as carried in session tokens and the
/// ledger's `token_expiry` column.
pub type EpochMillis = i64;

/// One ledger row: column name to cell value.
pub type Row = serde_json::Map<String, serde_json::Value>;
