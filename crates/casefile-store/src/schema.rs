//! Progress store database schema.

/// SQL to create the progress records table.
pub const CREATE_PROGRESS_RECORDS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS progress_records (
    record_key  TEXT PRIMARY KEY NOT NULL,
    payload     TEXT NOT NULL,
    saved_at    TEXT NOT NULL
);
";
