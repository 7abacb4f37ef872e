//! SQL schema for the local storage database.

/// Idempotent DDL run on every open.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Values are opaque strings; callers pick their own encoding.
CREATE TABLE IF NOT EXISTS local_storage (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

PRAGMA user_version = 1;
";
