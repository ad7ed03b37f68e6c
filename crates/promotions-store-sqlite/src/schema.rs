//! SQL schema for the promotions SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS promotions (
    id             TEXT PRIMARY KEY,   -- hyphenated UUID v4; server-assigned
    title          TEXT NOT NULL CHECK (title != ''),
    promotion_type TEXT NOT NULL,
    start_date     TEXT NOT NULL,      -- RFC 3339 UTC
    end_date       TEXT NOT NULL,      -- RFC 3339 UTC
    active         INTEGER NOT NULL CHECK (active IN (0, 1))
);

CREATE INDEX IF NOT EXISTS promotions_title_idx    ON promotions(title COLLATE NOCASE);
CREATE INDEX IF NOT EXISTS promotions_type_idx     ON promotions(promotion_type);
CREATE INDEX IF NOT EXISTS promotions_active_idx   ON promotions(active);
CREATE INDEX IF NOT EXISTS promotions_end_date_idx ON promotions(end_date);

PRAGMA user_version = 1;
";
