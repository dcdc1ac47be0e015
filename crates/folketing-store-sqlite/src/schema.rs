//! SQL schema for the Folketing SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! layout version for future migrations.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS persons (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    name_key    TEXT NOT NULL,   -- lower-cased name, for uniqueness
    party       TEXT NOT NULL,
    party_key   TEXT NOT NULL,   -- lower-cased party, for substring search
    position    TEXT NOT NULL CHECK (position IN ('Minister', 'Formand', 'Kandidat')),
    start_date  TEXT NOT NULL,   -- fixed-width RFC 3339 UTC
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS persons_name_party_position_idx
    ON persons(name, party, position);

-- One person per (case-folded name, position).
CREATE UNIQUE INDEX IF NOT EXISTS persons_name_key_position_idx
    ON persons(name_key, position);

CREATE INDEX IF NOT EXISTS persons_created_idx ON persons(created_at);

PRAGMA user_version = 1;
";
