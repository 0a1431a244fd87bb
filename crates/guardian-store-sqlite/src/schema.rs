//! SQL schema for the guardian SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS parents (
    parent_id     TEXT PRIMARY KEY,
    full_name     TEXT NOT NULL,
    email         TEXT UNIQUE,               -- NULLs never collide
    phone_primary TEXT NOT NULL UNIQUE,      -- canonical E.164
    phone_alt     TEXT,
    is_active     INTEGER NOT NULL DEFAULT 1,
    is_staff      INTEGER NOT NULL DEFAULT 0,
    is_superuser  INTEGER NOT NULL DEFAULT 0,
    date_joined   TEXT NOT NULL,             -- RFC 3339 UTC
    last_login    TEXT,
    notes         TEXT,
    password      TEXT,                      -- PHC string; NULL = unusable
    permissions   TEXT NOT NULL DEFAULT '[]',
    CHECK (phone_primary <> '')
);

CREATE INDEX IF NOT EXISTS parents_joined_idx ON parents(date_joined);

PRAGMA user_version = 1;
";
