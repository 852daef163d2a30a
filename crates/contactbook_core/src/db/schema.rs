//! Contact table schema.
//!
//! # Invariants
//! - `email` carries a `UNIQUE` constraint; it is the only arbiter for
//!   concurrent duplicate inserts.
//! - `AUTOINCREMENT` keeps ids from being reused after deletion.

use crate::db::DbResult;
use rusqlite::Connection;

/// Schema statement applied on every connection bootstrap.
pub const CONTACTS_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS contacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    phone TEXT NOT NULL,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
);";

/// Ensures the `contacts` table exists. Safe to call repeatedly.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(CONTACTS_TABLE_SQL)?;
    Ok(())
}
