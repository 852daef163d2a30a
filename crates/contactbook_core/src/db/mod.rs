//! SQLite storage bootstrap and the shared `Store` handle.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the contact book.
//! - Ensure the `contacts` table exists before any read/write.
//! - Own the process-wide connection behind an explicit `Store`.
//!
//! # Invariants
//! - Schema setup is a single idempotent `CREATE TABLE IF NOT EXISTS`.
//! - Core code must not read/write contacts before the schema statement succeeds.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;
mod store;

pub use open::{open_db, open_db_in_memory};
pub use store::{FallbackPolicy, Store, StoreConfig, StoreMode};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
