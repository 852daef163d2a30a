//! Process-wide store handle.
//!
//! # Responsibility
//! - Build the single SQLite connection once at startup from explicit config.
//! - Apply the in-memory fallback policy when the file cannot be opened.
//! - Serialize all access to the connection.
//!
//! # Invariants
//! - At most one caller holds the connection at a time.
//! - A panic while holding the connection does not take the store down.
//! - `mode()` reports `MemoryFallback` whenever data will not survive a restart.

use super::{open_db, open_db_in_memory, DbResult};
use log::{error, info, warn};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// What to do when the configured database file cannot be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Continue with an ephemeral in-memory database.
    #[default]
    InMemory,
    /// Surface the open error to the caller.
    Fail,
}

/// Storage configuration resolved at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Database file path. `None` opens an in-memory database directly.
    pub path: Option<PathBuf>,
    pub fallback: FallbackPolicy,
}

impl StoreConfig {
    /// File-backed config with the default in-memory fallback.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            fallback: FallbackPolicy::default(),
        }
    }

    /// Ephemeral config, mostly useful for tests.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            fallback: FallbackPolicy::default(),
        }
    }
}

/// Effective storage mode after `Store::open`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreMode {
    File(PathBuf),
    /// Requested in-memory storage.
    Memory,
    /// File open failed; running on an in-memory database instead.
    MemoryFallback { requested: PathBuf },
}

impl StoreMode {
    /// Whether data written in this mode survives a process restart.
    pub fn is_persistent(&self) -> bool {
        matches!(self, Self::File(_))
    }
}

/// Cloneable handle to the shared contact database connection.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
    mode: StoreMode,
}

impl Store {
    /// Opens the store described by `config` and ensures the schema.
    ///
    /// # Errors
    /// - Returns the file open error when `config.fallback` is `Fail`.
    /// - Returns the file open error when the in-memory fallback also fails.
    pub fn open(config: &StoreConfig) -> DbResult<Self> {
        let Some(path) = config.path.as_deref() else {
            let conn = open_db_in_memory()?;
            return Ok(Self::from_connection(conn, StoreMode::Memory));
        };

        ensure_parent_dir(path);

        match open_db(path) {
            Ok(conn) => Ok(Self::from_connection(conn, StoreMode::File(path.to_path_buf()))),
            Err(err) if config.fallback == FallbackPolicy::InMemory => {
                error!(
                    "event=store_fallback module=db status=error path={} error={}",
                    path.display(),
                    err
                );
                warn!("event=store_fallback module=db status=degraded mode=memory persistent=false");
                match open_db_in_memory() {
                    Ok(conn) => Ok(Self::from_connection(
                        conn,
                        StoreMode::MemoryFallback {
                            requested: path.to_path_buf(),
                        },
                    )),
                    Err(mem_err) => {
                        error!(
                            "event=store_fallback module=db status=error mode=memory error={}",
                            mem_err
                        );
                        Err(err)
                    }
                }
            }
            Err(err) => Err(err),
        }
    }

    fn from_connection(conn: Connection, mode: StoreMode) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            mode,
        }
    }

    pub fn mode(&self) -> &StoreMode {
        &self.mode
    }

    /// Runs `f` with exclusive access to the connection.
    ///
    /// A panic inside an earlier `f` poisons the lock; the connection itself
    /// stays usable, so the poison is cleared and the call proceeds.
    pub fn with_connection<T, E>(&self, f: impl FnOnce(&Connection) -> Result<T, E>) -> Result<T, E> {
        let guard = match self.conn.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("event=store_lock module=db status=recovered reason=poisoned");
                self.conn.clear_poison();
                poisoned.into_inner()
            }
        };
        f(&guard)
    }
}

fn ensure_parent_dir(path: &Path) {
    let Some(parent) = path.parent() else {
        return;
    };
    if parent.as_os_str().is_empty() || parent.exists() {
        return;
    }
    match std::fs::create_dir_all(parent) {
        Ok(()) => info!(
            "event=db_dir_create module=db status=ok dir={}",
            parent.display()
        ),
        Err(err) => error!(
            "event=db_dir_create module=db status=error dir={} error={}",
            parent.display(),
            err
        ),
    }
}
