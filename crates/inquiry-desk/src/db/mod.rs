//! SQLite storage for inquiries and their number sequences.
//!
//! One connection per process, shared behind a mutex. Every connection is
//! prepared the same way: a busy timeout, the search functions from
//! [`search`], and the schema upgraded to [`migrations::LATEST_VERSION`].

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rusqlite::Connection;

pub mod error;
pub mod inquiry_repo;
pub mod migrations;
pub mod search;
pub mod sequence_repo;

pub use error::DatabaseError;

/// How long a statement waits on a lock held by another process.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared handle to the inquiry store. Clones use the same connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Opens `path`, creating the file and its parent directories if needed.
    ///
    /// File databases run in WAL mode with `synchronous=NORMAL`.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| DatabaseError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let conn = Connection::open(path)?;
        let _mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |r| r.get(0))?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        let version = prepare(&conn)?;

        log::info!("Database opened at {} (schema v{})", path.display(), version);

        Ok(Self::from_connection(conn))
    }

    /// Private in-memory database, used by tests and throwaway runs.
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        prepare(&conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `f` with the connection locked.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, DatabaseError>
    where
        F: FnOnce(&Connection) -> Result<T, DatabaseError>,
    {
        let conn = self.conn.lock().map_err(|_| DatabaseError::LockPoisoned)?;
        f(&conn)
    }
}

fn prepare(conn: &Connection) -> Result<u32, DatabaseError> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    search::register(conn)?;
    migrations::migrate(conn)
}

/// Returns the canonical database path: `~/.inquiry-desk/data/inquiry-desk.db`.
pub fn default_database_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| {
        h.join(".inquiry-desk")
            .join("data")
            .join("inquiry-desk.db")
    })
}
