//! Database error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// SQLite error from rusqlite.
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    /// A `UNIQUE` constraint rejected a write. `constraint` carries the
    /// column reference as reported by SQLite, e.g. `inquiries.inquiry_no`.
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    /// A stored row could not be mapped back into a domain value.
    #[error("Invalid row '{id}': {reason}")]
    InvalidRow { id: String, reason: String },

    /// IO error when creating directories or files.
    #[error("IO error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A migration failed to apply.
    #[error("Migration failed at version {version}: {reason}")]
    Migration { version: u32, reason: String },

    /// The file was written by a newer schema than this build knows.
    #[error("Database schema v{found} is newer than supported v{supported}")]
    UnsupportedSchema { found: u32, supported: u32 },

    /// The database lock was poisoned.
    #[error("Database lock poisoned")]
    LockPoisoned,
}

impl DatabaseError {
    /// Returns true if this is a uniqueness violation on the given column.
    pub fn is_unique_violation_on(&self, column: &str) -> bool {
        match self {
            DatabaseError::UniqueViolation { constraint } => constraint
                .split(',')
                .any(|c| c.trim().rsplit('.').next() == Some(column)),
            _ => false,
        }
    }
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(ref code, Some(ref message)) = err {
            if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
                let constraint = message
                    .strip_prefix("UNIQUE constraint failed: ")
                    .unwrap_or(message)
                    .to_string();
                return DatabaseError::UniqueViolation { constraint };
            }
        }
        DatabaseError::Sqlite(err)
    }
}
