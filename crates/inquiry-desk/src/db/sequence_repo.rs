//! Per-period sequence counters backing inquiry numbering.

use rusqlite::params;

use super::{Database, DatabaseError};

/// Atomically increments the counter for `period` and returns the new value.
///
/// The first call for a period returns 1. Uses UPSERT with `RETURNING`, so
/// the read and the increment are a single statement.
pub fn next_value(db: &Database, period: &str) -> Result<u32, DatabaseError> {
    db.with_conn(|conn| {
        let value: u32 = conn.query_row(
            "INSERT INTO inquiry_sequences (period, last_value) VALUES (?1, 1)
             ON CONFLICT(period) DO UPDATE SET last_value = last_value + 1
             RETURNING last_value",
            params![period],
            |r| r.get(0),
        )?;
        Ok(value)
    })
}
