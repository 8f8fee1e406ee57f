//! Schema upgrades keyed on SQLite's `user_version`.
//!
//! Step `n` moves the schema from version `n - 1` to `n`. Each step and its
//! version bump commit together, so a failed step leaves the previous
//! version in place.

use rusqlite::Connection;

use super::error::DatabaseError;

struct Step {
    name: &'static str,
    sql: &'static str,
}

/// Ordered schema steps. The index plus one is the version a step produces.
const STEPS: &[Step] = &[
    Step {
        name: "inquiries",
        sql: include_str!("sql/001_create_inquiries.sql"),
    },
    Step {
        name: "inquiry_sequences",
        sql: include_str!("sql/002_create_inquiry_sequences.sql"),
    },
];

/// Version a fully migrated database reports.
pub const LATEST_VERSION: u32 = STEPS.len() as u32;

pub fn schema_version(conn: &Connection) -> Result<u32, DatabaseError> {
    Ok(conn.query_row("PRAGMA user_version", [], |r| r.get(0))?)
}

/// Brings the schema up to [`LATEST_VERSION`] and returns it.
///
/// A database written by a newer build is refused rather than opened with
/// tables this build does not know.
pub fn migrate(conn: &Connection) -> Result<u32, DatabaseError> {
    let found = schema_version(conn)?;
    if found > LATEST_VERSION {
        return Err(DatabaseError::UnsupportedSchema {
            found,
            supported: LATEST_VERSION,
        });
    }

    for (version, step) in (1..).zip(STEPS).skip(found as usize) {
        log::info!("Upgrading schema to v{}: {}", version, step.name);
        apply(conn, version, step).map_err(|e| DatabaseError::Migration {
            version,
            reason: e.to_string(),
        })?;
    }

    Ok(LATEST_VERSION)
}

fn apply(conn: &Connection, version: u32, step: &Step) -> rusqlite::Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(step.sql)?;
    tx.pragma_update(None, "user_version", version)?;
    tx.commit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_exists(conn: &Connection, table: &str) -> bool {
        conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |r| r.get::<_, u32>(0),
        )
        .map(|n| n == 1)
        .unwrap_or(false)
    }

    #[test]
    fn test_fresh_db_reaches_latest_version() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(schema_version(&conn).unwrap(), 0);

        assert_eq!(migrate(&conn).unwrap(), LATEST_VERSION);
        assert_eq!(schema_version(&conn).unwrap(), LATEST_VERSION);
        assert!(table_exists(&conn, "inquiries"));
        assert!(table_exists(&conn, "inquiry_sequences"));
    }

    #[test]
    fn test_migrate_twice_is_a_no_op() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), LATEST_VERSION);
    }

    #[test]
    fn test_partial_schema_resumes_from_its_version() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(STEPS[0].sql).unwrap();
        conn.pragma_update(None, "user_version", 1).unwrap();

        migrate(&conn).unwrap();
        assert!(table_exists(&conn, "inquiry_sequences"));
    }

    #[test]
    fn test_newer_schema_is_refused() {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "user_version", LATEST_VERSION + 1)
            .unwrap();

        match migrate(&conn) {
            Err(DatabaseError::UnsupportedSchema { found, supported }) => {
                assert_eq!(found, LATEST_VERSION + 1);
                assert_eq!(supported, LATEST_VERSION);
            }
            other => panic!("expected UnsupportedSchema, got {other:?}"),
        }
        assert!(!table_exists(&conn, "inquiries"));
    }

    #[test]
    fn test_failed_step_keeps_previous_version() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(STEPS[0].sql).unwrap();
        conn.pragma_update(None, "user_version", 1).unwrap();
        // An index holding the name makes step 2's CREATE TABLE fail.
        conn.execute_batch("CREATE INDEX inquiry_sequences ON inquiries(name)")
            .unwrap();

        let err = migrate(&conn).unwrap_err();
        assert!(matches!(err, DatabaseError::Migration { version: 2, .. }), "{err:?}");
        assert_eq!(schema_version(&conn).unwrap(), 1);
    }

    #[test]
    fn test_status_check_constraint_rejects_unknown_status() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO inquiries (id, inquiry_no, name, phone, email, address, status, created_at, updated_at)
             VALUES ('x', 'INQ-20260101-0001', 'A', '1', 'a@b.c', 'X', 'Shipped', 't', 't')",
            [],
        );
        assert!(result.is_err());
    }
}
