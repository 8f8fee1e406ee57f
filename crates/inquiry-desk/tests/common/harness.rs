//! Test harness for isolated service execution.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use inquiry_desk::clock::FixedClock;
use inquiry_desk::db::inquiry_repo::InquiryFilter;
use inquiry_desk::db::{Database, DatabaseError};
use inquiry_desk::inquiry::{
    Inquiry, InquiryService, InquiryStatus, InquiryStore, NumberingStrategy, ServiceSettings,
};

/// The instant every harness clock starts at.
pub fn start_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap()
}

/// A service over a file-backed database in its own temp directory.
pub struct TestHarness {
    temp_dir: TempDir,
    pub db_path: PathBuf,
    pub db: Database,
    pub clock: Arc<FixedClock>,
    pub service: InquiryService<Database, Arc<FixedClock>>,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_strategy(NumberingStrategy::MonthlyCounter)
    }

    pub fn with_strategy(strategy: NumberingStrategy) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("data").join("inquiry-desk.db");
        let db = Database::open(&db_path).expect("Failed to open database");
        let clock = Arc::new(FixedClock::new(start_instant()));
        let settings = ServiceSettings {
            numbering: strategy,
            ..Default::default()
        };
        let service = InquiryService::new(db.clone(), clock.clone(), settings);

        Self {
            temp_dir,
            db_path,
            db,
            clock,
            service,
        }
    }

    /// Opens a second, independent handle on the same database file.
    pub fn reopen(&self) -> Database {
        Database::open(&self.db_path).expect("Failed to reopen database")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Wraps a store and rejects the next `collisions` inserts as if their
/// inquiry number were already taken.
pub struct FlakyStore {
    inner: Database,
    collisions: AtomicU32,
    insert_attempts: AtomicU32,
}

impl FlakyStore {
    pub fn new(inner: Database, collisions: u32) -> Self {
        Self {
            inner,
            collisions: AtomicU32::new(collisions),
            insert_attempts: AtomicU32::new(0),
        }
    }

    pub fn insert_attempts(&self) -> u32 {
        self.insert_attempts.load(Ordering::SeqCst)
    }
}

impl InquiryStore for FlakyStore {
    fn insert(&self, inquiry: &Inquiry) -> Result<(), DatabaseError> {
        self.insert_attempts.fetch_add(1, Ordering::SeqCst);
        let collide = self
            .collisions
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if collide {
            return Err(DatabaseError::UniqueViolation {
                constraint: "inquiries.inquiry_no".to_string(),
            });
        }
        self.inner.insert(inquiry)
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Inquiry>, DatabaseError> {
        self.inner.find_by_id(id)
    }

    fn query(&self, filter: &InquiryFilter) -> Result<(Vec<Inquiry>, u64), DatabaseError> {
        self.inner.query(filter)
    }

    fn count_created_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<u64, DatabaseError> {
        self.inner.count_created_between(from, until)
    }

    fn next_sequence(&self, period: &str) -> Result<u32, DatabaseError> {
        self.inner.next_sequence(period)
    }

    fn update_status(
        &self,
        id: &str,
        status: InquiryStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Inquiry>, DatabaseError> {
        self.inner.update_status(id, status, updated_at)
    }

    fn delete(&self, id: &str) -> Result<bool, DatabaseError> {
        self.inner.delete(id)
    }

    fn count_by_status(&self) -> Result<Vec<(InquiryStatus, u64)>, DatabaseError> {
        self.inner.count_by_status()
    }
}
