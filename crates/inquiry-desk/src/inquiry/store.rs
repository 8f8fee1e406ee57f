//! The record store seam and its SQLite implementation.

use chrono::{DateTime, Utc};

use super::model::{Inquiry, InquiryStatus};
use super::numbering::InquiryNumber;
use crate::clock::{format_timestamp, parse_timestamp};
use crate::db::inquiry_repo::{self, InquiryFilter, InquiryRow};
use crate::db::{sequence_repo, Database, DatabaseError};

/// Persistence operations the inquiry service depends on.
///
/// Implementations must be safe to share between request handlers.
pub trait InquiryStore: Send + Sync {
    /// Inserts a new record. A taken `inquiry_no` must be reported as
    /// [`DatabaseError::UniqueViolation`] on column `inquiry_no`.
    fn insert(&self, inquiry: &Inquiry) -> Result<(), DatabaseError>;

    fn find_by_id(&self, id: &str) -> Result<Option<Inquiry>, DatabaseError>;

    /// Returns one page of matching records, newest first, and the total
    /// number of matches.
    fn query(&self, filter: &InquiryFilter) -> Result<(Vec<Inquiry>, u64), DatabaseError>;

    /// Counts records created in `[from, until)`.
    fn count_created_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<u64, DatabaseError>;

    /// Atomically increments and returns the counter for `period`.
    fn next_sequence(&self, period: &str) -> Result<u32, DatabaseError>;

    /// Sets the status. Returns `None` if no record has that ID.
    fn update_status(
        &self,
        id: &str,
        status: InquiryStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Inquiry>, DatabaseError>;

    /// Returns false if no record has that ID.
    fn delete(&self, id: &str) -> Result<bool, DatabaseError>;

    fn count_by_status(&self) -> Result<Vec<(InquiryStatus, u64)>, DatabaseError>;
}

impl From<&Inquiry> for InquiryRow {
    fn from(inquiry: &Inquiry) -> Self {
        Self {
            id: inquiry.id.clone(),
            inquiry_no: inquiry.inquiry_no.clone(),
            name: inquiry.name.clone(),
            phone: inquiry.phone.clone(),
            email: inquiry.email.clone(),
            address: inquiry.address.clone(),
            comment: inquiry.comment.clone(),
            status: inquiry.status.as_str().to_string(),
            created_at: format_timestamp(inquiry.created_at),
            updated_at: format_timestamp(inquiry.updated_at),
        }
    }
}

impl TryFrom<InquiryRow> for Inquiry {
    type Error = DatabaseError;

    fn try_from(row: InquiryRow) -> Result<Self, Self::Error> {
        let invalid = |reason: String| DatabaseError::InvalidRow {
            id: row.id.clone(),
            reason,
        };
        row.inquiry_no
            .parse::<InquiryNumber>()
            .map_err(|e| invalid(e.to_string()))?;
        let status = row
            .status
            .parse::<InquiryStatus>()
            .map_err(|e| invalid(e.to_string()))?;
        let created_at = parse_timestamp(&row.created_at)
            .map_err(|e| invalid(format!("created_at '{}': {}", row.created_at, e)))?;
        let updated_at = parse_timestamp(&row.updated_at)
            .map_err(|e| invalid(format!("updated_at '{}': {}", row.updated_at, e)))?;

        Ok(Inquiry {
            id: row.id,
            inquiry_no: row.inquiry_no,
            name: row.name,
            phone: row.phone,
            email: row.email,
            address: row.address,
            comment: row.comment,
            status,
            created_at,
            updated_at,
        })
    }
}

impl InquiryStore for Database {
    fn insert(&self, inquiry: &Inquiry) -> Result<(), DatabaseError> {
        inquiry_repo::insert(self, &InquiryRow::from(inquiry))
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Inquiry>, DatabaseError> {
        inquiry_repo::find_by_id(self, id)?
            .map(Inquiry::try_from)
            .transpose()
    }

    fn query(&self, filter: &InquiryFilter) -> Result<(Vec<Inquiry>, u64), DatabaseError> {
        let (rows, total) = inquiry_repo::query(self, filter)?;
        let inquiries = rows
            .into_iter()
            .map(Inquiry::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((inquiries, total))
    }

    fn count_created_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<u64, DatabaseError> {
        inquiry_repo::count_created_between(self, &format_timestamp(from), &format_timestamp(until))
    }

    fn next_sequence(&self, period: &str) -> Result<u32, DatabaseError> {
        sequence_repo::next_value(self, period)
    }

    fn update_status(
        &self,
        id: &str,
        status: InquiryStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Inquiry>, DatabaseError> {
        inquiry_repo::update_status(self, id, status.as_str(), &format_timestamp(updated_at))?
            .map(Inquiry::try_from)
            .transpose()
    }

    fn delete(&self, id: &str) -> Result<bool, DatabaseError> {
        inquiry_repo::delete(self, id)
    }

    fn count_by_status(&self) -> Result<Vec<(InquiryStatus, u64)>, DatabaseError> {
        inquiry_repo::count_by_status(self)?
            .into_iter()
            .map(|(status, count)| {
                status
                    .parse::<InquiryStatus>()
                    .map(|s| (s, count))
                    .map_err(|e| DatabaseError::InvalidRow {
                        id: format!("status={}", status),
                        reason: e.to_string(),
                    })
            })
            .collect()
    }
}
