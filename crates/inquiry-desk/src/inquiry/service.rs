use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use super::error::InquiryError;
use super::model::{Inquiry, InquiryStatus, NewInquiry, ValidatedInquiry};
use super::numbering::NumberingStrategy;
use super::store::InquiryStore;
use crate::clock::{to_storage_precision, Clock, SystemClock};
use crate::config::Config;
use crate::db::inquiry_repo::InquiryFilter;
use crate::db::Database;
use crate::sanitize;

/// Total attempts for a creation whose inquiry number collides: the first
/// try plus exactly one retry with a recomputed number.
const CREATE_ATTEMPTS: u32 = 2;

/// Status filter values that mean "no status filter".
const ALL_STATUS_SENTINELS: &[&str] = &["All Status", "all", "All"];

/// Tunables the service reads from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSettings {
    pub numbering: NumberingStrategy,
    pub default_limit: u32,
    pub max_limit: u32,
}

impl ServiceSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            numbering: config.numbering.strategy,
            default_limit: config.pagination.default_limit,
            max_limit: config.pagination.max_limit,
        }
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            numbering: NumberingStrategy::default(),
            default_limit: 10,
            max_limit: 100,
        }
    }
}

/// Listing parameters as received from the dashboard.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ListQuery {
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u64,
    pub total_records: u64,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InquiryPage {
    pub inquiries: Vec<Inquiry>,
    pub pagination: Pagination,
}

/// Record counts per status, as shown on the dashboard's stat cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSummary {
    pub total: u64,
    pub placed: u64,
    pub ready: u64,
    pub delivered: u64,
    pub cancelled: u64,
}

/// Orchestrates validation, numbering and persistence of inquiries.
pub struct InquiryService<S = Database, C = SystemClock> {
    store: S,
    clock: C,
    settings: ServiceSettings,
}

impl<S: InquiryStore, C: Clock> InquiryService<S, C> {
    pub fn new(store: S, clock: C, settings: ServiceSettings) -> Self {
        Self {
            store,
            clock,
            settings,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates and persists a new inquiry with status Placed and a freshly
    /// assigned inquiry number.
    ///
    /// A collision on the inquiry number is retried once with a recomputed
    /// number; a second collision is returned as
    /// [`InquiryError::NumberConflict`].
    pub fn create(&self, input: NewInquiry) -> Result<Inquiry, InquiryError> {
        let _span = info_span!("inquiry.create").entered();
        let validated = input.validate()?;

        let mut attempt = 1;
        loop {
            let inquiry = self.build(&validated)?;
            match self.store.insert(&inquiry) {
                Ok(()) => {
                    info!(
                        inquiry_no = %inquiry.inquiry_no,
                        email = %sanitize::mask_email(&inquiry.email),
                        phone = %sanitize::mask_phone(&inquiry.phone),
                        "Inquiry created"
                    );
                    return Ok(inquiry);
                }
                Err(e) if e.is_unique_violation_on("inquiry_no") => {
                    if attempt >= CREATE_ATTEMPTS {
                        warn!(
                            inquiry_no = %inquiry.inquiry_no,
                            attempt,
                            "Inquiry number still taken after retry"
                        );
                        return Err(InquiryError::NumberConflict {
                            inquiry_no: inquiry.inquiry_no,
                        });
                    }
                    warn!(
                        inquiry_no = %inquiry.inquiry_no,
                        attempt,
                        "Inquiry number already taken, retrying"
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn build(&self, validated: &ValidatedInquiry) -> Result<Inquiry, InquiryError> {
        let now = to_storage_precision(self.clock.now());
        let number = self.settings.numbering.next_number(&self.store, now)?;

        Ok(Inquiry {
            id: Uuid::new_v4().to_string(),
            inquiry_no: number.to_string(),
            name: validated.name.clone(),
            phone: validated.phone.clone(),
            email: validated.email.clone(),
            address: validated.address.clone(),
            comment: validated.comment.clone(),
            status: InquiryStatus::Placed,
            created_at: now,
            updated_at: now,
        })
    }

    /// Returns one page of inquiries, newest first.
    ///
    /// `status` and `search` are trimmed first. A blank search means no
    /// search; a blank status or an "all" sentinel means no status filter.
    pub fn list(&self, query: &ListQuery) -> Result<InquiryPage, InquiryError> {
        let _span = info_span!("inquiry.list").entered();

        let status = match query.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) if ALL_STATUS_SENTINELS.contains(&s) => None,
            Some(s) => Some(s.parse::<InquiryStatus>()?),
        };
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        let page = query.page.unwrap_or(1);
        if page == 0 {
            return Err(InquiryError::InvalidPagination(
                "page must be at least 1".to_string(),
            ));
        }
        let limit = match query.limit {
            Some(0) => {
                return Err(InquiryError::InvalidPagination(
                    "limit must be at least 1".to_string(),
                ))
            }
            Some(l) => l.min(self.settings.max_limit),
            None => self.settings.default_limit,
        };

        let filter = InquiryFilter {
            status: status.map(|s| s.as_str().to_string()),
            search,
            limit: Some(u64::from(limit)),
            offset: Some(u64::from(page - 1) * u64::from(limit)),
        };
        let (inquiries, total) = self.store.query(&filter)?;

        debug!(
            total,
            page,
            limit,
            returned = inquiries.len(),
            "Listed inquiries"
        );

        Ok(InquiryPage {
            inquiries,
            pagination: Pagination {
                current_page: page,
                total_pages: total.div_ceil(u64::from(limit)),
                total_records: total,
                limit,
            },
        })
    }

    pub fn get_by_id(&self, id: &str) -> Result<Inquiry, InquiryError> {
        self.store
            .find_by_id(id)?
            .ok_or_else(|| InquiryError::NotFound { id: id.to_string() })
    }

    /// Moves an inquiry to `status`. Any transition between the four
    /// statuses is allowed.
    pub fn update_status(&self, id: &str, status: &str) -> Result<Inquiry, InquiryError> {
        let _span = info_span!("inquiry.update_status").entered();
        let status: InquiryStatus = status.parse()?;

        let now = to_storage_precision(self.clock.now());
        let updated = self
            .store
            .update_status(id, status, now)?
            .ok_or_else(|| InquiryError::NotFound { id: id.to_string() })?;

        info!(inquiry_no = %updated.inquiry_no, status = %status, "Inquiry status updated");
        Ok(updated)
    }

    pub fn delete(&self, id: &str) -> Result<(), InquiryError> {
        let _span = info_span!("inquiry.delete").entered();
        if !self.store.delete(id)? {
            return Err(InquiryError::NotFound { id: id.to_string() });
        }
        info!(id, "Inquiry deleted");
        Ok(())
    }

    pub fn status_summary(&self) -> Result<StatusSummary, InquiryError> {
        let mut summary = StatusSummary::default();
        for (status, count) in self.store.count_by_status()? {
            summary.total += count;
            match status {
                InquiryStatus::Placed => summary.placed = count,
                InquiryStatus::Ready => summary.ready = count,
                InquiryStatus::Delivered => summary.delivered = count,
                InquiryStatus::Cancelled => summary.cancelled = count,
            }
        }
        Ok(summary)
    }
}
