use thiserror::Error;

use crate::db::DatabaseError;

/// Errors surfaced by [`InquiryService`](super::InquiryService) operations.
#[derive(Error, Debug)]
pub enum InquiryError {
    #[error("Missing required fields: {}", fields.join(", "))]
    MissingFields { fields: Vec<&'static str> },

    #[error("Invalid status '{value}', expected one of Placed, Ready, Delivered, Cancelled")]
    InvalidStatus { value: String },

    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("Inquiry not found: {id}")]
    NotFound { id: String },

    /// The generated inquiry number collided again after the single retry.
    #[error("Inquiry number {inquiry_no} already exists")]
    NumberConflict { inquiry_no: String },

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl InquiryError {
    /// True for errors caused by the caller's input rather than the store.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            InquiryError::MissingFields { .. }
                | InquiryError::InvalidStatus { .. }
                | InquiryError::InvalidPagination(_)
        )
    }
}
