//! Inquiry record, status lifecycle and intake input.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::InquiryError;

/// Lifecycle stage of an inquiry.
///
/// Any status may move to any other; Delivered and Cancelled are terminal by
/// convention only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InquiryStatus {
    #[default]
    Placed,
    Ready,
    Delivered,
    Cancelled,
}

impl InquiryStatus {
    pub const ALL: [InquiryStatus; 4] = [
        InquiryStatus::Placed,
        InquiryStatus::Ready,
        InquiryStatus::Delivered,
        InquiryStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryStatus::Placed => "Placed",
            InquiryStatus::Ready => "Ready",
            InquiryStatus::Delivered => "Delivered",
            InquiryStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InquiryStatus {
    type Err = InquiryError;

    /// Exact, case-sensitive match against the four status names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InquiryStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| InquiryError::InvalidStatus {
                value: s.to_string(),
            })
    }
}

/// A persisted customer inquiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub id: String,
    pub inquiry_no: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub comment: String,
    pub status: InquiryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Intake form payload. Every field is optional at the wire level so that
/// missing fields are reported as validation errors, not parse errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewInquiry {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub comment: Option<String>,
}

/// Intake input that passed validation, normalized for storage.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInquiry {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub comment: String,
}

impl NewInquiry {
    /// Trims the required fields, lower-cases the email and checks that
    /// none of name, phone, email, address is empty.
    pub fn validate(self) -> Result<ValidatedInquiry, InquiryError> {
        fn required(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        let name = required(self.name);
        let phone = required(self.phone);
        let email = required(self.email).map(|e| e.to_lowercase());
        let address = required(self.address);

        let mut missing = Vec::new();
        if name.is_none() {
            missing.push("name");
        }
        if phone.is_none() {
            missing.push("phone");
        }
        if email.is_none() {
            missing.push("email");
        }
        if address.is_none() {
            missing.push("address");
        }

        match (name, phone, email, address) {
            (Some(name), Some(phone), Some(email), Some(address)) => Ok(ValidatedInquiry {
                name,
                phone,
                email,
                address,
                comment: self.comment.unwrap_or_default(),
            }),
            _ => Err(InquiryError::MissingFields { fields: missing }),
        }
    }
}
