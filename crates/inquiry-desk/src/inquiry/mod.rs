//! Inquiry intake and lifecycle: validation, numbering, listing and status
//! changes over an [`InquiryStore`].

pub mod error;
pub mod model;
pub mod numbering;
pub mod service;
pub mod store;

pub use error::InquiryError;
pub use model::{Inquiry, InquiryStatus, NewInquiry, ValidatedInquiry};
pub use numbering::{InquiryNumber, MalformedInquiryNumber, MonthWindow, NumberingStrategy};
pub use service::{
    InquiryPage, InquiryService, ListQuery, Pagination, ServiceSettings, StatusSummary,
};
pub use store::InquiryStore;
