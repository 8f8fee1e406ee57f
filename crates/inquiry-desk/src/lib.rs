pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod inquiry;
pub mod sanitize;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{load_config, load_from_env, Config};
pub use db::{Database, DatabaseError};
pub use error::{ConfigError, InquiryDeskError};
pub use inquiry::{
    Inquiry, InquiryError, InquiryService, InquiryStatus, InquiryStore, ListQuery, NewInquiry,
    NumberingStrategy, ServiceSettings, StatusSummary,
};
