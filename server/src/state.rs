//! Shared state handed to every request handler.

use std::sync::Arc;

use inquiry_desk::inquiry::{InquiryError, InquiryService, ServiceSettings};
use inquiry_desk::{Clock, Config, Database};

use crate::response::ApiError;

pub type DeskService = InquiryService<Database, Arc<dyn Clock>>;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DeskService>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, db: Database, clock: Arc<dyn Clock>) -> Self {
        let settings = ServiceSettings::from_config(&config);
        Self {
            service: Arc::new(InquiryService::new(db, clock, settings)),
            config: Arc::new(config),
        }
    }

    /// Runs a service call on the blocking pool; every call ends in a
    /// SQLite round trip.
    pub async fn run<F, T>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&DeskService) -> Result<T, InquiryError> + Send + 'static,
        T: Send + 'static,
    {
        let service = Arc::clone(&self.service);
        tokio::task::spawn_blocking(move || f(&service))
            .await
            .map_err(|e| ApiError::internal(format!("Request task failed: {}", e)))?
            .map_err(ApiError::from)
    }
}
