//! The JSON envelope every endpoint answers with, and the mapping from
//! service errors to HTTP statuses.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use inquiry_desk::inquiry::{InquiryError, Pagination};
use serde::Serialize;
use tracing::error;

/// Response wrapper for API calls.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            pagination: None,
            error: None,
        }
    }

    pub fn paged(data: T, pagination: Pagination) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::ok(data)
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    /// A success carrying only a message.
    pub fn done(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            pagination: None,
            error: None,
        }
    }
}

/// A failed request, rendered as `{success: false, message, error?}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub error: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            error: None,
        }
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// 500 with the diagnostic in `error`.
    pub fn internal(diagnostic: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Server error").with_error(diagnostic)
    }
}

impl From<InquiryError> for ApiError {
    fn from(err: InquiryError) -> Self {
        match &err {
            InquiryError::MissingFields { .. } => {
                Self::new(StatusCode::BAD_REQUEST, "All fields are required")
                    .with_error(err.to_string())
            }
            InquiryError::InvalidStatus { .. } => {
                Self::new(StatusCode::BAD_REQUEST, "Invalid status").with_error(err.to_string())
            }
            InquiryError::InvalidPagination(_) => {
                Self::new(StatusCode::BAD_REQUEST, err.to_string())
            }
            InquiryError::NotFound { .. } => Self::new(StatusCode::NOT_FOUND, "Inquiry not found"),
            InquiryError::NumberConflict { .. } | InquiryError::Database(_) => {
                Self::internal(err.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Invalid request body").with_error(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Invalid query parameters")
            .with_error(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(
                status = self.status.as_u16(),
                error = self.error.as_deref().unwrap_or_default(),
                "{}",
                self.message
            );
        }
        let body = ApiResponse::<()> {
            success: false,
            message: Some(self.message),
            data: None,
            pagination: None,
            error: self.error,
        };
        (self.status, Json(body)).into_response()
    }
}
