//! HTTP service for the inquiry desk.

pub mod logging;
pub mod response;
pub mod routes;
pub mod state;

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use inquiry_desk::config::ServerConfig;
use inquiry_desk::{ConfigError, DatabaseError, InquiryDeskError};
use thiserror::Error;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use response::{ApiError, ApiResponse};
pub use state::AppState;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error(transparent)]
    Desk(#[from] InquiryDeskError),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("Failed to bind '{address}': {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

impl From<ConfigError> for ServerError {
    fn from(err: ConfigError) -> Self {
        ServerError::Desk(err.into())
    }
}

impl From<DatabaseError> for ServerError {
    fn from(err: DatabaseError) -> Self {
        ServerError::Desk(err.into())
    }
}

/// Builds the router: inquiry routes under the configured prefix, `/health`
/// at the root, CORS and request tracing around both.
pub fn app(state: AppState) -> Router {
    let server = &state.config.server;
    let api = routes::inquiries::router();

    let router = if server.api_prefix.is_empty() {
        Router::new().merge(api)
    } else {
        Router::new().nest(&server.api_prefix, api)
    };

    router
        .route("/health", get(routes::health::health))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    if server.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = server
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
