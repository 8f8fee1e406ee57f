//! Inquiry endpoints: intake, listing, lookup, status changes and deletion.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use inquiry_desk::inquiry::{Inquiry, ListQuery, NewInquiry, StatusSummary};
use serde::Deserialize;

use crate::response::{ApiError, ApiResponse};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/inquiries", post(create_inquiry).get(list_inquiries))
        .route("/inquiries/stats", get(inquiry_stats))
        .route("/inquiries/:id", get(get_inquiry).delete(delete_inquiry))
        .route("/inquiries/:id/status", patch(update_status))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusUpdate {
    pub status: Option<String>,
}

async fn create_inquiry(
    State(state): State<AppState>,
    payload: Result<Json<NewInquiry>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Inquiry>>), ApiError> {
    let Json(input) = payload?;
    let inquiry = state.run(move |service| service.create(input)).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(inquiry).with_message("Inquiry submitted successfully")),
    ))
}

async fn list_inquiries(
    State(state): State<AppState>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Inquiry>>>, ApiError> {
    let Query(query) = query?;
    let page = state.run(move |service| service.list(&query)).await?;
    Ok(Json(ApiResponse::paged(page.inquiries, page.pagination)))
}

async fn inquiry_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<StatusSummary>>, ApiError> {
    let summary = state.run(|service| service.status_summary()).await?;
    Ok(Json(ApiResponse::ok(summary)))
}

async fn get_inquiry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Inquiry>>, ApiError> {
    let inquiry = state.run(move |service| service.get_by_id(&id)).await?;
    Ok(Json(ApiResponse::ok(inquiry)))
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<Json<ApiResponse<Inquiry>>, ApiError> {
    let Json(update) = payload?;
    let status = update.status.unwrap_or_default();
    let inquiry = state
        .run(move |service| service.update_status(&id, &status))
        .await?;
    Ok(Json(
        ApiResponse::ok(inquiry).with_message("Status updated successfully"),
    ))
}

async fn delete_inquiry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.run(move |service| service.delete(&id)).await?;
    Ok(Json(ApiResponse::done("Inquiry deleted successfully")))
}
