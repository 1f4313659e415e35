use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::tender::TenderRow;
use crate::state::AppState;
use crate::tenders::queries;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct TenderListQuery {
    pub category: Option<String>,
    pub location: Option<String>,
    pub q: Option<String>,
    pub min_budget: Option<i64>,
    pub max_budget: Option<i64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct TenderListResponse {
    pub tenders: Vec<TenderRow>,
    pub count: usize,
}

/// GET /api/v1/tenders
pub async fn list_tenders(
    State(state): State<AppState>,
    Query(query): Query<TenderListQuery>,
) -> Result<Json<TenderListResponse>, AppError> {
    let filters = queries::TenderFilters {
        category: query.category,
        location: query.location,
        q: query.q,
        min_budget: query.min_budget,
        max_budget: query.max_budget,
        limit: query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        offset: query.offset.unwrap_or(0).max(0),
    };
    let tenders = queries::list_filtered(&state.db, &filters).await?;
    let count = tenders.len();
    Ok(Json(TenderListResponse { tenders, count }))
}

/// GET /api/v1/tenders/:id
pub async fn get_tender(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TenderRow>, AppError> {
    let tender = queries::get_tender(&state.db, id).await?;
    Ok(Json(tender))
}

/// POST /api/v1/tenders/:id/save
pub async fn save_tender(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    queries::save_tender(&state.db, query.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/tenders/:id/save
pub async fn unsave_tender(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    queries::unsave_tender(&state.db, query.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/tenders/saved
pub async fn list_saved(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<TenderListResponse>, AppError> {
    let tenders = queries::saved_for_user(&state.db, query.user_id).await?;
    let count = tenders.len();
    Ok(Json(TenderListResponse { tenders, count }))
}

#[derive(Debug, Serialize)]
pub struct ExpireResponse {
    pub expired: u64,
}

/// POST /api/v1/admin/tenders/expire — deadline sweep for the external
/// scheduler.
pub async fn expire_tenders(
    State(state): State<AppState>,
) -> Result<Json<ExpireResponse>, AppError> {
    let expired = queries::expire_overdue(&state.db).await?;
    info!(expired, "tender expiry sweep finished");
    Ok(Json(ExpireResponse { expired }))
}
