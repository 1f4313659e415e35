use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::community::{RfqRow, RFQ_CLOSED, RFQ_OPEN};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateRfqRequest {
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub quantity: Option<i32>,
    pub budget: Option<i64>,
    pub deadline: DateTime<Utc>,
}

/// POST /api/v1/rfqs
pub async fn create_rfq(
    State(state): State<AppState>,
    Json(req): Json<CreateRfqRequest>,
) -> Result<Json<RfqRow>, AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("title must not be empty".to_string()));
    }
    if req.deadline <= Utc::now() {
        return Err(AppError::Validation(
            "deadline must be in the future".to_string(),
        ));
    }

    let rfq: RfqRow = sqlx::query_as(
        r#"
        INSERT INTO rfqs
            (buyer_user_id, title, description, category, location,
             quantity, budget, deadline, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(req.user_id)
    .bind(req.title.trim())
    .bind(req.description.trim())
    .bind(req.category.trim())
    .bind(req.location.trim())
    .bind(req.quantity)
    .bind(req.budget)
    .bind(req.deadline)
    .bind(RFQ_OPEN)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(rfq))
}

#[derive(Debug, Deserialize)]
pub struct RfqListQuery {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RfqListResponse {
    pub rfqs: Vec<RfqRow>,
    pub count: usize,
}

/// GET /api/v1/rfqs — open RFQs, newest first.
pub async fn list_rfqs(
    State(state): State<AppState>,
    Query(query): Query<RfqListQuery>,
) -> Result<Json<RfqListResponse>, AppError> {
    let rfqs: Vec<RfqRow> = sqlx::query_as(
        r#"
        SELECT * FROM rfqs
        WHERE status = $1
          AND ($2::text IS NULL OR LOWER(category) = LOWER($2))
        ORDER BY created_at DESC
        "#,
    )
    .bind(RFQ_OPEN)
    .bind(query.category.as_deref())
    .fetch_all(&state.db)
    .await?;

    let count = rfqs.len();
    Ok(Json(RfqListResponse { rfqs, count }))
}

/// GET /api/v1/rfqs/:id
pub async fn get_rfq(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RfqRow>, AppError> {
    let rfq: Option<RfqRow> = sqlx::query_as("SELECT * FROM rfqs WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    let rfq = rfq.ok_or_else(|| AppError::NotFound(format!("RFQ {id} not found")))?;
    Ok(Json(rfq))
}

#[derive(Debug, Deserialize)]
pub struct CloseRfqRequest {
    pub user_id: Uuid,
}

/// POST /api/v1/rfqs/:id/close — buyer only.
pub async fn close_rfq(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CloseRfqRequest>,
) -> Result<StatusCode, AppError> {
    let rfq: Option<RfqRow> = sqlx::query_as("SELECT * FROM rfqs WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    let rfq = rfq.ok_or_else(|| AppError::NotFound(format!("RFQ {id} not found")))?;

    if rfq.buyer_user_id != req.user_id {
        return Err(AppError::Forbidden(
            "Only the buyer can close an RFQ".to_string(),
        ));
    }

    sqlx::query("UPDATE rfqs SET status = $1 WHERE id = $2")
        .bind(RFQ_CLOSED)
        .bind(id)
        .execute(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
