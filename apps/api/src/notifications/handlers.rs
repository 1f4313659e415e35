use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::alert::UserAlertRow;
use crate::state::AppState;
use crate::tenders::handlers::UserIdQuery;

const ALERT_PAGE_SIZE: i64 = 50;

#[derive(Debug, Serialize)]
pub struct AlertListResponse {
    pub alerts: Vec<UserAlertRow>,
    pub count: usize,
}

/// GET /api/v1/alerts — newest first, capped at one page.
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<AlertListResponse>, AppError> {
    let alerts: Vec<UserAlertRow> = sqlx::query_as(
        "SELECT * FROM user_alerts WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
    )
    .bind(query.user_id)
    .bind(ALERT_PAGE_SIZE)
    .fetch_all(&state.db)
    .await?;

    let count = alerts.len();
    Ok(Json(AlertListResponse { alerts, count }))
}

#[derive(Debug, Serialize)]
pub struct UnreadCountResponse {
    pub unread: i64,
}

/// GET /api/v1/alerts/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<UnreadCountResponse>, AppError> {
    let unread: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM user_alerts WHERE user_id = $1 AND is_read = FALSE",
    )
    .bind(query.user_id)
    .fetch_one(&state.db)
    .await?;
    Ok(Json(UnreadCountResponse { unread }))
}

#[derive(Debug, Deserialize)]
pub struct MarkReadRequest {
    pub user_id: Uuid,
}

/// PATCH /api/v1/alerts/:id/read
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<MarkReadRequest>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("UPDATE user_alerts SET is_read = TRUE WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(req.user_id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Alert {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct ReadAllResponse {
    pub updated: u64,
}

/// POST /api/v1/alerts/read-all
pub async fn read_all(
    State(state): State<AppState>,
    Json(req): Json<MarkReadRequest>,
) -> Result<Json<ReadAllResponse>, AppError> {
    let result =
        sqlx::query("UPDATE user_alerts SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE")
            .bind(req.user_id)
            .execute(&state.db)
            .await?;
    Ok(Json(ReadAllResponse {
        updated: result.rows_affected(),
    }))
}
