use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::community::{
    ConsortiumMemberRow, ConsortiumRow, CONSORTIUM_CLOSED, CONSORTIUM_OPEN, ROLE_LEAD, ROLE_MEMBER,
};
use crate::state::AppState;

const DEFAULT_MAX_MEMBERS: i32 = 5;

#[derive(Debug, Deserialize)]
pub struct CreateConsortiumRequest {
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub tender_id: Option<Uuid>,
    pub max_members: Option<i32>,
}

/// POST /api/v1/consortiums — the creator becomes the lead member.
pub async fn create_consortium(
    State(state): State<AppState>,
    Json(req): Json<CreateConsortiumRequest>,
) -> Result<Json<ConsortiumRow>, AppError> {
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }
    let max_members = req.max_members.unwrap_or(DEFAULT_MAX_MEMBERS);
    if max_members < 2 {
        return Err(AppError::Validation(
            "max_members must be at least 2".to_string(),
        ));
    }

    let consortium: ConsortiumRow = sqlx::query_as(
        r#"
        INSERT INTO consortiums (name, description, tender_id, lead_user_id, status, max_members)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(req.name.trim())
    .bind(req.description.trim())
    .bind(req.tender_id)
    .bind(req.user_id)
    .bind(CONSORTIUM_OPEN)
    .bind(max_members)
    .fetch_one(&state.db)
    .await?;

    sqlx::query("INSERT INTO consortium_members (consortium_id, user_id, role) VALUES ($1, $2, $3)")
        .bind(consortium.id)
        .bind(req.user_id)
        .bind(ROLE_LEAD)
        .execute(&state.db)
        .await?;

    info!(consortium_id = %consortium.id, lead = %req.user_id, "consortium created");
    Ok(Json(consortium))
}

#[derive(Debug, Deserialize)]
pub struct ConsortiumListQuery {
    pub tender_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ConsortiumListResponse {
    pub consortiums: Vec<ConsortiumRow>,
    pub count: usize,
}

/// GET /api/v1/consortiums — open consortiums, newest first.
pub async fn list_consortiums(
    State(state): State<AppState>,
    Query(query): Query<ConsortiumListQuery>,
) -> Result<Json<ConsortiumListResponse>, AppError> {
    let consortiums: Vec<ConsortiumRow> = sqlx::query_as(
        r#"
        SELECT * FROM consortiums
        WHERE status = $1
          AND ($2::uuid IS NULL OR tender_id = $2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(CONSORTIUM_OPEN)
    .bind(query.tender_id)
    .fetch_all(&state.db)
    .await?;

    let count = consortiums.len();
    Ok(Json(ConsortiumListResponse { consortiums, count }))
}

#[derive(Debug, Serialize)]
pub struct ConsortiumDetailResponse {
    pub consortium: ConsortiumRow,
    pub members: Vec<ConsortiumMemberRow>,
}

/// GET /api/v1/consortiums/:id
pub async fn get_consortium(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ConsortiumDetailResponse>, AppError> {
    let consortium = fetch_consortium(&state.db, id).await?;
    let members: Vec<ConsortiumMemberRow> = sqlx::query_as(
        "SELECT * FROM consortium_members WHERE consortium_id = $1 ORDER BY joined_at ASC",
    )
    .bind(id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(ConsortiumDetailResponse {
        consortium,
        members,
    }))
}

#[derive(Debug, Deserialize)]
pub struct MembershipRequest {
    pub user_id: Uuid,
}

/// POST /api/v1/consortiums/:id/join
pub async fn join_consortium(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<MembershipRequest>,
) -> Result<StatusCode, AppError> {
    let consortium = fetch_consortium(&state.db, id).await?;

    let member_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM consortium_members WHERE consortium_id = $1")
            .bind(id)
            .fetch_one(&state.db)
            .await?;
    let already_member: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM consortium_members WHERE consortium_id = $1 AND user_id = $2)",
    )
    .bind(id)
    .bind(req.user_id)
    .fetch_one(&state.db)
    .await?;

    check_joinable(&consortium, member_count, already_member)?;

    sqlx::query("INSERT INTO consortium_members (consortium_id, user_id, role) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(req.user_id)
        .bind(ROLE_MEMBER)
        .execute(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/consortiums/:id/leave
pub async fn leave_consortium(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<MembershipRequest>,
) -> Result<StatusCode, AppError> {
    let consortium = fetch_consortium(&state.db, id).await?;
    if consortium.lead_user_id == req.user_id {
        return Err(AppError::Validation(
            "The lead cannot leave; close the consortium instead".to_string(),
        ));
    }

    let result =
        sqlx::query("DELETE FROM consortium_members WHERE consortium_id = $1 AND user_id = $2")
            .bind(id)
            .bind(req.user_id)
            .execute(&state.db)
            .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!(
            "User {} is not a member of consortium {id}",
            req.user_id
        )));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/consortiums/:id/close — lead only.
pub async fn close_consortium(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<MembershipRequest>,
) -> Result<StatusCode, AppError> {
    let consortium = fetch_consortium(&state.db, id).await?;
    if consortium.lead_user_id != req.user_id {
        return Err(AppError::Forbidden(
            "Only the lead can close a consortium".to_string(),
        ));
    }

    sqlx::query("UPDATE consortiums SET status = $1 WHERE id = $2")
        .bind(CONSORTIUM_CLOSED)
        .bind(id)
        .execute(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn fetch_consortium(db: &PgPool, id: Uuid) -> Result<ConsortiumRow, AppError> {
    sqlx::query_as("SELECT * FROM consortiums WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Consortium {id} not found")))
}

fn check_joinable(
    consortium: &ConsortiumRow,
    member_count: i64,
    already_member: bool,
) -> Result<(), AppError> {
    if consortium.status != CONSORTIUM_OPEN {
        return Err(AppError::Validation(
            "This consortium is closed to new members".to_string(),
        ));
    }
    if member_count >= consortium.max_members as i64 {
        return Err(AppError::Validation("This consortium is full".to_string()));
    }
    if already_member {
        return Err(AppError::Validation(
            "You are already a member of this consortium".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_consortium(status: &str, max_members: i32) -> ConsortiumRow {
        ConsortiumRow {
            id: Uuid::new_v4(),
            name: "Nairobi ICT Alliance".to_string(),
            description: "Joint bids for county ICT tenders".to_string(),
            tender_id: None,
            lead_user_id: Uuid::new_v4(),
            status: status.to_string(),
            max_members,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_open_consortium_with_room_is_joinable() {
        let consortium = make_consortium(CONSORTIUM_OPEN, 5);
        assert!(check_joinable(&consortium, 3, false).is_ok());
    }

    #[test]
    fn test_closed_consortium_rejects_joins() {
        let consortium = make_consortium("closed", 5);
        assert!(matches!(
            check_joinable(&consortium, 1, false),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_full_consortium_rejects_joins() {
        let consortium = make_consortium(CONSORTIUM_OPEN, 3);
        assert!(matches!(
            check_joinable(&consortium, 3, false),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_duplicate_membership_rejected() {
        let consortium = make_consortium(CONSORTIUM_OPEN, 5);
        assert!(matches!(
            check_joinable(&consortium, 2, true),
            Err(AppError::Validation(_))
        ));
    }
}
