//! SQL access for tenders and saved-tender bookmarks.
//!
//! Browsing and matching only ever see `status = 'active'` rows; the
//! status column is the sole eligibility signal. Detail lookups by id
//! ignore status so saved closed tenders stay reachable.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::tender::{TenderRow, STATUS_ACTIVE, STATUS_EXPIRED};

#[derive(Debug, Default)]
pub struct TenderFilters {
    pub category: Option<String>,
    pub location: Option<String>,
    pub q: Option<String>,
    pub min_budget: Option<i64>,
    pub max_budget: Option<i64>,
    pub limit: i64,
    pub offset: i64,
}

/// Every active tender, newest first. The matcher's working set.
pub async fn list_active(db: &PgPool) -> Result<Vec<TenderRow>, AppError> {
    let rows = sqlx::query_as("SELECT * FROM tenders WHERE status = $1 ORDER BY created_at DESC")
        .bind(STATUS_ACTIVE)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

/// Active tenders with optional browse filters, newest first.
pub async fn list_filtered(db: &PgPool, f: &TenderFilters) -> Result<Vec<TenderRow>, AppError> {
    let rows = sqlx::query_as(
        r#"
        SELECT * FROM tenders
        WHERE status = $1
          AND ($2::text IS NULL OR LOWER(category) = LOWER($2))
          AND ($3::text IS NULL OR LOWER(location) = LOWER($3))
          AND ($4::text IS NULL OR (
                title ILIKE '%' || $4 || '%'
                OR description ILIKE '%' || $4 || '%'
                OR organization ILIKE '%' || $4 || '%'))
          AND ($5::bigint IS NULL OR budget_estimate >= $5)
          AND ($6::bigint IS NULL OR budget_estimate <= $6)
        ORDER BY created_at DESC
        LIMIT $7 OFFSET $8
        "#,
    )
    .bind(STATUS_ACTIVE)
    .bind(f.category.as_deref())
    .bind(f.location.as_deref())
    .bind(f.q.as_deref())
    .bind(f.min_budget)
    .bind(f.max_budget)
    .bind(f.limit)
    .bind(f.offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn get_tender(db: &PgPool, id: Uuid) -> Result<TenderRow, AppError> {
    sqlx::query_as("SELECT * FROM tenders WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tender {id} not found")))
}

/// Bookmarks a tender. Saving twice is a no-op.
pub async fn save_tender(db: &PgPool, user_id: Uuid, tender_id: Uuid) -> Result<(), AppError> {
    // 404 before touching the join table
    get_tender(db, tender_id).await?;

    sqlx::query(
        r#"
        INSERT INTO saved_tenders (user_id, tender_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, tender_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(tender_id)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn unsave_tender(db: &PgPool, user_id: Uuid, tender_id: Uuid) -> Result<(), AppError> {
    sqlx::query("DELETE FROM saved_tenders WHERE user_id = $1 AND tender_id = $2")
        .bind(user_id)
        .bind(tender_id)
        .execute(db)
        .await?;
    Ok(())
}

/// The user's saved tenders with their current status, most recently
/// saved first.
pub async fn saved_for_user(db: &PgPool, user_id: Uuid) -> Result<Vec<TenderRow>, AppError> {
    let rows = sqlx::query_as(
        r#"
        SELECT t.* FROM tenders t
        JOIN saved_tenders s ON s.tender_id = t.id
        WHERE s.user_id = $1
        ORDER BY s.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Flips active tenders whose deadline has passed to `expired`. Returns
/// the number of rows changed.
pub async fn expire_overdue(db: &PgPool) -> Result<u64, AppError> {
    let result = sqlx::query("UPDATE tenders SET status = $1 WHERE status = $2 AND deadline < NOW()")
        .bind(STATUS_EXPIRED)
        .bind(STATUS_ACTIVE)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
