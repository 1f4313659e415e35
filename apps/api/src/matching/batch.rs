//! Nightly matching sweep across all users who opted into alerts.
//!
//! Users are processed one at a time. A failure for one user is logged
//! and counted; it never aborts the rest of the batch.

use serde::Serialize;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::alert_writer::write_match_alerts;
use crate::matching::profile::build_profile;
use crate::matching::scorer::{rank_tenders, TenderMatch};
use crate::models::profile::UserPreferencesRow;
use crate::models::tender::TenderRow;
use crate::tenders::queries;

#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub processed: u32,
    pub alerts_created: u64,
    pub failed: u32,
}

/// Runs the full matching batch: one pass over every alert-subscribed
/// user against the current active tender set.
pub async fn run_matching_batch(db: &PgPool) -> Result<BatchReport, AppError> {
    let now = chrono::Utc::now();

    let subscribers: Vec<UserPreferencesRow> = sqlx::query_as(
        r#"
        SELECT * FROM user_preferences
        WHERE email_alerts = TRUE OR push_alerts = TRUE
        "#,
    )
    .fetch_all(db)
    .await?;

    // the active set is shared across every user in the run
    let active = queries::list_active(db).await?;

    info!(
        subscribers = subscribers.len(),
        active_tenders = active.len(),
        "starting matching batch"
    );

    let mut report = BatchReport::default();
    for prefs in &subscribers {
        report.processed += 1;
        match process_user(db, prefs, &active, now).await {
            Ok(count) => report.alerts_created += count,
            Err(err) => {
                report.failed += 1;
                error!(user_id = %prefs.user_id, error = %err, "matching failed for user");
            }
        }
    }

    info!(
        processed = report.processed,
        alerts_created = report.alerts_created,
        failed = report.failed,
        "matching batch finished"
    );
    Ok(report)
}

async fn process_user(
    db: &PgPool,
    prefs: &UserPreferencesRow,
    active: &[TenderRow],
    now: chrono::DateTime<chrono::Utc>,
) -> Result<u64, AppError> {
    let saved = queries::saved_for_user(db, prefs.user_id).await?;
    let profile = build_profile(Some(prefs), &saved);
    let matches = rank_tenders(&profile, active, now);
    write_match_alerts(db, prefs.user_id, &matches).await
}

/// Fetches matches on demand for a single user, outside the batch path.
pub async fn matches_for_user(
    db: &PgPool,
    user_id: Uuid,
) -> Result<Vec<TenderMatch>, AppError> {
    let prefs: Option<UserPreferencesRow> =
        sqlx::query_as("SELECT * FROM user_preferences WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(db)
            .await?;

    let saved = queries::saved_for_user(db, user_id).await?;
    let active = queries::list_active(db).await?;

    let profile = build_profile(prefs.as_ref(), &saved);
    Ok(rank_tenders(&profile, &active, chrono::Utc::now()))
}
