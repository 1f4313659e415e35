//! Subscription state: premium-access checks, expiry extension math, and
//! the lapse sweep.

use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::billing::plans::Plan;
use crate::errors::AppError;
use crate::models::profile::{ProfileRow, TIER_FREE, TIER_PREMIUM};

/// Premium access comes from an unexpired premium subscription or an
/// open founding-member window. A premium tier with no recorded expiry
/// counts as active (manually granted accounts).
pub fn has_premium_access(profile: &ProfileRow, now: DateTime<Utc>) -> bool {
    if profile.subscription_tier == TIER_PREMIUM {
        match profile.subscription_expires_at {
            Some(expiry) if expiry > now => return true,
            None => return true,
            _ => {}
        }
    }
    profile.is_founding_member
        && profile
            .founding_member_until
            .map(|until| until > now)
            .unwrap_or(false)
}

/// New expiry after buying `days` more: stacked on the current expiry if
/// it is still in the future, otherwise counted from now.
pub fn extend_expiry(
    current: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    days: i64,
) -> DateTime<Utc> {
    let base = match current {
        Some(expiry) if expiry > now => expiry,
        _ => now,
    };
    base + Duration::days(days)
}

/// Applies a paid plan to the profile. Returns the new expiry.
pub async fn activate_subscription(
    db: &PgPool,
    user_id: Uuid,
    plan: &Plan,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, AppError> {
    let current: Option<DateTime<Utc>> =
        sqlx::query_scalar("SELECT subscription_expires_at FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile {user_id} not found")))?;

    let new_expiry = extend_expiry(current, now, plan.duration_days);

    sqlx::query(
        r#"
        UPDATE profiles
        SET subscription_tier = $1, subscription_expires_at = $2, updated_at = NOW()
        WHERE user_id = $3
        "#,
    )
    .bind(TIER_PREMIUM)
    .bind(new_expiry)
    .bind(user_id)
    .execute(db)
    .await?;

    info!(%user_id, plan = plan.code, %new_expiry, "subscription activated");
    Ok(new_expiry)
}

/// Reverts premium profiles whose expiry has passed to the free tier.
/// Returns the number of rows changed.
pub async fn expire_lapsed(db: &PgPool) -> Result<u64, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE profiles
        SET subscription_tier = $1, updated_at = NOW()
        WHERE subscription_tier = $2
          AND subscription_expires_at IS NOT NULL
          AND subscription_expires_at < NOW()
        "#,
    )
    .bind(TIER_FREE)
    .bind(TIER_PREMIUM)
    .execute(db)
    .await?;
    Ok(result.rows_affected())
}
