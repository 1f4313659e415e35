use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const TIER_FREE: &str = "free";
pub const TIER_PREMIUM: &str = "premium";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub email: String,
    pub company_name: Option<String>,
    pub business_type: Option<String>,
    pub county: Option<String>,
    pub subscription_tier: String,
    pub subscription_expires_at: Option<DateTime<Utc>>,
    pub is_founding_member: bool,
    pub founding_member_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Explicit matching preferences. One row per user, upserted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserPreferencesRow {
    pub user_id: Uuid,
    pub sectors: Vec<String>,
    pub counties: Vec<String>,
    /// Whole KES. `budget_max <= 0` means no usable budget range.
    pub budget_min: i64,
    pub budget_max: i64,
    pub keywords: Vec<String>,
    pub eligibility_types: Vec<String>,
    pub email_alerts: bool,
    pub push_alerts: bool,
    pub updated_at: DateTime<Utc>,
}
