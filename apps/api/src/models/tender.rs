use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Tender lifecycle states. `status` is the single source of truth for
/// eligibility: only `active` rows participate in browsing and matching.
pub const STATUS_ACTIVE: &str = "active";
/// Set by upstream data loads, never by this service.
#[allow(dead_code)]
pub const STATUS_CLOSED: &str = "closed";
pub const STATUS_EXPIRED: &str = "expired";

/// A procurement opportunity. Immutable once scraped except for status
/// transitions (active → closed/expired).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TenderRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub organization: String,
    pub category: String,
    pub location: String,
    /// Whole Kenyan shillings; None when the source published no estimate.
    pub budget_estimate: Option<i64>,
    pub deadline: DateTime<Utc>,
    pub status: String,
    pub source_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Bookmark join row. Doubles as an implicit preference signal for the
/// matching engine.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SavedTenderRow {
    pub user_id: Uuid,
    pub tender_id: Uuid,
    pub created_at: DateTime<Utc>,
}
