use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Historical award outcome, imported in bulk. Read-only to the
/// application; feeds the win-probability engine.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HistoricalAwardRow {
    pub id: Uuid,
    pub organization: String,
    pub category: String,
    pub location: String,
    /// Whole KES at the time of award (inflation-adjusted downstream).
    pub awarded_amount: i64,
    pub winner_type: String,
    pub award_date: NaiveDate,
    pub bid_count: i32,
}
