use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const PAYMENT_PENDING: &str = "pending";
pub const PAYMENT_SUCCESS: &str = "success";
pub const PAYMENT_FAILED: &str = "failed";

/// One row per Paystack transaction, keyed by the gateway reference.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PaymentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub reference: String,
    pub plan: String,
    /// Whole KES (Paystack ingests the x100 subunit).
    pub amount: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}
