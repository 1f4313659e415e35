use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

pub const ALERT_NEW_MATCHES: &str = "new_matches";
pub const ALERT_PAYMENT: &str = "payment";

/// Append-only notification log. The only permitted mutation is the
/// `is_read` toggle.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserAlertRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub alert_type: String,
    pub title: String,
    pub message: String,
    pub data: Value,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
