use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const CONSORTIUM_OPEN: &str = "open";
pub const CONSORTIUM_CLOSED: &str = "closed";

pub const ROLE_LEAD: &str = "lead";
pub const ROLE_MEMBER: &str = "member";

pub const RFQ_OPEN: &str = "open";
pub const RFQ_CLOSED: &str = "closed";

/// A bidding group formed around a tender (or speculatively, without one).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ConsortiumRow {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub tender_id: Option<Uuid>,
    pub lead_user_id: Uuid,
    pub status: String,
    pub max_members: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ConsortiumMemberRow {
    pub consortium_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub joined_at: DateTime<Utc>,
}

/// Buyer-initiated sourcing request. Distinct from tenders; never enters
/// the matching engine.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RfqRow {
    pub id: Uuid,
    pub buyer_user_id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub quantity: Option<i32>,
    pub budget: Option<i64>,
    pub deadline: DateTime<Utc>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
