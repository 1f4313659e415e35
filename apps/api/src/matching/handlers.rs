use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::batch::{matches_for_user, run_matching_batch, BatchReport};
use crate::matching::scorer::TenderMatch;
use crate::state::AppState;

const DEFAULT_MATCH_LIMIT: usize = 20;

#[derive(Debug, Deserialize)]
pub struct MatchesQuery {
    pub user_id: Uuid,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct MatchesResponse {
    pub user_id: Uuid,
    pub total: usize,
    pub matches: Vec<TenderMatch>,
}

/// GET /api/v1/matches — ranked matches for one user, computed on demand.
pub async fn list_matches(
    State(state): State<AppState>,
    Query(query): Query<MatchesQuery>,
) -> Result<Json<MatchesResponse>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_MATCH_LIMIT);
    let mut matches = matches_for_user(&state.db, query.user_id).await?;
    let total = matches.len();
    matches.truncate(limit);

    Ok(Json(MatchesResponse {
        user_id: query.user_id,
        total,
        matches,
    }))
}

/// POST /api/v1/admin/matching/run — kicks the nightly batch. Invoked by
/// an external scheduler, not by end users.
pub async fn run_batch(
    State(state): State<AppState>,
) -> Result<Json<BatchReport>, AppError> {
    let report = run_matching_batch(&state.db).await?;
    Ok(Json(report))
}
