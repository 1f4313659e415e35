use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::analysis::bid_analysis::{analyze_tender, BidAnalysis};
use crate::analysis::win_probability::{estimate_win_probability, WinProbability};
use crate::billing::subscriptions::has_premium_access;
use crate::errors::AppError;
use crate::models::award::HistoricalAwardRow;
use crate::profiles::queries::find_profile;
use crate::state::AppState;
use crate::tenders::queries::get_tender;

#[derive(Debug, Default, Deserialize)]
pub struct WinProbabilityRequest {
    pub user_id: Option<Uuid>,
    pub intended_bid: Option<i64>,
}

/// POST /api/v1/tenders/:id/win-probability
///
/// Body is optional: without it the estimate uses neutral factors for
/// business type and intended bid.
pub async fn win_probability(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<WinProbabilityRequest>>,
) -> Result<Json<WinProbability>, AppError> {
    let req = body.map(|Json(r)| r).unwrap_or_default();
    let tender = get_tender(&state.db, id).await?;

    let business_type = match req.user_id {
        Some(user_id) => find_profile(&state.db, user_id)
            .await?
            .and_then(|p| p.business_type),
        None => None,
    };

    let awards: Vec<HistoricalAwardRow> =
        sqlx::query_as("SELECT * FROM historical_tender_awards WHERE LOWER(category) = LOWER($1)")
            .bind(&tender.category)
            .fetch_all(&state.db)
            .await?;

    let estimate = estimate_win_probability(
        &awards,
        &tender,
        business_type.as_deref(),
        req.intended_bid,
        chrono::Utc::now().date_naive(),
    );
    Ok(Json(estimate))
}

#[derive(Debug, Deserialize)]
pub struct BidAnalysisRequest {
    pub user_id: Uuid,
}

/// POST /api/v1/tenders/:id/analysis — premium-only.
pub async fn bid_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<BidAnalysisRequest>,
) -> Result<Json<BidAnalysis>, AppError> {
    let profile = find_profile(&state.db, req.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", req.user_id)))?;

    if !has_premium_access(&profile, chrono::Utc::now()) {
        return Err(AppError::Forbidden(
            "Bid analysis is a premium feature. Upgrade to access it.".to_string(),
        ));
    }

    let tender = get_tender(&state.db, id).await?;
    let analysis = analyze_tender(&state.llm, &tender).await;
    Ok(Json(analysis))
}
