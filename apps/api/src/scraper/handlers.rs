use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::scraper::find_source;
use crate::scraper::ingest::{run_scrape, ScrapeReport};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScrapeRunRequest {
    pub source: String,
}

/// POST /api/v1/admin/scrape — runs one source end to end. Invoked by the
/// external scheduler.
pub async fn scrape(
    State(state): State<AppState>,
    Json(req): Json<ScrapeRunRequest>,
) -> Result<Json<ScrapeReport>, AppError> {
    let source = find_source(&req.source).ok_or_else(|| {
        AppError::Validation(format!("Unknown scrape source '{}'", req.source))
    })?;
    let report = run_scrape(&state, source).await?;
    Ok(Json(report))
}
