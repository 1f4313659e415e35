use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{ProfileRow, UserPreferencesRow};
use crate::profiles::queries;
use crate::state::AppState;
use crate::tenders::handlers::UserIdQuery;

/// GET /api/v1/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<ProfileRow>, AppError> {
    let profile = queries::find_profile(&state.db, query.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", query.user_id)))?;
    Ok(Json(profile))
}

#[derive(Debug, Deserialize)]
pub struct UpsertProfileRequest {
    pub user_id: Uuid,
    pub email: String,
    pub company_name: Option<String>,
    pub business_type: Option<String>,
    pub county: Option<String>,
}

/// PUT /api/v1/profile
pub async fn put_profile(
    State(state): State<AppState>,
    Json(req): Json<UpsertProfileRequest>,
) -> Result<Json<ProfileRow>, AppError> {
    if req.email.trim().is_empty() {
        return Err(AppError::Validation("email must not be empty".to_string()));
    }

    let profile = queries::upsert_profile(
        &state.db,
        req.user_id,
        req.email.trim(),
        req.company_name.as_deref(),
        req.business_type.as_deref(),
        req.county.as_deref(),
    )
    .await?;
    Ok(Json(profile))
}

/// GET /api/v1/preferences — 404 until the user saved preferences once.
pub async fn get_preferences(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<UserPreferencesRow>, AppError> {
    let prefs = queries::find_preferences(&state.db, query.user_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("No preferences saved for user {}", query.user_id))
        })?;
    Ok(Json(prefs))
}

#[derive(Debug, Deserialize)]
pub struct UpsertPreferencesRequest {
    pub user_id: Uuid,
    #[serde(default)]
    pub sectors: Vec<String>,
    #[serde(default)]
    pub counties: Vec<String>,
    #[serde(default)]
    pub budget_min: i64,
    #[serde(default)]
    pub budget_max: i64,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub eligibility_types: Vec<String>,
    #[serde(default)]
    pub email_alerts: bool,
    #[serde(default)]
    pub push_alerts: bool,
}

/// PUT /api/v1/preferences
pub async fn put_preferences(
    State(state): State<AppState>,
    Json(req): Json<UpsertPreferencesRequest>,
) -> Result<Json<UserPreferencesRow>, AppError> {
    if req.budget_min < 0 || req.budget_max < 0 {
        return Err(AppError::Validation(
            "budget bounds must not be negative".to_string(),
        ));
    }
    if req.budget_max > 0 && req.budget_min > req.budget_max {
        return Err(AppError::Validation(
            "budget_min must not exceed budget_max".to_string(),
        ));
    }

    let prefs = queries::upsert_preferences(
        &state.db,
        queries::PreferencesUpsert {
            user_id: req.user_id,
            sectors: &req.sectors,
            counties: &req.counties,
            budget_min: req.budget_min,
            budget_max: req.budget_max,
            keywords: &req.keywords,
            eligibility_types: &req.eligibility_types,
            email_alerts: req.email_alerts,
            push_alerts: req.push_alerts,
        },
    )
    .await?;
    Ok(Json(prefs))
}
