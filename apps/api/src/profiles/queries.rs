//! SQL access for profiles and preferences. Both tables hold one row per
//! user and are written with upserts.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{ProfileRow, UserPreferencesRow};

pub async fn find_profile(db: &PgPool, user_id: Uuid) -> Result<Option<ProfileRow>, AppError> {
    let row = sqlx::query_as("SELECT * FROM profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

/// Creates or updates the contact half of a profile. Subscription and
/// founding-member columns are only ever written by the billing paths.
pub async fn upsert_profile(
    db: &PgPool,
    user_id: Uuid,
    email: &str,
    company_name: Option<&str>,
    business_type: Option<&str>,
    county: Option<&str>,
) -> Result<ProfileRow, AppError> {
    let row = sqlx::query_as(
        r#"
        INSERT INTO profiles (user_id, email, company_name, business_type, county)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id) DO UPDATE
        SET email = EXCLUDED.email,
            company_name = EXCLUDED.company_name,
            business_type = EXCLUDED.business_type,
            county = EXCLUDED.county,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(email)
    .bind(company_name)
    .bind(business_type)
    .bind(county)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn find_preferences(
    db: &PgPool,
    user_id: Uuid,
) -> Result<Option<UserPreferencesRow>, AppError> {
    let row = sqlx::query_as("SELECT * FROM user_preferences WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

/// Parameters for a preferences upsert.
pub struct PreferencesUpsert<'a> {
    pub user_id: Uuid,
    pub sectors: &'a [String],
    pub counties: &'a [String],
    pub budget_min: i64,
    pub budget_max: i64,
    pub keywords: &'a [String],
    pub eligibility_types: &'a [String],
    pub email_alerts: bool,
    pub push_alerts: bool,
}

pub async fn upsert_preferences(
    db: &PgPool,
    params: PreferencesUpsert<'_>,
) -> Result<UserPreferencesRow, AppError> {
    let PreferencesUpsert {
        user_id,
        sectors,
        counties,
        budget_min,
        budget_max,
        keywords,
        eligibility_types,
        email_alerts,
        push_alerts,
    } = params;
    let row = sqlx::query_as(
        r#"
        INSERT INTO user_preferences
            (user_id, sectors, counties, budget_min, budget_max,
             keywords, eligibility_types, email_alerts, push_alerts)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (user_id) DO UPDATE
        SET sectors = EXCLUDED.sectors,
            counties = EXCLUDED.counties,
            budget_min = EXCLUDED.budget_min,
            budget_max = EXCLUDED.budget_max,
            keywords = EXCLUDED.keywords,
            eligibility_types = EXCLUDED.eligibility_types,
            email_alerts = EXCLUDED.email_alerts,
            push_alerts = EXCLUDED.push_alerts,
            updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(sectors)
    .bind(counties)
    .bind(budget_min)
    .bind(budget_max)
    .bind(keywords)
    .bind(eligibility_types)
    .bind(email_alerts)
    .bind(push_alerts)
    .fetch_one(db)
    .await?;
    Ok(row)
}
