//! Draft validation and ingest.
//!
//! A draft needs a title and a parseable future deadline to enter the
//! table; everything else is normalized with sensible defaults. Dedup is
//! an exact-title check against existing rows, so a tender republished
//! under the same heading never double-inserts.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::models::tender::STATUS_ACTIVE;
use crate::scraper::extract::{extractor_for, infer_category, TenderDraft};
use crate::scraper::ScrapeSource;
use crate::state::AppState;

#[derive(Debug, Default, Serialize)]
pub struct ScrapeReport {
    pub source: String,
    pub fetched: usize,
    pub inserted: u32,
    pub skipped_duplicates: u32,
    pub skipped_invalid: u32,
}

/// Full pipeline for one source: fetch, extract, ingest.
pub async fn run_scrape(state: &AppState, source: &ScrapeSource) -> Result<ScrapeReport, AppError> {
    let markdown = state
        .firecrawl
        .scrape_markdown(source.url)
        .await
        .map_err(|e| AppError::Scrape(e.to_string()))?;

    let extractor = extractor_for(source.mode, &state.llm);
    let drafts = extractor.extract(&markdown, source.url).await?;

    ingest_drafts(&state.db, source, &drafts).await
}

/// Writes validated drafts, counting what was kept and what was skipped.
pub async fn ingest_drafts(
    db: &PgPool,
    source: &ScrapeSource,
    drafts: &[TenderDraft],
) -> Result<ScrapeReport, AppError> {
    let now = Utc::now();
    let mut report = ScrapeReport {
        source: source.name.to_string(),
        fetched: drafts.len(),
        ..Default::default()
    };

    for draft in drafts {
        let Some(deadline) = validate(draft, now) else {
            report.skipped_invalid += 1;
            continue;
        };
        let title = draft.title.trim();

        let duplicate: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM tenders WHERE title = $1)")
                .bind(title)
                .fetch_one(db)
                .await?;
        if duplicate {
            report.skipped_duplicates += 1;
            continue;
        }

        let description = if draft.description.trim().is_empty() {
            title
        } else {
            draft.description.trim()
        };
        let category = if draft.category.trim().is_empty() {
            infer_category(title)
        } else {
            draft.category.trim().to_string()
        };
        let location = if draft.location.trim().is_empty() {
            "National"
        } else {
            draft.location.trim()
        };

        sqlx::query(
            r#"
            INSERT INTO tenders
                (title, description, organization, category, location,
                 budget_estimate, deadline, status, source_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(draft.organization.trim())
        .bind(category)
        .bind(location)
        .bind(draft.budget_estimate)
        .bind(deadline)
        .bind(STATUS_ACTIVE)
        .bind(draft.source_url.as_deref().unwrap_or(source.url))
        .execute(db)
        .await?;
        report.inserted += 1;
    }

    info!(
        source = %report.source,
        fetched = report.fetched,
        inserted = report.inserted,
        skipped_duplicates = report.skipped_duplicates,
        skipped_invalid = report.skipped_invalid,
        "scrape ingest finished"
    );
    Ok(report)
}

/// A draft is usable when it has a title and a future deadline.
fn validate(draft: &TenderDraft, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if draft.title.trim().is_empty() {
        return None;
    }
    let deadline = parse_deadline(&draft.deadline)?;
    if deadline <= now {
        return None;
    }
    Some(deadline)
}

/// `YYYY-MM-DD` deadlines close at end of day UTC.
fn parse_deadline(raw: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(23, 59, 59)?.and_utc())
}
