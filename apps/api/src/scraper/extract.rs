//! Draft extraction from scraped page markdown.
//!
//! Two backends behind one trait: `PatternExtractor` walks markdown table
//! rows with a regex (mygov's listing is a clean table), `LlmExtractor`
//! hands the page to the LLM for unstructured layouts. Drafts keep the
//! deadline as raw text; parsing and validation happen at ingest, where
//! bad rows are counted instead of aborting the run.

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::llm_client::prompts::KENYAN_PROCUREMENT_CONTEXT;
use crate::llm_client::LlmClient;
use crate::scraper::prompts::{SCRAPE_EXTRACT_PROMPT_TEMPLATE, SCRAPE_EXTRACT_SYSTEM};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    Pattern,
    Llm,
}

/// A tender candidate as pulled off a page, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenderDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub budget_estimate: Option<i64>,
    /// Raw deadline text, `YYYY-MM-DD` expected.
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    pub source_url: Option<String>,
}

#[async_trait]
pub trait TenderExtractor: Send + Sync {
    async fn extract(&self, markdown: &str, source_url: &str)
        -> Result<Vec<TenderDraft>, AppError>;
}

pub fn extractor_for(mode: ExtractionMode, llm: &LlmClient) -> Box<dyn TenderExtractor> {
    match mode {
        ExtractionMode::Pattern => Box::new(PatternExtractor::new()),
        ExtractionMode::Llm => Box::new(LlmExtractor { llm: llm.clone() }),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pattern extractor
// ────────────────────────────────────────────────────────────────────────────

/// Parses listing tables of the shape
/// `| n | title | organization | YYYY-MM-DD |` (numbering column optional).
/// Header and separator rows fail the date match and drop out naturally.
pub struct PatternExtractor {
    row: Regex,
}

impl PatternExtractor {
    pub fn new() -> Self {
        let row = Regex::new(
            r"(?m)^\|(?:\s*\d+\s*\|)?\s*([^|]+?)\s*\|\s*([^|]+?)\s*\|\s*(\d{4}-\d{2}-\d{2})\s*\|\s*$",
        )
        .unwrap();
        Self { row }
    }
}

#[async_trait]
impl TenderExtractor for PatternExtractor {
    async fn extract(
        &self,
        markdown: &str,
        source_url: &str,
    ) -> Result<Vec<TenderDraft>, AppError> {
        let drafts = self
            .row
            .captures_iter(markdown)
            .map(|caps| {
                let title = caps[1].trim().to_string();
                TenderDraft {
                    description: title.clone(),
                    organization: caps[2].trim().to_string(),
                    category: infer_category(&title),
                    location: "National".to_string(),
                    budget_estimate: None,
                    deadline: caps[3].to_string(),
                    source_url: Some(source_url.to_string()),
                    title,
                }
            })
            .collect();
        Ok(drafts)
    }
}

const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Construction",
        &["construction", "works", "building", "renovation", "road"],
    ),
    (
        "ICT",
        &["ict", "software", "computer", "network", "laptop", "digital"],
    ),
    (
        "Medical",
        &["medical", "pharmaceutical", "hospital", "laboratory"],
    ),
    (
        "Consultancy",
        &["consultancy", "consulting", "advisory", "feasibility"],
    ),
    ("Security", &["security", "guarding", "cctv"]),
    ("Transport", &["transport", "vehicle", "motor"]),
    (
        "Agriculture",
        &["agriculture", "seed", "fertilizer", "livestock"],
    ),
    ("Energy", &["energy", "solar", "electrical", "generator"]),
];

/// Best-effort category from title keywords; `Supplies` when nothing hits.
pub fn infer_category(title: &str) -> String {
    let lower = title.to_lowercase();
    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|k| lower.contains(k)) {
            return (*category).to_string();
        }
    }
    "Supplies".to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// LLM extractor
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmExtractor {
    pub llm: LlmClient,
}

#[async_trait]
impl TenderExtractor for LlmExtractor {
    async fn extract(
        &self,
        markdown: &str,
        _source_url: &str,
    ) -> Result<Vec<TenderDraft>, AppError> {
        let prompt = SCRAPE_EXTRACT_PROMPT_TEMPLATE
            .replace("{procurement_context}", KENYAN_PROCUREMENT_CONTEXT)
            .replace("{page_markdown}", markdown);
        self.llm
            .call_json::<Vec<TenderDraft>>(&prompt, SCRAPE_EXTRACT_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("Tender extraction failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
# Open Tenders

| # | Tender | Procuring Entity | Deadline |
|---|--------|------------------|----------|
| 1 | Supply of laptop computers | Ministry of ICT | 2025-07-01 |
| 2 | Construction of market sheds | Kisumu County | 2025-07-15 |

Closed tenders are listed elsewhere.
"#;

    #[tokio::test]
    async fn test_pattern_extracts_table_rows() {
        let extractor = PatternExtractor::new();
        let drafts = extractor
            .extract(LISTING, "https://www.mygov.go.ke/all-tenders")
            .await
            .unwrap();

        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].title, "Supply of laptop computers");
        assert_eq!(drafts[0].organization, "Ministry of ICT");
        assert_eq!(drafts[0].deadline, "2025-07-01");
        assert_eq!(drafts[1].title, "Construction of market sheds");
    }

    #[tokio::test]
    async fn test_pattern_skips_header_and_separator_rows() {
        let extractor = PatternExtractor::new();
        let drafts = extractor.extract(LISTING, "x").await.unwrap();
        assert!(drafts.iter().all(|d| d.title != "Tender"));
    }

    #[tokio::test]
    async fn test_pattern_handles_rows_without_numbering_column() {
        let markdown = "| Supply of seeds | Ministry of Agriculture | 2025-08-01 |";
        let extractor = PatternExtractor::new();
        let drafts = extractor.extract(markdown, "x").await.unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].organization, "Ministry of Agriculture");
    }

    #[tokio::test]
    async fn test_pattern_stamps_source_url() {
        let extractor = PatternExtractor::new();
        let drafts = extractor.extract(LISTING, "https://example.test").await.unwrap();
        assert_eq!(drafts[0].source_url.as_deref(), Some("https://example.test"));
    }

    #[test]
    fn test_infer_category_from_title_keywords() {
        assert_eq!(infer_category("Supply of laptop computers"), "ICT");
        assert_eq!(infer_category("Construction of market sheds"), "Construction");
        assert_eq!(infer_category("Provision of guarding services"), "Security");
        assert_eq!(infer_category("Assorted stationery"), "Supplies");
    }

    #[test]
    fn test_draft_deserializes_llm_element() {
        let json = r#"{
            "title": "Medical supplies",
            "description": "Assorted medical supplies for level 4 hospitals",
            "organization": "Ministry of Health",
            "category": "Medical",
            "location": "Nairobi",
            "budget_estimate": 5000000,
            "deadline": "2025-07-30",
            "source_url": "https://tenders.go.ke/t/123"
        }"#;
        let draft: TenderDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.category, "Medical");
        assert_eq!(draft.budget_estimate, Some(5_000_000));
    }

    #[test]
    fn test_draft_defaults_missing_fields() {
        // a sparse LLM element deserializes instead of sinking the batch
        let draft: TenderDraft = serde_json::from_str(r#"{"title": "Borehole drilling"}"#).unwrap();
        assert_eq!(draft.title, "Borehole drilling");
        assert_eq!(draft.deadline, "");
        assert!(draft.budget_estimate.is_none());
    }
}
