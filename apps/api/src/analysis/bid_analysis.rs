//! AI bid analysis — structured tender advice via the LLM, with a static
//! category checklist when the call fails. Callers always get an answer;
//! the `source` field says which path produced it.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analysis::prompts::{BID_ANALYSIS_PROMPT_TEMPLATE, BID_ANALYSIS_SYSTEM};
use crate::llm_client::prompts::KENYAN_PROCUREMENT_CONTEXT;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::tender::TenderRow;

pub const SOURCE_AI: &str = "ai";
pub const SOURCE_FALLBACK: &str = "fallback";

/// Structured advice for one tender. The LLM fills everything except
/// `source`, which is stamped on this side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BidAnalysis {
    pub summary: String,
    pub key_requirements: Vec<String>,
    pub required_documents: Vec<String>,
    pub risk_factors: Vec<String>,
    pub evaluation_criteria: Vec<String>,
    pub competition_estimate: String,
    pub recommendation: String,
    #[serde(default)]
    pub source: String,
}

/// Analyzes a tender, falling back to the static checklist on any LLM
/// failure.
pub async fn analyze_tender(llm: &LlmClient, tender: &TenderRow) -> BidAnalysis {
    match llm_analysis(llm, tender).await {
        Ok(analysis) => analysis,
        Err(err) => {
            warn!(tender_id = %tender.id, error = %err, "bid analysis LLM call failed, serving fallback");
            fallback_analysis(tender)
        }
    }
}

async fn llm_analysis(llm: &LlmClient, tender: &TenderRow) -> Result<BidAnalysis, LlmError> {
    let budget = tender
        .budget_estimate
        .map(|b| b.to_string())
        .unwrap_or_else(|| "not stated".to_string());

    let prompt = BID_ANALYSIS_PROMPT_TEMPLATE
        .replace("{procurement_context}", KENYAN_PROCUREMENT_CONTEXT)
        .replace("{title}", &tender.title)
        .replace("{organization}", &tender.organization)
        .replace("{category}", &tender.category)
        .replace("{location}", &tender.location)
        .replace("{budget}", &budget)
        .replace("{deadline}", &tender.deadline.to_rfc3339())
        .replace("{description}", &tender.description);

    let mut analysis = llm
        .call_json::<BidAnalysis>(&prompt, BID_ANALYSIS_SYSTEM)
        .await?;
    analysis.source = SOURCE_AI.to_string();
    Ok(analysis)
}

/// Static category-based checklist used when no LLM answer is available.
pub fn fallback_analysis(tender: &TenderRow) -> BidAnalysis {
    let mut required_documents = vec![
        "Certificate of incorporation or business registration".to_string(),
        "Valid KRA tax compliance certificate".to_string(),
        "CR12 form or equivalent ownership disclosure".to_string(),
        "Company profile and duly filled tender forms".to_string(),
    ];

    let (sector_doc, competition_estimate) = match tender.category.to_lowercase().as_str() {
        "construction" => (
            Some("Current NCA registration certificate in the relevant class"),
            "High",
        ),
        "medical" => (
            Some("Pharmacy and Poisons Board licence where items are regulated"),
            "Moderate",
        ),
        "ict" => (
            Some("Manufacturer authorization or partner certificates where applicable"),
            "Moderate",
        ),
        "supplies" => (None, "High"),
        "consultancy" => (None, "Moderate"),
        _ => (None, "Moderate"),
    };
    if let Some(doc) = sector_doc {
        required_documents.push(doc.to_string());
    }

    BidAnalysis {
        summary: format!(
            "{} invites bids for \"{}\" in {}. Automated analysis was unavailable, \
            so this is the standard checklist for {} tenders.",
            tender.organization, tender.title, tender.location, tender.category
        ),
        key_requirements: vec![
            format!("Eligibility to supply {} goods or services", tender.category),
            "Compliance with the Public Procurement and Asset Disposal Act, 2015".to_string(),
        ],
        required_documents,
        risk_factors: vec![
            "Notice not individually reviewed; confirm every requirement against the full tender document"
                .to_string(),
        ],
        evaluation_criteria: vec![
            "Mandatory preliminary compliance, then technical and financial evaluation".to_string(),
        ],
        competition_estimate: competition_estimate.to_string(),
        recommendation: "Obtain and review the full tender document before committing resources to a bid."
            .to_string(),
        source: SOURCE_FALLBACK.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn make_tender(category: &str) -> TenderRow {
        let now = Utc::now();
        TenderRow {
            id: Uuid::new_v4(),
            title: "Perimeter wall construction".to_string(),
            description: "Construction of a perimeter wall and gatehouse".to_string(),
            organization: "Kiambu County Government".to_string(),
            category: category.to_string(),
            location: "Kiambu".to_string(),
            budget_estimate: Some(8_000_000),
            deadline: now + Duration::days(21),
            status: "active".to_string(),
            source_url: None,
            created_at: now,
        }
    }

    #[test]
    fn test_fallback_is_labelled_fallback() {
        let analysis = fallback_analysis(&make_tender("Construction"));
        assert_eq!(analysis.source, SOURCE_FALLBACK);
        assert!(!analysis.summary.is_empty());
        assert!(!analysis.required_documents.is_empty());
    }

    #[test]
    fn test_fallback_adds_sector_document_for_construction() {
        let analysis = fallback_analysis(&make_tender("Construction"));
        assert!(analysis
            .required_documents
            .iter()
            .any(|d| d.contains("NCA")));
        assert_eq!(analysis.competition_estimate, "High");
    }

    #[test]
    fn test_fallback_unknown_category_keeps_base_documents() {
        let analysis = fallback_analysis(&make_tender("Aviation"));
        assert_eq!(analysis.required_documents.len(), 4);
        assert_eq!(analysis.competition_estimate, "Moderate");
    }

    #[test]
    fn test_analysis_deserializes_without_source_field() {
        // the LLM response carries no `source`; serde must default it
        let json = r#"{
            "summary": "Wall construction tender",
            "key_requirements": ["NCA 6 or above"],
            "required_documents": ["Tax compliance certificate"],
            "risk_factors": ["Rainy season delays"],
            "evaluation_criteria": ["Technical 70%, financial 30%"],
            "competition_estimate": "High",
            "recommendation": "Bid with a joint-venture partner"
        }"#;
        let analysis: BidAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.source, "");
        assert_eq!(analysis.competition_estimate, "High");
    }
}
