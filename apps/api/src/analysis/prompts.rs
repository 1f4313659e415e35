// LLM prompt constants for bid analysis.
// Cross-cutting fragments live in llm_client::prompts.

/// System prompt for bid analysis — enforces JSON-only output.
pub const BID_ANALYSIS_SYSTEM: &str =
    "You are an expert Kenyan public-procurement bid consultant. \
    Analyze a government tender notice and advise a prospective bidder. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT invent requirements that are not implied by the notice.";

/// Bid analysis prompt template. Replace `{procurement_context}`,
/// `{title}`, `{organization}`, `{category}`, `{location}`, `{budget}`,
/// `{deadline}`, `{description}` before sending.
pub const BID_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the following Kenyan government tender for a prospective bidder.

{procurement_context}

Return a JSON object with this EXACT schema (no extra fields):
{
  "summary": "One-paragraph plain-language summary of what is being procured",
  "key_requirements": [
    "Registered supplier of medical consumables"
  ],
  "required_documents": [
    "Certificate of incorporation",
    "Valid tax compliance certificate"
  ],
  "risk_factors": [
    "Short delivery window relative to scope"
  ],
  "evaluation_criteria": [
    "Technical capacity 60%, financial 40% (typical where unstated)"
  ],
  "competition_estimate": "Low" | "Moderate" | "High",
  "recommendation": "Bid / bid with partner / do not bid, with one-sentence rationale"
}

Ground every field in the notice text. Where the notice is silent, state
the standard Kenyan public-procurement expectation (PPRA rules, AGPO set-asides,
tax compliance, bid security) rather than inventing specifics.

TENDER NOTICE:
Title: {title}
Procuring organization: {organization}
Category: {category}
Location: {location}
Budget estimate (KES): {budget}
Submission deadline: {deadline}

Description:
{description}"#;
