// LLM prompt constants for scrape extraction (llm mode).

/// System prompt for tender extraction — enforces JSON-array-only output.
pub const SCRAPE_EXTRACT_SYSTEM: &str =
    "You are a data extraction engine for Kenyan government tender notices. \
    Extract every tender from the page into a JSON array. \
    You MUST respond with a valid JSON array only. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences. \
    Return [] if the page contains no tenders.";

/// Extraction prompt template. Replace `{procurement_context}` and
/// `{page_markdown}` before sending.
pub const SCRAPE_EXTRACT_PROMPT_TEMPLATE: &str = r#"Extract all open government tenders from the following page.

{procurement_context}

Return a JSON array where each element has this EXACT schema:
{
  "title": "Supply and delivery of laptop computers",
  "description": "Full description as given, or the title if none",
  "organization": "Procuring entity name",
  "category": "ICT" | "Construction" | "Supplies" | "Consultancy" | "Medical" | "Agriculture" | "Transport" | "Security" | "Energy",
  "location": "County name, or \"National\" for national tenders",
  "budget_estimate": 5000000,
  "deadline": "YYYY-MM-DD",
  "source_url": "link to the tender detail page, or null"
}

Rules:
- One element per distinct tender notice.
- budget_estimate is whole Kenyan Shillings; use null when the notice does not state one.
- deadline must be the submission deadline in YYYY-MM-DD form; skip notices with no discernible deadline.
- Do not invent tenders, amounts, or dates that are not on the page.

PAGE CONTENT:
{page_markdown}"#;
