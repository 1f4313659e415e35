//! Minimal Firecrawl client — fetches a rendered page as markdown.
//!
//! One attempt per call, no retry: a failed scrape surfaces to the caller
//! as a gateway error and the next scheduled run tries again.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

const FIRECRAWL_API_URL: &str = "https://api.firecrawl.dev/v1/scrape";

#[derive(Debug, Error)]
pub enum FirecrawlError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Firecrawl API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Firecrawl returned no markdown for {0}")]
    EmptyContent(String),
}

#[derive(Debug, Serialize)]
struct ScrapeRequest<'a> {
    url: &'a str,
    formats: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    success: bool,
    #[serde(default)]
    data: Option<ScrapeData>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScrapeData {
    #[serde(default)]
    markdown: Option<String>,
}

#[derive(Clone)]
pub struct FirecrawlClient {
    client: Client,
    api_key: String,
}

impl FirecrawlClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Fetches `url` rendered to markdown.
    pub async fn scrape_markdown(&self, url: &str) -> Result<String, FirecrawlError> {
        info!(url, "fetching page via Firecrawl");

        let response = self
            .client
            .post(FIRECRAWL_API_URL)
            .bearer_auth(&self.api_key)
            .json(&ScrapeRequest {
                url,
                formats: vec!["markdown"],
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(FirecrawlError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ScrapeResponse = response.json().await?;
        if !parsed.success {
            return Err(FirecrawlError::Api {
                status: status.as_u16(),
                message: parsed.error.unwrap_or_else(|| "unknown error".to_string()),
            });
        }

        parsed
            .data
            .and_then(|d| d.markdown)
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| FirecrawlError::EmptyContent(url.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_response_parses_markdown() {
        let body = r#"{
            "success": true,
            "data": {"markdown": "| Supply of laptops | Ministry of ICT | 2025-07-01 |"}
        }"#;
        let parsed: ScrapeResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.success);
        assert!(parsed.data.unwrap().markdown.unwrap().contains("laptops"));
    }

    #[test]
    fn test_scrape_response_parses_error_envelope() {
        let body = r#"{"success": false, "error": "Page timed out"}"#;
        let parsed: ScrapeResponse = serde_json::from_str(body).unwrap();
        assert!(!parsed.success);
        assert_eq!(parsed.error.as_deref(), Some("Page timed out"));
    }

    #[test]
    fn test_scrape_response_tolerates_missing_data() {
        let body = r#"{"success": true}"#;
        let parsed: ScrapeResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.data.is_none());
    }
}
