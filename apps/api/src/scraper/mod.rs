//! Scraper pipeline: fetch a rendered listing page as markdown through
//! Firecrawl, extract tender drafts (regex table rows or LLM), then
//! ingest with exact-title dedup.

pub mod extract;
pub mod firecrawl;
pub mod handlers;
pub mod ingest;
pub mod prompts;

use crate::scraper::extract::ExtractionMode;

/// A named scrape target. Adding a source is adding an entry here.
#[derive(Debug, Clone, Copy)]
pub struct ScrapeSource {
    pub name: &'static str,
    pub url: &'static str,
    pub mode: ExtractionMode,
}

pub const SOURCES: &[ScrapeSource] = &[
    ScrapeSource {
        name: "mygov",
        url: "https://www.mygov.go.ke/all-tenders",
        mode: ExtractionMode::Pattern,
    },
    ScrapeSource {
        name: "tenders-go-ke",
        url: "https://tenders.go.ke/tenders",
        mode: ExtractionMode::Llm,
    },
];

pub fn find_source(name: &str) -> Option<&'static ScrapeSource> {
    SOURCES.iter().find(|s| s.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_sources_resolve() {
        assert!(find_source("mygov").is_some());
        assert!(find_source("tenders-go-ke").is_some());
        assert!(find_source("unknown-portal").is_none());
    }

    #[test]
    fn test_mygov_uses_pattern_mode() {
        assert_eq!(find_source("mygov").unwrap().mode, ExtractionMode::Pattern);
    }
}
