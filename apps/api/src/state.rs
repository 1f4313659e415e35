use sqlx::PgPool;

use crate::billing::paystack::PaystackClient;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::scraper::firecrawl::FirecrawlClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    pub paystack: PaystackClient,
    pub firecrawl: FirecrawlClient,
    pub config: Config,
}
