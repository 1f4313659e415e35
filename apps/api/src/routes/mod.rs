pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::state::AppState;
use crate::{
    analysis, billing, consortiums, matching, notifications, profiles, rfqs, scraper, tenders,
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Tender browsing
        .route("/api/v1/tenders", get(tenders::handlers::list_tenders))
        .route("/api/v1/tenders/saved", get(tenders::handlers::list_saved))
        .route("/api/v1/tenders/:id", get(tenders::handlers::get_tender))
        .route(
            "/api/v1/tenders/:id/save",
            post(tenders::handlers::save_tender).delete(tenders::handlers::unsave_tender),
        )
        // Decision support
        .route(
            "/api/v1/tenders/:id/win-probability",
            post(analysis::handlers::win_probability),
        )
        .route(
            "/api/v1/tenders/:id/analysis",
            post(analysis::handlers::bid_analysis),
        )
        // Matching
        .route("/api/v1/matches", get(matching::handlers::list_matches))
        // Profiles & preferences
        .route(
            "/api/v1/profile",
            get(profiles::handlers::get_profile).put(profiles::handlers::put_profile),
        )
        .route(
            "/api/v1/preferences",
            get(profiles::handlers::get_preferences).put(profiles::handlers::put_preferences),
        )
        // Alerts
        .route("/api/v1/alerts", get(notifications::handlers::list_alerts))
        .route(
            "/api/v1/alerts/unread-count",
            get(notifications::handlers::unread_count),
        )
        .route(
            "/api/v1/alerts/read-all",
            post(notifications::handlers::read_all),
        )
        .route(
            "/api/v1/alerts/:id/read",
            patch(notifications::handlers::mark_read),
        )
        // Billing
        .route(
            "/api/v1/billing/initialize",
            post(billing::handlers::initialize_payment),
        )
        .route(
            "/api/v1/billing/verify",
            post(billing::handlers::verify_payment),
        )
        .route(
            "/api/v1/billing/webhook",
            post(billing::handlers::paystack_webhook),
        )
        .route(
            "/api/v1/billing/status",
            get(billing::handlers::billing_status),
        )
        // Consortiums
        .route(
            "/api/v1/consortiums",
            get(consortiums::handlers::list_consortiums)
                .post(consortiums::handlers::create_consortium),
        )
        .route(
            "/api/v1/consortiums/:id",
            get(consortiums::handlers::get_consortium),
        )
        .route(
            "/api/v1/consortiums/:id/join",
            post(consortiums::handlers::join_consortium),
        )
        .route(
            "/api/v1/consortiums/:id/leave",
            post(consortiums::handlers::leave_consortium),
        )
        .route(
            "/api/v1/consortiums/:id/close",
            post(consortiums::handlers::close_consortium),
        )
        // RFQs
        .route(
            "/api/v1/rfqs",
            get(rfqs::handlers::list_rfqs).post(rfqs::handlers::create_rfq),
        )
        .route("/api/v1/rfqs/:id", get(rfqs::handlers::get_rfq))
        .route("/api/v1/rfqs/:id/close", post(rfqs::handlers::close_rfq))
        // Scheduler hooks
        .route(
            "/api/v1/admin/matching/run",
            post(matching::handlers::run_batch),
        )
        .route("/api/v1/admin/scrape", post(scraper::handlers::scrape))
        .route(
            "/api/v1/admin/tenders/expire",
            post(tenders::handlers::expire_tenders),
        )
        .route(
            "/api/v1/admin/subscriptions/expire",
            post(billing::handlers::expire_subscriptions),
        )
        .with_state(state)
}
