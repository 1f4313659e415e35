use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::billing::plans::find_plan;
use crate::billing::subscriptions::{activate_subscription, expire_lapsed, has_premium_access};
use crate::errors::AppError;
use crate::models::alert::ALERT_PAYMENT;
use crate::models::billing::{PaymentRow, PAYMENT_FAILED, PAYMENT_PENDING, PAYMENT_SUCCESS};
use crate::profiles::queries::find_profile;
use crate::state::AppState;
use crate::tenders::handlers::UserIdQuery;

#[derive(Debug, Deserialize)]
pub struct InitializePaymentRequest {
    pub user_id: Uuid,
    pub plan: String,
}

#[derive(Debug, Serialize)]
pub struct InitializePaymentResponse {
    pub authorization_url: String,
    pub reference: String,
}

/// POST /api/v1/billing/initialize
pub async fn initialize_payment(
    State(state): State<AppState>,
    Json(req): Json<InitializePaymentRequest>,
) -> Result<Json<InitializePaymentResponse>, AppError> {
    let plan = find_plan(&req.plan)
        .ok_or_else(|| AppError::Validation(format!("Unknown plan '{}'", req.plan)))?;
    let profile = find_profile(&state.db, req.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", req.user_id)))?;

    let reference = format!("TAP-{}", Uuid::new_v4().simple());

    // pending row first, so a verify for this reference always finds it
    sqlx::query(
        "INSERT INTO payments (user_id, reference, plan, amount, status) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(req.user_id)
    .bind(&reference)
    .bind(plan.code)
    .bind(plan.amount_kes)
    .bind(PAYMENT_PENDING)
    .execute(&state.db)
    .await?;

    let initialized = state
        .paystack
        .initialize_transaction(
            &profile.email,
            plan.amount_kes,
            &reference,
            json!({"user_id": req.user_id, "plan": plan.code}),
            state.config.paystack_callback_url.as_deref(),
        )
        .await
        .map_err(|e| AppError::Payment(e.to_string()))?;

    Ok(Json(InitializePaymentResponse {
        authorization_url: initialized.authorization_url,
        reference: initialized.reference,
    }))
}

#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
    pub reference: String,
}

#[derive(Debug, Serialize)]
pub struct PaymentStatusResponse {
    pub reference: String,
    pub status: String,
    pub plan: String,
    pub subscription_expires_at: Option<DateTime<Utc>>,
}

/// POST /api/v1/billing/verify
pub async fn verify_payment(
    State(state): State<AppState>,
    Json(req): Json<VerifyPaymentRequest>,
) -> Result<Json<PaymentStatusResponse>, AppError> {
    let outcome = settle_payment(&state, &req.reference).await?;
    Ok(Json(outcome))
}

/// Checks a reference against Paystack and applies the outcome. Safe to
/// call repeatedly: an already-successful payment short-circuits without
/// touching the subscription again.
async fn settle_payment(
    state: &AppState,
    reference: &str,
) -> Result<PaymentStatusResponse, AppError> {
    let payment: PaymentRow = sqlx::query_as("SELECT * FROM payments WHERE reference = $1")
        .bind(reference)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Payment {reference} not found")))?;

    if payment.status == PAYMENT_SUCCESS {
        let expiry: Option<DateTime<Utc>> = sqlx::query_scalar(
            "SELECT subscription_expires_at FROM profiles WHERE user_id = $1",
        )
        .bind(payment.user_id)
        .fetch_optional(&state.db)
        .await?
        .flatten();
        return Ok(PaymentStatusResponse {
            reference: payment.reference,
            status: payment.status,
            plan: payment.plan,
            subscription_expires_at: expiry,
        });
    }

    let verified = state
        .paystack
        .verify_transaction(reference)
        .await
        .map_err(|e| AppError::Payment(e.to_string()))?;

    if !verified.is_successful() {
        // only a hard failure is terminal; abandoned/pending stay pending
        let status = if verified.status == "failed" {
            sqlx::query("UPDATE payments SET status = $1 WHERE reference = $2")
                .bind(PAYMENT_FAILED)
                .bind(reference)
                .execute(&state.db)
                .await?;
            PAYMENT_FAILED.to_string()
        } else {
            warn!(reference, paystack_status = %verified.status, "payment not settled yet");
            verified.status
        };
        return Ok(PaymentStatusResponse {
            reference: payment.reference,
            status,
            plan: payment.plan,
            subscription_expires_at: None,
        });
    }

    let plan = find_plan(&payment.plan).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "Payment {reference} references unknown plan {}",
            payment.plan
        ))
    })?;

    let now = Utc::now();
    let new_expiry = activate_subscription(&state.db, payment.user_id, plan, now).await?;

    sqlx::query("UPDATE payments SET status = $1, paid_at = $2 WHERE reference = $3")
        .bind(PAYMENT_SUCCESS)
        .bind(now)
        .bind(reference)
        .execute(&state.db)
        .await?;

    sqlx::query(
        "INSERT INTO user_alerts (user_id, alert_type, title, message, data) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(payment.user_id)
    .bind(ALERT_PAYMENT)
    .bind("Payment received")
    .bind(format!(
        "Your {} subscription is active until {}",
        plan.code,
        new_expiry.format("%-d %b %Y")
    ))
    .bind(json!({
        "reference": reference,
        "plan": plan.code,
        "amount": payment.amount,
    }))
    .execute(&state.db)
    .await?;

    info!(reference, user_id = %payment.user_id, "payment settled");
    Ok(PaymentStatusResponse {
        reference: payment.reference,
        status: PAYMENT_SUCCESS.to_string(),
        plan: payment.plan,
        subscription_expires_at: Some(new_expiry),
    })
}

#[derive(Debug, Deserialize)]
pub struct PaystackWebhook {
    pub event: String,
    pub data: PaystackWebhookData,
}

#[derive(Debug, Deserialize)]
pub struct PaystackWebhookData {
    pub reference: String,
}

/// POST /api/v1/billing/webhook
///
/// Paystack redelivers on non-2xx. Unknown events and references are
/// acknowledged so they stop; real settlement failures return 500 to get
/// another delivery.
pub async fn paystack_webhook(
    State(state): State<AppState>,
    Json(payload): Json<PaystackWebhook>,
) -> Result<StatusCode, StatusCode> {
    info!(
        event = %payload.event,
        reference = %payload.data.reference,
        "paystack webhook received"
    );

    if payload.event != "charge.success" {
        return Ok(StatusCode::OK);
    }

    match settle_payment(&state, &payload.data.reference).await {
        Ok(_) => Ok(StatusCode::OK),
        Err(AppError::NotFound(msg)) => {
            warn!(reference = %payload.data.reference, %msg, "webhook for unknown payment");
            Ok(StatusCode::OK)
        }
        Err(err) => {
            error!(reference = %payload.data.reference, error = %err, "webhook settlement failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BillingStatusResponse {
    pub user_id: Uuid,
    pub subscription_tier: String,
    pub subscription_expires_at: Option<DateTime<Utc>>,
    pub is_founding_member: bool,
    pub founding_member_until: Option<DateTime<Utc>>,
    pub has_premium_access: bool,
}

/// GET /api/v1/billing/status
pub async fn billing_status(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<BillingStatusResponse>, AppError> {
    let profile = find_profile(&state.db, query.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {} not found", query.user_id)))?;

    let premium = has_premium_access(&profile, Utc::now());
    Ok(Json(BillingStatusResponse {
        user_id: profile.user_id,
        subscription_tier: profile.subscription_tier,
        subscription_expires_at: profile.subscription_expires_at,
        is_founding_member: profile.is_founding_member,
        founding_member_until: profile.founding_member_until,
        has_premium_access: premium,
    }))
}

#[derive(Debug, Serialize)]
pub struct SubscriptionSweepResponse {
    pub lapsed: u64,
}

/// POST /api/v1/admin/subscriptions/expire — lapse sweep for the external
/// scheduler.
pub async fn expire_subscriptions(
    State(state): State<AppState>,
) -> Result<Json<SubscriptionSweepResponse>, AppError> {
    let lapsed = expire_lapsed(&state.db).await?;
    info!(lapsed, "subscription expiry sweep finished");
    Ok(Json(SubscriptionSweepResponse { lapsed }))
}
