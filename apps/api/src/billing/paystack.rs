//! Minimal Paystack client: transaction initialize and verify.
//!
//! No retry layer. A failed call surfaces as a gateway error; the caller
//! (or Paystack's own webhook redelivery) drives any retry.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

const PAYSTACK_API_URL: &str = "https://api.paystack.co";

/// Paystack takes amounts in the currency subunit (KES cents).
const KES_SUBUNIT: i64 = 100;

#[derive(Debug, Error)]
pub enum PaystackError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Paystack API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Serialize)]
struct InitializeRequest<'a> {
    email: &'a str,
    amount: i64,
    reference: &'a str,
    currency: &'a str,
    metadata: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_url: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: bool,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InitializedTransaction {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifiedTransaction {
    /// Paystack's transaction state: `success`, `failed`, `abandoned`, ...
    pub status: String,
    pub reference: String,
    /// Subunit amount actually charged.
    pub amount: i64,
    #[serde(default)]
    pub paid_at: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl VerifiedTransaction {
    pub fn is_successful(&self) -> bool {
        self.status == "success"
    }

    pub fn amount_kes(&self) -> i64 {
        self.amount / KES_SUBUNIT
    }
}

#[derive(Clone)]
pub struct PaystackClient {
    client: Client,
    secret_key: String,
}

impl PaystackClient {
    pub fn new(secret_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            secret_key,
        }
    }

    /// Starts a checkout. The returned authorization URL is where the
    /// user completes payment.
    pub async fn initialize_transaction(
        &self,
        email: &str,
        amount_kes: i64,
        reference: &str,
        metadata: Value,
        callback_url: Option<&str>,
    ) -> Result<InitializedTransaction, PaystackError> {
        info!(reference, amount_kes, "initializing Paystack transaction");

        let response = self
            .client
            .post(format!("{PAYSTACK_API_URL}/transaction/initialize"))
            .bearer_auth(&self.secret_key)
            .json(&InitializeRequest {
                email,
                amount: amount_kes * KES_SUBUNIT,
                reference,
                currency: "KES",
                metadata,
                callback_url,
            })
            .send()
            .await?;

        self.unwrap_envelope(response).await
    }

    /// Looks up the authoritative state of a transaction by reference.
    pub async fn verify_transaction(
        &self,
        reference: &str,
    ) -> Result<VerifiedTransaction, PaystackError> {
        let response = self
            .client
            .get(format!("{PAYSTACK_API_URL}/transaction/verify/{reference}"))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        self.unwrap_envelope(response).await
    }

    async fn unwrap_envelope<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, PaystackError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PaystackError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: Envelope<T> = response.json().await?;
        match envelope.data {
            Some(data) if envelope.status => Ok(data),
            _ => Err(PaystackError::Api {
                status: status.as_u16(),
                message: envelope.message,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_envelope_parses() {
        let body = r#"{
            "status": true,
            "message": "Authorization URL created",
            "data": {
                "authorization_url": "https://checkout.paystack.com/abc123",
                "access_code": "abc123",
                "reference": "TAP-42"
            }
        }"#;
        let envelope: Envelope<InitializedTransaction> = serde_json::from_str(body).unwrap();
        assert!(envelope.status);
        let data = envelope.data.unwrap();
        assert_eq!(data.reference, "TAP-42");
        assert!(data.authorization_url.starts_with("https://checkout"));
    }

    #[test]
    fn test_verify_envelope_parses_success() {
        let body = r#"{
            "status": true,
            "message": "Verification successful",
            "data": {
                "status": "success",
                "reference": "TAP-42",
                "amount": 150000,
                "paid_at": "2025-06-01T10:00:00.000Z",
                "metadata": {"plan": "premium_monthly"}
            }
        }"#;
        let envelope: Envelope<VerifiedTransaction> = serde_json::from_str(body).unwrap();
        let data = envelope.data.unwrap();
        assert!(data.is_successful());
        assert_eq!(data.amount_kes(), 1_500);
    }

    #[test]
    fn test_verify_envelope_parses_failed_charge() {
        let body = r#"{
            "status": true,
            "message": "Verification successful",
            "data": {
                "status": "failed",
                "reference": "TAP-43",
                "amount": 150000
            }
        }"#;
        let envelope: Envelope<VerifiedTransaction> = serde_json::from_str(body).unwrap();
        let data = envelope.data.unwrap();
        assert!(!data.is_successful());
        assert!(data.paid_at.is_none());
    }

    #[test]
    fn test_error_envelope_without_data() {
        let body = r#"{"status": false, "message": "Transaction reference not found"}"#;
        let envelope: Envelope<VerifiedTransaction> = serde_json::from_str(body).unwrap();
        assert!(!envelope.status);
        assert!(envelope.data.is_none());
    }
}
