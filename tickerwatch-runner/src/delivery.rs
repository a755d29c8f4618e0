//! Webhook delivery — one POST per alert, success or failure, nothing more.
//!
//! Delivery is at-least-once: dedup state is persisted before delivery, so a
//! failed POST is logged and the alert still exists in the local artifact.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("webhook post failed: {0}")]
    Transport(String),

    #[error("webhook returned HTTP {0}")]
    Status(u16),
}

/// Anything that can carry an alert's text to a destination.
pub trait AlertSink: Send + Sync {
    fn deliver(&self, webhook: &str, text: &str) -> Result<(), DeliveryError>;
}

/// Plain HTTP webhook POST with a `{"content": ...}` body.
pub struct WebhookClient {
    client: reqwest::blocking::Client,
}

impl WebhookClient {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");
        Self { client }
    }
}

impl AlertSink for WebhookClient {
    fn deliver(&self, webhook: &str, text: &str) -> Result<(), DeliveryError> {
        let resp = self
            .client
            .post(webhook)
            .json(&serde_json::json!({ "content": text }))
            .send()
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(DeliveryError::Status(status.as_u16()))
        }
    }
}
