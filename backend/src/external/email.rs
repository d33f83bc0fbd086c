//! Email notification client
//!
//! Posts messages to a configurable mail API. Notifications are
//! fire-and-forget from the core's perspective: callers use
//! [`EmailClient::send_or_log`], which never fails the triggering
//! operation. With an empty endpoint the client only logs, which keeps
//! development environments mail-free.

use reqwest::Client;
use serde::Serialize;

use crate::config::EmailConfig;
use crate::error::{AppError, AppResult};

/// Outbound email client
#[derive(Clone)]
pub struct EmailClient {
    client: Client,
    api_endpoint: String,
    api_key: String,
    from_address: String,
}

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

impl EmailClient {
    pub fn new(config: &EmailConfig) -> Self {
        Self {
            client: Client::new(),
            api_endpoint: config.api_endpoint.clone(),
            api_key: config.api_key.clone(),
            from_address: config.from_address.clone(),
        }
    }

    /// Send one message through the mail API
    pub async fn send(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        if self.api_endpoint.is_empty() {
            tracing::info!(to, subject, "Email delivery disabled; skipping send");
            return Ok(());
        }

        let request = SendEmailRequest {
            from: &self.from_address,
            to,
            subject,
            body,
        };

        let response = self
            .client
            .post(&self.api_endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::NotificationError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::NotificationError(format!(
                "mail API returned {}",
                response.status()
            )));
        }

        Ok(())
    }

    /// Fire-and-forget send: a delivery failure is logged for operational
    /// visibility and never rolls back the state transition that
    /// triggered it.
    pub async fn send_or_log(&self, to: &str, subject: &str, body: &str) {
        if let Err(error) = self.send(to, subject, body).await {
            tracing::warn!(to, subject, %error, "Failed to send notification email");
        }
    }
}
