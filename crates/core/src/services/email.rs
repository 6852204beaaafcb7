//! Outbound email transport.

use std::sync::Arc;

use async_trait::async_trait;
use portfolio_common::AppResult;

/// Result of handing a message to the transport.
#[derive(Debug, Clone)]
pub struct DeliveryResult {
    /// Recipients the transport accepted the message for.
    pub accepted: usize,
}

/// Boundary for sending email. Implementations decide how mail actually
/// leaves the system.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    /// Send one HTML message to a set of recipients.
    async fn send(
        &self,
        recipients: &[String],
        subject: &str,
        html_body: &str,
    ) -> AppResult<DeliveryResult>;
}

/// Shared handle to the configured transport.
pub type Mailer = Arc<dyn EmailTransport>;

/// Transport that only logs. Used in development and as the default
/// until a real provider is wired in.
#[derive(Debug, Clone, Default)]
pub struct LogTransport;

#[async_trait]
impl EmailTransport for LogTransport {
    async fn send(
        &self,
        recipients: &[String],
        subject: &str,
        html_body: &str,
    ) -> AppResult<DeliveryResult> {
        tracing::info!(
            recipients = recipients.len(),
            subject,
            body_bytes = html_body.len(),
            "email send (log transport, not delivered)"
        );

        Ok(DeliveryResult {
            accepted: recipients.len(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_transport_accepts_all_recipients() {
        let transport = LogTransport;
        let recipients = vec!["a@x.com".to_string(), "b@x.com".to_string()];

        let result = transport
            .send(&recipients, "Subject", "<p>Hi</p>")
            .await
            .unwrap();

        assert_eq!(result.accepted, 2);
    }
}
