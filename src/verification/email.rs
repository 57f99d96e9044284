//! Outbound email collaborator
//!
//! The issuer only needs `send`; the concrete provider lives behind this
//! trait so tests can observe or fail dispatch deterministically.

use async_trait::async_trait;

/// Narrow contract for the external email service
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), String>;
}

/// Development sender that logs instead of dispatching
pub struct TracingEmailSender;

#[async_trait]
impl EmailSender for TracingEmailSender {
    async fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), String> {
        tracing::info!(to, subject, body_len = html_body.len(), "email dispatched (log only)");
        Ok(())
    }
}

/// Test sender that always fails dispatch
pub struct FailingEmailSender;

#[async_trait]
impl EmailSender for FailingEmailSender {
    async fn send(&self, _to: &str, _subject: &str, _html_body: &str) -> Result<(), String> {
        Err("provider rejected the message".to_string())
    }
}
