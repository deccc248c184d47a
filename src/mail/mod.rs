//! Notification collaborator
//!
//! Successful creates dispatch a notification mail. Delivery is strictly
//! best-effort: the write pipeline spawns the send off the request path and
//! a failure lands in the log, never in the caller's result.

use std::sync::{Arc, RwLock};

use thiserror::Error;

/// Notification errors. These never cross the write-pipeline boundary.
#[derive(Debug, Clone, Error)]
pub enum MailError {
    #[error("Invalid mail address: {0}")]
    Address(String),

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("Mail transport failure: {0}")]
    Transport(String),
}

/// Mail configuration
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// SMTP server host
    pub smtp_host: String,

    /// SMTP server port
    pub smtp_port: u16,

    /// SMTP username (empty = unauthenticated local relay)
    pub smtp_user: String,

    /// SMTP password (should come from secrets)
    pub smtp_password: String,

    /// From address
    pub from_email: String,

    /// From display name
    pub from_name: String,

    /// Recipient for catalog notifications
    pub to_email: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_user: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@catalogd.local".to_string(),
            from_name: "catalogd".to_string(),
            to_email: "catalog@catalogd.local".to_string(),
        }
    }
}

/// Notification sender abstraction
pub trait Notifier: Send + Sync {
    /// Send one notification
    fn send(&self, subject: &str, body: &str) -> Result<(), MailError>;
}

/// Recording notifier for tests
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    /// Sent (subject, body) pairs
    pub sent: RwLock<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sends observed
    pub fn sent_count(&self) -> usize {
        self.sent.read().map(|s| s.len()).unwrap_or(0)
    }

    /// Snapshot of the sends observed so far
    pub fn sent_messages(&self) -> Vec<(String, String)> {
        self.sent.read().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, subject: &str, body: &str) -> Result<(), MailError> {
        self.sent
            .write()
            .map_err(|e| MailError::Transport(e.to_string()))?
            .push((subject.to_string(), body.to_string()));
        Ok(())
    }
}

/// SMTP notifier
pub struct SmtpNotifier {
    config: MailConfig,
}

impl SmtpNotifier {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }
}

impl Notifier for SmtpNotifier {
    fn send(&self, subject: &str, body: &str) -> Result<(), MailError> {
        use lettre::{
            message::header::ContentType, transport::smtp::authentication::Credentials, Message,
            SmtpTransport, Transport,
        };

        let email = Message::builder()
            .from(
                format!("{} <{}>", self.config.from_name, self.config.from_email)
                    .parse()
                    .map_err(|e| MailError::Address(format!("from: {e}")))?,
            )
            .to(self
                .config
                .to_email
                .parse()
                .map_err(|e| MailError::Address(format!("to: {e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| MailError::Build(e.to_string()))?;

        let mailer = if self.config.smtp_user.is_empty() {
            // No authentication (for local development SMTP servers)
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_user.clone(),
                self.config.smtp_password.clone(),
            );
            SmtpTransport::relay(&self.config.smtp_host)
                .map_err(|e| MailError::Transport(e.to_string()))?
                .credentials(creds)
                .port(self.config.smtp_port)
                .build()
        };

        mailer
            .send(&email)
            .map_err(|e| MailError::Transport(e.to_string()))?;

        Ok(())
    }
}

/// Create a notifier from an optional config; no config means a recording
/// sink (tests, local development without a relay).
pub fn create_notifier(config: Option<MailConfig>) -> Arc<dyn Notifier> {
    match config {
        Some(cfg) => Arc::new(SmtpNotifier::new(cfg)),
        None => Arc::new(RecordingNotifier::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_notifier_captures_messages() {
        let notifier = RecordingNotifier::new();
        notifier.send("New catalog item", "created").unwrap();
        notifier.send("Second", "also created").unwrap();

        assert_eq!(notifier.sent_count(), 2);
        let sent = notifier.sent_messages();
        assert_eq!(sent[0].0, "New catalog item");
        assert_eq!(sent[1].1, "also created");
    }

    #[test]
    fn test_create_notifier_defaults_to_recording() {
        let notifier = create_notifier(None);
        assert!(notifier.send("s", "b").is_ok());
    }
}
