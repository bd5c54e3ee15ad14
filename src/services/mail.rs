//! # Mail
//!
//! Outbound mail goes through SMTP (STARTTLS + login). There is no
//! receiving side: the inbox is a permanently empty list because a full
//! IMAP/POP3 client is out of scope.
//!
//! ```text
//! MailService
//! ├── transport: Arc<dyn MailTransport>   // SMTP or Unconfigured
//! ├── sender_email
//! ├── inbox: Vec<MailMessage>             // always empty
//! └── sent: Vec<MailMessage>              // appended on successful send
//! ```
//!
//! The send itself runs on a background task; the reducer only records the
//! outcome via `record_sent`.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use log::info;
use serde::{Deserialize, Serialize};

use crate::core::config::SmtpSettings;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub enum MailError {
    /// No SMTP settings, or an address that does not parse.
    Config(String),
    /// SMTP conversation failed.
    Transport(String),
}

impl fmt::Display for MailError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MailError::Config(msg) => write!(f, "mail config error: {msg}"),
            MailError::Transport(msg) => write!(f, "SMTP error: {msg}"),
        }
    }
}

impl std::error::Error for MailError {}

/// A message handed to the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// A message as it appears in the sent list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub timestamp: String,
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    fn name(&self) -> &str;

    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

/// Used when SMTP settings are incomplete. Every send fails.
pub struct Unconfigured;

#[async_trait]
impl MailTransport for Unconfigured {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn send(&self, _mail: &OutgoingMail) -> Result<(), MailError> {
        Err(MailError::Config(
            "SMTP is not configured (set SMTP_SERVER, SMTP_USERNAME, SMTP_PASSWORD)".to_string(),
        ))
    }
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    server: String,
}

impl SmtpMailer {
    pub fn new(settings: &SmtpSettings) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.server)
            .map_err(|e| MailError::Config(e.to_string()))?
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .build();
        Ok(Self {
            transport,
            server: settings.server.clone(),
        })
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|e| MailError::Config(format!("invalid address '{}': {}", address.trim(), e)))
}

/// Build the RFC 5322 message (plain text body).
pub fn build_message(mail: &OutgoingMail) -> Result<Message, MailError> {
    Message::builder()
        .from(parse_mailbox(&mail.from)?)
        .to(parse_mailbox(&mail.to)?)
        .subject(mail.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(mail.body.clone())
        .map_err(|e| MailError::Config(e.to_string()))
}

#[async_trait]
impl MailTransport for SmtpMailer {
    fn name(&self) -> &str {
        "smtp"
    }

    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let message = build_message(mail)?;
        info!("Sending mail to {} via {}", mail.to, self.server);
        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| MailError::Transport(e.to_string()))
    }
}

/// Build the transport for the resolved settings, falling back to `Unconfigured`.
pub fn build_transport(settings: Option<&SmtpSettings>) -> Arc<dyn MailTransport> {
    match settings {
        Some(settings) => match SmtpMailer::new(settings) {
            Ok(mailer) => Arc::new(mailer),
            Err(e) => {
                log::warn!("SMTP setup failed: {}", e);
                Arc::new(Unconfigured)
            }
        },
        None => Arc::new(Unconfigured),
    }
}

pub struct MailService {
    pub transport: Arc<dyn MailTransport>,
    pub sender_email: String,
    pub inbox: Vec<MailMessage>,
    pub sent: Vec<MailMessage>,
}

impl MailService {
    pub fn new(transport: Arc<dyn MailTransport>, sender_email: String) -> Self {
        Self {
            transport,
            sender_email,
            inbox: Vec::new(),
            sent: Vec::new(),
        }
    }

    /// Prepare a message from this service's sender.
    pub fn compose(&self, to: &str, subject: &str, body: &str) -> Result<OutgoingMail, String> {
        let to = to.trim();
        if to.is_empty() {
            return Err("Failed to send message: recipient is empty".to_string());
        }
        Ok(OutgoingMail {
            from: self.sender_email.clone(),
            to: to.to_string(),
            subject: subject.trim().to_string(),
            body: body.to_string(),
        })
    }

    /// Send and record in one call.
    pub async fn send_message(&mut self, to: &str, subject: &str, body: &str) -> String {
        let mail = match self.compose(to, subject, body) {
            Ok(mail) => mail,
            Err(msg) => return msg,
        };
        let outcome = self.transport.send(&mail).await;
        self.record_sent(mail, outcome)
    }

    /// Apply the outcome of a send. Only successes land in `sent`.
    pub fn record_sent(&mut self, mail: OutgoingMail, outcome: Result<(), MailError>) -> String {
        match outcome {
            Ok(()) => {
                self.sent.push(MailMessage {
                    from: mail.from,
                    to: mail.to,
                    subject: mail.subject,
                    body: mail.body,
                    timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
                });
                "Message sent successfully!".to_string()
            }
            Err(e) => format!("Failed to send message: {e}"),
        }
    }

    pub fn get_inbox(&self) -> &[MailMessage] {
        &self.inbox
    }

    pub fn get_sent_items(&self) -> &[MailMessage] {
        &self.sent
    }

    pub fn clear_inbox(&mut self) -> String {
        self.inbox.clear();
        "Inbox cleared.".to_string()
    }

    pub fn clear_sent_items(&mut self) -> String {
        self.sent.clear();
        "Sent items cleared.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every message instead of sending it.
    #[derive(Default)]
    struct RecordingTransport {
        delivered: Mutex<Vec<OutgoingMail>>,
    }

    #[async_trait]
    impl MailTransport for RecordingTransport {
        fn name(&self) -> &str {
            "recording"
        }

        async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
            self.delivered.lock().unwrap().push(mail.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_send_records_sent_item() {
        let transport = Arc::new(RecordingTransport::default());
        let mut service = MailService::new(transport.clone(), "me@example.com".to_string());

        let msg = service.send_message("you@example.com", "Hi", "Hello there").await;
        assert_eq!(msg, "Message sent successfully!");
        assert_eq!(service.get_sent_items().len(), 1);
        assert_eq!(service.get_sent_items()[0].to, "you@example.com");
        assert_eq!(service.get_sent_items()[0].from, "me@example.com");
        assert_eq!(transport.delivered.lock().unwrap().len(), 1);
        assert!(service.get_inbox().is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_send_fails_and_records_nothing() {
        let mut service = MailService::new(Arc::new(Unconfigured), "me@example.com".to_string());
        let msg = service.send_message("you@example.com", "Hi", "Body").await;
        assert!(msg.starts_with("Failed to send message:"));
        assert!(service.get_sent_items().is_empty());
    }

    #[tokio::test]
    async fn test_empty_recipient_rejected() {
        let mut service = MailService::new(
            Arc::new(RecordingTransport::default()),
            "me@example.com".to_string(),
        );
        let msg = service.send_message("  ", "Hi", "Body").await;
        assert!(msg.contains("recipient is empty"));
        assert!(service.get_sent_items().is_empty());
    }

    #[test]
    fn test_clear_messages() {
        let mut service = MailService::new(Arc::new(Unconfigured), "me@example.com".to_string());
        let mail = service.compose("a@b.c", "s", "b").unwrap();
        service.record_sent(mail, Ok(()));
        assert_eq!(service.clear_sent_items(), "Sent items cleared.");
        assert!(service.sent.is_empty());
        assert_eq!(service.clear_inbox(), "Inbox cleared.");
    }

    #[test]
    fn test_build_message_rejects_bad_address() {
        let mail = OutgoingMail {
            from: "me@example.com".to_string(),
            to: "not an address".to_string(),
            subject: "s".to_string(),
            body: "b".to_string(),
        };
        assert!(matches!(build_message(&mail), Err(MailError::Config(_))));
    }

    #[test]
    fn test_build_message_accepts_valid_addresses() {
        let mail = OutgoingMail {
            from: "me@example.com".to_string(),
            to: "you@example.com".to_string(),
            subject: "Greetings".to_string(),
            body: "Hello".to_string(),
        };
        assert!(build_message(&mail).is_ok());
    }
}
