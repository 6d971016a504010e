// file: src/notify/smtp.rs
// description: authenticated, encrypted SMTP delivery via lettre
// reference: https://docs.rs/lettre

use super::{MailTransport, OutgoingEmail};
use crate::config::SmtpSettings;
use crate::error::{PipelineError, Result};
use async_trait::async_trait;
use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::time::Duration;
use tracing::debug;

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

pub struct SmtpMailer {
    settings: SmtpSettings,
}

impl SmtpMailer {
    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    fn build_message(settings: &SmtpSettings, email: &OutgoingEmail) -> Result<Message> {
        let from: Mailbox = settings.from.parse().map_err(|e| {
            PipelineError::Notification(format!("Invalid sender '{}': {}", settings.from, e))
        })?;
        let to: Mailbox = settings.recipient.parse().map_err(|e| {
            PipelineError::Notification(format!(
                "Invalid recipient '{}': {}",
                settings.recipient, e
            ))
        })?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(|e| PipelineError::Notification(format!("Failed to build email: {}", e)))
    }

    fn build_transport(settings: &SmtpSettings) -> Result<SmtpTransport> {
        let builder = if settings.starttls {
            SmtpTransport::starttls_relay(&settings.host)
        } else {
            SmtpTransport::relay(&settings.host)
        }
        .map_err(|e| PipelineError::Notification(format!("Invalid SMTP relay: {}", e)))?;

        Ok(builder
            .port(settings.port)
            .credentials(Credentials::new(
                settings.username.clone(),
                settings.password.clone(),
            ))
            .timeout(Some(SMTP_TIMEOUT))
            .build())
    }

    fn send_blocking(settings: &SmtpSettings, email: &OutgoingEmail) -> Result<()> {
        let message = Self::build_message(settings, email)?;
        let transport = Self::build_transport(settings)?;

        debug!(
            "Opening SMTP session to {}:{} (starttls={})",
            settings.host, settings.port, settings.starttls
        );
        transport
            .send(&message)
            .map_err(|e| PipelineError::Notification(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        let settings = self.settings.clone();
        let email = email.clone();

        tokio::task::spawn_blocking(move || Self::send_blocking(&settings, &email))
            .await
            .map_err(|e| PipelineError::Notification(format!("SMTP task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> SmtpSettings {
        SmtpSettings {
            host: "smtp.example.com".to_string(),
            port: 465,
            username: "bot@example.com".to_string(),
            password: "secret".to_string(),
            from: "Paper Bot <bot@example.com>".to_string(),
            recipient: "me@example.com".to_string(),
            starttls: false,
        }
    }

    fn email() -> OutgoingEmail {
        OutgoingEmail {
            subject: "arXiv digest: 1 new paper (2025-01-16)".to_string(),
            body: "Title: Qubits\n".to_string(),
        }
    }

    #[test]
    fn test_build_message() {
        let message = SmtpMailer::build_message(&settings(), &email()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("To: me@example.com"));
        assert!(raw.contains("Subject: arXiv digest: 1 new paper (2025-01-16)"));
    }

    #[test]
    fn test_invalid_recipient_is_notification_error() {
        let mut bad = settings();
        bad.recipient = "not an address".to_string();
        let err = SmtpMailer::build_message(&bad, &email()).unwrap_err();
        assert!(matches!(err, PipelineError::Notification(_)));
    }

    #[test]
    fn test_build_transport_for_both_tls_modes() {
        assert!(SmtpMailer::build_transport(&settings()).is_ok());
        let mut starttls = settings();
        starttls.starttls = true;
        starttls.port = 587;
        assert!(SmtpMailer::build_transport(&starttls).is_ok());
    }
}
