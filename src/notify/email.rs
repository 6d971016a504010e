// file: src/notify/email.rs
// description: digest composition and best-effort delivery
// reference: notification failures never roll back the seen cache

use super::{MailTransport, SmtpMailer};
use crate::config::Config;
use crate::models::Paper;
use crate::utils::Validator;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{debug, error, info};

const SUMMARY_CHARS: usize = 600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// Nothing to send or no complete mail configuration.
    Skipped,
    Sent,
    Failed,
}

pub fn format_entry(paper: &Paper) -> String {
    let excerpt = Validator::truncate_text(paper.abstract_text.trim(), SUMMARY_CHARS);
    format!(
        "Title: {}\nAuthors: {}\nDate: {}\nLink: {}\nSummary: {}\n{}\n",
        paper.title.trim(),
        paper.authors_line(),
        paper.published.format("%Y-%m-%dT%H:%M:%SZ"),
        paper.link,
        excerpt,
        "-".repeat(80)
    )
}

/// Papers are listed in discovery order.
pub fn compose_email(papers: &[Paper], date: NaiveDate) -> OutgoingEmail {
    let plural = if papers.len() == 1 { "" } else { "s" };
    let subject = format!(
        "arXiv digest: {} new paper{} ({})",
        papers.len(),
        plural,
        date
    );

    let mut body = format!(
        "{} new relevant paper{} found on {}.\n\n",
        papers.len(),
        plural,
        date
    );
    for paper in papers {
        body.push_str(&format_entry(paper));
        body.push('\n');
    }

    OutgoingEmail { subject, body }
}

pub struct Notifier {
    transport: Option<Arc<dyn MailTransport>>,
}

impl Notifier {
    pub fn new(transport: Arc<dyn MailTransport>) -> Self {
        Self {
            transport: Some(transport),
        }
    }

    pub fn disabled() -> Self {
        Self { transport: None }
    }

    pub fn from_config(config: &Config) -> Self {
        match config.smtp_settings() {
            Some(settings) => {
                debug!(
                    "Email notification enabled via {}:{}",
                    settings.host, settings.port
                );
                Self::new(Arc::new(SmtpMailer::new(settings)))
            }
            None => {
                if config.email.is_some() {
                    info!("Email configuration incomplete, notification disabled");
                } else {
                    debug!("No email configuration, notification disabled");
                }
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    pub async fn notify(&self, papers: &[Paper]) -> NotifyOutcome {
        if papers.is_empty() {
            debug!("No new papers, skipping notification");
            return NotifyOutcome::Skipped;
        }

        let Some(transport) = &self.transport else {
            return NotifyOutcome::Skipped;
        };

        let email = compose_email(papers, Utc::now().date_naive());
        match transport.send(&email).await {
            Ok(()) => {
                info!("Sent digest email with {} papers", papers.len());
                NotifyOutcome::Sent
            }
            Err(e) => {
                error!(
                    "Failed to send digest email, {} papers stay marked as seen: {}",
                    papers.len(),
                    e
                );
                NotifyOutcome::Failed
            }
        }
    }
}
