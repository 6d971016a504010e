// file: src/notify/mod.rs
// description: email digest notification
// reference: internal module structure

mod email;
mod smtp;

pub use email::{NotifyOutcome, Notifier, OutgoingEmail, compose_email, format_entry};
pub use smtp::SmtpMailer;

use crate::error::Result;
use async_trait::async_trait;

/// Delivery of a composed email.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<()>;
}
