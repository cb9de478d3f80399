//! Report delivery by email
//!
//! Delivery is independent of reporting: a failed send is reported to the
//! caller and never touches the report already produced.

use crate::config::MailConfig;
use crate::error::{GamePlanError, Result};
use crate::report::ReportSink;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::fs;
use std::path::Path;

/// Sends reports through an SMTP relay with STARTTLS
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    config: MailConfig,
}

impl SmtpMailer {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MailConfig {
        &self.config
    }

    /// Password from the configured environment variable
    fn password(&self) -> Result<String> {
        std::env::var(&self.config.password_env).map_err(|_| {
            GamePlanError::DeliveryFailed(format!(
                "environment variable {} is not set",
                self.config.password_env
            ))
        })
    }

    /// Build the message without sending it
    pub fn build_message(&self, subject: &str, body: &str, attachment: &Path) -> Result<Message> {
        let from: Mailbox = parse_mailbox(&self.config.from, "sender")?;
        let to: Mailbox = parse_mailbox(&self.config.to, "recipient")?;

        let contents = fs::read(attachment)?;
        let filename = attachment
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report.txt".to_string());
        let octet_stream = ContentType::parse("application/octet-stream")
            .map_err(|e| GamePlanError::DeliveryFailed(e.to_string()))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(body.to_string()))
                    .singlepart(Attachment::new(filename).body(contents, octet_stream)),
            )
            .map_err(|e| GamePlanError::DeliveryFailed(format!("cannot build message: {}", e)))
    }
}

fn parse_mailbox(address: &str, role: &str) -> Result<Mailbox> {
    address.parse().map_err(|e| {
        GamePlanError::DeliveryFailed(format!("invalid {} address {:?}: {}", role, address, e))
    })
}

impl ReportSink for SmtpMailer {
    fn deliver(&self, subject: &str, body: &str, attachment: &Path) -> Result<()> {
        let message = self.build_message(subject, body, attachment)?;
        let password = self.password()?;
        let username = self
            .config
            .username
            .clone()
            .unwrap_or_else(|| self.config.from.clone());

        // One connection per send, closed when the transport drops
        let transport = SmtpTransport::starttls_relay(&self.config.smtp_host)
            .map_err(|e| GamePlanError::DeliveryFailed(format!("SMTP relay error: {}", e)))?
            .port(self.config.smtp_port)
            .credentials(Credentials::new(username, password))
            .build();

        transport
            .send(&message)
            .map_err(|e| GamePlanError::DeliveryFailed(format!("SMTP send failed: {}", e)))?;

        log::info!("Report mailed to {}", self.config.to);
        Ok(())
    }

    fn name(&self) -> &str {
        "smtp"
    }
}
