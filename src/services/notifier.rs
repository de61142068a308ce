//! Report delivery over SMTP

use async_trait::async_trait;
use lettre::address::Address;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::time::Duration;
use tracing::debug;

use crate::config::{EmailConfig, SmtpSecurity};
use crate::error::NotifyError;

const SMTP_TIMEOUT: Duration = Duration::from_secs(60);

/// A rendered report ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEmail {
    pub subject: String,
    pub html_body: String,
}

/// Delivers rendered reports. Implementations report failure instead of
/// retrying; the caller only logs it.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, email: &ReportEmail) -> Result<(), NotifyError>;
}

pub struct SmtpNotifier {
    transport: SmtpTransport,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpNotifier {
    pub fn new(config: &EmailConfig) -> Result<Self, NotifyError> {
        let host = config.from_smtp_host.as_str();
        let builder = match config.from_smtp_type {
            SmtpSecurity::Ssl => SmtpTransport::relay(host),
            SmtpSecurity::Tls => SmtpTransport::starttls_relay(host),
            SmtpSecurity::None => Ok(SmtpTransport::builder_dangerous(host)),
        }
        .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let mut builder = builder
            .port(config.from_smtp_port)
            .timeout(Some(SMTP_TIMEOUT));
        if !config.from_smtp_username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.from_smtp_username.clone(),
                config.from_smtp_password.clone(),
            ));
        }

        Ok(Self {
            transport: builder.build(),
            from: mailbox(&config.from_name, &config.from_address)?,
            to: mailbox(&config.to_name, &config.to_address)?,
        })
    }

    fn build_message(&self, email: &ReportEmail) -> Result<Message, NotifyError> {
        Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(email.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(email.html_body.clone())
            .map_err(|e| NotifyError::Message(e.to_string()))
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn deliver(&self, email: &ReportEmail) -> Result<(), NotifyError> {
        debug!(to = %self.to, "Attempting to send email message");

        let message = self.build_message(email)?;
        let transport = self.transport.clone();

        // lettre's SmtpTransport blocks; keep it off the runtime threads
        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| NotifyError::Transport(format!("send task failed: {}", e)))?
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        debug!("Email message has been sent");
        Ok(())
    }
}

/// Build a mailbox from a display name (may be empty) and an address
pub fn mailbox(name: &str, address: &str) -> Result<Mailbox, NotifyError> {
    let address: Address = address
        .parse()
        .map_err(|_| NotifyError::Address(address.to_string()))?;
    let name = Some(name.trim().to_string()).filter(|n| !n.is_empty());
    Ok(Mailbox::new(name, address))
}
