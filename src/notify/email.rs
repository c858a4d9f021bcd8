//! # Email Transport
//!
//! SMTP delivery of confirmation emails.

use std::sync::RwLock;
use std::time::Duration;

use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, Message, SmtpTransport, Transport};

use super::errors::{NotifyError, NotifyResult};
use super::template::ConfirmationEmail;

/// Port on which SMTP uses implicit TLS rather than STARTTLS.
const IMPLICIT_TLS_PORT: u16 = 465;

/// Connection timeout for the SMTP server.
const SMTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Email configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Whether to actually send; when false the recipient is only logged
    pub enabled: bool,

    /// SMTP server host
    pub smtp_host: String,

    /// SMTP server port
    pub smtp_port: u16,

    /// SMTP username; empty means an unauthenticated local relay
    pub smtp_user: String,

    /// SMTP password (should come from secrets)
    pub smtp_password: String,

    /// From email address
    pub from_email: String,

    /// From name
    pub from_name: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            smtp_user: String::new(),
            smtp_password: String::new(),
            from_email: String::new(),
            from_name: "Hackathon 2025".to_string(),
        }
    }
}

impl EmailConfig {
    /// Sender address, falling back to the SMTP user when unset.
    pub fn sender_address(&self) -> &str {
        if self.from_email.trim().is_empty() {
            &self.smtp_user
        } else {
            &self.from_email
        }
    }

    /// Whether the transport should log in.
    pub fn uses_authentication(&self) -> bool {
        !self.smtp_user.is_empty()
    }
}

/// Mail transport abstraction
pub trait Mailer: Send + Sync {
    /// Send one message
    fn send(&self, email: &ConfirmationEmail) -> NotifyResult<()>;
}

/// Mock mailer for testing
#[derive(Debug, Default)]
pub struct MockMailer {
    /// Sent emails (for testing)
    pub sent: RwLock<Vec<ConfirmationEmail>>,
    /// Error to return instead of recording
    pub fail_with: Option<NotifyError>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every send fails with `error`
    pub fn failing(error: NotifyError) -> Self {
        Self {
            sent: RwLock::new(Vec::new()),
            fail_with: Some(error),
        }
    }

    /// Get number of sent emails
    pub fn sent_count(&self) -> usize {
        self.sent.read().map(|sent| sent.len()).unwrap_or(0)
    }

    /// Snapshot of sent emails
    pub fn sent(&self) -> Vec<ConfirmationEmail> {
        self.sent.read().map(|sent| sent.clone()).unwrap_or_default()
    }
}

impl Mailer for MockMailer {
    fn send(&self, email: &ConfirmationEmail) -> NotifyResult<()> {
        if let Some(ref err) = self.fail_with {
            return Err(err.clone());
        }
        self.sent
            .write()
            .map_err(|_| NotifyError::Transport("mock mailer lock poisoned".to_string()))?
            .push(email.clone());
        Ok(())
    }
}

/// SMTP mailer
pub struct SmtpMailer {
    from: Mailbox,
    transport: SmtpTransport,
}

impl SmtpMailer {
    /// Build the transport from configuration.
    ///
    /// Port 465 uses implicit TLS, any other port upgrades with STARTTLS.
    /// Without a user the connection is plain and unauthenticated (local relays).
    pub fn new(config: &EmailConfig) -> NotifyResult<Self> {
        let address: Address = config.sender_address().parse().map_err(|e| {
            NotifyError::InvalidAddress(format!("from '{}': {}", config.sender_address(), e))
        })?;
        let from = Mailbox::new(Some(config.from_name.clone()), address);

        let transport = if config.uses_authentication() {
            let builder = if config.smtp_port == IMPLICIT_TLS_PORT {
                SmtpTransport::relay(&config.smtp_host)
            } else {
                SmtpTransport::starttls_relay(&config.smtp_host)
            }
            .map_err(|e| NotifyError::Transport(format!("SMTP relay error: {}", e)))?;

            builder
                .port(config.smtp_port)
                .credentials(Credentials::new(
                    config.smtp_user.clone(),
                    config.smtp_password.clone(),
                ))
                .timeout(Some(SMTP_TIMEOUT))
                .build()
        } else {
            SmtpTransport::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .timeout(Some(SMTP_TIMEOUT))
                .build()
        };

        Ok(Self { from, transport })
    }

    fn build_message(&self, email: &ConfirmationEmail) -> NotifyResult<Message> {
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| NotifyError::InvalidAddress(format!("to '{}': {}", email.to, e)))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject.clone())
            .multipart(MultiPart::alternative_plain_html(
                email.text_body.clone(),
                email.html_body.clone(),
            ))
            .map_err(|e| NotifyError::Build(e.to_string()))
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, email: &ConfirmationEmail) -> NotifyResult<()> {
        let message = self.build_message(email)?;
        self.transport
            .send(&message)
            .map(|_| ())
            .map_err(classify_smtp_error)
    }
}

/// 530/534/535 replies mean the credentials were refused.
fn classify_smtp_error(err: lettre::transport::smtp::Error) -> NotifyError {
    let auth_refused = err
        .status()
        .map(|code| code.to_string().starts_with("53"))
        .unwrap_or(false);

    if auth_refused {
        NotifyError::Authentication(err.to_string())
    } else {
        NotifyError::Transport(err.to_string())
    }
}
