//! Background confirmation delivery
//!
//! The admission pipeline only submits to a [`NotificationQueue`]; delivery
//! happens on a worker task it never waits for. Every delivery failure is
//! logged and dropped here.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info, warn};

use super::email::{EmailConfig, Mailer, SmtpMailer};
use super::errors::{NotifyError, NotifyResult};
use super::template::ConfirmationEmail;
use crate::registration::Registration;

/// What happened to one confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent,
    /// Sending is disabled; the recipient was logged instead
    Skipped,
    Failed(String),
}

/// Renders and sends confirmations.
#[derive(Clone)]
pub struct Notifier {
    /// `None` when sending is disabled
    mailer: Option<Arc<dyn Mailer>>,
}

impl Notifier {
    /// Notifier sending through `mailer`.
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self {
            mailer: Some(mailer),
        }
    }

    /// Notifier that only logs the intended recipient.
    pub fn disabled() -> Self {
        Self { mailer: None }
    }

    /// SMTP notifier, or a disabled one when `config.enabled` is false or
    /// there is no sender address to send from.
    pub fn from_config(config: &EmailConfig) -> NotifyResult<Self> {
        if !config.enabled {
            return Ok(Self::disabled());
        }
        if config.sender_address().trim().is_empty() {
            warn!("no SMTP user or sender address configured; email disabled");
            return Ok(Self::disabled());
        }
        let mailer = SmtpMailer::new(config)?;
        Ok(Self::new(Arc::new(mailer)))
    }

    pub fn is_enabled(&self) -> bool {
        self.mailer.is_some()
    }

    /// Render and send one confirmation. Never fails; the outcome is for
    /// logging and tests.
    pub fn deliver(&self, registration: &Registration) -> DeliveryOutcome {
        let Some(ref mailer) = self.mailer else {
            info!(
                hackathon_id = %registration.identifier,
                recipient = %registration.lead_email,
                "email disabled; would send confirmation"
            );
            return DeliveryOutcome::Skipped;
        };

        let email = ConfirmationEmail::render(registration);
        match mailer.send(&email) {
            Ok(()) => {
                info!(
                    hackathon_id = %registration.identifier,
                    recipient = %email.to,
                    "confirmation sent"
                );
                DeliveryOutcome::Sent
            }
            Err(err) => {
                match &err {
                    NotifyError::Authentication(_) => error!(
                        hackathon_id = %registration.identifier,
                        error = %err,
                        "SMTP authentication failed; check SMTP user and password"
                    ),
                    _ => warn!(
                        hackathon_id = %registration.identifier,
                        recipient = %email.to,
                        kind = err.kind(),
                        error = %err,
                        "confirmation not sent"
                    ),
                }
                DeliveryOutcome::Failed(err.to_string())
            }
        }
    }

    /// Spawn the delivery worker and return the queue feeding it.
    ///
    /// Must be called from within a Tokio runtime. Each delivery runs as its
    /// own detached blocking task, so a slow SMTP server never holds up the
    /// queue or any request.
    pub fn start(self) -> NotificationQueue {
        let (queue, mut rx) = NotificationQueue::unbounded();

        tokio::spawn(async move {
            while let Some(registration) = rx.recv().await {
                let notifier = self.clone();
                tokio::task::spawn_blocking(move || {
                    notifier.deliver(&registration);
                });
            }
        });

        queue
    }
}

/// Submission side of the notification worker.
#[derive(Debug, Clone)]
pub struct NotificationQueue {
    tx: UnboundedSender<Registration>,
}

impl NotificationQueue {
    /// A queue and its receiving end, for custom consumers and tests.
    pub fn unbounded() -> (Self, UnboundedReceiver<Registration>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Submit a confirmation. Does not block and does not wait for delivery.
    pub fn enqueue(&self, registration: Registration) {
        if let Err(mpsc::error::SendError(registration)) = self.tx.send(registration) {
            warn!(
                hackathon_id = %registration.identifier,
                "notification worker stopped; confirmation dropped"
            );
        }
    }
}
