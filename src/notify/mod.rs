//! # Confirmation Notifications
//!
//! Out-of-band email to the team lead after admission.
//!
//! - [`template`] renders subject, HTML and plain-text bodies
//! - [`email`] holds the transport (`SmtpMailer`) behind the `Mailer` trait
//! - [`notifier`] runs delivery on a background worker fed by a queue
//!
//! Nothing here can fail an admission: errors are logged and dropped.

pub mod email;
pub mod errors;
pub mod notifier;
pub mod template;

pub use email::{EmailConfig, Mailer, MockMailer, SmtpMailer};
pub use errors::{NotifyError, NotifyResult};
pub use notifier::{DeliveryOutcome, NotificationQueue, Notifier};
pub use template::ConfirmationEmail;
