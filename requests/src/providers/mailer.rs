//! Email transport interface with console and SMTP implementations.

use lettre::message::MultiPart;
use lettre::{Message, SmtpTransport, Transport};
use record_access_core::DeliveryError;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A rendered email ready for sending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    /// Sender address (the process-wide configured default sender).
    pub sender: String,
    /// Recipient address.
    pub recipient: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html_body: String,
    /// Plain-text body.
    pub body: String,
}

/// Email transport.
///
/// Abstracts over the actual delivery mechanism (SMTP, console, a queue).
pub trait Mailer: Send + Sync {
    /// Send one message.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Email`] when the message cannot be handed
    /// to the transport.
    fn send(&self, message: &EmailMessage) -> Result<(), DeliveryError>;
}

/// Mailer that logs messages instead of sending them.
///
/// Useful for development and tests where no SMTP server is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMailer;

impl ConsoleMailer {
    /// Create a new console mailer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Mailer for ConsoleMailer {
    fn send(&self, message: &EmailMessage) -> Result<(), DeliveryError> {
        info!(
            to = %message.recipient,
            from = %message.sender,
            subject = %message.subject,
            "email (console mode, not sent)"
        );
        Ok(())
    }
}

/// Mailer backed by a blocking SMTP transport.
pub struct SmtpMailer {
    transport: SmtpTransport,
}

impl SmtpMailer {
    /// Connect to an SMTP relay with TLS.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Email`] when the relay address is invalid.
    pub fn relay(host: &str) -> Result<Self, DeliveryError> {
        let transport = SmtpTransport::relay(host)
            .map_err(|err| DeliveryError::Email(err.to_string()))?
            .build();
        Ok(Self { transport })
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, message: &EmailMessage) -> Result<(), DeliveryError> {
        let email = Message::builder()
            .from(
                message
                    .sender
                    .parse()
                    .map_err(|_| DeliveryError::Email(format!("invalid sender: {}", message.sender)))?,
            )
            .to(message
                .recipient
                .parse()
                .map_err(|_| {
                    DeliveryError::Email(format!("invalid recipient: {}", message.recipient))
                })?)
            .subject(&message.subject)
            .multipart(MultiPart::alternative_plain_html(
                message.body.clone(),
                message.html_body.clone(),
            ))
            .map_err(|err| DeliveryError::Email(err.to_string()))?;

        self.transport
            .send(&email)
            .map_err(|err| DeliveryError::Email(err.to_string()))?;
        Ok(())
    }
}
