//! Outbound mail transports.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{Message, SmtpTransport, Transport};
use tracing::info;
use uuid::Uuid;

use crate::config::EmailConfig;
use crate::error::{EngineError, EngineResult};

/// A fully composed email with one PDF attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub html_body: String,
    /// Attachment file name.
    pub attachment_name: String,
    /// Attachment bytes.
    pub attachment: Vec<u8>,
}

/// Sends composed emails.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends the email and returns its message id.
    async fn send(&self, email: OutgoingEmail) -> EngineResult<String>;
}

fn delivery_error(err: impl std::fmt::Display) -> EngineError {
    EngineError::Delivery {
        message: err.to_string(),
    }
}

/// SMTP mailer using STARTTLS.
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpMailer {
    /// Builds the transport. No connection is made until the first send.
    pub fn new(config: &EmailConfig, password: String) -> EngineResult<Self> {
        info!(
            server = %config.smtp_server,
            port = config.smtp_port,
            "Initializing SMTP mailer"
        );

        let from: Mailbox = config.from_address.parse().map_err(delivery_error)?;
        let tls = TlsParameters::new(config.smtp_server.clone()).map_err(delivery_error)?;
        let transport = SmtpTransport::relay(&config.smtp_server)
            .map_err(delivery_error)?
            .port(config.smtp_port)
            .tls(Tls::Required(tls))
            .credentials(Credentials::new(config.username.clone(), password))
            .build();

        Ok(Self { transport, from })
    }

    fn compose(&self, email: OutgoingEmail, message_id: String) -> EngineResult<Message> {
        let to: Mailbox = email.to.parse().map_err(delivery_error)?;
        let pdf = ContentType::parse("application/pdf").map_err(delivery_error)?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject)
            .message_id(Some(message_id))
            .multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::html(email.html_body))
                    .singlepart(Attachment::new(email.attachment_name).body(email.attachment, pdf)),
            )
            .map_err(delivery_error)
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> EngineResult<String> {
        let message_id = format!("<{}@{}>", Uuid::new_v4(), self.from.email.domain());
        let message = self.compose(email, message_id.clone())?;
        let transport = self.transport.clone();

        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(delivery_error)?
            .map_err(delivery_error)?;

        Ok(message_id)
    }
}

/// Mailer used when email is switched off; every send fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, _email: OutgoingEmail) -> EngineResult<String> {
        Err(EngineError::Delivery {
            message: "email delivery is disabled".to_string(),
        })
    }
}
