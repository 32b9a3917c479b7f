use crate::config::EmailConfig;
use crate::domain::model::EmailMessage;
use crate::domain::ports::Mailer;
use crate::utils::error::Result;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Sends offer summaries through an authenticated SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    pub fn new(config: &EmailConfig) -> Result<Self> {
        let builder = if config.starttls {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)?
        };

        let transport = builder
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self { transport })
    }
}

/// Builds an HTML message with one `To` header per recipient.
pub fn build_message(message: &EmailMessage) -> Result<Message> {
    let mut builder = Message::builder()
        .from(message.from.parse::<Mailbox>()?)
        .subject(message.subject.clone())
        .header(ContentType::TEXT_HTML);

    for recipient in &message.to {
        builder = builder.to(recipient.parse::<Mailbox>()?);
    }

    Ok(builder.body(message.html_body.clone())?)
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: EmailMessage) -> Result<()> {
        let email = build_message(&message)?;
        let response = self.transport.send(email).await?;
        tracing::debug!("SMTP response code: {}", response.code());
        Ok(())
    }
}
