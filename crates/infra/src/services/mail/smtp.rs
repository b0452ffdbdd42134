use super::{Email, IEmailService};
use crate::config::SmtpSettings;
use anyhow::Context;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use tracing::debug;

/// Delivers over SMTP with a hard per-call timeout. Failed sends are not
/// retried here, the orchestrator leaves no ledger row for them.
pub struct SmtpEmailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpEmailService {
    pub fn new(settings: &SmtpSettings) -> anyhow::Result<Self> {
        let credentials = Credentials::new(settings.username.clone(), settings.password.clone());
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?
            .credentials(credentials)
            .timeout(Some(Duration::from_secs(settings.timeout_secs)))
            .build();
        let from = settings
            .from_address
            .parse::<Mailbox>()
            .with_context(|| format!("Invalid EMAIL_FROM address: {}", settings.from_address))?;
        Ok(Self { transport, from })
    }
}

#[async_trait::async_trait]
impl IEmailService for SmtpEmailService {
    async fn send(&self, email: Email) -> anyhow::Result<String> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(email
                .to
                .parse::<Mailbox>()
                .with_context(|| format!("Invalid recipient address: {}", email.to))?)
            .subject(&email.subject)
            .header(ContentType::TEXT_HTML)
            .body(email.html)?;

        let response = self.transport.send(message).await?;
        let message_id = response.message().collect::<Vec<&str>>().join(" ");
        debug!("Delivered email to {}: {}", email.to, message_id);
        Ok(message_id)
    }
}
