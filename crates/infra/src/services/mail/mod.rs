mod inmemory;
mod smtp;

pub use inmemory::InMemoryEmailService;
pub use smtp::SmtpEmailService;

/// An email ready for delivery
#[derive(Debug, Clone)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// The delivery provider. Returns the provider message id on success. The
/// provider gives no idempotency guarantee, so duplicate prevention is
/// entirely on the calling side.
#[async_trait::async_trait]
pub trait IEmailService: Send + Sync {
    async fn send(&self, email: Email) -> anyhow::Result<String>;
}
