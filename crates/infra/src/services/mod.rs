mod mail;

pub use mail::{Email, IEmailService, InMemoryEmailService, SmtpEmailService};
