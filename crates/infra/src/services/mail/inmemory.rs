use super::{Email, IEmailService};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Delivery provider double used by tests: records every mail and can be
/// flipped into a failing mode to exercise provider-error paths.
pub struct InMemoryEmailService {
    sent: Mutex<Vec<Email>>,
    fail_sends: AtomicBool,
}

impl InMemoryEmailService {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_sends: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_sends.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<Email> {
        self.sent.lock().unwrap().clone()
    }
}

impl Default for InMemoryEmailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IEmailService for InMemoryEmailService {
    async fn send(&self, email: Email) -> anyhow::Result<String> {
        if self.fail_sends.load(Ordering::SeqCst) {
            anyhow::bail!("Delivery provider rejected the message");
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(email);
        Ok(format!("inmemory-{}", sent.len()))
    }
}
