mod inmemory;
mod postgres;

use crate::repos::shared::repo::DeleteResult;
pub use inmemory::InMemoryReminderAttemptRepo;
pub use postgres::PostgresReminderAttemptRepo;
use skifte_domain::{ReminderAttempt, TrackedAction, ID};

/// The deduplication ledger. `insert` is guarded by the uniqueness of
/// `(vehicle_id, offset_label)` and is the source of truth for "already
/// sent": inserting a second attempt for the same pair is an error, never
/// a silent overwrite.
#[async_trait::async_trait]
pub trait IReminderAttemptRepo: Send + Sync {
    async fn insert(&self, attempt: &ReminderAttempt) -> anyhow::Result<()>;
    async fn find(&self, attempt_id: &ID) -> Option<ReminderAttempt>;
    async fn find_by_vehicle_and_offset(
        &self,
        vehicle_id: &ID,
        offset_label: &str,
    ) -> Option<ReminderAttempt>;
    async fn find_by_vehicle(&self, vehicle_id: &ID) -> Vec<ReminderAttempt>;
    /// Monotonic: marking an already-opened attempt is a no-op, as is
    /// marking an unknown id
    async fn mark_opened(&self, attempt_id: &ID) -> anyhow::Result<()>;
    async fn mark_link_clicked(&self, attempt_id: &ID) -> anyhow::Result<()>;
    async fn mark_action(&self, attempt_id: &ID, action: TrackedAction) -> anyhow::Result<()>;
    async fn delete_by_vehicle(&self, vehicle_id: &ID) -> anyhow::Result<DeleteResult>;
}
