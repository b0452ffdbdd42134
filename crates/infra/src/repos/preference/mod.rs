mod inmemory;
mod postgres;

pub use inmemory::InMemoryPreferenceRepo;
pub use postgres::PostgresPreferenceRepo;
use skifte_domain::{NotificationPreference, ID};

#[async_trait::async_trait]
pub trait IPreferenceRepo: Send + Sync {
    async fn insert(&self, preference: &NotificationPreference) -> anyhow::Result<()>;
    async fn save(&self, preference: &NotificationPreference) -> anyhow::Result<()>;
    async fn find_by_user(&self, user_id: &ID) -> Option<NotificationPreference>;
}
