use super::IPreferenceRepo;
use crate::repos::shared::inmemory_repo::*;
use skifte_domain::{NotificationPreference, ID};

pub struct InMemoryPreferenceRepo {
    preferences: std::sync::Mutex<Vec<NotificationPreference>>,
}

impl InMemoryPreferenceRepo {
    pub fn new() -> Self {
        Self {
            preferences: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IPreferenceRepo for InMemoryPreferenceRepo {
    async fn insert(&self, preference: &NotificationPreference) -> anyhow::Result<()> {
        insert(preference, &self.preferences);
        Ok(())
    }

    async fn save(&self, preference: &NotificationPreference) -> anyhow::Result<()> {
        save(preference, &self.preferences);
        Ok(())
    }

    async fn find_by_user(&self, user_id: &ID) -> Option<NotificationPreference> {
        find(user_id, &self.preferences)
    }
}
