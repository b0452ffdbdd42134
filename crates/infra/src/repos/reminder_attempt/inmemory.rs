use super::IReminderAttemptRepo;
use crate::repos::shared::inmemory_repo::*;
use crate::repos::shared::repo::DeleteResult;
use skifte_domain::{ReminderAttempt, TrackedAction, ID};

pub struct InMemoryReminderAttemptRepo {
    reminder_attempts: std::sync::Mutex<Vec<ReminderAttempt>>,
}

impl InMemoryReminderAttemptRepo {
    pub fn new() -> Self {
        Self {
            reminder_attempts: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait::async_trait]
impl IReminderAttemptRepo for InMemoryReminderAttemptRepo {
    async fn insert(&self, attempt: &ReminderAttempt) -> anyhow::Result<()> {
        let existing = find_by(&self.reminder_attempts, |a| {
            a.vehicle_id == attempt.vehicle_id && a.offset_label == attempt.offset_label
        });
        if !existing.is_empty() {
            anyhow::bail!(
                "A reminder attempt already exists for vehicle {} and offset {}",
                attempt.vehicle_id,
                attempt.offset_label
            );
        }
        insert(attempt, &self.reminder_attempts);
        Ok(())
    }

    async fn find(&self, attempt_id: &ID) -> Option<ReminderAttempt> {
        find(attempt_id, &self.reminder_attempts)
    }

    async fn find_by_vehicle_and_offset(
        &self,
        vehicle_id: &ID,
        offset_label: &str,
    ) -> Option<ReminderAttempt> {
        find_by(&self.reminder_attempts, |a| {
            a.vehicle_id == *vehicle_id && a.offset_label == offset_label
        })
        .into_iter()
        .next()
    }

    async fn find_by_vehicle(&self, vehicle_id: &ID) -> Vec<ReminderAttempt> {
        find_by(&self.reminder_attempts, |a| a.vehicle_id == *vehicle_id)
    }

    async fn mark_opened(&self, attempt_id: &ID) -> anyhow::Result<()> {
        update_many(
            &self.reminder_attempts,
            |a| a.id == *attempt_id,
            |a| a.opened = true,
        );
        Ok(())
    }

    async fn mark_link_clicked(&self, attempt_id: &ID) -> anyhow::Result<()> {
        update_many(
            &self.reminder_attempts,
            |a| a.id == *attempt_id,
            |a| a.link_clicked = true,
        );
        Ok(())
    }

    async fn mark_action(&self, attempt_id: &ID, action: TrackedAction) -> anyhow::Result<()> {
        update_many(
            &self.reminder_attempts,
            |a| a.id == *attempt_id,
            |a| match action {
                TrackedAction::Callback => a.callback_requested = true,
                TrackedAction::Offer => a.offer_requested = true,
            },
        );
        Ok(())
    }

    async fn delete_by_vehicle(&self, vehicle_id: &ID) -> anyhow::Result<DeleteResult> {
        Ok(delete_by(&self.reminder_attempts, |a| {
            a.vehicle_id == *vehicle_id
        }))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;
    use skifte_domain::{User, Vehicle};

    fn attempt_factory(offset_label: &str) -> (Vehicle, ReminderAttempt) {
        let user = User::new("Kari Nordmann", "kari@example.com");
        let renewal_date = NaiveDate::from_ymd_opt(2026, 9, 25).unwrap();
        let vehicle = Vehicle::new(user.id.clone(), "EL 11223", renewal_date);
        let attempt = ReminderAttempt::new(&vehicle, &user, offset_label, 0);
        (vehicle, attempt)
    }

    #[tokio::test]
    async fn rejects_a_second_attempt_for_the_same_vehicle_and_offset() {
        let repo = InMemoryReminderAttemptRepo::new();
        let (vehicle, attempt) = attempt_factory("50");

        repo.insert(&attempt).await.unwrap();

        // Same pair under a fresh attempt id still violates the ledger key
        let mut duplicate = attempt.clone();
        duplicate.id = ID::new();
        assert!(repo.insert(&duplicate).await.is_err());
        assert_eq!(repo.find_by_vehicle(&vehicle.id).await.len(), 1);

        // A different offset for the same vehicle is a separate pair
        let mut other_offset = attempt.clone();
        other_offset.id = ID::new();
        other_offset.offset_label = "30".into();
        assert!(repo.insert(&other_offset).await.is_ok());
    }

    #[tokio::test]
    async fn deleting_by_vehicle_cascades_the_history() {
        let repo = InMemoryReminderAttemptRepo::new();
        let (vehicle, attempt) = attempt_factory("50");
        repo.insert(&attempt).await.unwrap();
        let mut second = attempt.clone();
        second.id = ID::new();
        second.offset_label = "30".into();
        repo.insert(&second).await.unwrap();

        let res = repo.delete_by_vehicle(&vehicle.id).await.unwrap();

        assert_eq!(res.deleted_count, 2);
        assert!(repo.find_by_vehicle(&vehicle.id).await.is_empty());
    }
}
