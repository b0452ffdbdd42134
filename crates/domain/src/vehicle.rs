use crate::shared::entity::{Entity, ID};
use chrono::NaiveDate;

/// A `Vehicle` registered by a `User`. The `renewal_date` is the date at
/// which the current insurance policy renews and drives all scheduling
/// decisions for reminders.
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: ID,
    /// The `User` owning this `Vehicle` and receiving its reminders
    pub user_id: ID,
    pub registration_plate: String,
    /// Optional display name chosen by the owner, e.g. "The red one"
    pub nickname: Option<String>,
    /// Calendar date of the next insurance renewal, no time component
    pub renewal_date: NaiveDate,
    /// What the owner currently pays per year, used for the savings estimate
    pub current_annual_fee: Option<f64>,
}

impl Vehicle {
    pub fn new(user_id: ID, registration_plate: &str, renewal_date: NaiveDate) -> Self {
        Self {
            id: Default::default(),
            user_id,
            registration_plate: registration_plate.into(),
            nickname: None,
            renewal_date,
            current_annual_fee: None,
        }
    }

    /// Name shown to the owner in reminder emails
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.registration_plate)
    }
}

impl Entity<ID> for Vehicle {
    fn id(&self) -> ID {
        self.id.clone()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_name_prefers_nickname() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let mut vehicle = Vehicle::new(ID::new(), "AB 12345", date);
        assert_eq!(vehicle.display_name(), "AB 12345");

        vehicle.nickname = Some("The red one".into());
        assert_eq!(vehicle.display_name(), "The red one");
    }
}
