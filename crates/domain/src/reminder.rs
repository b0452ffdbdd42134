use crate::shared::entity::{Entity, ID};
use crate::user::User;
use crate::vehicle::Vehicle;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// The durable record of one successfully dispatched reminder for one
/// `(vehicle, offset)` pair. At most one row may ever exist per pair, which
/// is the idempotency key of the whole engine: the orchestrator consults
/// this ledger before sending and writes to it only after confirmed
/// delivery.
///
/// Recipient and vehicle details are denormalized at send time so the audit
/// trail survives later edits or deletion of the owner and the vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderAttempt {
    /// Opaque id embedded in tracking URLs to correlate opens and clicks
    pub id: ID,
    pub vehicle_id: ID,
    /// Which reminder this was, e.g. "50" for the 50-days-before email
    pub offset_label: String,
    /// Delivery timestamp in millis
    pub sent_at: i64,
    pub recipient_name: String,
    pub recipient_email: String,
    pub registration_plate: String,
    pub vehicle_nickname: Option<String>,
    /// Tracking flags, monotonic: once true they are never unset
    pub opened: bool,
    pub link_clicked: bool,
    pub callback_requested: bool,
    pub offer_requested: bool,
}

impl ReminderAttempt {
    pub fn new(vehicle: &Vehicle, recipient: &User, offset_label: &str, sent_at: i64) -> Self {
        Self {
            id: Default::default(),
            vehicle_id: vehicle.id.clone(),
            offset_label: offset_label.into(),
            sent_at,
            recipient_name: recipient.name.clone(),
            recipient_email: recipient.email.clone(),
            registration_plate: vehicle.registration_plate.clone(),
            vehicle_nickname: vehicle.nickname.clone(),
            opened: false,
            link_clicked: false,
            callback_requested: false,
            offer_requested: false,
        }
    }
}

impl Entity<ID> for ReminderAttempt {
    fn id(&self) -> ID {
        self.id.clone()
    }
}

/// Recipient actions that can be requested from within a reminder email
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackedAction {
    Callback,
    Offer,
}

impl TrackedAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackedAction::Callback => "callback",
            TrackedAction::Offer => "offer",
        }
    }
}

impl Display for TrackedAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug)]
pub struct InvalidTrackedAction(pub String);

impl FromStr for TrackedAction {
    type Err = InvalidTrackedAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "callback" => Ok(TrackedAction::Callback),
            "offer" => Ok(TrackedAction::Offer),
            _ => Err(InvalidTrackedAction(s.to_string())),
        }
    }
}

/// Per-offset outcome of one orchestrator run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetRunReport {
    pub offset: i64,
    pub sent_count: usize,
    pub errors: Vec<String>,
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn snapshots_recipient_and_vehicle_details() {
        let recipient = User::new("Kari Nordmann", "kari@example.com");
        let date = NaiveDate::from_ymd_opt(2026, 9, 25).unwrap();
        let mut vehicle = Vehicle::new(recipient.id.clone(), "EL 11223", date);
        vehicle.nickname = Some("Van".into());

        let attempt = ReminderAttempt::new(&vehicle, &recipient, "50", 1_700_000_000_000);
        assert_eq!(attempt.vehicle_id, vehicle.id);
        assert_eq!(attempt.offset_label, "50");
        assert_eq!(attempt.recipient_email, "kari@example.com");
        assert_eq!(attempt.registration_plate, "EL 11223");
        assert_eq!(attempt.vehicle_nickname.as_deref(), Some("Van"));
        assert!(!attempt.opened && !attempt.link_clicked);
    }

    #[test]
    fn tracked_actions_round_trip_as_strings() {
        for action in [TrackedAction::Callback, TrackedAction::Offer].iter() {
            assert_eq!(action.as_str().parse::<TrackedAction>().unwrap(), *action);
        }
        assert!("unsubscribe".parse::<TrackedAction>().is_err());
    }
}
