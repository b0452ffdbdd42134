use crate::shared::entity::{Entity, ID};

/// Per-`User` notification settings. Mutated only by the owner through
/// settings, read-only from the reminder engine's perspective.
#[derive(Debug, Clone)]
pub struct NotificationPreference {
    pub user_id: ID,
    pub email_reminders_enabled: bool,
    /// Days before the renewal date at which a reminder is wanted
    pub reminder_offsets: Vec<i64>,
}

impl NotificationPreference {
    /// `default_offsets` comes from configuration so that the offset list
    /// has a single source of truth.
    pub fn new(user_id: ID, default_offsets: &[i64]) -> Self {
        Self {
            user_id,
            email_reminders_enabled: true,
            reminder_offsets: default_offsets.to_vec(),
        }
    }

    /// Whether a reminder at the given offset should be attempted for this
    /// user. A denial is not an error and leaves no trace, so a later
    /// preference change can still allow an offset that was never attempted.
    pub fn allows_offset(&self, offset: i64) -> bool {
        self.email_reminders_enabled && self.reminder_offsets.contains(&offset)
    }
}

// A user has exactly one preference record, so the owning user is the
// identity.
impl Entity<ID> for NotificationPreference {
    fn id(&self) -> ID {
        self.user_id.clone()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn denies_all_offsets_when_disabled() {
        let mut prefs = NotificationPreference::new(ID::new(), &[50, 30, 7]);
        prefs.email_reminders_enabled = false;
        for offset in [50, 30, 7].iter() {
            assert!(!prefs.allows_offset(*offset));
        }
    }

    #[test]
    fn denies_offsets_outside_the_set() {
        let prefs = NotificationPreference::new(ID::new(), &[50, 30, 7]);
        assert!(!prefs.allows_offset(60));
        assert!(!prefs.allows_offset(40));
        assert!(!prefs.allows_offset(0));
    }

    #[test]
    fn allows_member_offsets_when_enabled() {
        let prefs = NotificationPreference::new(ID::new(), &[50, 30, 7]);
        for offset in [50, 30, 7].iter() {
            assert!(prefs.allows_offset(*offset));
        }
    }
}
