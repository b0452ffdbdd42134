use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Days before renewal at which a policy starts needing attention
pub const ATTENTION_WINDOW_DAYS: i64 = 60;
/// Days before renewal during which the owner can still switch provider
pub const SWITCHING_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RenewalStatus {
    Ok,
    Attention,
    SwitchingPeriod,
    Expired,
}

impl RenewalStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RenewalStatus::Ok => "All good for now",
            RenewalStatus::Attention => "Renewal is approaching",
            RenewalStatus::SwitchingPeriod => "Switching period is open",
            RenewalStatus::Expired => "Renewal date has passed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenewalOverview {
    /// Signed distance to the renewal date, negative once it has passed
    pub days_remaining: i64,
    pub status: RenewalStatus,
    /// How far into the attention window the vehicle is, in [0, 100]
    pub progress_percent: f64,
    pub can_switch: bool,
}

/// Classifies the urgency of a vehicle's renewal from its renewal date and
/// a reference date. Pure and total: every pair of dates yields an overview.
pub fn renewal_overview(renewal_date: NaiveDate, today: NaiveDate) -> RenewalOverview {
    let days_remaining = (renewal_date - today).num_days();

    let status = if days_remaining < 0 {
        RenewalStatus::Expired
    } else if days_remaining <= SWITCHING_WINDOW_DAYS {
        RenewalStatus::SwitchingPeriod
    } else if days_remaining <= ATTENTION_WINDOW_DAYS {
        RenewalStatus::Attention
    } else {
        RenewalStatus::Ok
    };

    let progress_percent = match status {
        RenewalStatus::Expired => 100.,
        RenewalStatus::Ok => 0.,
        _ => {
            let window = ATTENTION_WINDOW_DAYS as f64;
            let progress = (window - days_remaining as f64) / window * 100.;
            progress.max(0.).min(100.)
        }
    };

    let can_switch = matches!(
        status,
        RenewalStatus::Attention | RenewalStatus::SwitchingPeriod
    );

    RenewalOverview {
        days_remaining,
        status,
        progress_percent,
        can_switch,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::Duration;

    fn overview_at(days_remaining: i64) -> RenewalOverview {
        let today = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();
        renewal_overview(today + Duration::days(days_remaining), today)
    }

    #[test]
    fn classifies_status_at_boundaries() {
        let cases = [
            (-1, RenewalStatus::Expired),
            (0, RenewalStatus::SwitchingPeriod),
            (1, RenewalStatus::SwitchingPeriod),
            (30, RenewalStatus::SwitchingPeriod),
            (31, RenewalStatus::Attention),
            (60, RenewalStatus::Attention),
            (61, RenewalStatus::Ok),
        ];
        for (days, expected) in cases.iter() {
            let overview = overview_at(*days);
            assert_eq!(overview.status, *expected, "at {} days", days);
            assert_eq!(overview.days_remaining, *days);
        }
    }

    #[test]
    fn progress_interpolates_over_the_attention_window() {
        assert_eq!(overview_at(60).progress_percent, 0.);
        assert_eq!(overview_at(30).progress_percent, 50.);
        assert_eq!(overview_at(0).progress_percent, 100.);
    }

    #[test]
    fn progress_is_clamped_outside_the_window() {
        assert_eq!(overview_at(-1).progress_percent, 100.);
        assert_eq!(overview_at(-120).progress_percent, 100.);
        assert_eq!(overview_at(61).progress_percent, 0.);
        assert_eq!(overview_at(365).progress_percent, 0.);
    }

    #[test]
    fn can_switch_only_inside_the_attention_window() {
        assert!(!overview_at(-1).can_switch);
        assert!(overview_at(0).can_switch);
        assert!(overview_at(30).can_switch);
        assert!(overview_at(60).can_switch);
        assert!(!overview_at(61).can_switch);
    }
}
