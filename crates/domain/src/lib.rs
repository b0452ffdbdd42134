mod preference;
mod reminder;
mod shared;
mod status;
mod template;
mod tracking;
mod user;
mod vehicle;

pub use preference::NotificationPreference;
pub use reminder::{OffsetRunReport, ReminderAttempt, TrackedAction};
pub use shared::entity::{Entity, ID};
pub use status::{renewal_overview, RenewalOverview, RenewalStatus};
pub use template::{
    estimated_savings, EmailTemplate, ReminderMailVars, RenderedEmail,
};
pub use tracking::TrackingLinks;
pub use user::User;
pub use vehicle::Vehicle;
