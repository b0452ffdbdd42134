pub mod run_reminders;
mod send_test_reminder;

use actix_web::web;
use chrono::NaiveDate;
use run_reminders::run_reminders_controller;
use send_test_reminder::send_test_reminder_controller;
use skifte_domain::{
    estimated_savings, renewal_overview, EmailTemplate, RenderedEmail, ReminderMailVars,
    TrackedAction, TrackingLinks, User, Vehicle, ID,
};
use skifte_infra::Config;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/run-reminders", web::post().to(run_reminders_controller));
    cfg.route(
        "/reminders/test",
        web::post().to(send_test_reminder_controller),
    );
}

/// Projects a vehicle, its owner and the attempt id into template
/// placeholders and renders the email. All values are formatted for display
/// here so the substitution itself stays a dumb find and replace.
pub(crate) fn render_reminder(
    template: &EmailTemplate,
    vehicle: &Vehicle,
    recipient: &User,
    attempt_id: &ID,
    today: NaiveDate,
    config: &Config,
) -> RenderedEmail {
    let overview = renewal_overview(vehicle.renewal_date, today);
    let tracking_base = config.tracking_base_url();
    let links = TrackingLinks::new(&tracking_base, attempt_id);

    let vars = ReminderMailVars {
        recipient_name: recipient.name.clone(),
        vehicle_name: vehicle.display_name().to_string(),
        registration_plate: vehicle.registration_plate.clone(),
        renewal_date: vehicle.renewal_date.format("%d.%m.%Y").to_string(),
        days_remaining: overview.days_remaining.to_string(),
        status_label: overview.status.label().to_string(),
        estimated_savings: vehicle
            .current_annual_fee
            .map(|fee| estimated_savings(fee, config.savings_rate).to_string()),
        switch_url: links.click(&config.switch_offers_url),
        callback_url: links.action(TrackedAction::Callback),
        offer_url: links.action(TrackedAction::Offer),
        open_pixel_url: links.open_pixel(),
    };

    template.render(&vars.into_map())
}
