mod track_action;
mod track_click;
mod track_open;

use actix_web::web;
use skifte_domain::ID;
use track_action::track_action_controller;
use track_click::track_click_controller;
use track_open::track_open_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/track/open", web::get().to(track_open_controller));
    cfg.route("/track/click", web::get().to(track_click_controller));
    cfg.route("/track/action", web::get().to(track_action_controller));
}

/// These endpoints are addressed by recipients' mail clients, correlated
/// only by knowledge of an opaque attempt id. They must always produce
/// their fixed response: a malformed or unknown id is logged server-side
/// and otherwise ignored, never surfaced to the recipient.
pub(crate) fn parse_attempt_id(id: Option<&str>) -> Option<ID> {
    id.and_then(|id| id.parse::<ID>().ok())
}
