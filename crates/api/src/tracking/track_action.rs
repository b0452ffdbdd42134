use super::parse_attempt_id;
use crate::shared::usecase::{execute, UseCase};
use actix_web::http::header;
use actix_web::{web, HttpResponse};
use skifte_api_structs::track_action::*;
use skifte_domain::{TrackedAction, ID};
use skifte_infra::SkifteContext;

pub async fn track_action_controller(
    query: web::Query<QueryParams>,
    ctx: web::Data<SkifteContext>,
) -> HttpResponse {
    let query = query.into_inner();
    let attempt_id = parse_attempt_id(query.id.as_deref());
    let action = query
        .action
        .as_deref()
        .and_then(|action| action.parse::<TrackedAction>().ok());

    // An unparsable action or id still redirects to the confirmation page
    if let (Some(attempt_id), Some(action)) = (attempt_id, action) {
        let ctx = ctx.get_ref().clone();
        actix_web::rt::spawn(async move {
            let usecase = TrackActionUseCase { attempt_id, action };
            let _ = execute(usecase, &ctx).await;
        });
    }

    let confirmation_url = format!(
        "{}/confirmation",
        ctx.config.base_url.trim_end_matches('/')
    );
    HttpResponse::Found()
        .insert_header((header::LOCATION, confirmation_url))
        .finish()
}

/// Records a callback or offer request made from within a reminder email
#[derive(Debug)]
pub struct TrackActionUseCase {
    pub attempt_id: ID,
    pub action: TrackedAction,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for TrackActionUseCase {
    type Response = ();

    type Error = UseCaseError;

    const NAME: &'static str = "TrackAction";

    async fn execute(&mut self, ctx: &SkifteContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .reminder_attempts
            .mark_action(&self.attempt_id, self.action)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
