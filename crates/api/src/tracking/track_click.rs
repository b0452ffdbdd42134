use super::parse_attempt_id;
use crate::shared::usecase::{execute, UseCase};
use actix_web::http::header;
use actix_web::{web, HttpResponse};
use skifte_api_structs::track_click::*;
use skifte_domain::ID;
use skifte_infra::SkifteContext;

pub async fn track_click_controller(
    query: web::Query<QueryParams>,
    ctx: web::Data<SkifteContext>,
) -> HttpResponse {
    let query = query.into_inner();

    // The redirect never waits on the tracking write
    if let Some(attempt_id) = parse_attempt_id(query.id.as_deref()) {
        let ctx = ctx.get_ref().clone();
        actix_web::rt::spawn(async move {
            let usecase = TrackClickUseCase { attempt_id };
            let _ = execute(usecase, &ctx).await;
        });
    }

    let destination = query
        .url
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| ctx.config.base_url.clone());

    HttpResponse::Found()
        .insert_header((header::LOCATION, destination))
        .finish()
}

#[derive(Debug)]
pub struct TrackClickUseCase {
    pub attempt_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for TrackClickUseCase {
    type Response = ();

    type Error = UseCaseError;

    const NAME: &'static str = "TrackClick";

    async fn execute(&mut self, ctx: &SkifteContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .reminder_attempts
            .mark_link_clicked(&self.attempt_id)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
