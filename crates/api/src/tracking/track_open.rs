use super::parse_attempt_id;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use skifte_api_structs::track_open::*;
use skifte_domain::ID;
use skifte_infra::SkifteContext;

/// A 1x1 transparent GIF. Served on every request: a broken image in the
/// recipient's mail client would leak that tracking failed.
pub(crate) const TRANSPARENT_GIF: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0xff, 0xff, 0xff, 0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3b,
];

pub async fn track_open_controller(
    query: web::Query<QueryParams>,
    ctx: web::Data<SkifteContext>,
) -> HttpResponse {
    if let Some(attempt_id) = parse_attempt_id(query.id.as_deref()) {
        let usecase = TrackOpenUseCase { attempt_id };
        // Failures only reach the log, the pixel is returned regardless
        let _ = execute(usecase, &ctx).await;
    }

    HttpResponse::Ok()
        .content_type("image/gif")
        .body(TRANSPARENT_GIF)
}

/// Marks an attempt as opened. Opening is monotonic: repeated opens are
/// no-ops, as are opens for ids that resolve to nothing.
#[derive(Debug)]
pub struct TrackOpenUseCase {
    pub attempt_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for TrackOpenUseCase {
    type Response = ();

    type Error = UseCaseError;

    const NAME: &'static str = "TrackOpen";

    async fn execute(&mut self, ctx: &SkifteContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .reminder_attempts
            .mark_opened(&self.attempt_id)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tracking::configure_routes;
    use actix_web::{test, App};
    use chrono::Duration;
    use skifte_domain::{ReminderAttempt, User, Vehicle};

    async fn setup_attempt(ctx: &SkifteContext) -> ReminderAttempt {
        let user = User::new("Kari Nordmann", "kari@example.com");
        ctx.repos.users.insert(&user).await.unwrap();
        let renewal_date = ctx.sys.date_today() + Duration::days(50);
        let vehicle = Vehicle::new(user.id.clone(), "EL 11223", renewal_date);
        ctx.repos.vehicles.insert(&vehicle).await.unwrap();

        let attempt = ReminderAttempt::new(&vehicle, &user, "50", 0);
        ctx.repos.reminder_attempts.insert(&attempt).await.unwrap();
        attempt
    }

    #[actix_web::test]
    async fn opening_twice_is_monotonic_and_not_an_error() {
        let ctx = SkifteContext::create_inmemory();
        let attempt = setup_attempt(&ctx).await;

        for _ in 0..2 {
            let usecase = TrackOpenUseCase {
                attempt_id: attempt.id.clone(),
            };
            assert!(execute(usecase, &ctx).await.is_ok());

            let stored = ctx.repos.reminder_attempts.find(&attempt.id).await.unwrap();
            assert!(stored.opened);
        }
    }

    #[actix_web::test]
    async fn opening_an_unknown_id_is_a_no_op() {
        let ctx = SkifteContext::create_inmemory();

        let usecase = TrackOpenUseCase {
            attempt_id: ID::new(),
        };
        assert!(execute(usecase, &ctx).await.is_ok());
    }

    #[actix_web::test]
    async fn always_answers_with_an_image() {
        let ctx = SkifteContext::create_inmemory();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(ctx))
                .configure(configure_routes),
        )
        .await;

        for uri in [
            "/track/open",
            "/track/open?id=garbage",
            "/track/open?id=71e2c2c9-3a1f-4a5e-9d7a-111111111111",
        ]
        .iter()
        {
            let req = test::TestRequest::get().uri(uri).to_request();
            let res = test::call_service(&app, req).await;
            assert!(res.status().is_success());
            assert_eq!(
                res.headers().get("content-type").unwrap(),
                "image/gif",
                "for {}",
                uri
            );
        }
    }
}
