use super::render_reminder;
use crate::error::SkifteError;
use crate::shared::auth::protect_job_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use skifte_api_structs::send_test_reminder::*;
use skifte_domain::{EmailTemplate, ID};
use skifte_infra::{Email, SkifteContext};

pub async fn send_test_reminder_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<SkifteContext>,
) -> Result<HttpResponse, SkifteError> {
    protect_job_route(&http_req, &ctx)?;

    let body = body.0;
    let usecase = SendTestReminderUseCase {
        vehicle_id: body.vehicle_id,
        offset: body.offset,
    };

    execute(usecase, &ctx)
        .await
        .map(|message_id| HttpResponse::Ok().json(APIResponse::new(message_id)))
        .map_err(SkifteError::from)
}

/// Admin tooling: render and deliver one reminder for one vehicle right
/// now. The deduplication ledger is bypassed entirely and the subject is
/// prefixed so the mail is recognizable as test traffic.
#[derive(Debug)]
pub struct SendTestReminderUseCase {
    pub vehicle_id: ID,
    pub offset: i64,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    VehicleNotFound(ID),
    OwnerNotFound(ID),
    MissingTemplate(String),
    DeliveryFailed(String),
}

impl From<UseCaseError> for SkifteError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::VehicleNotFound(vehicle_id) => Self::NotFound(format!(
                "The vehicle with id: {}, was not found.",
                vehicle_id
            )),
            UseCaseError::OwnerNotFound(user_id) => Self::NotFound(format!(
                "The user with id: {}, was not found.",
                user_id
            )),
            UseCaseError::MissingTemplate(key) => Self::NotFound(format!(
                "The email template with key: {}, was not found.",
                key
            )),
            UseCaseError::DeliveryFailed(msg) => Self::DeliveryFailed(msg),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendTestReminderUseCase {
    type Response = String;

    type Error = UseCaseError;

    const NAME: &'static str = "SendTestReminder";

    async fn execute(&mut self, ctx: &SkifteContext) -> Result<Self::Response, Self::Error> {
        let vehicle = match ctx.repos.vehicles.find(&self.vehicle_id).await {
            Some(vehicle) => vehicle,
            None => return Err(UseCaseError::VehicleNotFound(self.vehicle_id.clone())),
        };
        let recipient = match ctx.repos.users.find(&vehicle.user_id).await {
            Some(user) => user,
            None => return Err(UseCaseError::OwnerNotFound(vehicle.user_id.clone())),
        };

        let key = EmailTemplate::key_for_offset(self.offset);
        let template = match ctx.repos.templates.find(&key).await {
            Some(template) => template,
            None => return Err(UseCaseError::MissingTemplate(key)),
        };

        // A throwaway attempt id: tracking links in a test mail resolve to
        // nothing, which the tracking endpoints tolerate by design
        let attempt_id = ID::new();
        let rendered = render_reminder(
            &template,
            &vehicle,
            &recipient,
            &attempt_id,
            ctx.sys.date_today(),
            &ctx.config,
        );

        let email = Email {
            to: recipient.email.clone(),
            subject: format!("[TEST] {}", rendered.subject),
            html: rendered.html,
        };
        ctx.email
            .send(email)
            .await
            .map_err(|e| UseCaseError::DeliveryFailed(e.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::Duration;
    use skifte_domain::{User, Vehicle};
    use skifte_infra::InMemoryEmailService;
    use std::sync::Arc;

    struct TestContext {
        ctx: SkifteContext,
        email: Arc<InMemoryEmailService>,
        vehicle: Vehicle,
    }

    async fn setup() -> TestContext {
        let email = Arc::new(InMemoryEmailService::new());
        let mut ctx = SkifteContext::create_inmemory();
        ctx.email = email.clone();

        let template = EmailTemplate::new(
            &EmailTemplate::key_for_offset(50),
            "{{vehicle_name}} renews soon",
            "<p>{{recipient_name}}</p><img src=\"{{open_pixel_url}}\" />",
        );
        ctx.repos.templates.upsert(&template).await.unwrap();

        let user = User::new("Kari Nordmann", "kari@example.com");
        ctx.repos.users.insert(&user).await.unwrap();
        let renewal_date = ctx.sys.date_today() + Duration::days(50);
        let vehicle = Vehicle::new(user.id.clone(), "EL 11223", renewal_date);
        ctx.repos.vehicles.insert(&vehicle).await.unwrap();

        TestContext {
            ctx,
            email,
            vehicle,
        }
    }

    #[actix_web::test]
    async fn sends_a_marked_test_mail_without_touching_the_ledger() {
        let t = setup().await;

        let usecase = SendTestReminderUseCase {
            vehicle_id: t.vehicle.id.clone(),
            offset: 50,
        };
        let res = execute(usecase, &t.ctx).await;
        assert!(res.is_ok());

        let sent = t.email.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].subject.starts_with("[TEST] "));
        assert!(t
            .ctx
            .repos
            .reminder_attempts
            .find_by_vehicle(&t.vehicle.id)
            .await
            .is_empty());
    }

    #[actix_web::test]
    async fn repeated_test_sends_are_not_deduplicated() {
        let t = setup().await;

        for _ in 0..2 {
            let usecase = SendTestReminderUseCase {
                vehicle_id: t.vehicle.id.clone(),
                offset: 50,
            };
            execute(usecase, &t.ctx).await.unwrap();
        }

        assert_eq!(t.email.sent().len(), 2);
    }

    #[actix_web::test]
    async fn rejects_unknown_vehicles() {
        let t = setup().await;

        let unknown = ID::new();
        let usecase = SendTestReminderUseCase {
            vehicle_id: unknown.clone(),
            offset: 50,
        };
        let res = execute(usecase, &t.ctx).await;

        assert_eq!(res.unwrap_err(), UseCaseError::VehicleNotFound(unknown));
        assert!(t.email.sent().is_empty());
    }

    #[actix_web::test]
    async fn rejects_offsets_without_a_template() {
        let t = setup().await;

        let usecase = SendTestReminderUseCase {
            vehicle_id: t.vehicle.id.clone(),
            offset: 40,
        };
        let res = execute(usecase, &t.ctx).await;

        assert_eq!(
            res.unwrap_err(),
            UseCaseError::MissingTemplate("reminder_40".into())
        );
    }
}
