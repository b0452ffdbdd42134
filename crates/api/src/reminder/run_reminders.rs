use super::render_reminder;
use crate::error::SkifteError;
use crate::shared::auth::protect_job_route;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{Duration, NaiveDate};
use futures::stream::{self, StreamExt};
use skifte_api_structs::run_reminders::*;
use skifte_domain::{EmailTemplate, OffsetRunReport, ReminderAttempt, Vehicle};
use skifte_infra::{Email, SkifteContext};
use std::collections::HashMap;
use tracing::{debug, error, warn};

/// Upper bound on in-flight deliveries within one run. Per-vehicle work is
/// independent, only the ledger is shared.
const MAX_CONCURRENT_DELIVERIES: usize = 8;

pub async fn run_reminders_controller(
    http_req: HttpRequest,
    ctx: web::Data<SkifteContext>,
) -> Result<HttpResponse, SkifteError> {
    protect_job_route(&http_req, &ctx)?;

    let usecase = RunRemindersUseCase {
        today: ctx.sys.date_today(),
    };

    execute(usecase, &ctx)
        .await
        .map(|reports| HttpResponse::Ok().json(APIResponse::new(reports)))
        .map_err(SkifteError::from)
}

/// The daily reminder batch. For each configured offset it finds vehicles
/// renewing exactly `offset` days from `today`, filters them through the
/// owner's preferences and the deduplication ledger, and delivers the
/// rendered reminder. A ledger row is written only after confirmed
/// delivery, which makes the whole job safe to re-run: an aborted or failed
/// run leaves no row, a completed send leaves exactly one.
#[derive(Debug)]
pub struct RunRemindersUseCase {
    pub today: NaiveDate,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    MissingTemplate(String),
}

impl From<UseCaseError> for SkifteError {
    fn from(e: UseCaseError) -> Self {
        match e {
            // A missing template is an operator problem, not a client one
            UseCaseError::MissingTemplate(_) => Self::InternalError,
        }
    }
}

enum SendOutcome {
    Sent,
    Skipped,
    Failed(String),
}

#[async_trait::async_trait(?Send)]
impl UseCase for RunRemindersUseCase {
    type Response = Vec<OffsetRunReport>;

    type Error = UseCaseError;

    const NAME: &'static str = "RunReminders";

    async fn execute(&mut self, ctx: &SkifteContext) -> Result<Self::Response, Self::Error> {
        // Resolve every template up front. A missing one is a configuration
        // error that aborts the run before anything is sent.
        let mut templates = HashMap::new();
        for offset in &ctx.config.reminder_offsets {
            let key = EmailTemplate::key_for_offset(*offset);
            match ctx.repos.templates.find(&key).await {
                Some(template) => templates.insert(*offset, template),
                None => return Err(UseCaseError::MissingTemplate(key)),
            };
        }

        let today = self.today;
        let mut reports = Vec::with_capacity(ctx.config.reminder_offsets.len());

        for offset in ctx.config.reminder_offsets.clone() {
            let target_date = today + Duration::days(offset);

            // A read failure forfeits only this offset's batch
            let vehicles = match ctx.repos.vehicles.find_by_renewal_date(target_date).await {
                Ok(vehicles) => vehicles,
                Err(e) => {
                    error!(
                        "Could not query vehicles renewing at {}: {:?}",
                        target_date, e
                    );
                    reports.push(OffsetRunReport {
                        offset,
                        sent_count: 0,
                        errors: vec![format!("Vehicle lookup for {} failed: {}", target_date, e)],
                    });
                    continue;
                }
            };

            let template = &templates[&offset];
            let outcomes = stream::iter(vehicles)
                .map(|vehicle| send_reminder(vehicle, offset, template, today, ctx))
                .buffer_unordered(MAX_CONCURRENT_DELIVERIES)
                .collect::<Vec<_>>()
                .await;

            let mut report = OffsetRunReport {
                offset,
                sent_count: 0,
                errors: Vec::new(),
            };
            for outcome in outcomes {
                match outcome {
                    SendOutcome::Sent => report.sent_count += 1,
                    SendOutcome::Skipped => {}
                    SendOutcome::Failed(err) => report.errors.push(err),
                }
            }
            reports.push(report);
        }

        Ok(reports)
    }
}

async fn send_reminder(
    vehicle: Vehicle,
    offset: i64,
    template: &EmailTemplate,
    today: NaiveDate,
    ctx: &SkifteContext,
) -> SendOutcome {
    let offset_label = offset.to_string();

    let preference = match ctx.repos.preferences.find_by_user(&vehicle.user_id).await {
        Some(preference) => preference,
        None => {
            warn!(
                "Vehicle {} owner {} has no notification preferences, skipping",
                vehicle.id, vehicle.user_id
            );
            return SendOutcome::Skipped;
        }
    };
    // A denial leaves no trace, so a later preference change can still
    // allow an offset that was never attempted
    if !preference.allows_offset(offset) {
        return SendOutcome::Skipped;
    }

    // The ledger check is what makes the job safe to re-run
    if ctx
        .repos
        .reminder_attempts
        .find_by_vehicle_and_offset(&vehicle.id, &offset_label)
        .await
        .is_some()
    {
        return SendOutcome::Skipped;
    }

    let recipient = match ctx.repos.users.find(&vehicle.user_id).await {
        Some(user) => user,
        None => {
            warn!(
                "Vehicle {} owner {} does not exist, skipping",
                vehicle.id, vehicle.user_id
            );
            return SendOutcome::Skipped;
        }
    };

    let attempt = ReminderAttempt::new(
        &vehicle,
        &recipient,
        &offset_label,
        ctx.sys.get_timestamp_millis(),
    );
    let rendered = render_reminder(
        template,
        &vehicle,
        &recipient,
        &attempt.id,
        today,
        &ctx.config,
    );

    let email = Email {
        to: recipient.email.clone(),
        subject: rendered.subject,
        html: rendered.html,
    };
    match ctx.email.send(email).await {
        Ok(message_id) => {
            debug!(
                "Sent {} day reminder for vehicle {}: {}",
                offset, vehicle.id, message_id
            );
            // Commit point of the idempotency invariant: only a confirmed
            // delivery is recorded
            if let Err(e) = ctx.repos.reminder_attempts.insert(&attempt).await {
                error!(
                    "Reminder for vehicle {} was delivered but could not be recorded: {:?}",
                    vehicle.id, e
                );
                return SendOutcome::Failed(format!(
                    "Vehicle {}: delivered but not recorded: {}",
                    vehicle.id, e
                ));
            }
            SendOutcome::Sent
        }
        Err(e) => {
            error!(
                "Could not deliver {} day reminder for vehicle {}: {:?}",
                offset, vehicle.id, e
            );
            SendOutcome::Failed(format!("Vehicle {}: {}", vehicle.id, e))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use skifte_domain::{NotificationPreference, User, ID};
    use skifte_infra::{ISys, InMemoryEmailService};
    use std::sync::Arc;

    pub struct StaticTimeSys;
    impl ISys for StaticTimeSys {
        fn get_timestamp_millis(&self) -> i64 {
            1_772_000_000_000
        }

        fn date_today(&self) -> NaiveDate {
            NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
        }
    }

    fn today() -> NaiveDate {
        StaticTimeSys {}.date_today()
    }

    struct TestContext {
        ctx: SkifteContext,
        email: Arc<InMemoryEmailService>,
        user: User,
        vehicle: Vehicle,
    }

    async fn setup_without_templates(offset: i64) -> TestContext {
        let email = Arc::new(InMemoryEmailService::new());
        let mut ctx = SkifteContext::create_inmemory();
        ctx.sys = Arc::new(StaticTimeSys {});
        ctx.email = email.clone();
        ctx.config.reminder_offsets = vec![50, 30, 7];
        ctx.config.savings_rate = 0.18;
        ctx.config.base_url = "https://skifte.test".into();
        ctx.config.switch_offers_url = "https://skifte.test/compare".into();

        let user = User::new("Kari Nordmann", "kari@example.com");
        ctx.repos.users.insert(&user).await.unwrap();
        let preference =
            NotificationPreference::new(user.id.clone(), &ctx.config.reminder_offsets);
        ctx.repos.preferences.insert(&preference).await.unwrap();

        let mut vehicle = Vehicle::new(
            user.id.clone(),
            "EL 11223",
            today() + Duration::days(offset),
        );
        vehicle.nickname = Some("Van".into());
        vehicle.current_annual_fee = Some(4500.);
        ctx.repos.vehicles.insert(&vehicle).await.unwrap();

        TestContext {
            ctx,
            email,
            user,
            vehicle,
        }
    }

    async fn setup(offset: i64) -> TestContext {
        let t = setup_without_templates(offset).await;
        for offset in &t.ctx.config.reminder_offsets {
            let template = EmailTemplate::new(
                &EmailTemplate::key_for_offset(*offset),
                "{{vehicle_name}}: {{days_remaining}} days left, save {{estimated_savings}}",
                "<p>Hi {{recipient_name}}, {{vehicle_name}} ({{registration_plate}}) renews on {{renewal_date}}. {{status_label}}.</p>\
                 <a href=\"{{switch_url}}\">Switch</a>\
                 <a href=\"{{callback_url}}\">Callback</a>\
                 <a href=\"{{offer_url}}\">Offer</a>\
                 <img src=\"{{open_pixel_url}}\" width=\"1\" height=\"1\" />",
            );
            t.ctx.repos.templates.upsert(&template).await.unwrap();
        }
        t
    }

    async fn run(ctx: &SkifteContext) -> Vec<OffsetRunReport> {
        let usecase = RunRemindersUseCase { today: today() };
        execute(usecase, ctx).await.unwrap()
    }

    fn report_for(reports: &[OffsetRunReport], offset: i64) -> &OffsetRunReport {
        reports.iter().find(|r| r.offset == offset).unwrap()
    }

    #[actix_web::test]
    async fn sends_one_reminder_for_a_vehicle_renewing_at_an_offset() {
        let t = setup(50).await;

        let reports = run(&t.ctx).await;

        assert_eq!(report_for(&reports, 50).sent_count, 1);
        assert_eq!(report_for(&reports, 30).sent_count, 0);
        assert_eq!(report_for(&reports, 7).sent_count, 0);
        assert!(reports.iter().all(|r| r.errors.is_empty()));

        let attempt = t
            .ctx
            .repos
            .reminder_attempts
            .find_by_vehicle_and_offset(&t.vehicle.id, "50")
            .await
            .expect("Attempt to be recorded");
        assert_eq!(attempt.recipient_email, t.user.email);
        assert_eq!(attempt.registration_plate, "EL 11223");
        assert_eq!(attempt.sent_at, t.ctx.sys.get_timestamp_millis());

        let sent = t.email.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "kari@example.com");
        // Nickname and rounded savings (4500 * 0.18) end up in the subject
        assert!(sent[0].subject.contains("Van"));
        assert!(sent[0].subject.contains("810"));
        // Tracking URLs in the body correlate back to the recorded attempt
        assert!(sent[0].html.contains(&attempt.id.as_string()));
        assert!(!sent[0].html.contains("{{"));
    }

    #[actix_web::test]
    async fn running_twice_sends_exactly_once() {
        let t = setup(50).await;

        let first = run(&t.ctx).await;
        assert_eq!(report_for(&first, 50).sent_count, 1);

        let second = run(&t.ctx).await;
        assert_eq!(report_for(&second, 50).sent_count, 0);
        assert!(second.iter().all(|r| r.errors.is_empty()));

        assert_eq!(t.email.sent().len(), 1);
        assert_eq!(
            t.ctx
                .repos
                .reminder_attempts
                .find_by_vehicle(&t.vehicle.id)
                .await
                .len(),
            1
        );
    }

    #[actix_web::test]
    async fn disabled_preferences_never_produce_attempts() {
        let t = setup(50).await;
        let mut preference = t
            .ctx
            .repos
            .preferences
            .find_by_user(&t.user.id)
            .await
            .unwrap();
        preference.email_reminders_enabled = false;
        t.ctx.repos.preferences.save(&preference).await.unwrap();

        let reports = run(&t.ctx).await;

        assert_eq!(report_for(&reports, 50).sent_count, 0);
        assert!(t.email.sent().is_empty());
        assert!(t
            .ctx
            .repos
            .reminder_attempts
            .find_by_vehicle(&t.vehicle.id)
            .await
            .is_empty());
    }

    #[actix_web::test]
    async fn a_denied_offset_can_still_be_sent_after_a_preference_change() {
        let t = setup(50).await;
        let mut preference = t
            .ctx
            .repos
            .preferences
            .find_by_user(&t.user.id)
            .await
            .unwrap();
        preference.reminder_offsets = vec![30, 7];
        t.ctx.repos.preferences.save(&preference).await.unwrap();

        let reports = run(&t.ctx).await;
        assert_eq!(report_for(&reports, 50).sent_count, 0);

        // The denial left no ledger row, so re-enabling the offset works
        preference.reminder_offsets = vec![50, 30, 7];
        t.ctx.repos.preferences.save(&preference).await.unwrap();

        let reports = run(&t.ctx).await;
        assert_eq!(report_for(&reports, 50).sent_count, 1);
    }

    #[actix_web::test]
    async fn a_missing_preference_record_skips_only_that_vehicle() {
        let t = setup(50).await;

        let orphan_owner = User::new("Ola Nordmann", "ola@example.com");
        t.ctx.repos.users.insert(&orphan_owner).await.unwrap();
        let orphan_vehicle = Vehicle::new(
            orphan_owner.id.clone(),
            "DR 99887",
            today() + Duration::days(50),
        );
        t.ctx.repos.vehicles.insert(&orphan_vehicle).await.unwrap();

        let reports = run(&t.ctx).await;

        let report = report_for(&reports, 50);
        assert_eq!(report.sent_count, 1);
        assert!(report.errors.is_empty());
        assert!(t
            .ctx
            .repos
            .reminder_attempts
            .find_by_vehicle(&orphan_vehicle.id)
            .await
            .is_empty());
    }

    #[actix_web::test]
    async fn a_failed_delivery_leaves_no_ledger_row_and_is_retried_next_run() {
        let t = setup(50).await;
        t.email.set_failing(true);

        let reports = run(&t.ctx).await;
        let report = report_for(&reports, 50);
        assert_eq!(report.sent_count, 0);
        assert_eq!(report.errors.len(), 1);
        assert!(t
            .ctx
            .repos
            .reminder_attempts
            .find_by_vehicle(&t.vehicle.id)
            .await
            .is_empty());

        t.email.set_failing(false);
        let reports = run(&t.ctx).await;
        assert_eq!(report_for(&reports, 50).sent_count, 1);
        assert_eq!(t.email.sent().len(), 1);
    }

    #[actix_web::test]
    async fn a_missing_template_aborts_the_run_before_anything_is_sent() {
        let t = setup_without_templates(50).await;

        let mut usecase = RunRemindersUseCase { today: today() };
        let res = usecase.execute(&t.ctx).await;

        assert_eq!(
            res.unwrap_err(),
            UseCaseError::MissingTemplate("reminder_50".into())
        );
        assert!(t.email.sent().is_empty());
    }

    #[actix_web::test]
    async fn vehicles_renewing_off_schedule_are_ignored() {
        let t = setup(49).await;

        let reports = run(&t.ctx).await;

        assert!(reports.iter().all(|r| r.sent_count == 0));
        assert!(t.email.sent().is_empty());
    }
}
