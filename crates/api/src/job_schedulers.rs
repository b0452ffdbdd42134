use crate::reminder::run_reminders::RunRemindersUseCase;
use crate::shared::usecase::execute;
use actix_web::rt::time::{interval, sleep};
use skifte_infra::SkifteContext;
use std::time::Duration;
use tracing::{error, info};

const SECS_PER_DAY: u64 = 60 * 60 * 24;

/// Seconds to wait until the next occurrence of `run_hour` UTC
pub fn secs_until_daily_run(now_ts_millis: i64, run_hour: u32) -> u64 {
    let secs_of_day = (now_ts_millis / 1000).rem_euclid(SECS_PER_DAY as i64) as u64;
    let run_at = u64::from(run_hour) * 60 * 60;
    if run_at > secs_of_day {
        run_at - secs_of_day
    } else {
        SECS_PER_DAY - secs_of_day + run_at
    }
}

/// Spawns the daily reminder batch. One instance of the application is
/// expected to be active at a time: the scheduler is what serializes runs,
/// the ledger's unique constraint is the backstop.
pub fn start_send_reminders_job(ctx: SkifteContext) {
    actix_web::rt::spawn(async move {
        let now = ctx.sys.get_timestamp_millis();
        let secs_to_first_run = secs_until_daily_run(now, ctx.config.reminder_run_hour);

        sleep(Duration::from_secs(secs_to_first_run)).await;
        let mut daily_interval = interval(Duration::from_secs(SECS_PER_DAY));
        loop {
            daily_interval.tick().await;

            let usecase = RunRemindersUseCase {
                today: ctx.sys.date_today(),
            };
            match execute(usecase, &ctx).await {
                Ok(reports) => {
                    for report in reports {
                        info!(
                            "Reminder run: offset {} sent {} with {} errors",
                            report.offset,
                            report.sent_count,
                            report.errors.len()
                        );
                    }
                }
                Err(e) => error!("Reminder run failed: {:?}", e),
            }
        }
    });
}
