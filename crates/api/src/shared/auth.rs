use crate::error::SkifteError;
use actix_web::HttpRequest;
use skifte_infra::SkifteContext;

/// Operational endpoints (the reminder run trigger and the test send) are
/// meant for the scheduler and admin tooling, identified by a shared
/// secret header.
pub fn protect_job_route(http_req: &HttpRequest, ctx: &SkifteContext) -> Result<(), SkifteError> {
    match http_req.headers().get("skifte-job-key") {
        Some(key)
            if key
                .to_str()
                .map(|k| k == ctx.config.job_trigger_secret)
                .unwrap_or(false) =>
        {
            Ok(())
        }
        _ => Err(SkifteError::Unauthorized(
            "Missing or invalid skifte-job-key header".into(),
        )),
    }
}
