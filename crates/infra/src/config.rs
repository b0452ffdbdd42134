use skifte_utils::create_random_secret;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Secret expected in the `skifte-job-key` header of operational
    /// endpoints like the reminder run trigger
    pub job_trigger_secret: String,
    /// Port for the application to run on
    pub port: usize,
    /// Days before the renewal date at which reminders go out. Single
    /// source of truth: the batch job iterates this list and new
    /// notification preferences default to it.
    pub reminder_offsets: Vec<i64>,
    /// Share of the current annual fee quoted as the estimated yearly
    /// savings from switching provider
    pub savings_rate: f64,
    /// Public base URL of this service, used to build tracking links
    pub base_url: String,
    /// Where the "compare offers" link in a reminder really leads; the
    /// rendered link goes through the click-tracking redirect first
    pub switch_offers_url: String,
    /// UTC hour of day at which the daily reminder run starts
    pub reminder_run_hour: u32,
    /// SMTP delivery settings. `None` means delivery is not configured,
    /// which is fatal at context setup.
    pub smtp: Option<SmtpSettings>,
}

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub username: String,
    pub password: String,
    pub from_address: String,
    /// Delivery calls are not retried synchronously, they just get a hard
    /// timeout
    pub timeout_secs: u64,
}

const DEFAULT_REMINDER_OFFSETS: [i64; 3] = [50, 30, 7];

impl Config {
    pub fn new() -> Self {
        let job_trigger_secret = match std::env::var("JOB_TRIGGER_SECRET") {
            Ok(secret) => secret,
            Err(_) => {
                info!("Did not find JOB_TRIGGER_SECRET environment variable. Going to create one.");
                let secret = create_random_secret(16);
                info!(
                    "Secret code for triggering reminder runs was generated and set to: {}",
                    secret
                );
                secret
            }
        };

        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or(default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };

        let reminder_offsets = match std::env::var("REMINDER_OFFSETS") {
            Ok(offsets) => match parse_offsets(&offsets) {
                Some(offsets) => offsets,
                None => {
                    warn!(
                        "The given REMINDER_OFFSETS: {} is not a list of positive day counts, falling back to the defaults: {:?}.",
                        offsets, DEFAULT_REMINDER_OFFSETS
                    );
                    DEFAULT_REMINDER_OFFSETS.to_vec()
                }
            },
            Err(_) => DEFAULT_REMINDER_OFFSETS.to_vec(),
        };

        let savings_rate = std::env::var("SAVINGS_RATE")
            .ok()
            .and_then(|rate| rate.parse::<f64>().ok())
            .unwrap_or(0.18);

        let base_url = std::env::var("BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", port));

        let switch_offers_url = std::env::var("SWITCH_OFFERS_URL")
            .unwrap_or_else(|_| format!("{}/compare", base_url.trim_end_matches('/')));

        let default_run_hour = 7;
        let reminder_run_hour = std::env::var("REMINDER_RUN_HOUR")
            .ok()
            .and_then(|hour| hour.parse::<u32>().ok())
            .filter(|hour| *hour < 24)
            .unwrap_or(default_run_hour);

        let smtp = match (
            std::env::var("SMTP_HOST"),
            std::env::var("SMTP_USERNAME"),
            std::env::var("SMTP_PASSWORD"),
            std::env::var("EMAIL_FROM"),
        ) {
            (Ok(host), Ok(username), Ok(password), Ok(from_address)) => Some(SmtpSettings {
                host,
                username,
                password,
                from_address,
                timeout_secs: std::env::var("SMTP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|secs| secs.parse::<u64>().ok())
                    .unwrap_or(10),
            }),
            _ => {
                warn!("SMTP_HOST, SMTP_USERNAME, SMTP_PASSWORD and EMAIL_FROM are not all set. Email delivery is not configured.");
                None
            }
        };

        Self {
            job_trigger_secret,
            port,
            reminder_offsets,
            savings_rate,
            base_url,
            switch_offers_url,
            reminder_run_hour,
            smtp,
        }
    }

    /// Prefix for the public tracking endpoints embedded in emails
    pub fn tracking_base_url(&self) -> String {
        format!("{}/api/v1/track", self.base_url.trim_end_matches('/'))
    }
}

fn parse_offsets(offsets: &str) -> Option<Vec<i64>> {
    let parsed = offsets
        .split(',')
        .map(|o| o.trim().parse::<i64>())
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    if parsed.is_empty() || parsed.iter().any(|o| *o <= 0) {
        return None;
    }
    Some(parsed)
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_offset_lists() {
        assert_eq!(parse_offsets("50,30,7"), Some(vec![50, 30, 7]));
        assert_eq!(parse_offsets("60, 50, 40"), Some(vec![60, 50, 40]));
        assert_eq!(parse_offsets(""), None);
        assert_eq!(parse_offsets("50,abc"), None);
        assert_eq!(parse_offsets("50,-1"), None);
        assert_eq!(parse_offsets("0"), None);
    }
}
