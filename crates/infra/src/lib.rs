mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, SmtpSettings};
pub use repos::{
    DeleteResult, IPreferenceRepo, IReminderAttemptRepo, ITemplateRepo, IUserRepo, IVehicleRepo,
    Repos,
};
pub use services::{Email, IEmailService, InMemoryEmailService, SmtpEmailService};
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;

#[derive(Clone)]
pub struct SkifteContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub email: Arc<dyn IEmailService>,
}

struct ContextParams {
    pub postgres_connection_string: String,
}

impl SkifteContext {
    async fn create(params: ContextParams) -> Self {
        let repos = Repos::create_postgres(&params.postgres_connection_string)
            .await
            .expect("Postgres credentials must be set and valid");
        let config = Config::new();
        let smtp = config
            .smtp
            .as_ref()
            .expect("SMTP credentials must be set to deliver reminders");
        let email =
            SmtpEmailService::new(smtp).expect("SMTP credentials must be set and valid");
        Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            email: Arc::new(email),
        }
    }

    /// Context backed by inmemory repositories and an inmemory mail service.
    /// Used by tests, which typically swap in their own `sys` and `email`.
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::new(),
            sys: Arc::new(RealSys {}),
            email: Arc::new(InMemoryEmailService::new()),
        }
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> SkifteContext {
    SkifteContext::create(ContextParams {
        postgres_connection_string: get_psql_connection_string(),
    })
    .await
}

fn get_psql_connection_string() -> String {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING)
        .unwrap_or_else(|_| panic!("{} env var to be present.", PSQL_CONNECTION_STRING))
}

pub async fn run_migration() -> Result<(), MigrateError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&get_psql_connection_string())
        .await
        .expect("TO CONNECT TO POSTGRES");

    sqlx::migrate!().run(&pool).await
}
