mod preference;
mod reminder_attempt;
mod shared;
mod template;
mod user;
mod vehicle;

pub use preference::IPreferenceRepo;
use preference::{InMemoryPreferenceRepo, PostgresPreferenceRepo};
pub use reminder_attempt::IReminderAttemptRepo;
use reminder_attempt::{InMemoryReminderAttemptRepo, PostgresReminderAttemptRepo};
pub use shared::repo::DeleteResult;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
pub use template::ITemplateRepo;
use template::{InMemoryTemplateRepo, PostgresTemplateRepo};
use tracing::info;
pub use user::IUserRepo;
use user::{InMemoryUserRepo, PostgresUserRepo};
pub use vehicle::IVehicleRepo;
use vehicle::{InMemoryVehicleRepo, PostgresVehicleRepo};

#[derive(Clone)]
pub struct Repos {
    pub vehicles: Arc<dyn IVehicleRepo>,
    pub users: Arc<dyn IUserRepo>,
    pub preferences: Arc<dyn IPreferenceRepo>,
    pub templates: Arc<dyn ITemplateRepo>,
    pub reminder_attempts: Arc<dyn IReminderAttemptRepo>,
}

impl Repos {
    pub async fn create_postgres(connection_string: &str) -> anyhow::Result<Self> {
        info!("DB CHECKING CONNECTION ...");
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(connection_string)
            .await?;
        info!("DB CHECKING CONNECTION ... [done]");

        Ok(Self {
            vehicles: Arc::new(PostgresVehicleRepo::new(pool.clone())),
            users: Arc::new(PostgresUserRepo::new(pool.clone())),
            preferences: Arc::new(PostgresPreferenceRepo::new(pool.clone())),
            templates: Arc::new(PostgresTemplateRepo::new(pool.clone())),
            reminder_attempts: Arc::new(PostgresReminderAttemptRepo::new(pool)),
        })
    }

    pub fn create_inmemory() -> Self {
        Self {
            vehicles: Arc::new(InMemoryVehicleRepo::new()),
            users: Arc::new(InMemoryUserRepo::new()),
            preferences: Arc::new(InMemoryPreferenceRepo::new()),
            templates: Arc::new(InMemoryTemplateRepo::new()),
            reminder_attempts: Arc::new(InMemoryReminderAttemptRepo::new()),
        }
    }
}
