use super::IPreferenceRepo;
use skifte_domain::{NotificationPreference, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresPreferenceRepo {
    pool: PgPool,
}

impl PostgresPreferenceRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct PreferenceRaw {
    user_uid: Uuid,
    email_reminders_enabled: bool,
    reminder_offsets: Vec<i64>,
}

impl Into<NotificationPreference> for PreferenceRaw {
    fn into(self) -> NotificationPreference {
        NotificationPreference {
            user_id: self.user_uid.into(),
            email_reminders_enabled: self.email_reminders_enabled,
            reminder_offsets: self.reminder_offsets,
        }
    }
}

#[async_trait::async_trait]
impl IPreferenceRepo for PostgresPreferenceRepo {
    async fn insert(&self, preference: &NotificationPreference) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notification_preferences
            (user_uid, email_reminders_enabled, reminder_offsets)
            VALUES($1, $2, $3)
            "#,
        )
        .bind(preference.user_id.inner_ref())
        .bind(preference.email_reminders_enabled)
        .bind(&preference.reminder_offsets)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save(&self, preference: &NotificationPreference) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE notification_preferences
            SET email_reminders_enabled = $2,
            reminder_offsets = $3
            WHERE user_uid = $1
            "#,
        )
        .bind(preference.user_id.inner_ref())
        .bind(preference.email_reminders_enabled)
        .bind(&preference.reminder_offsets)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_user(&self, user_id: &ID) -> Option<NotificationPreference> {
        match sqlx::query_as::<_, PreferenceRaw>(
            r#"
            SELECT * FROM notification_preferences AS p
            WHERE p.user_uid = $1
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        {
            Ok(preference) => preference.map(|p| p.into()),
            Err(_) => None,
        }
    }
}
