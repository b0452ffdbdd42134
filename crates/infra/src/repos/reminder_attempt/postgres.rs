use super::IReminderAttemptRepo;
use crate::repos::shared::repo::DeleteResult;
use skifte_domain::{ReminderAttempt, TrackedAction, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresReminderAttemptRepo {
    pool: PgPool,
}

impl PostgresReminderAttemptRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderAttemptRaw {
    attempt_uid: Uuid,
    vehicle_uid: Uuid,
    offset_label: String,
    sent_at: i64,
    recipient_name: String,
    recipient_email: String,
    registration_plate: String,
    vehicle_nickname: Option<String>,
    opened: bool,
    link_clicked: bool,
    callback_requested: bool,
    offer_requested: bool,
}

impl Into<ReminderAttempt> for ReminderAttemptRaw {
    fn into(self) -> ReminderAttempt {
        ReminderAttempt {
            id: self.attempt_uid.into(),
            vehicle_id: self.vehicle_uid.into(),
            offset_label: self.offset_label,
            sent_at: self.sent_at,
            recipient_name: self.recipient_name,
            recipient_email: self.recipient_email,
            registration_plate: self.registration_plate,
            vehicle_nickname: self.vehicle_nickname,
            opened: self.opened,
            link_clicked: self.link_clicked,
            callback_requested: self.callback_requested,
            offer_requested: self.offer_requested,
        }
    }
}

#[async_trait::async_trait]
impl IReminderAttemptRepo for PostgresReminderAttemptRepo {
    async fn insert(&self, attempt: &ReminderAttempt) -> anyhow::Result<()> {
        // The unique index on (vehicle_uid, offset_label) makes this fail
        // rather than duplicate when two runs overlap
        sqlx::query(
            r#"
            INSERT INTO reminder_attempts
            (attempt_uid, vehicle_uid, offset_label, sent_at,
             recipient_name, recipient_email, registration_plate, vehicle_nickname,
             opened, link_clicked, callback_requested, offer_requested)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(attempt.id.inner_ref())
        .bind(attempt.vehicle_id.inner_ref())
        .bind(&attempt.offset_label)
        .bind(attempt.sent_at)
        .bind(&attempt.recipient_name)
        .bind(&attempt.recipient_email)
        .bind(&attempt.registration_plate)
        .bind(&attempt.vehicle_nickname)
        .bind(attempt.opened)
        .bind(attempt.link_clicked)
        .bind(attempt.callback_requested)
        .bind(attempt.offer_requested)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, attempt_id: &ID) -> Option<ReminderAttempt> {
        match sqlx::query_as::<_, ReminderAttemptRaw>(
            r#"
            SELECT * FROM reminder_attempts AS r
            WHERE r.attempt_uid = $1
            "#,
        )
        .bind(attempt_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        {
            Ok(attempt) => attempt.map(|a| a.into()),
            Err(_) => None,
        }
    }

    async fn find_by_vehicle_and_offset(
        &self,
        vehicle_id: &ID,
        offset_label: &str,
    ) -> Option<ReminderAttempt> {
        match sqlx::query_as::<_, ReminderAttemptRaw>(
            r#"
            SELECT * FROM reminder_attempts AS r
            WHERE r.vehicle_uid = $1 AND r.offset_label = $2
            "#,
        )
        .bind(vehicle_id.inner_ref())
        .bind(offset_label)
        .fetch_optional(&self.pool)
        .await
        {
            Ok(attempt) => attempt.map(|a| a.into()),
            Err(_) => None,
        }
    }

    async fn find_by_vehicle(&self, vehicle_id: &ID) -> Vec<ReminderAttempt> {
        sqlx::query_as::<_, ReminderAttemptRaw>(
            r#"
            SELECT * FROM reminder_attempts AS r
            WHERE r.vehicle_uid = $1
            "#,
        )
        .bind(vehicle_id.inner_ref())
        .fetch_all(&self.pool)
        .await
        .unwrap_or_else(|_| Vec::new())
        .into_iter()
        .map(|a| a.into())
        .collect()
    }

    async fn mark_opened(&self, attempt_id: &ID) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminder_attempts
            SET opened = TRUE
            WHERE attempt_uid = $1
            "#,
        )
        .bind(attempt_id.inner_ref())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn mark_link_clicked(&self, attempt_id: &ID) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminder_attempts
            SET link_clicked = TRUE
            WHERE attempt_uid = $1
            "#,
        )
        .bind(attempt_id.inner_ref())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn mark_action(&self, attempt_id: &ID, action: TrackedAction) -> anyhow::Result<()> {
        let query = match action {
            TrackedAction::Callback => {
                r#"
                UPDATE reminder_attempts
                SET callback_requested = TRUE
                WHERE attempt_uid = $1
                "#
            }
            TrackedAction::Offer => {
                r#"
                UPDATE reminder_attempts
                SET offer_requested = TRUE
                WHERE attempt_uid = $1
                "#
            }
        };
        sqlx::query(query)
            .bind(attempt_id.inner_ref())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_by_vehicle(&self, vehicle_id: &ID) -> anyhow::Result<DeleteResult> {
        let res = sqlx::query(
            r#"
            DELETE FROM reminder_attempts AS r
            WHERE r.vehicle_uid = $1
            "#,
        )
        .bind(vehicle_id.inner_ref())
        .execute(&self.pool)
        .await?;
        Ok(DeleteResult {
            deleted_count: res.rows_affected() as i64,
        })
    }
}
