use super::ITemplateRepo;
use skifte_domain::EmailTemplate;
use sqlx::{FromRow, PgPool};

pub struct PostgresTemplateRepo {
    pool: PgPool,
}

impl PostgresTemplateRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TemplateRaw {
    template_key: String,
    subject: String,
    body: String,
}

impl Into<EmailTemplate> for TemplateRaw {
    fn into(self) -> EmailTemplate {
        EmailTemplate {
            key: self.template_key,
            subject: self.subject,
            body: self.body,
        }
    }
}

#[async_trait::async_trait]
impl ITemplateRepo for PostgresTemplateRepo {
    async fn upsert(&self, template: &EmailTemplate) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO email_templates(template_key, subject, body)
            VALUES($1, $2, $3)
            ON CONFLICT (template_key)
            DO UPDATE SET subject = EXCLUDED.subject, body = EXCLUDED.body
            "#,
        )
        .bind(&template.key)
        .bind(&template.subject)
        .bind(&template.body)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, key: &str) -> Option<EmailTemplate> {
        match sqlx::query_as::<_, TemplateRaw>(
            r#"
            SELECT * FROM email_templates AS t
            WHERE t.template_key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        {
            Ok(template) => template.map(|t| t.into()),
            Err(_) => None,
        }
    }
}
