use super::IUserRepo;
use skifte_domain::{User, ID};
use sqlx::{types::Uuid, FromRow, PgPool};

pub struct PostgresUserRepo {
    pool: PgPool,
}

impl PostgresUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRaw {
    user_uid: Uuid,
    name: String,
    email: String,
}

impl Into<User> for UserRaw {
    fn into(self) -> User {
        User {
            id: self.user_uid.into(),
            name: self.name,
            email: self.email,
        }
    }
}

#[async_trait::async_trait]
impl IUserRepo for PostgresUserRepo {
    async fn insert(&self, user: &User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users(user_uid, name, email)
            VALUES($1, $2, $3)
            "#,
        )
        .bind(user.id.inner_ref())
        .bind(&user.name)
        .bind(&user.email)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, user_id: &ID) -> Option<User> {
        match sqlx::query_as::<_, UserRaw>(
            r#"
            SELECT * FROM users AS u
            WHERE u.user_uid = $1
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        {
            Ok(user) => user.map(|u| u.into()),
            Err(_) => None,
        }
    }

    async fn delete(&self, user_id: &ID) -> Option<User> {
        match sqlx::query_as::<_, UserRaw>(
            r#"
            DELETE FROM users AS u
            WHERE u.user_uid = $1
            RETURNING *
            "#,
        )
        .bind(user_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        {
            Ok(user) => user.map(|u| u.into()),
            Err(_) => None,
        }
    }
}
