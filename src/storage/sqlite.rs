use anyhow::Context;
use async_trait::async_trait;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use super::{InsertError, UserStore};
use crate::auth::repo_types::UserRecord;

/// User store on an embedded SQLite database with a unique index on email.
#[derive(Clone)]
pub struct SqliteStore {
    db: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let db = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Self::from_pool(db).await
    }

    /// Wraps an existing pool, applying pending migrations.
    pub async fn from_pool(db: SqlitePool) -> anyhow::Result<Self> {
        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("run migrations")?;
        Ok(Self { db })
    }
}

#[async_trait]
impl UserStore for SqliteStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT email, password, created_at AS timestamp
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("select user by email")?;
        Ok(user)
    }

    async fn insert(&self, record: UserRecord) -> Result<(), InsertError> {
        let res = sqlx::query(
            r#"
            INSERT INTO users (email, password, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&record.email)
        .bind(&record.password)
        .bind(record.timestamp)
        .execute(&self.db)
        .await;

        match res {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(InsertError::Duplicate),
            Err(e) => Err(anyhow::Error::new(e).context("insert user").into()),
        }
    }

    async fn count(&self) -> anyhow::Result<usize> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await
            .context("count users")?;
        Ok(n as usize)
    }
}
