use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::repo_types::UserRecord;
use crate::config::{AppConfig, StoreBackend};

mod json_file;
mod sqlite;

pub use json_file::JsonFileStore;
pub use sqlite::SqliteStore;

#[derive(Debug, thiserror::Error)]
pub enum InsertError {
    #[error("email already registered")]
    Duplicate,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Persistence seam for user records. Emails are compared exactly.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRecord>>;
    /// Adds a record, failing with [`InsertError::Duplicate`] if the email is taken.
    async fn insert(&self, record: UserRecord) -> Result<(), InsertError>;
    async fn count(&self) -> anyhow::Result<usize>;
}

pub async fn open(config: &AppConfig) -> anyhow::Result<Arc<dyn UserStore>> {
    let store = match config.backend {
        StoreBackend::Json => {
            Arc::new(JsonFileStore::open(&config.users_file).await) as Arc<dyn UserStore>
        }
        StoreBackend::Sqlite => {
            Arc::new(SqliteStore::connect(&config.database_url).await?) as Arc<dyn UserStore>
        }
    };
    tracing::info!(backend = ?config.backend, users = store.count().await?, "user store ready");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn config(dir: &Path, backend: StoreBackend) -> AppConfig {
        AppConfig {
            host: "127.0.0.1".into(),
            port: 0,
            users_file: dir.join("users.json"),
            public_dir: dir.join("public"),
            backend,
            database_url: format!("sqlite://{}?mode=rwc", dir.join("users.db").display()),
        }
    }

    #[tokio::test]
    async fn sqlite_backend_persists_to_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path(), StoreBackend::Sqlite);

        let store = open(&cfg).await.unwrap();
        store
            .insert(UserRecord::new("a@example.com", "$argon2id$placeholder"))
            .await
            .unwrap();
        drop(store);

        assert!(dir.path().join("users.db").exists());
        assert!(!dir.path().join("users.json").exists());

        let reopened = open(&cfg).await.unwrap();
        assert_eq!(reopened.count().await.unwrap(), 1);
        assert!(reopened.find_by_email("a@example.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn json_backend_writes_users_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path(), StoreBackend::Json);

        let store = open(&cfg).await.unwrap();
        store
            .insert(UserRecord::new("a@example.com", "$argon2id$placeholder"))
            .await
            .unwrap();

        assert!(dir.path().join("users.json").exists());
        assert!(!dir.path().join("users.db").exists());
        assert_eq!(open(&cfg).await.unwrap().count().await.unwrap(), 1);
    }
}
