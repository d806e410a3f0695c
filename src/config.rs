use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

/// Which persistence layer backs the user store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Json,
    Sqlite,
}

impl std::str::FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "sqlite" => Ok(Self::Sqlite),
            other => anyhow::bail!("unknown STORE_BACKEND {other:?} (expected json or sqlite)"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub users_file: PathBuf,
    pub public_dir: PathBuf,
    pub backend: StoreBackend,
    pub database_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = match lookup("PORT") {
            Some(v) => v
                .parse::<u16>()
                .with_context(|| format!("invalid PORT {v:?}"))?,
            None => 3000,
        };
        let backend = lookup("STORE_BACKEND")
            .unwrap_or_else(|| "json".into())
            .parse()?;

        Ok(Self {
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            users_file: lookup("USERS_FILE")
                .unwrap_or_else(|| "users.json".into())
                .into(),
            public_dir: lookup("PUBLIC_DIR")
                .unwrap_or_else(|| "public".into())
                .into(),
            backend,
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://users.db?mode=rwc".into()),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
