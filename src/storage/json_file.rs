use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{InsertError, UserStore};
use crate::auth::repo_types::UserRecord;

/// Reads the whole snapshot. A missing or unparseable file yields no users.
pub async fn load(path: &Path) -> Vec<UserRecord> {
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            warn!(error = %e, path = %path.display(), "could not read users file; starting empty");
            return Vec::new();
        }
    };
    match serde_json::from_slice(&raw) {
        Ok(records) => records,
        Err(e) => {
            warn!(error = %e, path = %path.display(), "could not parse users file; starting empty");
            Vec::new()
        }
    }
}

/// Overwrites the snapshot with `records` via a temp file and rename.
pub async fn save(path: &Path, records: &[UserRecord]) -> anyhow::Result<()> {
    let body = serde_json::to_vec_pretty(records).context("serialize users")?;

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("create {}", dir.display()))?;
    }
    tokio::fs::write(&tmp, body)
        .await
        .with_context(|| format!("write {}", tmp.display()))?;
    tokio::fs::rename(&tmp, path)
        .await
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}

struct Snapshot {
    records: Vec<UserRecord>,
    by_email: HashMap<String, usize>,
}

impl Snapshot {
    fn index(loaded: Vec<UserRecord>) -> Self {
        let mut records = Vec::with_capacity(loaded.len());
        let mut by_email = HashMap::with_capacity(loaded.len());
        for record in loaded {
            if by_email.contains_key(&record.email) {
                warn!(email = %record.email, "duplicate email in users file; keeping the first");
                continue;
            }
            by_email.insert(record.email.clone(), records.len());
            records.push(record);
        }
        Self { records, by_email }
    }
}

/// User store kept in memory and written back to a single JSON array file on every insert.
pub struct JsonFileStore {
    path: PathBuf,
    inner: Mutex<Snapshot>,
}

impl JsonFileStore {
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let snapshot = Snapshot::index(load(&path).await);
        debug!(path = %path.display(), users = snapshot.records.len(), "users file loaded");
        Self {
            path,
            inner: Mutex::new(snapshot),
        }
    }
}

#[async_trait]
impl UserStore for JsonFileStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRecord>> {
        let snap = self.inner.lock().await;
        Ok(snap
            .by_email
            .get(email)
            .map(|&i| snap.records[i].clone()))
    }

    async fn insert(&self, record: UserRecord) -> Result<(), InsertError> {
        let mut snap = self.inner.lock().await;
        if snap.by_email.contains_key(&record.email) {
            return Err(InsertError::Duplicate);
        }

        let email = record.email.clone();
        let idx = snap.records.len();
        snap.records.push(record);

        if let Err(e) = save(&self.path, &snap.records).await {
            // keep memory in step with what is on disk
            snap.records.truncate(idx);
            return Err(e.into());
        }
        snap.by_email.insert(email, idx);
        Ok(())
    }

    async fn count(&self) -> anyhow::Result<usize> {
        Ok(self.inner.lock().await.records.len())
    }
}
