/// Whole-document persistence for the record store.
///
/// Every operation runs load → mutate → persist under one async mutex. The
/// document is never cached between calls; the file is the source of truth.
/// Writes overwrite the file in place (no atomic rename).

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::{AppError, StoreError};
use crate::store::models::{Chirp, ChirpId, User, UserId};

/// On-disk layout: `{"chirps": {"1": {...}}, "users": {"1": {...}}, ...}`
#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct DbStructure {
    #[serde(default)]
    pub chirps: BTreeMap<ChirpId, Chirp>,
    #[serde(default)]
    pub users: BTreeMap<UserId, User>,
    /// High-water marks; 0 in documents written before they existed
    #[serde(default)]
    next_chirp_id: ChirpId,
    #[serde(default)]
    next_user_id: UserId,
}

impl DbStructure {
    /// Next chirp id. Ids of deleted chirps are never handed out again.
    pub fn allocate_chirp_id(&mut self) -> Result<ChirpId, StoreError> {
        let (id, next) = next_id(self.next_chirp_id, self.chirps.keys().next_back(), "chirp")?;
        self.next_chirp_id = next;
        Ok(id)
    }

    pub fn allocate_user_id(&mut self) -> Result<UserId, StoreError> {
        let (id, next) = next_id(self.next_user_id, self.users.keys().next_back(), "user")?;
        self.next_user_id = next;
        Ok(id)
    }
}

/// Returns the id to hand out and the new high-water mark
fn next_id(high_water: i64, max_key: Option<&i64>, kind: &str) -> Result<(i64, i64), StoreError> {
    let exhausted = || StoreError::Corrupt(format!("{} id space exhausted", kind));

    let floor = match max_key {
        Some(max) => max.checked_add(1).ok_or_else(exhausted)?,
        None => 1,
    };
    let id = high_water.max(floor);
    let next = id.checked_add(1).ok_or_else(exhausted)?;
    Ok((id, next))
}

/// The record store: users, chirps and refresh token state in one JSON file.
///
/// Construct once at startup and share it (e.g. through `web::Data`).
pub struct Database {
    path: PathBuf,
    lock: Mutex<()>,
}

impl Database {
    /// Open the store at `path`, creating an empty document if missing
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let db = Self {
            path: path.into(),
            lock: Mutex::new(()),
        };

        let _guard = db.lock.lock().await;
        if !tokio::fs::try_exists(&db.path).await.map_err(StoreError::from)? {
            tracing::info!(path = %db.path.display(), "Creating empty database document");
            db.persist(&DbStructure::default()).await?;
        } else {
            // fail early on an unreadable document
            db.load().await?;
        }
        drop(_guard);

        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run a read-only operation against a fresh load of the document
    pub(crate) async fn read<T, F>(&self, op: F) -> Result<T, AppError>
    where
        F: FnOnce(&DbStructure) -> Result<T, AppError>,
    {
        let _guard = self.lock.lock().await;
        let document = self.load().await?;
        op(&document)
    }

    /// Run a mutation and persist the whole document if it succeeds
    pub(crate) async fn write<T, F>(&self, op: F) -> Result<T, AppError>
    where
        F: FnOnce(&mut DbStructure) -> Result<T, AppError>,
    {
        let _guard = self.lock.lock().await;
        let mut document = self.load().await?;
        let output = op(&mut document)?;
        self.persist(&document).await?;
        Ok(output)
    }

    async fn load(&self) -> Result<DbStructure, StoreError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(path = %self.path.display(), "Database document missing, starting empty");
                return Ok(DbStructure::default());
            }
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "Failed to read database document");
                return Err(e.into());
            }
        };

        if raw.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(DbStructure::default());
        }

        serde_json::from_slice(&raw).map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to parse database document");
            StoreError::from(e)
        })
    }

    async fn persist(&self, document: &DbStructure) -> Result<(), StoreError> {
        let data = serde_json::to_vec(document)?;
        tokio::fs::write(&self.path, data).await.map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to write database document");
            StoreError::from(e)
        })
    }
}
