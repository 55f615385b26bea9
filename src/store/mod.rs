/// File-backed Document Store
///
/// All server state lives in one JSON document on disk. Every operation
/// loads the whole document, works on it in memory and, for mutations,
/// writes the whole document back. A single `RwLock` guards the file:
/// reads share it, and each mutation holds it exclusively for the full
/// load -> mutate -> persist unit so concurrent requests never interleave.

mod chirps;
mod refresh_tokens;
mod users;

pub use chirps::{Chirp, DeleteOutcome};
pub use refresh_tokens::RefreshToken;
pub use users::{User, UserRecord};

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::RwLock;

use crate::error::StoreError;

/// The whole persisted state
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub chirps: BTreeMap<u64, Chirp>,
    #[serde(default)]
    pub users: BTreeMap<u64, UserRecord>,
    #[serde(default)]
    pub refresh_tokens: BTreeMap<String, RefreshToken>,
    #[serde(default)]
    pub next_ids: IdCounters,
}

/// Last id handed out per collection.
///
/// Ids only ever grow, so a deleted entry's id is never assigned again.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdCounters {
    #[serde(default)]
    pub chirps: u64,
    #[serde(default)]
    pub users: u64,
}

/// Allocate the next id for a collection.
///
/// Documents written before the counters existed still have entries, so the
/// highest existing key is taken into account as well.
pub(crate) fn allocate_id<V>(last: &mut u64, existing: &BTreeMap<u64, V>) -> u64 {
    let highest = existing.keys().next_back().copied().unwrap_or(0);
    *last = (*last).max(highest) + 1;
    *last
}

pub struct Db {
    path: PathBuf,
    lock: RwLock<()>,
}

impl Db {
    /// Open the document at `path`, creating it (and its directory) with an
    /// empty skeleton if it does not exist yet.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let db = Self {
            path: path.into(),
            lock: RwLock::new(()),
        };

        {
            let _guard = db.lock.write().await;
            if let Some(parent) = db.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).await?;
                }
            }
            if fs::metadata(&db.path).await.is_err() {
                tracing::info!(path = %db.path.display(), "Creating empty document");
                db.persist(&Document::default()).await?;
            }
        }

        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` against a consistent snapshot of the document.
    pub async fn read<T>(&self, f: impl FnOnce(&Document) -> T) -> Result<T, StoreError> {
        let _guard = self.lock.read().await;
        let doc = self.load().await?;
        Ok(f(&doc))
    }

    /// Run one transactional unit: the exclusive lock is held while the
    /// document is loaded, mutated by `f` and written back. Nothing is
    /// written when `f` fails.
    pub async fn update<T>(
        &self,
        f: impl FnOnce(&mut Document) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _guard = self.lock.write().await;
        let mut doc = self.load().await?;
        let out = f(&mut doc)?;
        self.persist(&doc).await?;
        Ok(out)
    }

    async fn load(&self) -> Result<Document, StoreError> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            // Removed out from under us; the next mutation recreates it
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Document::default()),
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "Failed to read document");
                Err(e.into())
            }
        }
    }

    /// Callers must hold the write lock.
    async fn persist(&self, doc: &Document) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(doc)?;
        let tmp = self.temp_path();

        fs::write(&tmp, &bytes).await.map_err(|e| {
            tracing::error!(path = %tmp.display(), error = %e, "Failed to write document");
            StoreError::Io(e)
        })?;
        fs::rename(&tmp, &self.path).await.map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "Failed to replace document");
            StoreError::Io(e)
        })?;

        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "database.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
