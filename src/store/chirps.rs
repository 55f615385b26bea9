use serde::{Deserialize, Serialize};

use super::{allocate_id, Db};
use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chirp {
    pub id: u64,
    pub body: String,
    #[serde(default)]
    pub author_id: u64,
}

/// Result of an author-checked delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    Forbidden,
}

impl Db {
    pub async fn create_chirp(&self, body: String, author_id: u64) -> Result<Chirp, StoreError> {
        self.update(move |doc| {
            let id = allocate_id(&mut doc.next_ids.chirps, &doc.chirps);
            let chirp = Chirp {
                id,
                body,
                author_id,
            };
            doc.chirps.insert(id, chirp.clone());
            Ok(chirp)
        })
        .await
    }

    /// All chirps in ascending id order, optionally limited to one author.
    pub async fn list_chirps(&self, author_id: Option<u64>) -> Result<Vec<Chirp>, StoreError> {
        self.read(|doc| {
            doc.chirps
                .values()
                .filter(|c| author_id.map_or(true, |author| c.author_id == author))
                .cloned()
                .collect()
        })
        .await
    }

    pub async fn get_chirp(&self, id: u64) -> Result<Option<Chirp>, StoreError> {
        self.read(|doc| doc.chirps.get(&id).cloned()).await
    }

    /// Delete chirp `id` if `author_id` wrote it. The lookup, the author
    /// check and the removal happen in one locked unit.
    pub async fn delete_chirp_by(
        &self,
        id: u64,
        author_id: u64,
    ) -> Result<DeleteOutcome, StoreError> {
        self.update(|doc| {
            let outcome = match doc.chirps.get(&id) {
                None => DeleteOutcome::NotFound,
                Some(chirp) if chirp.author_id != author_id => DeleteOutcome::Forbidden,
                Some(_) => {
                    doc.chirps.remove(&id);
                    DeleteOutcome::Deleted
                }
            };
            Ok(outcome)
        })
        .await
    }
}
