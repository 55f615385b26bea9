/// Refresh Token Records
///
/// Each issued refresh token is stored under its own token string. The
/// record, not the token's signed claims, decides whether a refresh is
/// still allowed: revoking deletes the record outright.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Db;
use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: u64,
    pub expires_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Expired from `expires_at` onwards, the same boundary as a JWT `exp`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl Db {
    pub async fn save_refresh_token(
        &self,
        token: &str,
        user_id: u64,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        self.update(|doc| {
            doc.refresh_tokens.insert(
                token.to_string(),
                RefreshToken {
                    token: token.to_string(),
                    user_id,
                    expires_at,
                },
            );
            Ok(())
        })
        .await
    }

    pub async fn get_refresh_token(&self, token: &str) -> Result<Option<RefreshToken>, StoreError> {
        self.read(|doc| doc.refresh_tokens.get(token).cloned()).await
    }

    /// Idempotent: returns `false` when no record existed.
    pub async fn delete_refresh_token(&self, token: &str) -> Result<bool, StoreError> {
        self.update(|doc| Ok(doc.refresh_tokens.remove(token).is_some()))
            .await
    }
}
