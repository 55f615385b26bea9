use serde::{Deserialize, Serialize};

use super::{allocate_id, Db};
use crate::error::StoreError;

/// User as persisted, including the password hash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: u64,
    pub email: String,
    #[serde(rename = "password")]
    pub password_hash: String,
    #[serde(default)]
    pub is_chirpy_red: bool,
}

/// Public view of a user. Never carries the hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub is_chirpy_red: bool,
}

impl From<&UserRecord> for User {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email.clone(),
            is_chirpy_red: record.is_chirpy_red,
        }
    }
}

impl Db {
    pub async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        self.update(|doc| {
            if doc.users.values().any(|u| u.email == email) {
                return Err(StoreError::DuplicateEntry("Email already registered".to_string()));
            }

            let id = allocate_id(&mut doc.next_ids.users, &doc.users);
            let record = UserRecord {
                id,
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                is_chirpy_red: false,
            };
            let user = User::from(&record);
            doc.users.insert(id, record);
            Ok(user)
        })
        .await
    }

    pub async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        self.read(|doc| doc.users.values().map(User::from).collect())
            .await
    }

    pub async fn get_user(&self, id: u64) -> Result<Option<User>, StoreError> {
        self.read(|doc| doc.users.get(&id).map(User::from)).await
    }

    /// Case-sensitive lookup, returning the record with its hash.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        self.read(|doc| doc.users.values().find(|u| u.email == email).cloned())
            .await
    }

    /// Replace email and password hash. `None` when the user does not exist.
    pub async fn update_user(
        &self,
        id: u64,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>, StoreError> {
        self.update(|doc| {
            if doc.users.values().any(|u| u.email == email && u.id != id) {
                return Err(StoreError::DuplicateEntry("Email already registered".to_string()));
            }

            Ok(doc.users.get_mut(&id).map(|record| {
                record.email = email.to_string();
                record.password_hash = password_hash.to_string();
                User::from(&*record)
            }))
        })
        .await
    }

    /// Mark a user as upgraded. Returns `false` when the user does not exist.
    pub async fn set_upgraded(&self, id: u64) -> Result<bool, StoreError> {
        self.update(|doc| {
            Ok(match doc.users.get_mut(&id) {
                Some(record) => {
                    record.is_chirpy_red = true;
                    true
                }
                None => false,
            })
        })
        .await
    }
}
