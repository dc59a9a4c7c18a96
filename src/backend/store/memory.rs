//! In-memory identity store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ConflictKind, IdentityStore, StoreError, Uniqueness};
use crate::shared::{AuthUser, Baid};

#[derive(Debug, Default)]
struct Tables {
    access_codes: HashMap<String, Baid>,
    /// Accounts keyed by Baid
    users: HashMap<Baid, AuthUser>,
}

impl Tables {
    fn find_conflict(&self, username: &str, baid: Baid) -> Option<ConflictKind> {
        if self.users.values().any(|user| user.username == username) {
            Some(ConflictKind::UsernameTaken)
        } else if self.users.contains_key(&baid) {
            Some(ConflictKind::BaidTaken)
        } else {
            None
        }
    }
}

/// Identity store kept in process memory.
///
/// Every write takes the single write lock, checks uniqueness, and applies
/// the change before releasing it, so concurrent registrations for the same
/// username or Baid are serialized and exactly one succeeds.
///
/// # Example
/// ```
/// use profile_auth::backend::store::MemoryIdentityStore;
///
/// let store = MemoryIdentityStore::with_access_codes([("AC-001", 42)]);
/// ```
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    tables: RwLock<Tables>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already knows the given access codes.
    pub fn with_access_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = (S, Baid)>,
        S: Into<String>,
    {
        let access_codes = codes
            .into_iter()
            .map(|(code, baid)| (code.into(), baid))
            .collect();
        Self {
            tables: RwLock::new(Tables {
                access_codes,
                users: HashMap::new(),
            }),
        }
    }

    pub async fn user_count(&self) -> usize {
        self.tables.read().await.users.len()
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    async fn get_baid_from_access_code(&self, access_code: &str) -> Result<Option<Baid>, StoreError> {
        Ok(self.tables.read().await.access_codes.get(access_code).copied())
    }

    async fn is_auth_user_unique(&self, username: &str, baid: Baid) -> Result<Uniqueness, StoreError> {
        let tables = self.tables.read().await;
        Ok(match tables.find_conflict(username, baid) {
            Some(kind) => Uniqueness::Taken(kind),
            None => Uniqueness::Unique,
        })
    }

    async fn insert_auth_user(&self, user: &AuthUser) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(kind) = tables.find_conflict(&user.username, user.baid) {
            return Err(StoreError::Conflict(kind));
        }
        tables.users.insert(user.baid, user.clone());
        Ok(())
    }

    async fn get_auth_user_by_username(&self, username: &str) -> Result<Option<AuthUser>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn get_username_by_baid(&self, baid: Baid) -> Result<Option<String>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&baid).map(|user| user.username.clone()))
    }

    async fn get_password_hash_by_baid(&self, baid: Baid) -> Result<Option<String>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&baid).map(|user| user.password_hash.clone()))
    }

    async fn change_username(&self, baid: Baid, new_username: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let taken = tables
            .users
            .values()
            .any(|user| user.username == new_username && user.baid != baid);
        if taken {
            return Err(StoreError::Conflict(ConflictKind::UsernameTaken));
        }
        let user = tables
            .users
            .get_mut(&baid)
            .ok_or(StoreError::UnknownBaid(baid))?;
        user.username = new_username.to_string();
        Ok(())
    }

    async fn change_password(&self, baid: Baid, new_hash: &str) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(&baid)
            .ok_or(StoreError::UnknownBaid(baid))?;
        user.password_hash = new_hash.to_string();
        Ok(())
    }
}
