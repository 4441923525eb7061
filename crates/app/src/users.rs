//! User store collaborator
//!
//! The games never touch persistence directly; they see the `UserStore`
//! trait. The JSON file implementation is the durable key-value analogue of
//! the original product's local storage: whole-file read/rewrite,
//! last-writer-wins, no locking.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use voxplay_foundation::error::StoreError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    /// Unique key for lookups
    pub email: String,
    pub mobile: String,
    pub age: u8,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// Signup form payload; id and creation time are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile: String,
    pub age: u8,
    pub password: String,
}

/// The logged-in identity for this session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub email: String,
    pub is_admin: bool,
}

pub trait UserStore: Send + Sync {
    fn list(&self) -> Result<Vec<User>, StoreError>;

    /// Append a user record. Fails with `DuplicateEmail` if the email is
    /// already present. Records are never mutated or deleted afterwards.
    fn create(&self, new_user: NewUser) -> Result<User, StoreError>;

    /// Look a user up by exact (email, password) equality.
    fn find_by_credentials(&self, email: &str, password: &str)
        -> Result<Option<User>, StoreError>;

    fn set_current(&self, current: Option<CurrentUser>) -> Result<(), StoreError>;

    fn current(&self) -> Result<Option<CurrentUser>, StoreError>;
}

/// Log in through a store. The hard-coded admin/admin pair bypasses the
/// store entirely and yields an admin-flagged session.
pub fn authenticate(
    store: &dyn UserStore,
    email: &str,
    password: &str,
) -> Result<Option<CurrentUser>, StoreError> {
    if email == "admin" && password == "admin" {
        let current = CurrentUser {
            email: "admin".to_string(),
            is_admin: true,
        };
        store.set_current(Some(current.clone()))?;
        info!("Admin login");
        return Ok(Some(current));
    }

    match store.find_by_credentials(email, password)? {
        Some(user) => {
            let current = CurrentUser {
                email: user.email.clone(),
                is_admin: false,
            };
            store.set_current(Some(current.clone()))?;
            info!(email = %user.email, "User login");
            Ok(Some(current))
        }
        None => Ok(None),
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    next_id: u64,
    users: Vec<User>,
    current: Option<CurrentUser>,
}

/// JSON-file-backed store.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn load(&self) -> Result<StoreData, StoreError> {
        if !self.path.exists() {
            return Ok(StoreData {
                next_id: 1,
                ..Default::default()
            });
        }
        let raw = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&raw).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn save(&self, data: &StoreData) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(data)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl UserStore for JsonFileStore {
    fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.load()?.users)
    }

    fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut data = self.load()?;
        if data.users.iter().any(|u| u.email == new_user.email) {
            return Err(StoreError::DuplicateEmail {
                email: new_user.email,
            });
        }

        let user = User {
            id: data.next_id,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            mobile: new_user.mobile,
            age: new_user.age,
            password: new_user.password,
            created_at: Utc::now(),
        };
        data.next_id += 1;
        data.users.push(user.clone());
        self.save(&data)?;
        info!(email = %user.email, "User created");
        Ok(user)
    }

    fn find_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, StoreError> {
        let data = self.load()?;
        Ok(data
            .users
            .into_iter()
            .find(|u| u.email == email && u.password == password))
    }

    fn set_current(&self, current: Option<CurrentUser>) -> Result<(), StoreError> {
        let mut data = self.load()?;
        data.current = current;
        self.save(&data)
    }

    fn current(&self) -> Result<Option<CurrentUser>, StoreError> {
        Ok(self.load()?.current)
    }
}
