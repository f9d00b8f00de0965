//! User registry: email → display name + argon2 password hash.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::AuthError;
use crate::store::{load_json_or_default, save_json_atomic, StoreError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    /// PHC-format argon2 hash, never the plain password.
    pub password: String,
}

#[derive(Debug)]
pub struct UserStore {
    path: Option<PathBuf>,
    users: Mutex<HashMap<String, UserRecord>>,
}

impl UserStore {
    /// Load users from `path` (missing file → empty registry).
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let users: HashMap<String, UserRecord> = load_json_or_default(&path)?;
        Ok(Self {
            path: Some(path),
            users: Mutex::new(users),
        })
    }

    /// Registry that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            users: Mutex::new(HashMap::new()),
        }
    }

    /// Create a user and return the display name. `name` defaults to the
    /// email's local part.
    pub fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<String, AuthError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        if self.lock().contains_key(email) {
            return Err(AuthError::UserExists);
        }

        // Hash outside the lock; it is the slow part.
        let hash = hash_password(password)?;
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| default_name(email));

        let mut users = self.lock();
        if users.contains_key(email) {
            return Err(AuthError::UserExists);
        }
        users.insert(
            email.to_string(),
            UserRecord {
                name: name.clone(),
                password: hash,
            },
        );
        if let Some(path) = &self.path {
            if let Err(e) = save_json_atomic(path, &*users) {
                users.remove(email);
                return Err(e.into());
            }
        }
        info!(target: "auth", %name, "user registered");
        Ok(name)
    }

    /// Check credentials and return the display name.
    pub fn verify(&self, email: &str, password: &str) -> Result<String, AuthError> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }
        let record = self
            .lock()
            .get(email)
            .cloned()
            .ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(password, &record.password) {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(if record.name.is_empty() {
            default_name(email)
        } else {
            record.name
        })
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, UserRecord>> {
        self.users.lock().expect("user store mutex poisoned")
    }
}

fn default_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

fn verify_password(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
