//! Best-effort cache of the bearer token and the authenticated user's profile.
//!
//! Every operation is synchronous and infallible from the caller's point of
//! view: storage failures are logged and treated as a cache miss, since the
//! backend remains the source of truth.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use paydash_shared::models::{StoredToken, UserProfile, UserProfilePatch};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::storage::{FileStorage, MemoryStorage, Storage};

/// Storage key holding the serialized [`StoredToken`].
pub const TOKEN_KEY: &str = "auth_token";
/// Storage key holding the serialized [`UserProfile`].
pub const USER_KEY: &str = "user_data";

/// Token and profile cache shared by the API client and auth orchestration.
#[derive(Debug, Clone)]
pub struct SessionStore {
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    /// Wraps an arbitrary storage backend.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Session persisted to a JSON file at `path`.
    #[must_use]
    pub fn file(path: impl Into<std::path::PathBuf>) -> Self {
        Self::new(Arc::new(FileStorage::new(path)))
    }

    /// Session that lives only as long as the process.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Persists `token`, optionally expiring at `expires_at`.
    pub fn set_token(&self, token: impl Into<String>, expires_at: Option<DateTime<Utc>>) {
        self.write(TOKEN_KEY, &StoredToken::new(token, expires_at));
    }

    /// Returns the stored token unless it is missing, unreadable or expired.
    /// Unreadable tokens are purged. An expired token ends the session, so the
    /// cached profile is purged with it.
    #[must_use]
    pub fn get_token(&self) -> Option<String> {
        self.get_token_at(Utc::now())
    }

    /// [`Self::get_token`] evaluated against an explicit clock reading.
    #[must_use]
    pub fn get_token_at(&self, now: DateTime<Utc>) -> Option<String> {
        let stored: StoredToken = self.read(TOKEN_KEY)?;
        if stored.is_expired_at(now) {
            debug!(expires_at = ?stored.expires_at, "stored token expired; purging session");
            self.clear_all();
            return None;
        }
        Some(stored.token)
    }

    /// Whether a usable token is stored.
    #[must_use]
    pub fn has_session(&self) -> bool {
        self.get_token().is_some()
    }

    /// Replaces the cached profile.
    pub fn set_user(&self, profile: &UserProfile) {
        self.write(USER_KEY, profile);
    }

    /// Returns the cached profile, if any.
    #[must_use]
    pub fn get_user(&self) -> Option<UserProfile> {
        self.read(USER_KEY)
    }

    /// Merges `patch` over the cached profile and stores the result.
    ///
    /// Returns `None` without writing anything when no profile is cached.
    #[must_use = "the merged profile reflects what was written"]
    pub fn update_user(&self, patch: &UserProfilePatch) -> Option<UserProfile> {
        let merged = self.get_user()?.merged(patch);
        self.set_user(&merged);
        Some(merged)
    }

    /// Records `business_id` as the active business on the cached profile.
    #[must_use = "the merged profile reflects what was written"]
    pub fn set_business_id(&self, business_id: i64) -> Option<UserProfile> {
        self.update_user(&UserProfilePatch::business(business_id))
    }

    /// Active business of the cached profile.
    #[must_use]
    pub fn business_id(&self) -> Option<i64> {
        self.get_user().and_then(|profile| profile.business_id)
    }

    /// Removes both the token and the cached profile.
    pub fn clear_all(&self) {
        self.remove(TOKEN_KEY);
        self.remove(USER_KEY);
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.storage.get_item(key) {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(key, error = %err, "failed to read session storage");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, error = %err, "discarding unreadable session entry");
                self.remove(key);
                None
            }
        }
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) {
        let serialized = match serde_json::to_string(value) {
            Ok(serialized) => serialized,
            Err(err) => {
                warn!(key, error = %err, "failed to serialize session entry");
                return;
            }
        };
        if let Err(err) = self.storage.set_item(key, &serialized) {
            warn!(key, error = %err, "failed to write session storage");
        }
    }

    fn remove(&self, key: &str) {
        if let Err(err) = self.storage.remove_item(key) {
            warn!(key, error = %err, "failed to remove session entry");
        }
    }
}
