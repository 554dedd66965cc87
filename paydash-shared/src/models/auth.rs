//! Credentials, auth responses and the persisted bearer token.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserProfile;

/// Bearer credential as persisted by the session store.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredToken {
    /// Opaque bearer token.
    pub token: String,

    /// Expiry instant; `None` means the token never expires locally.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredToken {
    /// Creates a stored token with an optional expiry.
    #[must_use]
    pub fn new(token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    /// A token is expired once `now` reaches its expiry instant.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }

    /// Convenience wrapper around [`Self::is_expired_at`] using the wall clock.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

// Tokens never show up in logs.
impl fmt::Debug for StoredToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoredToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Email/password credentials for `POST auth/login`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Merchant onboarding payload for `POST auth/register`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterRequest {
    /// Display name of the new user.
    pub name: String,
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
    /// Optional first business created alongside the account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("business_name", &self.business_name)
            .finish()
    }
}

/// Successful login or registration.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// Server-side expiry of the token, when the backend reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// Profile of the authenticated user.
    pub user: UserProfile,
}

impl AuthResponse {
    /// Splits the response into the credential to persist and the profile.
    #[must_use]
    pub fn into_parts(self) -> (StoredToken, UserProfile) {
        (StoredToken::new(self.token, self.expires_at), self.user)
    }
}

impl fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthResponse")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

/// Body of `POST auth/switch-business`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SwitchBusinessRequest {
    /// Business to make active.
    pub business_id: i64,
}
