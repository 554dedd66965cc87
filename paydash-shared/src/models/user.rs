//! Profile of the signed-in merchant user and partial updates to it.

use serde::{Deserialize, Serialize};

/// Cached snapshot of the authenticated merchant user.
///
/// The backend is the source of truth; this copy is refreshed opportunistically
/// and rewritten after every call that returns a profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    /// Backend identifier of the user.
    pub id: i64,

    /// Display name.
    pub name: String,

    /// Login email address.
    pub email: String,

    /// Role names granted to the user (e.g. `admin`, `finance`).
    #[serde(default)]
    pub roles: Vec<String>,

    /// Permission names granted to the user, directly or through roles.
    #[serde(default)]
    pub permissions: Vec<String>,

    /// Currently active business, if the user has selected one.
    #[serde(default)]
    pub business_id: Option<i64>,
}

/// Partial profile update; `None` fields keep the cached value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfilePatch {
    /// New display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Replacement role list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    /// Replacement permission list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
    /// New active business.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_id: Option<i64>,
}

impl UserProfilePatch {
    /// Patch that only changes the active business.
    #[must_use]
    pub fn business(business_id: i64) -> Self {
        Self {
            business_id: Some(business_id),
            ..Self::default()
        }
    }

    /// Returns `true` when applying the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.roles.is_none()
            && self.permissions.is_none()
            && self.business_id.is_none()
    }
}

impl UserProfile {
    /// Returns a copy of `self` with every `Some` field of `patch` applied.
    #[must_use]
    pub fn merged(&self, patch: &UserProfilePatch) -> Self {
        let mut merged = self.clone();
        if let Some(name) = &patch.name {
            merged.name.clone_from(name);
        }
        if let Some(email) = &patch.email {
            merged.email.clone_from(email);
        }
        if let Some(roles) = &patch.roles {
            merged.roles.clone_from(roles);
        }
        if let Some(permissions) = &patch.permissions {
            merged.permissions.clone_from(permissions);
        }
        if let Some(business_id) = patch.business_id {
            merged.business_id = Some(business_id);
        }
        merged
    }
}
