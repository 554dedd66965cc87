//! Role and permission checks for the signed-in user.

use std::collections::BTreeSet;

use paydash_shared::models::UserProfile;

/// Roles that implicitly hold every permission.
pub const ADMIN_ROLES: [&str; 2] = ["super_admin", "admin"];

/// Role and permission lookup for the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Permissions {
    roles: BTreeSet<String>,
    permissions: BTreeSet<String>,
}

impl Permissions {
    /// No roles, no permissions.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Permissions carried by `profile`.
    #[must_use]
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self::new(profile.roles.iter(), profile.permissions.iter())
    }

    /// Builds a set from raw role and permission names.
    #[must_use]
    pub fn new<R, P>(roles: R, permissions: P) -> Self
    where
        R: IntoIterator,
        R::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        Self {
            roles: roles.into_iter().map(|r| r.as_ref().to_string()).collect(),
            permissions: permissions
                .into_iter()
                .map(|p| p.as_ref().to_string())
                .collect(),
        }
    }

    /// Whether the user holds one of the [`ADMIN_ROLES`].
    #[must_use]
    pub fn is_admin(&self) -> bool {
        ADMIN_ROLES.iter().any(|role| self.roles.contains(*role))
    }

    /// Whether the user holds `role`.
    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    /// Whether the user holds `permission`; admins hold everything.
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.is_admin() || self.permissions.contains(permission)
    }

    /// Whether the user holds at least one of `permissions`. False when empty.
    #[must_use]
    pub fn has_any<S: AsRef<str>>(&self, permissions: &[S]) -> bool {
        permissions.iter().any(|p| self.has_permission(p.as_ref()))
    }

    /// Whether the user holds every one of `permissions`. True when empty.
    #[must_use]
    pub fn has_all<S: AsRef<str>>(&self, permissions: &[S]) -> bool {
        permissions.iter().all(|p| self.has_permission(p.as_ref()))
    }

    /// Whether the user holds at least one of `roles`. False when empty.
    #[must_use]
    pub fn has_any_role<S: AsRef<str>>(&self, roles: &[S]) -> bool {
        roles.iter().any(|r| self.has_role(r.as_ref()))
    }
}
