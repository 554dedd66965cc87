//! Navigation tree of the merchant dashboard, filtered by what the signed-in
//! user may see.

use serde::{Deserialize, Serialize};

use crate::permissions::Permissions;

/// One entry of the navigation tree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MenuItem {
    /// Stable identifier.
    pub key: String,
    /// Label shown to the user.
    pub title: String,
    /// Route of the entry; groups may have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Permission required to see the entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<String>,
    /// Roles of which the user needs at least one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    /// Nested entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    /// A leaf entry pointing at `path`.
    #[must_use]
    pub fn link(key: impl Into<String>, title: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            path: Some(path.into()),
            permission: None,
            roles: None,
            children: Vec::new(),
        }
    }

    /// A group entry without its own route.
    #[must_use]
    pub fn group(
        key: impl Into<String>,
        title: impl Into<String>,
        children: Vec<MenuItem>,
    ) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            path: None,
            permission: None,
            roles: None,
            children,
        }
    }

    /// Requires `permission` to see this entry.
    #[must_use]
    pub fn requires(mut self, permission: impl Into<String>) -> Self {
        self.permission = Some(permission.into());
        self
    }

    /// Restricts this entry to users holding one of `roles`.
    #[must_use]
    pub fn for_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    fn is_permitted(&self, permissions: &Permissions) -> bool {
        let permission_ok = self
            .permission
            .as_deref()
            .is_none_or(|permission| permissions.has_permission(permission));
        let roles_ok = self
            .roles
            .as_deref()
            .is_none_or(|roles| permissions.is_admin() || permissions.has_any_role(roles));
        permission_ok && roles_ok
    }
}

/// Returns the entries of `items` visible with `permissions`.
///
/// A group whose children are all hidden disappears unless it has its own
/// route.
#[must_use]
pub fn filter_menu(items: &[MenuItem], permissions: &Permissions) -> Vec<MenuItem> {
    items
        .iter()
        .filter(|item| item.is_permitted(permissions))
        .filter_map(|item| {
            if item.children.is_empty() {
                return Some(item.clone());
            }
            let children = filter_menu(&item.children, permissions);
            if children.is_empty() && item.path.is_none() {
                return None;
            }
            Some(MenuItem {
                children,
                ..item.clone()
            })
        })
        .collect()
}

/// Every route in `items`, depth first.
#[must_use]
pub fn flatten_paths(items: &[MenuItem]) -> Vec<String> {
    let mut paths = Vec::new();
    collect_paths(items, &mut paths);
    paths
}

fn collect_paths(items: &[MenuItem], paths: &mut Vec<String>) {
    for item in items {
        if let Some(path) = &item.path {
            paths.push(path.clone());
        }
        collect_paths(&item.children, paths);
    }
}

/// Navigation of the merchant dashboard.
#[must_use]
pub fn default_menu() -> Vec<MenuItem> {
    vec![
        MenuItem::link("overview", "Overview", "/dashboard"),
        MenuItem::group(
            "payments",
            "Payments",
            vec![
                MenuItem::link("wallets", "Wallets", "/wallets").requires("wallets.view"),
                MenuItem::link("transactions", "Transactions", "/transactions")
                    .requires("transactions.view"),
                MenuItem::link("settlements", "Settlements", "/settlements")
                    .requires("settlements.view"),
            ],
        ),
        MenuItem::link("compliance", "Compliance", "/compliance").requires("compliance.view"),
        MenuItem::group(
            "developers",
            "Developers",
            vec![
                MenuItem::link("webhooks", "Webhooks", "/webhooks").requires("webhooks.manage"),
                MenuItem::link("api-keys", "API Keys", "/api-keys").requires("api_keys.manage"),
            ],
        ),
        MenuItem::group(
            "settings",
            "Settings",
            vec![
                MenuItem::link("team", "Team", "/settings/team").requires("team.manage"),
                MenuItem::link("roles", "Roles & Permissions", "/settings/roles")
                    .requires("roles.manage")
                    .for_roles(["owner", "admin", "super_admin"]),
                MenuItem::link("businesses", "Businesses", "/settings/businesses"),
            ],
        ),
    ]
}
