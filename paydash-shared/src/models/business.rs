//! Businesses a merchant user can operate under.

use serde::{Deserialize, Serialize};

/// A merchant business the user can operate under.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Business {
    /// Backend identifier; the value stored as the active business.
    pub id: i64,
    /// Trading name.
    pub name: String,
    /// Onboarding/compliance status as reported by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
