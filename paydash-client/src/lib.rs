#![cfg_attr(not(test), forbid(unsafe_code))]
#![deny(warnings, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::multiple_crate_versions)]

//! Client core of the `PayDash` merchant dashboard.
//!
//! [`SessionStore`] caches the bearer token and user profile, [`ApiClient`]
//! talks to the REST backend with that token, and [`AuthProvider`] drives
//! sign-in, sign-out and session restoration on top of both.

pub mod api;
pub mod auth;
pub mod business;
pub mod error;
pub mod menu;
pub mod navigator;
pub mod pagination;
pub mod permissions;
pub mod session;
pub mod storage;

pub use api::ApiClient;
pub use auth::{AuthProvider, AuthState};
pub use business::BusinessService;
pub use error::{ApiError, ApiResult};
pub use menu::{MenuItem, default_menu, filter_menu, flatten_paths};
pub use navigator::{LogNavigator, Navigator};
pub use pagination::PageState;
pub use permissions::Permissions;
pub use session::SessionStore;
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
