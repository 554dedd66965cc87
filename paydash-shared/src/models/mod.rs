//! Data transfer objects exchanged with the `PayDash` backend.

pub mod auth;
pub mod business;
pub mod errors;
pub mod pagination;
pub mod user;

pub use auth::{AuthResponse, LoginRequest, RegisterRequest, StoredToken, SwitchBusinessRequest};
pub use business::Business;
pub use errors::ErrorBody;
pub use pagination::{PageMeta, Paginated};
pub use user::{UserProfile, UserProfilePatch};
