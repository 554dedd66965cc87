//! Login, registration, logout and session revalidation.

use std::sync::{Arc, Mutex};

use paydash_shared::models::{AuthResponse, LoginRequest, RegisterRequest, UserProfile};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::{
    api::ApiClient,
    business::BusinessService,
    error::{ApiError, ApiResult},
    permissions::Permissions,
};

/// Where the signed-in state currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// No usable session.
    #[default]
    Anonymous,
    /// A token exists and is being revalidated.
    Initializing,
    /// Signed in as the contained user.
    Authenticated(UserProfile),
    /// The last auth operation failed with the contained message.
    Error(String),
}

/// Keeps the session store, the API client and the auth state in step.
#[derive(Debug, Clone)]
pub struct AuthProvider {
    client: ApiClient,
    state: Arc<Mutex<AuthState>>,
}

impl AuthProvider {
    /// Creates a provider in the [`AuthState::Anonymous`] state.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: Arc::new(Mutex::new(AuthState::Anonymous)),
        }
    }

    /// The API client used for auth calls.
    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<UserProfile> {
        match self.state() {
            AuthState::Authenticated(profile) => Some(profile),
            _ => None,
        }
    }

    /// Whether a user is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self.state(), AuthState::Authenticated(_))
    }

    /// Permissions of the signed-in user; empty when anonymous.
    #[must_use]
    pub fn permissions(&self) -> Permissions {
        self.current_user()
            .map_or_else(Permissions::anonymous, |profile| {
                Permissions::from_profile(&profile)
            })
    }

    fn set_state(&self, state: AuthState) {
        if let Ok(mut guard) = self.state.lock() {
            debug!(?state, "auth state changed");
            *guard = state;
        }
    }

    /// Restores a persisted session.
    ///
    /// With a stored token the cached profile is shown immediately, then
    /// revalidated against `auth/me`. A rejected session ends anonymous; any
    /// other failure keeps the cached profile.
    pub async fn initialize(&self) -> AuthState {
        let session = self.client.session();
        if session.get_token().is_none() {
            self.set_state(AuthState::Anonymous);
            return self.state();
        }

        self.set_state(AuthState::Initializing);
        let cached = session.get_user();
        if let Some(profile) = &cached {
            self.set_state(AuthState::Authenticated(profile.clone()));
        }

        match self.client.get::<UserProfile>("auth/me").await {
            Ok(profile) => {
                session.set_user(&profile);
                self.set_state(AuthState::Authenticated(profile));
            }
            Err(ApiError::Unauthorized) => {
                self.set_state(AuthState::Anonymous);
            }
            Err(err) => match cached {
                Some(profile) => {
                    warn!(error = %err, "profile revalidation failed; using cached profile");
                    self.set_state(AuthState::Authenticated(profile));
                }
                None => {
                    warn!(error = %err, "profile revalidation failed without a cached profile");
                    self.set_state(AuthState::Error(err.to_string()));
                }
            },
        }
        self.state()
    }

    /// Signs in with email and password, replacing any stored session.
    ///
    /// # Errors
    /// Returns the backend error; any partially stored session is cleared
    /// first.
    #[instrument(skip_all, fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &LoginRequest) -> ApiResult<UserProfile> {
        self.client.session().clear_all();
        let result = self.client.submit_credentials("auth/login", credentials).await;
        self.complete_sign_in(result)
    }

    /// Registers a new merchant account and signs in.
    ///
    /// # Errors
    /// Returns the backend error; any partially stored session is cleared
    /// first.
    #[instrument(skip_all, fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<UserProfile> {
        self.client.session().clear_all();
        let result = self.client.submit_credentials("auth/register", request).await;
        self.complete_sign_in(result)
    }

    fn complete_sign_in(&self, result: ApiResult<AuthResponse>) -> ApiResult<UserProfile> {
        let session = self.client.session();
        match result {
            Ok(response) => {
                let (token, profile) = response.into_parts();
                session.set_token(token.token, token.expires_at);
                session.set_user(&profile);
                self.client.rearm_unauthorized();
                info!(user_id = profile.id, "signed in");
                self.set_state(AuthState::Authenticated(profile.clone()));
                Ok(profile)
            }
            Err(err) => {
                session.clear_all();
                self.set_state(AuthState::Error(err.to_string()));
                Err(err)
            }
        }
    }

    /// Signs out. The backend is told on a best-effort basis; the local
    /// session is always cleared, and a rejected token does not trigger the
    /// expired-session redirect.
    pub async fn logout(&self) {
        let session = self.client.session();
        if session.get_token().is_some()
            && let Err(err) = self.client.revoke_session::<Value>("auth/logout").await
        {
            warn!(error = %err, "logout request failed");
        }
        session.clear_all();
        self.set_state(AuthState::Anonymous);
        info!("signed out");
    }

    /// Re-reads the profile from the backend.
    ///
    /// # Errors
    /// Returns the backend error; the state is left as it was unless the
    /// session was rejected.
    pub async fn refresh_user(&self) -> ApiResult<UserProfile> {
        match self.client.get::<UserProfile>("auth/me").await {
            Ok(profile) => {
                self.client.session().set_user(&profile);
                self.set_state(AuthState::Authenticated(profile.clone()));
                Ok(profile)
            }
            Err(err) => {
                if matches!(err, ApiError::Unauthorized) {
                    self.set_state(AuthState::Anonymous);
                }
                Err(err)
            }
        }
    }

    /// Switches the active business and updates the signed-in profile.
    ///
    /// # Errors
    /// Returns the backend error; nothing changes locally on failure.
    pub async fn switch_business(&self, business_id: i64) -> ApiResult<Option<UserProfile>> {
        let result = BusinessService::new(self.client.clone())
            .switch(business_id)
            .await;
        match &result {
            Ok(Some(profile)) => self.set_state(AuthState::Authenticated(profile.clone())),
            Err(ApiError::Unauthorized) => self.set_state(AuthState::Anonymous),
            _ => {}
        }
        result
    }
}
