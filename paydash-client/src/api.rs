//! Authenticated HTTP client for the `PayDash` REST backend.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use paydash_shared::{
    config::ClientConfig,
    models::{ErrorBody, Paginated},
};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, header::ACCEPT};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use crate::{
    error::{ApiError, ApiResult},
    navigator::Navigator,
    pagination::PageState,
    session::SessionStore,
};

const USER_AGENT: &str = concat!("paydash-client/", env!("CARGO_PKG_VERSION"));

/// What a 401 response means for the request that received it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OnUnauthorized {
    /// The session is gone: clear it once and send the user to the root.
    EndSession,
    /// The caller handles the rejection itself (bad credentials, sign-out).
    Report,
}

#[derive(Debug)]
struct Inner {
    base_url: Url,
    http: Client,
    timeout: Duration,
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
    unauthorized_handled: AtomicBool,
}

/// Bearer-authenticated JSON client.
///
/// Cloning is cheap and clones share the session, the navigator and the
/// one-shot 401 guard.
#[derive(Clone, Debug)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

impl ApiClient {
    /// Creates a client from the resolved configuration.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(
        config: &ClientConfig,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> ApiResult<Self> {
        Self::with_base_url(
            config.api_base_url.clone(),
            config.request_timeout(),
            session,
            navigator,
        )
    }

    /// Creates a client for `base_url` with a fixed per-request `timeout`.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn with_base_url(
        base_url: Url,
        timeout: Duration,
        session: SessionStore,
        navigator: Arc<dyn Navigator>,
    ) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| ApiError::Network(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            inner: Arc::new(Inner {
                base_url,
                http,
                timeout,
                session,
                navigator,
                unauthorized_handled: AtomicBool::new(false),
            }),
        })
    }

    /// Session store the client reads its bearer token from.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Base URL endpoints are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Re-enables 401 handling after a fresh login.
    pub fn rearm_unauthorized(&self) {
        self.inner
            .unauthorized_handled
            .store(false, Ordering::SeqCst);
    }

    /// `GET endpoint`.
    ///
    /// # Errors
    /// See [`ApiError`].
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.send(Method::GET, endpoint, OnUnauthorized::EndSession, |request| request)
            .await
    }

    /// `GET endpoint?query`.
    ///
    /// # Errors
    /// See [`ApiError`].
    pub async fn get_with_query<T, Q>(&self, endpoint: &str, query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.send(
            Method::GET,
            endpoint,
            OnUnauthorized::EndSession,
            |request| request.query(query),
        )
            .await
    }

    /// Fetches one page of a paginated listing.
    ///
    /// # Errors
    /// See [`ApiError`].
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        page: &PageState,
    ) -> ApiResult<Paginated<T>> {
        self.get_with_query(endpoint, &page.as_query()).await
    }

    /// `POST endpoint` with a JSON body.
    ///
    /// # Errors
    /// See [`ApiError`].
    pub async fn post<T, B>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(
            Method::POST,
            endpoint,
            OnUnauthorized::EndSession,
            |request| request.json(body),
        )
            .await
    }

    /// `POST endpoint` without a body.
    ///
    /// # Errors
    /// See [`ApiError`].
    pub async fn post_empty<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.send(Method::POST, endpoint, OnUnauthorized::EndSession, |request| request)
            .await
    }

    /// `PUT endpoint` with a JSON body.
    ///
    /// # Errors
    /// See [`ApiError`].
    pub async fn put<T, B>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(
            Method::PUT,
            endpoint,
            OnUnauthorized::EndSession,
            |request| request.json(body),
        )
            .await
    }

    /// `PATCH endpoint` with a JSON body.
    ///
    /// # Errors
    /// See [`ApiError`].
    pub async fn patch<T, B>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(
            Method::PATCH,
            endpoint,
            OnUnauthorized::EndSession,
            |request| request.json(body),
        )
            .await
    }

    /// `DELETE endpoint`.
    ///
    /// # Errors
    /// See [`ApiError`].
    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.send(
            Method::DELETE,
            endpoint,
            OnUnauthorized::EndSession,
            |request| request,
        )
        .await
    }

    /// `POST endpoint` with sign-in credentials.
    ///
    /// A 401 here means the credentials were rejected, so it comes back as
    /// [`ApiError::Http`] with the backend's message and the session is left
    /// to the caller.
    ///
    /// # Errors
    /// See [`ApiError`].
    pub async fn submit_credentials<T, B>(&self, endpoint: &str, body: &B) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send(Method::POST, endpoint, OnUnauthorized::Report, |request| {
            request.json(body)
        })
        .await
    }

    /// `POST endpoint` without a body, to end the session on the backend.
    ///
    /// A 401 is returned as [`ApiError::Http`] without clearing the session or
    /// redirecting, since the caller is already signing out.
    ///
    /// # Errors
    /// See [`ApiError`].
    pub async fn revoke_session<T: DeserializeOwned>(&self, endpoint: &str) -> ApiResult<T> {
        self.send(Method::POST, endpoint, OnUnauthorized::Report, |request| {
            request
        })
        .await
    }

    fn endpoint_url(&self, endpoint: &str) -> ApiResult<Url> {
        self.inner
            .base_url
            .join(endpoint.trim_start_matches('/'))
            .map_err(|err| ApiError::InvalidEndpoint(format!("{endpoint}: {err}")))
    }

    async fn send<T, F>(
        &self,
        method: Method,
        endpoint: &str,
        on_unauthorized: OnUnauthorized,
        build: F,
    ) -> ApiResult<T>
    where
        T: DeserializeOwned,
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let url = self.endpoint_url(endpoint)?;
        let mut request = build(
            self.inner
                .http
                .request(method.clone(), url)
                .header(ACCEPT, "application/json"),
        );

        let token = self.inner.session.get_token();
        let authenticated = token.is_some();
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        debug!(%method, endpoint, authenticated, "sending API request");
        let response = request
            .send()
            .await
            .map_err(|err| self.transport_error(&err))?;

        let result = self.handle_response(response, on_unauthorized).await;
        if let Err(err) = &result {
            warn!(%method, endpoint, error = %err, "API request failed");
        }
        result
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
        on_unauthorized: OnUnauthorized,
    ) -> ApiResult<T> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED && on_unauthorized == OnUnauthorized::EndSession {
            self.handle_unauthorized();
            return Err(ApiError::Unauthorized);
        }

        if status == StatusCode::NO_CONTENT {
            return empty_body();
        }

        if !status.is_success() {
            let body = response
                .bytes()
                .await
                .ok()
                .and_then(|bytes| serde_json::from_slice::<ErrorBody>(&bytes).ok())
                .unwrap_or_default();
            return Err(ApiError::from_status(status, body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| self.transport_error(&err))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return empty_body();
        }
        serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()))
    }

    fn handle_unauthorized(&self) {
        if self
            .inner
            .unauthorized_handled
            .swap(true, Ordering::SeqCst)
        {
            debug!("unauthorized response already handled");
            return;
        }
        warn!("backend rejected the session; clearing local credentials");
        self.inner.session.clear_all();
        self.inner.navigator.redirect_to_root();
    }

    fn transport_error(&self, err: &reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(self.inner.timeout)
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

/// Value used for bodiless successes: an empty object, or `null` for targets
/// such as `()` and `Option<_>` that cannot be built from an object.
fn empty_body<T: DeserializeOwned>() -> ApiResult<T> {
    serde_json::from_value(Value::Object(Map::new()))
        .or_else(|_| serde_json::from_value(Value::Null))
        .map_err(|err| ApiError::Decode(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigator::LogNavigator;
    use std::collections::HashMap;

    fn client(base: &str) -> ApiClient {
        ApiClient::with_base_url(
            Url::parse(base).unwrap(),
            Duration::from_secs(1),
            SessionStore::in_memory(),
            Arc::new(LogNavigator),
        )
        .unwrap()
    }

    #[test]
    fn endpoint_url_joins_relative_paths() {
        let client = client("https://api.example.com/v1/");

        assert_eq!(
            client.endpoint_url("auth/me").unwrap().as_str(),
            "https://api.example.com/v1/auth/me"
        );
        assert_eq!(
            client.endpoint_url("/businesses").unwrap().as_str(),
            "https://api.example.com/v1/businesses"
        );
    }

    #[test]
    fn empty_body_builds_empty_object_or_unit() {
        let map: HashMap<String, String> = empty_body().unwrap();
        assert!(map.is_empty());

        let value: Value = empty_body().unwrap();
        assert_eq!(value, Value::Object(Map::new()));

        assert!(empty_body::<()>().is_ok());

        let missing: Option<paydash_shared::models::UserProfile> = empty_body().unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn clones_share_the_unauthorized_guard() {
        let first = client("https://api.example.com/");
        let second = first.clone();

        first.handle_unauthorized();
        assert!(second.inner.unauthorized_handled.load(Ordering::SeqCst));

        second.rearm_unauthorized();
        assert!(!first.inner.unauthorized_handled.load(Ordering::SeqCst));
    }
}
