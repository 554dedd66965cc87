//! Errors returned by backend calls.

use std::time::Duration;

use paydash_shared::models::errors::{ErrorBody, ValidationErrors};
use reqwest::StatusCode;
use thiserror::Error;

/// Result of an [`ApiClient`](crate::ApiClient) call.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failure of a backend call, as surfaced to the calling front end.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request exceeded the client's timeout and was aborted.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Network(String),

    /// The backend rejected the session; the local session has been cleared.
    #[error("session expired or unauthorized")]
    Unauthorized,

    /// Any other non-2xx response, including a 401 answering a sign-in or
    /// sign-out request.
    #[error("{message}")]
    Http {
        /// Response status.
        status: StatusCode,
        /// Backend message, or `HTTP <status>: <reason>` without one.
        message: String,
        /// Per-field validation messages, when the backend sent any.
        validation_errors: Option<ValidationErrors>,
    },

    /// A 2xx response whose body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The endpoint could not be joined onto the configured base URL.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl ApiError {
    /// Builds an [`ApiError::Http`] from a status and a (possibly empty)
    /// backend error body, falling back to `HTTP <status>: <reason>`.
    #[must_use]
    pub fn from_status(status: StatusCode, body: ErrorBody) -> Self {
        let message = body.message().map_or_else(
            || {
                format!(
                    "HTTP {}: {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown Status")
                )
            },
            str::to_string,
        );
        Self::Http {
            status,
            message,
            validation_errors: body.errors,
        }
    }

    /// HTTP status behind the error, when there was a response.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the error is a 4xx response.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status().is_some_and(|status| status.is_client_error())
    }

    /// Whether the error is a 5xx response.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status().is_some_and(|status| status.is_server_error())
    }

    /// Whether the request was aborted by the client timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }

    /// Per-field validation messages reported by the backend.
    #[must_use]
    pub const fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Http {
                validation_errors: Some(errors),
                ..
            } => Some(errors),
            _ => None,
        }
    }
}
