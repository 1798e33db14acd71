//! Error types for the simposio front-end.
//!
//! Every failure a page can hit is one variant of [`Error`]. Configuration and
//! token problems are raised before any request leaves the process; API failures
//! carry the server's own message when it sent one.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::forms::ValidationErrors;
use crate::lifecycle::Actor;
use crate::models::SubmissionStatus;

/// Shown whenever the server gave us nothing better to say.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Main error type for the front-end.
#[derive(Error, Debug)]
pub enum Error {
    /// Required configuration is absent
    #[error("Configuration error: {0}")]
    MissingConfig(String),

    /// No bearer token in the session cookie
    #[error("Missing session token")]
    MissingToken,

    /// Non-success status returned by the REST API
    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api { status: u16, message: Option<String> },

    /// Transport-level failure talking to the REST API
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Client-side form validation failed
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Status change not allowed by the submission lifecycle
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: SubmissionStatus,
        to: SubmissionStatus,
    },

    /// Transition exists but belongs to another party
    #[error("{actor} may not move a submission from {from} to {to}")]
    NotPermitted {
        actor: Actor,
        from: SubmissionStatus,
        to: SubmissionStatus,
    },

    /// The current user's role cannot use this page
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Missing resource
    #[error("Not found: {0}")]
    NotFound(String),

    /// Page template failed to render
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
}

/// Convenience Result type using the crate Error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> String {
        match self {
            Error::Api {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            Error::MissingToken => "Your session has expired. Please sign in again.".to_string(),
            Error::Validation(_) => "Some fields are invalid. Please review the form.".to_string(),
            Error::InvalidTransition { .. }
            | Error::NotPermitted { .. }
            | Error::Forbidden(_)
            | Error::NotFound(_) => self.to_string(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_) | Error::Api { status: 404, .. })
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MissingToken => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) | Error::NotPermitted { .. } => StatusCode::FORBIDDEN,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::InvalidTransition { .. } => StatusCode::CONFLICT,
            Error::Api { status: 401, .. } => StatusCode::UNAUTHORIZED,
            Error::Api { status: 403, .. } => StatusCode::FORBIDDEN,
            _ if self.is_not_found() => StatusCode::NOT_FOUND,
            Error::Api { .. } | Error::Network(_) | Error::Decode(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::Validation(errors)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }
        let page = crate::templates::render_error(status, &self.user_message(), self.is_session_error());
        (status, page).into_response()
    }
}

impl Error {
    fn is_session_error(&self) -> bool {
        matches!(self, Error::MissingToken | Error::Api { status: 401, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_wins_over_fallback() {
        let err = Error::Api {
            status: 422,
            message: Some("Prazo de submissão encerrado".to_string()),
        };
        assert_eq!(err.user_message(), "Prazo de submissão encerrado");
    }

    #[test]
    fn blank_or_missing_server_message_falls_back() {
        let missing = Error::Api {
            status: 500,
            message: None,
        };
        let blank = Error::Api {
            status: 500,
            message: Some("   ".to_string()),
        };
        assert_eq!(missing.user_message(), GENERIC_ERROR_MESSAGE);
        assert_eq!(blank.user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn status_codes() {
        assert_eq!(Error::MissingToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            Error::Api {
                status: 404,
                message: None
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::Api {
                status: 500,
                message: None
            }
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            Error::InvalidTransition {
                from: SubmissionStatus::Approved,
                to: SubmissionStatus::Rejected
            }
            .status_code(),
            StatusCode::CONFLICT
        );
    }
}
