//! Error handling module for the HMS frontend.
//!
//! Provides the error taxonomy shared by the backend client and the page
//! handlers, and its mapping onto browser responses.

use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::session;
use crate::ui;

/// Generic message shown whenever the backend cannot be reached.
pub const UNREACHABLE_MESSAGE: &str = "Cannot reach server. Make sure the backend is running.";

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const UNREACHABLE: &str = "UNREACHABLE";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// The backend could not be reached (connect, DNS, broken body)
    Unreachable(String),
    /// The backend answered 401; the token is no longer valid
    Unauthorized,
    /// The policy table does not grant this action to the role
    Forbidden(String),
    /// Resource not found
    NotFound(String),
    /// Internal error
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unreachable(_) => StatusCode::BAD_GATEWAY,
            AppError::Unauthorized => StatusCode::SEE_OTHER,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unreachable(_) => codes::UNREACHABLE,
            AppError::Unauthorized => codes::UNAUTHORIZED,
            AppError::Forbidden(_) => codes::FORBIDDEN,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Unreachable(_) => UNREACHABLE_MESSAGE.to_string(),
            AppError::Unauthorized => "Session expired".to_string(),
            AppError::Forbidden(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Internal(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        tracing::warn!("Backend request failed: {:?}", err);
        AppError::Unreachable(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            // Forced logout: drop the token and start over from the auth screen.
            AppError::Unauthorized => (
                [(header::SET_COOKIE, session::clear_cookie())],
                Redirect::to("/"),
            )
                .into_response(),
            other => {
                let status = other.status_code();
                match ui::error_page(status.as_u16(), &other.message()) {
                    Ok(body) => (status, Html(body)).into_response(),
                    Err(_) => (status, other.message()).into_response(),
                }
            }
        }
    }
}
