//! Result and error types for the core library

use thiserror::Error;

/// Message carried by the temporary error raised when the gate answers 401.
///
/// Callers branch on it through [`is_auth_error`] to decide whether the user
/// has to go through the login flow again.
pub const AUTHORIZATION_ERROR: &str = "authorization error";

/// Localized message shown when the interactive login could not be completed.
pub const LOGIN_FAILED_MESSAGE: &str =
    "Не удалось пройти авторизацию в Яндекс.Деньги. Попробуйте еще раз";

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    /// The host cannot show an interactive web view, so login can never run here.
    #[error("Incompatible host version: interactive web view is not available")]
    IncompatibleHost,

    /// User-recoverable authorization failure; the caller should prompt re-login.
    #[error("{0}")]
    TemporaryAuthorization(String),

    /// The provider redirected back with an OAuth error other than a user refusal.
    #[error("Authorization failed: {error}{}", .description.as_deref().map(|d| format!(" ({})", d)).unwrap_or_default())]
    Authorization {
        error: String,
        description: Option<String>,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Unexpected gate response: {0}")]
    Protocol(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a temporary authorization error with the given message
    pub fn temporary(msg: impl Into<String>) -> Self {
        Self::TemporaryAuthorization(msg.into())
    }

    /// The error raised for a 401 from the gate
    pub fn unauthorized() -> Self {
        Self::temporary(AUTHORIZATION_ERROR)
    }

    /// Create a protocol error
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::Protocol(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for the session-expired error produced on a 401.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::TemporaryAuthorization(msg) if msg == AUTHORIZATION_ERROR)
    }

    /// True for every user-recoverable authorization failure.
    pub fn is_temporary(&self) -> bool {
        matches!(self, Self::TemporaryAuthorization(_))
    }
}

/// Returns true iff `err` is the temporary error raised for a 401.
///
/// Accepts `None` so callers holding an optional last error can branch
/// without unwrapping first.
pub fn is_auth_error(err: Option<&Error>) -> bool {
    err.is_some_and(Error::is_auth_error)
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
