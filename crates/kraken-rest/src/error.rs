//! Error types for REST API operations
//!
//! Every failure of a private call falls into one of four kinds:
//!
//! | Kind            | Raised when                                              |
//! |-----------------|----------------------------------------------------------|
//! | `Configuration` | credentials missing or invalid, before any network call  |
//! | `Transport`     | network failure, timeout or non-2xx HTTP status          |
//! | `Exchange`      | Kraken answered with a non-empty `error` array           |
//! | `Protocol`      | the response body is not a well-formed envelope          |
//!
//! None of them is retried by the client.

use std::time::Duration;

use kraken_auth::AuthError;

use crate::error_codes::ExchangeError;

/// Fieldless discriminant of [`RestError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or invalid credentials
    Configuration,
    /// Network or HTTP failure
    Transport,
    /// Error reported by the exchange
    Exchange,
    /// Malformed response
    Protocol,
}

/// Failures below the HTTP envelope
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// HTTP client error (connect, TLS, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("HTTP status {status}: {body}")]
    Status {
        /// Status code
        status: u16,
        /// Response body, possibly truncated
        body: String,
    },

    /// Request did not complete within the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection could not be established
    #[error("Connection failed: {0}")]
    Connection(String),
}

/// Errors that can occur during REST API operations
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// Missing or invalid credentials
    #[error("Configuration error: {0}")]
    Configuration(AuthError),

    /// Network or HTTP failure
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Kraken returned errors in the response envelope
    #[error("Exchange error: {}", .errors.join(", "))]
    Exchange {
        /// Error strings exactly as returned by Kraken
        errors: Vec<String>,
        /// First error, parsed
        error: ExchangeError,
    },

    /// Response did not match the expected envelope or result shape
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl RestError {
    /// Create an exchange error from error strings returned by Kraken
    pub fn from_api_errors(errors: Vec<String>) -> Self {
        let error = errors
            .first()
            .map(|e| ExchangeError::parse(e))
            .unwrap_or_else(|| ExchangeError::parse("Unknown error"));

        Self::Exchange { errors, error }
    }

    /// The kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Exchange { .. } => ErrorKind::Exchange,
            Self::Protocol(_) => ErrorKind::Protocol,
        }
    }

    /// The parsed exchange error, if this is one
    pub fn exchange_error(&self) -> Option<&ExchangeError> {
        match self {
            Self::Exchange { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Check if this error indicates rate limiting
    pub fn is_rate_limited(&self) -> bool {
        self.exchange_error().is_some_and(ExchangeError::is_rate_limit)
    }

    /// Check if Kraken rejected the nonce
    pub fn is_invalid_nonce(&self) -> bool {
        self.exchange_error().is_some_and(ExchangeError::is_invalid_nonce)
    }
}

impl From<AuthError> for RestError {
    fn from(err: AuthError) -> Self {
        if err.is_credentials_error() {
            Self::Configuration(err)
        } else {
            Self::Protocol(err.to_string())
        }
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;
