//! Error types for authentication operations

/// Errors that can occur while preparing an authenticated request
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No credentials were configured for a private call
    #[error("API credentials are not configured")]
    NotConfigured,

    /// API key is empty
    #[error("Missing API key")]
    MissingApiKey,

    /// Secret key is empty
    #[error("Missing secret key")]
    MissingSecret,

    /// Secret key is not valid base64
    #[error("Invalid secret key: {0}")]
    InvalidSecret(String),

    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),

    /// Payload could not be form-encoded
    #[error("Payload encoding failed: {0}")]
    Encoding(String),
}

impl AuthError {
    /// Whether this error stems from missing or malformed credentials
    pub fn is_credentials_error(&self) -> bool {
        !matches!(self, Self::Encoding(_))
    }
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;
