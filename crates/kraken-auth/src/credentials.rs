//! Authentication credentials for Kraken API
//!
//! Implements HMAC-SHA512 signing as required by Kraken's private endpoints.
//!
//! # Security
//!
//! Secret keys are stored using the `secrecy` crate which:
//! - Zeroizes memory on drop (prevents memory scanning)
//! - Prevents accidental logging via Debug impl
//! - Provides explicit access via `expose_secret()`

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretBox};
use sha2::{Digest, Sha256, Sha512};

use crate::error::{AuthError, AuthResult};
use crate::payload::StampedPayload;

type HmacSha512 = Hmac<Sha512>;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "KRAKEN_API_KEY";
/// Environment variable holding the base64 secret key
pub const SECRET_KEY_ENV: &str = "KRAKEN_PRIVATE_KEY";

/// API credentials for authenticated requests
///
/// Secret keys are automatically zeroized when the Credentials are dropped,
/// preventing sensitive data from remaining in memory.
pub struct Credentials {
    /// API key (public)
    api_key: String,
    /// Secret key (decoded from base64, zeroized on drop)
    secret: SecretBox<Vec<u8>>,
}

impl Credentials {
    /// Create new credentials from API key and secret key
    ///
    /// # Arguments
    /// * `api_key` - Your Kraken API key
    /// * `secret_key` - Your secret key (base64 encoded string)
    ///
    /// # Errors
    /// Fails if either value is empty or the secret is not valid base64.
    pub fn new(api_key: impl Into<String>, secret_key: impl AsRef<str>) -> AuthResult<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AuthError::MissingApiKey);
        }

        let secret_key = secret_key.as_ref().trim();
        if secret_key.is_empty() {
            return Err(AuthError::MissingSecret);
        }

        let decoded = BASE64
            .decode(secret_key)
            .map_err(|e| AuthError::InvalidSecret(format!("not valid base64: {}", e)))?;

        Ok(Self {
            api_key,
            secret: SecretBox::new(Box::new(decoded)),
        })
    }

    /// Create credentials from environment variables
    ///
    /// Reads `KRAKEN_API_KEY` and `KRAKEN_PRIVATE_KEY` from the environment.
    pub fn from_env() -> AuthResult<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| AuthError::EnvVarNotSet(API_KEY_ENV.to_string()))?;
        let secret_key = std::env::var(SECRET_KEY_ENV)
            .map_err(|_| AuthError::EnvVarNotSet(SECRET_KEY_ENV.to_string()))?;

        Self::new(api_key, secret_key)
    }

    /// Get the API key
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Sign already-encoded POST data
    ///
    /// Kraken signature algorithm:
    /// 1. SHA256(nonce + POST_data)
    /// 2. HMAC-SHA512(secret_key, uri_path + SHA256_result)
    /// 3. Base64 encode result
    ///
    /// `post_data` must be byte-for-byte the request body.
    pub fn sign(&self, path: &str, nonce: u64, post_data: &str) -> AuthResult<String> {
        let mut sha256 = Sha256::new();
        sha256.update(nonce.to_string().as_bytes());
        sha256.update(post_data.as_bytes());
        let digest = sha256.finalize();

        let mut message = path.as_bytes().to_vec();
        message.extend_from_slice(&digest);

        let mut mac = HmacSha512::new_from_slice(self.secret.expose_secret())
            .map_err(|e| AuthError::InvalidSecret(e.to_string()))?;
        mac.update(&message);

        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }

    /// Sign a stamped payload for `path`
    pub fn sign_payload(&self, path: &str, payload: &StampedPayload) -> AuthResult<String> {
        let post_data = payload.encode()?;
        self.sign(path, payload.nonce(), &post_data)
    }
}

impl Clone for Credentials {
    /// Clone credentials (creates new SecretBox with same content)
    fn clone(&self) -> Self {
        Self {
            api_key: self.api_key.clone(),
            secret: SecretBox::new(Box::new(self.secret.expose_secret().clone())),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix: String = self.api_key.chars().take(8).collect();
        f.debug_struct("Credentials")
            .field("api_key", &format!("{}...", prefix))
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
