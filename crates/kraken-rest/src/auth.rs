//! Authenticated transport for private endpoints
//!
//! Every private call goes through [`AuthenticatedTransport::call`]:
//!
//! 1. stamp the payload with the next nonce and sign it (one atomic step),
//! 2. POST the body with `API-Key` / `API-Sign` headers,
//! 3. reject non-2xx statuses,
//! 4. unwrap the `{error, result}` envelope into `T`.
//!
//! The network I/O itself is not serialized; concurrent calls only contend
//! on the nonce sequencer.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

pub use kraken_auth::Credentials;
use kraken_auth::{NonceSequencer, Payload, RequestSigner};

use crate::error::RestResult;
use crate::transport::{parse_envelope, HttpTransport};

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.kraken.com";

/// Signs and dispatches private requests for one credential pair
///
/// Cheap to clone; clones share the credentials, the nonce sequencer and the
/// HTTP transport.
#[derive(Clone)]
pub struct AuthenticatedTransport {
    http: Arc<dyn HttpTransport>,
    credentials: Arc<Credentials>,
    nonces: Arc<NonceSequencer>,
    base_url: Arc<str>,
}

impl AuthenticatedTransport {
    /// Create a transport with its own nonce sequencer
    pub fn new(
        http: Arc<dyn HttpTransport>,
        credentials: Credentials,
        base_url: impl AsRef<str>,
    ) -> Self {
        Self::with_nonces(http, credentials, Arc::new(NonceSequencer::new()), base_url)
    }

    /// Create a transport sharing an existing nonce sequencer
    pub fn with_nonces(
        http: Arc<dyn HttpTransport>,
        credentials: Credentials,
        nonces: Arc<NonceSequencer>,
        base_url: impl AsRef<str>,
    ) -> Self {
        Self {
            http,
            credentials: Arc::new(credentials),
            nonces,
            base_url: Arc::from(base_url.as_ref().trim_end_matches('/')),
        }
    }

    /// Credentials used for signing
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Nonce sequencer shared by all clones of this transport
    pub fn nonces(&self) -> &NonceSequencer {
        &self.nonces
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make an authenticated POST request
    ///
    /// Consumes exactly one nonce whether or not the request succeeds.
    pub async fn call<T: DeserializeOwned>(&self, path: &str, payload: Payload) -> RestResult<T> {
        let signed = RequestSigner::new(&self.credentials, &self.nonces).sign(path, payload)?;
        let headers = signed.headers();
        let url = format!("{}{}", self.base_url, path);

        debug!(path, nonce = signed.nonce, "Making authenticated request");

        let response = self
            .http
            .post_form(&url, &headers, signed.body)
            .await?
            .error_for_status()?;

        parse_envelope(&response.body)
    }
}

impl std::fmt::Debug for AuthenticatedTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedTransport")
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url)
            .finish()
    }
}
