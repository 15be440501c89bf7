//! Request signer for building authenticated requests

use crate::credentials::Credentials;
use crate::error::AuthResult;
use crate::nonce::NonceSequencer;
use crate::payload::Payload;
use tracing::trace;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "API-Key";
/// Header carrying the request signature
pub const API_SIGN_HEADER: &str = "API-Sign";

/// A fully prepared private request
///
/// Holds the form-encoded body and the two authentication headers. Built per
/// call and consumed by the transport; never persisted.
pub struct SignedRequest<'a> {
    /// Nonce embedded in `body`
    pub nonce: u64,
    /// Form-encoded body, exactly as signed
    pub body: String,
    /// Value for the `API-Key` header
    pub api_key: &'a str,
    /// Value for the `API-Sign` header
    pub signature: String,
}

impl SignedRequest<'_> {
    /// Authentication headers as `(name, value)` pairs
    pub fn headers(&self) -> [(&'static str, String); 2] {
        [
            (API_KEY_HEADER, self.api_key.to_string()),
            (API_SIGN_HEADER, self.signature.clone()),
        ]
    }
}

impl std::fmt::Debug for SignedRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignedRequest")
            .field("nonce", &self.nonce)
            .field("body_len", &self.body.len())
            .field("signature", &"[REDACTED]")
            .finish()
    }
}

/// Stamps payloads with a nonce and signs them
///
/// Nonce minting, encoding and signing happen inside the sequencer's
/// critical section, so the nonce in the body always matches the one the
/// signature covers and requests are produced in nonce order.
#[derive(Debug, Clone, Copy)]
pub struct RequestSigner<'a> {
    credentials: &'a Credentials,
    nonces: &'a NonceSequencer,
}

impl<'a> RequestSigner<'a> {
    /// Create a new request signer
    pub fn new(credentials: &'a Credentials, nonces: &'a NonceSequencer) -> Self {
        Self {
            credentials,
            nonces,
        }
    }

    /// Get the API key
    pub fn api_key(&self) -> &'a str {
        self.credentials.api_key()
    }

    /// Stamp `payload` with the next nonce and sign it for `path`
    ///
    /// The nonce is consumed even if encoding or signing fails.
    pub fn sign(&self, path: &str, payload: Payload) -> AuthResult<SignedRequest<'a>> {
        let credentials = self.credentials;
        self.nonces.stamp(|nonce| {
            let stamped = payload.stamp(nonce);
            let body = stamped.encode()?;
            let signature = credentials.sign(path, nonce, &body)?;
            trace!(path, nonce, "Signed private request");

            Ok(SignedRequest {
                nonce,
                body,
                api_key: credentials.api_key(),
                signature,
            })
        })
    }
}
