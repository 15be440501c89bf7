//! Authentication primitives for Kraken's private REST API
//!
//! Every private request needs three things: a nonce that is strictly
//! greater than any nonce previously used with the API key, a form-encoded
//! body carrying that nonce, and an HMAC-SHA512 signature over the path and
//! body. This crate provides each piece and a [`RequestSigner`] tying them
//! together.
//!
//! # Example
//!
//! ```no_run
//! use kraken_auth::{Credentials, NonceSequencer, Payload, RequestSigner};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Load credentials from environment
//!     let creds = Credentials::from_env()?;
//!     let nonces = NonceSequencer::new();
//!
//!     let request = RequestSigner::new(&creds, &nonces)
//!         .sign("/0/private/Balance", Payload::new())?;
//!     println!("nonce {} body {}", request.nonce, request.body);
//!
//!     Ok(())
//! }
//! ```

mod credentials;
mod error;
mod nonce;
mod payload;
mod signer;

pub use credentials::{Credentials, API_KEY_ENV, SECRET_KEY_ENV};
pub use error::{AuthError, AuthResult};
pub use nonce::NonceSequencer;
pub use payload::{FieldValue, Payload, StampedPayload, NONCE_FIELD};
pub use signer::{RequestSigner, SignedRequest, API_KEY_HEADER, API_SIGN_HEADER};
