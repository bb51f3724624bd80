//! AWS Signature Version 4 request signing and verification.
//!
//! Clients sign an [`http::Request`] either with an `Authorization` header or
//! as a presigned URL. Servers verify the same request against a credential
//! store. Both sides share one canonicalization path, so a request signed here
//! verifies here, and requests signed by AWS SDKs verify too.
//!
//! # Usage
//!
//! ```rust
//! use sigv4_auth::credentials::StaticCredentialProvider;
//! use sigv4_auth::signer::{RequestSigner, SignatureLocation};
//! use sigv4_auth::verify::verify_request;
//! use sigv4_core::Credential;
//!
//! let credential = Credential::new("spiderman", "@C*u0NrTxs@Y89m#").unwrap();
//! let mut req = http::Request::post("http://localhost:9527/app")
//!     .header("content-type", "application/json")
//!     .body(br#"{"limit":10}"#.to_vec())
//!     .unwrap();
//!
//! RequestSigner::new("universal", "query_api")
//!     .unwrap()
//!     .sign(&mut req, &credential, SignatureLocation::Headers)
//!     .unwrap();
//!
//! let provider = StaticCredentialProvider::new(vec![
//!     ("spiderman".to_owned(), "@C*u0NrTxs@Y89m#".to_owned()),
//! ]);
//! let (auth, _trace) = verify_request(&req, &provider, "universal", "query_api").unwrap();
//! assert_eq!(auth.access_key_id, "spiderman");
//! ```
//!
//! # Modules
//!
//! - [`authorization`] - Parsing the claimed authorization from headers or query
//! - [`canonical`] - Canonical request construction
//! - [`credentials`] - Credential provider trait and in-memory implementation
//! - [`key`] - Signing key derivation and hashing
//! - [`signer`] - Header and presigned-URL signing
//! - [`sigv4`] - String to sign and signature computation
//! - [`trace`] - Intermediate values of one signature computation
//! - [`verify`] - Server-side verification

pub mod authorization;
pub mod canonical;
pub mod constants;
pub mod credentials;
pub mod error;
pub mod key;
mod request;
pub mod signer;
pub mod sigv4;
pub mod trace;
pub mod verify;

pub use authorization::{Authorization, AuthorizationSource};
pub use credentials::{CredentialProvider, StaticCredentialProvider};
pub use error::{AuthError, SignError};
pub use key::{derive_signing_key, hash_payload};
pub use signer::{RequestSigner, SignatureLocation, sign_request};
pub use trace::SigningTrace;
pub use verify::{Verifier, verify_request};
