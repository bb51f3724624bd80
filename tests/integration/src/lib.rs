//! End-to-end tests for SigV4 signing and verification.
//!
//! Everything runs in-process: requests are built with `http`, signed with
//! [`RequestSigner`] and checked with [`Verifier`]. Set `RUST_LOG=debug` to
//! see canonical requests and strings to sign.

use std::sync::{Arc, Once};

use sigv4_auth::{RequestSigner, StaticCredentialProvider, Verifier};
use sigv4_core::{Credential, SigV4Config};

static INIT: Once = Once::new();

/// Access key used by the local round-trip tests.
pub const ACCESS_KEY: &str = "spiderman";
/// Secret key used by the local round-trip tests.
pub const SECRET_KEY: &str = "@C*u0NrTxs@Y89m#";
/// Region used by the local round-trip tests.
pub const REGION: &str = "universal";
/// Service used by the local round-trip tests.
pub const SERVICE: &str = "query_api";

/// Initialize tracing (once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// The shared test credential.
#[must_use]
pub fn credential() -> Credential {
    Credential::new(ACCESS_KEY, SECRET_KEY).expect("test credential is valid")
}

/// A signer for [`REGION`] / [`SERVICE`].
#[must_use]
pub fn signer() -> RequestSigner {
    init_tracing();
    RequestSigner::new(REGION, SERVICE).expect("test scope is valid")
}

/// A verifier for [`REGION`] / [`SERVICE`] that knows [`ACCESS_KEY`].
///
/// # Errors
///
/// Returns an error if the verifier configuration is rejected.
pub fn verifier(check_expiration: bool) -> anyhow::Result<Verifier> {
    init_tracing();
    let provider = StaticCredentialProvider::default()
        .with_credential(ACCESS_KEY, SECRET_KEY)?;
    let config = SigV4Config::new(REGION, SERVICE).with_check_expiration(check_expiration);
    Ok(Verifier::new(config, Arc::new(provider))?)
}

/// A JSON `POST` to the local query endpoint.
///
/// # Errors
///
/// Returns an error if the request cannot be built.
pub fn json_request(body: &str) -> anyhow::Result<http::Request<Vec<u8>>> {
    Ok(http::Request::post("http://localhost:9527/app")
        .header("content-type", "application/json")
        .body(body.as_bytes().to_vec())?)
}

mod test_concurrency;
mod test_round_trip;
mod test_scope;
mod test_tamper;
