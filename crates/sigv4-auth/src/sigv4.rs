//! String-to-sign assembly and signature computation.
//!
//! These are the pure steps shared by the signer and the verifier:
//!
//! 1. Hash the canonical request.
//! 2. Build the string to sign from the algorithm, timestamp, credential scope
//!    and canonical request hash.
//! 3. Derive the signing key for the scope.
//! 4. HMAC the string to sign with the signing key.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use sigv4_core::CredentialScope;

use crate::constants::{ALGORITHM, ISO8601_BASIC_FORMAT};
use crate::key::{derive_signing_key, hash_payload, hmac_sha256};
use crate::trace::SigningTrace;

/// Build the SigV4 string to sign.
///
/// Format:
/// ```text
/// AWS4-HMAC-SHA256\n
/// <ISO8601 timestamp>\n
/// <credential_scope>\n
/// <hex(SHA256(canonical_request))>
/// ```
///
/// # Examples
///
/// ```
/// use sigv4_auth::sigv4::build_string_to_sign;
///
/// let sts = build_string_to_sign(
///     "20130524T000000Z",
///     "20130524/us-east-1/s3/aws4_request",
///     "7344ae5b7ee6c3e7e6b0fe0640412a37625d1fbfff95c48bbb2dc43964946972",
/// );
/// assert!(sts.starts_with("AWS4-HMAC-SHA256\n20130524T000000Z\n"));
/// ```
#[must_use]
pub fn build_string_to_sign(
    timestamp: &str,
    credential_scope: &str,
    canonical_request_hash: &str,
) -> String {
    format!("{ALGORITHM}\n{timestamp}\n{credential_scope}\n{canonical_request_hash}")
}

/// Compute the HMAC-SHA256 signature of `data` using the given `signing_key`.
///
/// Returns the hex-encoded signature.
#[must_use]
pub fn compute_signature(signing_key: &[u8], data: &str) -> String {
    hex::encode(hmac_sha256(signing_key, data.as_bytes()))
}

/// Format a UTC time as a basic ISO 8601 timestamp (`20150830T123600Z`).
#[must_use]
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.format(ISO8601_BASIC_FORMAT).to_string()
}

/// Parse a basic ISO 8601 timestamp (`20150830T123600Z`) as UTC.
///
/// Returns `None` if the string is not in that exact form.
#[must_use]
pub fn parse_timestamp(timestamp: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(timestamp, ISO8601_BASIC_FORMAT)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Run the full signature computation over an already-built canonical request.
///
/// `timestamp` must be the basic ISO 8601 form whose date matches `scope`.
#[must_use]
pub fn sign_canonical_request(
    secret_key: &str,
    scope: &CredentialScope,
    timestamp: &str,
    canonical_request: String,
    payload_hash: String,
) -> SigningTrace {
    let canonical_request_hash = hash_payload(canonical_request.as_bytes());
    let string_to_sign =
        build_string_to_sign(timestamp, &scope.to_string(), &canonical_request_hash);

    let signing_key =
        derive_signing_key(secret_key, scope.date(), scope.region(), scope.service());
    let signature = compute_signature(&signing_key, &string_to_sign);

    SigningTrace {
        signing_key,
        payload_hash,
        canonical_request,
        canonical_request_hash,
        string_to_sign,
        signature,
    }
}
