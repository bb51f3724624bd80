//! Error types for SigV4 signing and verification.
//!
//! Verification failures are represented by [`AuthError`], signing failures
//! by [`SignError`]. None of the variants carry secret or derived key material.

/// Errors that can occur while verifying a SigV4-signed request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The `Authorization` header or the presigned query parameters could not
    /// be parsed.
    #[error("Malformed authorization: {0}")]
    MalformedAuthorization(String),

    /// The `Credential` component is not `AKID/date/region/service/aws4_request`.
    #[error("Malformed credential: {0}")]
    MalformedCredential(String),

    /// The signing algorithm is not `AWS4-HMAC-SHA256`.
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// No `x-amz-date` header, `X-Amz-Date` parameter or `date` header.
    #[error("Missing request timestamp (x-amz-date header, X-Amz-Date query or date header)")]
    MissingTimestamp,

    /// The request timestamp is not in `YYYYMMDDTHHMMSSZ` form.
    #[error("Invalid request timestamp: {0}")]
    TimestampFormat(String),

    /// The request timestamp is not on the day named by the credential scope.
    #[error("Request timestamp {timestamp} does not match credential date {credential_date}")]
    TimestampScopeMismatch {
        /// Timestamp found on the request.
        timestamp: String,
        /// Date segment of the credential.
        credential_date: String,
    },

    /// The credential scope names a region or service this verifier does not serve.
    #[error("Credential scope {region}/{service} does not match")]
    ScopeMismatch {
        /// Region from the credential scope.
        region: String,
        /// Service from the credential scope.
        service: String,
    },

    /// The access key ID was not found in the credential store.
    #[error("Unknown access key: {0}")]
    UnknownAccessKey(String),

    /// A header listed in `SignedHeaders` is missing or not valid UTF-8.
    #[error("Missing signed header: {0}")]
    MissingHeader(String),

    /// The presigned URL has expired (`X-Amz-Date` + `X-Amz-Expires` is in the past).
    #[error("Request has expired")]
    RequestExpired,

    /// The computed signature does not match the provided signature.
    #[error("Signature does not match")]
    SignatureMismatch,
}

/// Errors that can occur while signing a request.
///
/// Signing is not atomic: when one of these is returned the request may
/// already carry the timestamp header or the presigned query parameters.
#[derive(Debug, thiserror::Error)]
pub enum SignError {
    /// The `date` header is present but not an HTTP date.
    #[error("Cannot parse date header: {0}")]
    DateParse(String),

    /// A header value is not visible ASCII, or a computed value cannot be a header.
    #[error("Invalid header value for {0}")]
    InvalidHeaderValue(String),

    /// Presigning needs a host but the request has neither an authority nor a `host` header.
    #[error("Request has no host")]
    MissingHost,

    /// The rewritten request URI is invalid.
    #[error("Invalid request URI: {0}")]
    InvalidUri(String),

    /// The signer's region or service cannot appear in a credential scope.
    #[error("Invalid signing scope: {0}")]
    InvalidScope(#[from] sigv4_core::CoreError),
}
