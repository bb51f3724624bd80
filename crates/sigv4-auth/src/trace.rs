//! Diagnostic record of one signature computation.

use std::fmt;

/// Intermediate values produced while computing a signature.
///
/// Returned by both signing and verification for observability. The derived
/// signing key is never rendered by `Debug` or `Display`; callers that really
/// need it must ask for it through [`SigningTrace::signing_key`].
#[derive(Clone, PartialEq, Eq)]
pub struct SigningTrace {
    pub(crate) signing_key: Vec<u8>,
    pub(crate) payload_hash: String,
    pub(crate) canonical_request: String,
    pub(crate) canonical_request_hash: String,
    pub(crate) string_to_sign: String,
    pub(crate) signature: String,
}

impl SigningTrace {
    /// The derived signing key. Treat as secret.
    #[must_use]
    pub fn signing_key(&self) -> &[u8] {
        &self.signing_key
    }

    /// Hex SHA-256 of the request body.
    #[must_use]
    pub fn payload_hash(&self) -> &str {
        &self.payload_hash
    }

    /// The canonical request that was hashed.
    #[must_use]
    pub fn canonical_request(&self) -> &str {
        &self.canonical_request
    }

    /// Hex SHA-256 of the canonical request.
    #[must_use]
    pub fn canonical_request_hash(&self) -> &str {
        &self.canonical_request_hash
    }

    /// The string to sign.
    #[must_use]
    pub fn string_to_sign(&self) -> &str {
        &self.string_to_sign
    }

    /// The hex-encoded signature.
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }
}

impl fmt::Debug for SigningTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningTrace")
            .field("signing_key", &"<redacted>")
            .field("payload_hash", &self.payload_hash)
            .field("canonical_request", &self.canonical_request)
            .field("canonical_request_hash", &self.canonical_request_hash)
            .field("string_to_sign", &self.string_to_sign)
            .field("signature", &self.signature)
            .finish()
    }
}

impl fmt::Display for SigningTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "payload sha256: {}", self.payload_hash)?;
        writeln!(f, "------------ canonical request begin ------------")?;
        writeln!(f, "{}", self.canonical_request)?;
        writeln!(f, "------------ canonical request end --------------")?;
        writeln!(f, "canonical request sha256: {}", self.canonical_request_hash)?;
        writeln!(f, "------------ string to sign begin ---------------")?;
        writeln!(f, "{}", self.string_to_sign)?;
        writeln!(f, "------------ string to sign end -----------------")?;
        write!(f, "signature: {}", self.signature)
    }
}
