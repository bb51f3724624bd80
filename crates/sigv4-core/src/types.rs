//! Credential and credential-scope types shared by signer and verifier.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};

/// The fixed last segment of every credential scope.
pub const SCOPE_TERMINATOR: &str = "aws4_request";

/// An access key / secret key pair.
///
/// The secret never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    access_key: String,
    secret_key: String,
}

impl Credential {
    /// Create a credential from an access key and a secret key.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidAccessKey`] if the access key is empty or
    /// contains `/`, `,` or whitespace, none of which can round-trip through
    /// an `Authorization` header.
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> CoreResult<Self> {
        let access_key = access_key.into();
        if access_key.is_empty()
            || access_key
                .chars()
                .any(|c| c == '/' || c == ',' || c.is_whitespace())
        {
            return Err(CoreError::InvalidAccessKey(access_key));
        }
        Ok(Self {
            access_key,
            secret_key: secret_key.into(),
        })
    }

    /// The public access key id.
    #[must_use]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// The secret key.
    #[must_use]
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// The `date/region/service/aws4_request` scope a signature is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CredentialScope {
    date: String,
    region: String,
    service: String,
}

impl CredentialScope {
    /// Create a scope from its three variable parts.
    #[must_use]
    pub fn new(
        date: impl Into<String>,
        region: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            region: region.into(),
            service: service.into(),
        }
    }

    /// Create a scope for the UTC day of `timestamp`.
    #[must_use]
    pub fn for_timestamp(timestamp: DateTime<Utc>, region: &str, service: &str) -> Self {
        Self::new(timestamp.format("%Y%m%d").to_string(), region, service)
    }

    /// Check that a region or service can sit inside a scope.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] if `value` is empty or contains `/`.
    pub fn check_part(name: &str, value: &str) -> CoreResult<()> {
        if value.is_empty() || value.contains('/') {
            return Err(CoreError::Config(format!("invalid {name}: {value:?}")));
        }
        Ok(())
    }

    /// The `YYYYMMDD` date.
    #[must_use]
    pub fn date(&self) -> &str {
        &self.date
    }

    /// The region.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.region
    }

    /// The service name.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }
}

impl fmt::Display for CredentialScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{SCOPE_TERMINATOR}",
            self.date, self.region, self.service
        )
    }
}

impl FromStr for CredentialScope {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        match parts.as_slice() {
            [date, region, service, terminator] if *terminator == SCOPE_TERMINATOR => {
                Ok(Self::new(*date, *region, *service))
            }
            _ => Err(CoreError::InvalidCredentialScope(s.to_owned())),
        }
    }
}
