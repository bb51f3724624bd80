//! Verifier configuration.
//!
//! Configuration is driven by environment variables. Access keys are never
//! read from the environment; key lookup belongs to the caller.

use crate::error::CoreResult;
use crate::types::CredentialScope;

/// Region and service a verifier accepts, plus optional expiration checks.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigV4Config {
    /// Region that every accepted credential scope must name.
    pub region: String,
    /// Service that every accepted credential scope must name.
    pub service: String,
    /// Reject presigned requests whose `X-Amz-Expires` window has passed.
    #[serde(default)]
    pub check_expiration: bool,
}

impl Default for SigV4Config {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_owned(),
            service: "execute-api".to_owned(),
            check_expiration: false,
        }
    }
}

impl SigV4Config {
    /// Create a configuration for the given region and service.
    #[must_use]
    pub fn new(region: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            service: service.into(),
            ..Self::default()
        }
    }

    /// Enable or disable `X-Amz-Expires` enforcement.
    #[must_use]
    pub fn with_check_expiration(mut self, check: bool) -> Self {
        self.check_expiration = check;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `SIGV4_REGION` | `us-east-1` |
    /// | `SIGV4_SERVICE` | `execute-api` |
    /// | `SIGV4_CHECK_EXPIRATION` | `false` |
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("SIGV4_REGION") {
            config.region = v;
        }
        if let Ok(v) = std::env::var("SIGV4_SERVICE") {
            config.service = v;
        }
        if let Ok(v) = std::env::var("SIGV4_CHECK_EXPIRATION") {
            config.check_expiration = v == "1" || v.eq_ignore_ascii_case("true");
        }

        config
    }

    /// Check that region and service can appear inside a credential scope.
    ///
    /// # Errors
    /// Returns [`crate::CoreError::Config`] if either value is empty or contains `/`.
    pub fn validate(&self) -> CoreResult<()> {
        CredentialScope::check_part("region", &self.region)?;
        CredentialScope::check_part("service", &self.service)
    }
}
