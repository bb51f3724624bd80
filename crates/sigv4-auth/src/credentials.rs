//! Credential provider trait and implementations.
//!
//! This module defines the [`CredentialProvider`] trait for resolving secret access keys
//! from access key IDs, along with a [`StaticCredentialProvider`] for in-memory key sets.
//! Any `Fn(&str) -> Option<String>` closure is also a provider.

use std::collections::HashMap;

use sigv4_core::CoreError;

use crate::error::AuthError;

/// Trait for looking up secret access keys by access key ID.
///
/// Implementations may back this with a database, configuration file,
/// or any other credential store. Lookups may block; the verifier holds no
/// lock while calling them.
pub trait CredentialProvider: Send + Sync {
    /// Retrieve the secret access key for the given access key ID.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UnknownAccessKey`] if the access key ID is not recognized.
    fn get_secret_key(&self, access_key_id: &str) -> Result<String, AuthError>;
}

impl<F> CredentialProvider for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn get_secret_key(&self, access_key_id: &str) -> Result<String, AuthError> {
        self(access_key_id).ok_or_else(|| AuthError::UnknownAccessKey(access_key_id.to_owned()))
    }
}

/// A simple in-memory credential provider backed by a `HashMap`.
///
/// # Examples
///
/// ```
/// use sigv4_auth::credentials::{CredentialProvider, StaticCredentialProvider};
///
/// let provider = StaticCredentialProvider::new(vec![
///     ("AKIDEXAMPLE".to_owned(), "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_owned()),
/// ]);
///
/// let secret = provider.get_secret_key("AKIDEXAMPLE").unwrap();
/// assert_eq!(secret, "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY");
/// ```
#[derive(Clone, Default)]
pub struct StaticCredentialProvider {
    credentials: HashMap<String, String>,
}

impl StaticCredentialProvider {
    /// Create a new `StaticCredentialProvider` from an iterable of (access_key_id, secret_key) pairs.
    ///
    /// Later pairs overwrite earlier ones with the same access key ID.
    pub fn new(credentials: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            credentials: credentials.into_iter().collect(),
        }
    }

    /// Add one key pair, refusing to replace an existing access key ID.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::DuplicateAccessKey`] if the access key ID is
    /// already registered.
    pub fn with_credential(
        mut self,
        access_key_id: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let access_key_id = access_key_id.into();
        if self.credentials.contains_key(&access_key_id) {
            return Err(CoreError::DuplicateAccessKey(access_key_id));
        }
        self.credentials.insert(access_key_id, secret_key.into());
        Ok(self)
    }

    /// Number of registered access keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// Whether no access keys are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

impl std::fmt::Debug for StaticCredentialProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&str> = self.credentials.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("StaticCredentialProvider")
            .field("access_keys", &keys)
            .finish()
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn get_secret_key(&self, access_key_id: &str) -> Result<String, AuthError> {
        self.credentials
            .get(access_key_id)
            .cloned()
            .ok_or_else(|| AuthError::UnknownAccessKey(access_key_id.to_owned()))
    }
}
