//! Error types for the SigV4 core.

/// Core error type for credential and configuration handling.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The access key is empty or contains a character that would corrupt
    /// the `Credential=` token.
    #[error("invalid access key: {0:?}")]
    InvalidAccessKey(String),

    /// A credential scope string is not `date/region/service/aws4_request`.
    #[error("invalid credential scope: {0}")]
    InvalidCredentialScope(String),

    /// An access key was registered twice in a credential store.
    #[error("duplicate access key: {0}")]
    DuplicateAccessKey(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Convenience result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
