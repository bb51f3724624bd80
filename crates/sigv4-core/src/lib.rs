//! Core types, configuration, and errors for the SigV4 crates.
//!
//! This crate holds the pieces shared by both the signing and the verifying
//! side of AWS Signature Version 4: the access/secret key pair, the credential
//! scope that binds a signature to a day, region and service, and the
//! verifier configuration.

mod config;
mod error;
mod types;

pub use config::SigV4Config;
pub use error::{CoreError, CoreResult};
pub use types::{Credential, CredentialScope, SCOPE_TERMINATOR};
