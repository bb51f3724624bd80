//! Parsing and validation of the claimed SigV4 authorization.
//!
//! A claim arrives either as an `Authorization` header:
//!
//! ```text
//! AWS4-HMAC-SHA256 Credential=AKID/20150830/us-east-1/iam/aws4_request, SignedHeaders=content-type;host, Signature=<hex>
//! ```
//!
//! or as presigned query parameters (`X-Amz-Algorithm`, `X-Amz-Credential`,
//! `X-Amz-Date`, `X-Amz-SignedHeaders`, `X-Amz-Signature`). Both converge on
//! [`Authorization`]. The signed-header set is built once at parse time and
//! never mutated afterwards, so a parsed value can be shared freely.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use http::HeaderMap;
use sigv4_core::CredentialScope;

use crate::constants::{
    ALGORITHM, HEADER_AUTHORIZATION, HEADER_DATE, HEADER_X_AMZ_DATE, QUERY_ALGORITHM,
    QUERY_CREDENTIAL, QUERY_DATE, QUERY_SIGNATURE, QUERY_SIGNED_HEADERS,
};
use crate::error::AuthError;
use crate::sigv4::parse_timestamp;

/// Where a claimed authorization was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationSource {
    /// The `Authorization` header.
    Header,
    /// Presigned query parameters.
    QueryString,
}

/// A parsed SigV4 authorization claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorization {
    /// The signing algorithm as claimed (validated by [`Authorization::check`]).
    pub algorithm: String,
    /// The raw `AKID/date/region/service/aws4_request` credential.
    pub credential: String,
    /// The access key ID.
    pub access_key_id: String,
    /// The credential scope (date, region, service).
    pub scope: CredentialScope,
    /// Lowercase names of the signed headers, sorted.
    pub signed_headers: BTreeSet<String>,
    /// The hex-encoded signature.
    pub signature: String,
    /// Header or query string.
    pub source: AuthorizationSource,
}

impl Authorization {
    /// Extract the claim from the request headers, falling back to the query.
    ///
    /// A non-empty `authorization` header wins; otherwise all five presigned
    /// parameters must be present in `query`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MalformedAuthorization`] if neither form can be
    /// parsed and [`AuthError::MalformedCredential`] if the credential is not
    /// `AKID/date/region/service/aws4_request`.
    pub fn from_parts(headers: &HeaderMap, query: &[(String, String)]) -> Result<Self, AuthError> {
        if let Some(value) = headers.get(HEADER_AUTHORIZATION) {
            let content = value.to_str().map_err(|_| {
                AuthError::MalformedAuthorization("authorization header is not valid UTF-8".to_owned())
            })?;
            if !content.is_empty() {
                return Self::parse_header(content);
            }
        }
        Self::from_query(query)
    }

    /// Parse an `Authorization` header value.
    ///
    /// The value must be exactly four space-separated tokens.
    ///
    /// # Examples
    ///
    /// ```
    /// use sigv4_auth::authorization::Authorization;
    ///
    /// let auth = Authorization::parse_header(
    ///     "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20150830/us-east-1/iam/aws4_request, \
    ///      SignedHeaders=content-type;host, Signature=abc",
    /// )
    /// .unwrap();
    /// assert_eq!(auth.access_key_id, "AKIDEXAMPLE");
    /// assert!(auth.contains_signed_header("host"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MalformedAuthorization`] or [`AuthError::MalformedCredential`].
    pub fn parse_header(content: &str) -> Result<Self, AuthError> {
        let tokens: Vec<&str> = content.split(' ').collect();
        let [algorithm, credential, signed_headers, signature] = tokens.as_slice() else {
            return Err(AuthError::MalformedAuthorization(format!(
                "expected 4 space-separated tokens, found {}",
                tokens.len()
            )));
        };

        let credential = component_value("Credential=", credential)?;
        let signed_headers = component_value("SignedHeaders=", signed_headers)?;
        let signature = component_value("Signature=", signature)?;

        Self::build(
            algorithm,
            credential,
            signed_headers,
            signature,
            AuthorizationSource::Header,
        )
    }

    /// Build the claim from decoded presigned query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::MalformedAuthorization`] if any of the five
    /// parameters is missing, or [`AuthError::MalformedCredential`].
    pub fn from_query(query: &[(String, String)]) -> Result<Self, AuthError> {
        let algorithm = required_param(query, QUERY_ALGORITHM)?;
        let credential = required_param(query, QUERY_CREDENTIAL)?;
        required_param(query, QUERY_DATE)?;
        let signed_headers = required_param(query, QUERY_SIGNED_HEADERS)?;
        let signature = required_param(query, QUERY_SIGNATURE)?;

        Self::build(
            algorithm,
            credential,
            signed_headers,
            signature,
            AuthorizationSource::QueryString,
        )
    }

    fn build(
        algorithm: &str,
        credential: &str,
        signed_headers: &str,
        signature: &str,
        source: AuthorizationSource,
    ) -> Result<Self, AuthError> {
        let (access_key_id, scope) = decode_credential(credential)?;

        let signed_headers = signed_headers
            .split(';')
            .filter(|name| !name.is_empty())
            .map(str::to_ascii_lowercase)
            .collect();

        Ok(Self {
            algorithm: algorithm.to_owned(),
            credential: credential.to_owned(),
            access_key_id,
            scope,
            signed_headers,
            signature: signature.to_owned(),
            source,
        })
    }

    /// Date segment of the credential (`YYYYMMDD`).
    #[must_use]
    pub fn credential_date(&self) -> &str {
        self.scope.date()
    }

    /// Region named by the credential.
    #[must_use]
    pub fn region(&self) -> &str {
        self.scope.region()
    }

    /// Service named by the credential.
    #[must_use]
    pub fn service(&self) -> &str {
        self.scope.service()
    }

    /// Whether `name` (lowercase) is one of the signed headers.
    #[must_use]
    pub fn contains_signed_header(&self, name: &str) -> bool {
        self.signed_headers.contains(name)
    }

    /// Validate algorithm, timestamp and scope against what this verifier serves.
    ///
    /// The timestamp is looked up in the `x-amz-date` header, the
    /// `X-Amz-Date` query parameter, then the `date` header. Returns the
    /// parsed time together with the timestamp exactly as it appeared.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UnsupportedAlgorithm`], [`AuthError::MissingTimestamp`],
    /// [`AuthError::TimestampFormat`], [`AuthError::TimestampScopeMismatch`] or
    /// [`AuthError::ScopeMismatch`].
    pub fn check(
        &self,
        headers: &HeaderMap,
        query: &[(String, String)],
        region: &str,
        service: &str,
    ) -> Result<(DateTime<Utc>, String), AuthError> {
        if self.algorithm != ALGORITHM {
            return Err(AuthError::UnsupportedAlgorithm(self.algorithm.clone()));
        }

        let timestamp = request_timestamp(headers, query)?;
        let time = parse_timestamp(&timestamp)
            .ok_or_else(|| AuthError::TimestampFormat(timestamp.clone()))?;

        let credential_date = self.credential_date();
        if credential_date.len() != 8 || !timestamp.starts_with(credential_date) {
            return Err(AuthError::TimestampScopeMismatch {
                timestamp,
                credential_date: credential_date.to_owned(),
            });
        }

        if self.region() != region || self.service() != service {
            return Err(AuthError::ScopeMismatch {
                region: self.region().to_owned(),
                service: self.service().to_owned(),
            });
        }

        Ok((time, timestamp))
    }
}

/// Split `AKID/date/region/service/aws4_request` into the key and its scope.
fn decode_credential(credential: &str) -> Result<(String, CredentialScope), AuthError> {
    let malformed = || AuthError::MalformedCredential(credential.to_owned());

    let (access_key_id, scope) = credential.split_once('/').ok_or_else(malformed)?;
    let scope: CredentialScope = scope.parse().map_err(|_| malformed())?;

    Ok((access_key_id.to_owned(), scope))
}

/// Strip `prefix` and one trailing comma from a header token.
fn component_value<'a>(prefix: &str, token: &'a str) -> Result<&'a str, AuthError> {
    let value = token.strip_prefix(prefix).ok_or_else(|| {
        AuthError::MalformedAuthorization(format!("expected {prefix}... but found {token}"))
    })?;
    Ok(value.strip_suffix(',').unwrap_or(value))
}

fn required_param<'a>(query: &'a [(String, String)], name: &str) -> Result<&'a str, AuthError> {
    query
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
        .ok_or_else(|| AuthError::MalformedAuthorization(format!("missing query parameter {name}")))
}

fn request_timestamp(headers: &HeaderMap, query: &[(String, String)]) -> Result<String, AuthError> {
    let header = |name: &str| -> Result<Option<String>, AuthError> {
        match headers.get(name) {
            None => Ok(None),
            Some(value) => value
                .to_str()
                .map(|v| (!v.is_empty()).then(|| v.to_owned()))
                .map_err(|_| AuthError::TimestampFormat(format!("{value:?}"))),
        }
    };

    if let Some(timestamp) = header(HEADER_X_AMZ_DATE)? {
        return Ok(timestamp);
    }
    if let Some((_, timestamp)) = query.iter().find(|(k, v)| k == QUERY_DATE && !v.is_empty()) {
        return Ok(timestamp.clone());
    }
    header(HEADER_DATE)?.ok_or(AuthError::MissingTimestamp)
}
