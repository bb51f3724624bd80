//! Request signing for AWS Signature Version 4.
//!
//! One operation covers both transports, selected by [`SignatureLocation`]:
//!
//! - [`SignatureLocation::Headers`] writes `x-amz-date` and an
//!   `Authorization` header.
//! - [`SignatureLocation::QueryString`] produces a presigned URL: the host
//!   header is pinned, the `X-Amz-*` parameters are written into the query
//!   *before* the canonical request is computed, and `X-Amz-Signature` is
//!   appended last since it cannot sign itself.
//!
//! Signing is not atomic. If an error is returned, the request may already
//! carry the timestamp header or the presigned query parameters.

use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use http::header::{AUTHORIZATION, HOST};
use http::{HeaderMap, HeaderName, HeaderValue, Request};
use sigv4_core::{Credential, CredentialScope};
use tracing::debug;

use crate::canonical::{
    build_canonical_request, build_signed_headers_string, join_canonical_query,
    parse_canonical_query, uri_encode,
};
use crate::constants::{
    ALGORITHM, HEADER_DATE, HEADER_X_AMZ_DATE, HTTP_DATE_FORMAT, QUERY_ALGORITHM,
    QUERY_CREDENTIAL, QUERY_DATE, QUERY_EXPIRES, QUERY_SIGNATURE, QUERY_SIGNED_HEADERS,
};
use crate::error::SignError;
use crate::key::hash_payload;
use crate::request::{raw_query, uri_host, with_query};
use crate::sigv4::{format_timestamp, sign_canonical_request};
use crate::trace::SigningTrace;

/// Where the signature is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureLocation {
    /// `Authorization` header.
    #[default]
    Headers,
    /// Presigned query parameters, optionally with an `X-Amz-Expires` window.
    QueryString {
        /// Validity window written as `X-Amz-Expires`.
        expires_in: Option<Duration>,
    },
}

/// Signs requests for one region and service.
///
/// # Examples
///
/// ```
/// use sigv4_auth::signer::{RequestSigner, SignatureLocation};
/// use sigv4_core::Credential;
///
/// let credential = Credential::new("spiderman", "@C*u0NrTxs@Y89m#").unwrap();
/// let mut req = http::Request::builder()
///     .method("POST")
///     .uri("http://localhost:9527/app")
///     .header("content-type", "application/json")
///     .body(b"{}".to_vec())
///     .unwrap();
///
/// let trace = RequestSigner::new("universal", "query_api")
///     .unwrap()
///     .sign(&mut req, &credential, SignatureLocation::Headers)
///     .unwrap();
/// assert!(req.headers().contains_key("authorization"));
/// assert_eq!(trace.signature().len(), 64);
/// ```
#[derive(Debug, Clone)]
pub struct RequestSigner {
    region: String,
    service: String,
    time: Option<DateTime<Utc>>,
}

impl RequestSigner {
    /// Create a signer for the given region and service.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::InvalidScope`] if either value is empty or
    /// contains `/`, which no verifier could parse back out of the credential.
    pub fn new(region: impl Into<String>, service: impl Into<String>) -> Result<Self, SignError> {
        let region = region.into();
        let service = service.into();
        CredentialScope::check_part("region", &region)?;
        CredentialScope::check_part("service", &service)?;
        Ok(Self {
            region,
            service,
            time: None,
        })
    }

    /// Pin the signing time used when the request has no `date` header.
    ///
    /// Requests should normally be signed with the current time; this exists
    /// for reproducible tests.
    #[must_use]
    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    /// Sign `req` in place and return the intermediate values.
    ///
    /// # Errors
    ///
    /// Returns [`SignError::DateParse`] if a `date` header is present but is
    /// not an HTTP date, [`SignError::InvalidHeaderValue`] if a header value
    /// cannot be canonicalized, and [`SignError::MissingHost`] or
    /// [`SignError::InvalidUri`] when presigning a request without a usable URI.
    pub fn sign<B: AsRef<[u8]>>(
        &self,
        req: &mut Request<B>,
        credential: &Credential,
        location: SignatureLocation,
    ) -> Result<SigningTrace, SignError> {
        let now = self.signing_time(req.headers())?;
        let timestamp = format_timestamp(now);
        let scope = CredentialScope::for_timestamp(now, &self.region, &self.service);

        debug!(
            access_key_id = %credential.access_key(),
            region = %self.region,
            service = %self.service,
            timestamp = %timestamp,
            ?location,
            "Signing request"
        );

        match location {
            SignatureLocation::Headers => sign_with_headers(req, credential, &scope, &timestamp),
            SignatureLocation::QueryString { expires_in } => {
                sign_with_query(req, credential, &scope, &timestamp, expires_in)
            }
        }
    }

    /// Time from the `date` header, else the pinned time, else now.
    fn signing_time(&self, headers: &HeaderMap) -> Result<DateTime<Utc>, SignError> {
        match headers.get(HEADER_DATE) {
            Some(value) => {
                let raw = value
                    .to_str()
                    .map_err(|_| SignError::DateParse(format!("{value:?}")))?;
                parse_http_date(raw).ok_or_else(|| SignError::DateParse(raw.to_owned()))
            }
            None => Ok(self.time.unwrap_or_else(Utc::now)),
        }
    }
}

/// Sign `req` for `region`/`service` with the current time.
///
/// Shorthand for [`RequestSigner::new`] followed by [`RequestSigner::sign`].
///
/// # Errors
///
/// See [`RequestSigner::sign`].
pub fn sign_request<B: AsRef<[u8]>>(
    req: &mut Request<B>,
    credential: &Credential,
    region: &str,
    service: &str,
    location: SignatureLocation,
) -> Result<SigningTrace, SignError> {
    RequestSigner::new(region, service)?.sign(req, credential, location)
}

fn sign_with_headers<B: AsRef<[u8]>>(
    req: &mut Request<B>,
    credential: &Credential,
    scope: &CredentialScope,
    timestamp: &str,
) -> Result<SigningTrace, SignError> {
    set_header(req.headers_mut(), HeaderName::from_static(HEADER_X_AMZ_DATE), timestamp)?;

    let signed_headers = signed_header_list(req.headers())?;
    let trace = compute_trace(req, credential, scope, timestamp)?;

    let authorization = format!(
        "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={}",
        credential.access_key(),
        trace.signature(),
    );
    let mut value = HeaderValue::from_str(&authorization)
        .map_err(|_| SignError::InvalidHeaderValue(AUTHORIZATION.to_string()))?;
    value.set_sensitive(true);
    req.headers_mut().insert(AUTHORIZATION, value);

    Ok(trace)
}

fn sign_with_query<B: AsRef<[u8]>>(
    req: &mut Request<B>,
    credential: &Credential,
    scope: &CredentialScope,
    timestamp: &str,
    expires_in: Option<Duration>,
) -> Result<SigningTrace, SignError> {
    if let Some(host) = uri_host(req.uri()) {
        set_header(req.headers_mut(), HOST, &host)?;
    } else if !req.headers().contains_key(HOST) {
        return Err(SignError::MissingHost);
    }

    let signed_headers = signed_header_list(req.headers())?;

    // Existing parameters are carried over in canonical encoding, byte for byte.
    let mut params = parse_canonical_query(raw_query(req.uri()));
    // A signature left over from an earlier signing must not be signed.
    params.retain(|(k, _)| k != QUERY_SIGNATURE);
    set_param(&mut params, QUERY_ALGORITHM, ALGORITHM);
    set_param(
        &mut params,
        QUERY_CREDENTIAL,
        &format!("{}/{scope}", credential.access_key()),
    );
    set_param(&mut params, QUERY_DATE, timestamp);
    if let Some(expires_in) = expires_in {
        set_param(&mut params, QUERY_EXPIRES, &expires_in.as_secs().to_string());
    }
    set_param(&mut params, QUERY_SIGNED_HEADERS, &signed_headers);

    let query = join_canonical_query(params);
    let uri = with_query(req.uri(), &query)?;
    *req.uri_mut() = uri;

    let trace = compute_trace(req, credential, scope, timestamp)?;

    let query = format!("{query}&{QUERY_SIGNATURE}={}", trace.signature());
    let uri = with_query(req.uri(), &query)?;
    *req.uri_mut() = uri;

    Ok(trace)
}

/// Canonicalize the request as it currently is and sign it.
fn compute_trace<B: AsRef<[u8]>>(
    req: &Request<B>,
    credential: &Credential,
    scope: &CredentialScope,
    timestamp: &str,
) -> Result<SigningTrace, SignError> {
    let headers = signable_headers(req.headers())?;
    let names = header_names(&headers);

    let payload_hash = hash_payload(req.body().as_ref());

    let canonical_request = build_canonical_request(
        req.method().as_str(),
        req.uri().path(),
        raw_query(req.uri()),
        &headers,
        &names,
        &payload_hash,
    );
    debug!(canonical_request, "Built canonical request");

    let trace = sign_canonical_request(
        credential.secret_key(),
        scope,
        timestamp,
        canonical_request,
        payload_hash,
    );
    debug!(string_to_sign = trace.string_to_sign(), "Built string to sign");

    Ok(trace)
}

/// Every header except `authorization`, in arrival order.
fn signable_headers(headers: &HeaderMap) -> Result<Vec<(&str, &str)>, SignError> {
    headers
        .iter()
        .filter(|(name, _)| *name != AUTHORIZATION)
        .map(|(name, value)| {
            value
                .to_str()
                .map(|value| (name.as_str(), value))
                .map_err(|_| SignError::InvalidHeaderValue(name.to_string()))
        })
        .collect()
}

fn header_names<'a>(headers: &[(&'a str, &str)]) -> Vec<&'a str> {
    let mut names: Vec<&str> = headers.iter().map(|(name, _)| *name).collect();
    names.sort_unstable();
    names.dedup();
    names
}

/// `;`-joined names of the headers that will be signed.
fn signed_header_list(headers: &HeaderMap) -> Result<String, SignError> {
    let headers = signable_headers(headers)?;
    Ok(build_signed_headers_string(&header_names(&headers)))
}

fn set_header(headers: &mut HeaderMap, name: HeaderName, value: &str) -> Result<(), SignError> {
    let value =
        HeaderValue::from_str(value).map_err(|_| SignError::InvalidHeaderValue(name.to_string()))?;
    headers.insert(name, value);
    Ok(())
}

/// Replace every occurrence of `name` with a single encoded `name=value`.
fn set_param(params: &mut Vec<(String, String)>, name: &str, value: &str) {
    params.retain(|(k, _)| k != name);
    params.push((name.to_owned(), uri_encode(value)));
}

/// Parse an IMF-fixdate such as `Sun, 30 Aug 2015 12:36:00 GMT`.
fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), HTTP_DATE_FORMAT)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}
