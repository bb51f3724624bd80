//! Server-side verification of SigV4-signed requests.
//!
//! Verification recomputes the signature from the request as received and
//! compares it with the claimed one in constant time. The request is only
//! read; nothing is normalized in place.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use http::Request;
use sigv4_core::{CoreError, CredentialScope, SigV4Config};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::authorization::Authorization;
use crate::canonical::build_canonical_request;
use crate::constants::{HEADER_HOST, QUERY_EXPIRES, QUERY_SIGNATURE};
use crate::credentials::CredentialProvider;
use crate::error::AuthError;
use crate::key::hash_payload;
use crate::request::{as_str_pairs, query_pairs, raw_query, strip_query_param, uri_host};
use crate::sigv4::sign_canonical_request;
use crate::trace::SigningTrace;

/// Verify a signed request for `region` and `service`.
///
/// On success returns the parsed claim and the trace of the recomputed
/// signature. Presigned expiration is not checked here; use a [`Verifier`]
/// configured with `check_expiration` for that.
///
/// # Errors
///
/// Returns the first [`AuthError`] encountered. Parsing and scope checks
/// happen before the credential lookup, and the lookup before any HMAC work.
pub fn verify_request<B: AsRef<[u8]>>(
    req: &Request<B>,
    provider: &dyn CredentialProvider,
    region: &str,
    service: &str,
) -> Result<(Authorization, SigningTrace), AuthError> {
    verify(req, provider, region, service, None)
}

/// A verifier bound to one region and service and a credential store.
///
/// Cheap to clone and safe to share across threads.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use sigv4_auth::credentials::StaticCredentialProvider;
/// use sigv4_auth::verify::Verifier;
/// use sigv4_core::SigV4Config;
///
/// let provider = StaticCredentialProvider::new(vec![
///     ("AKIDEXAMPLE".to_owned(), "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY".to_owned()),
/// ]);
/// let verifier = Verifier::new(SigV4Config::new("us-east-1", "iam"), Arc::new(provider)).unwrap();
///
/// let req = http::Request::get("https://iam.amazonaws.com/?Action=ListUsers")
///     .body(Vec::new())
///     .unwrap();
/// assert!(verifier.verify(&req).is_err());
/// ```
#[derive(Clone)]
pub struct Verifier {
    config: SigV4Config,
    provider: Arc<dyn CredentialProvider>,
}

impl Verifier {
    /// Create a verifier after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] if the region or service is unusable.
    pub fn new(config: SigV4Config, provider: Arc<dyn CredentialProvider>) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self { config, provider })
    }

    /// The configuration this verifier was built with.
    #[must_use]
    pub fn config(&self) -> &SigV4Config {
        &self.config
    }

    /// Verify `req` against the current time.
    ///
    /// # Errors
    ///
    /// See [`verify_request`]. Additionally returns [`AuthError::RequestExpired`]
    /// when expiration checking is enabled and the presigned window has passed.
    pub fn verify<B: AsRef<[u8]>>(
        &self,
        req: &Request<B>,
    ) -> Result<(Authorization, SigningTrace), AuthError> {
        self.verify_at(req, Utc::now())
    }

    /// Verify `req` as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// See [`Verifier::verify`].
    pub fn verify_at<B: AsRef<[u8]>>(
        &self,
        req: &Request<B>,
        now: DateTime<Utc>,
    ) -> Result<(Authorization, SigningTrace), AuthError> {
        let now = self.config.check_expiration.then_some(now);
        verify(
            req,
            self.provider.as_ref(),
            &self.config.region,
            &self.config.service,
            now,
        )
    }
}

impl std::fmt::Debug for Verifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Verifier")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn verify<B: AsRef<[u8]>>(
    req: &Request<B>,
    provider: &dyn CredentialProvider,
    region: &str,
    service: &str,
    now: Option<DateTime<Utc>>,
) -> Result<(Authorization, SigningTrace), AuthError> {
    let headers = req.headers();
    let query = query_pairs(req.uri());

    let auth = Authorization::from_parts(headers, &query)?;
    debug!(
        access_key_id = %auth.access_key_id,
        scope = %auth.scope,
        source = ?auth.source,
        "Verifying SigV4 signature"
    );

    let (time, timestamp) = auth.check(headers, &query, region, service)?;

    if let Some(now) = now {
        check_expiration(&query, time, now)?;
    }

    let secret_key = provider.get_secret_key(&auth.access_key_id)?;

    let header_pairs = collect_signed_headers(req, &auth)?;
    let signed_names: Vec<&str> = auth.signed_headers.iter().map(String::as_str).collect();

    let signed_query = strip_query_param(raw_query(req.uri()), QUERY_SIGNATURE);
    let payload_hash = hash_payload(req.body().as_ref());

    let canonical_request = build_canonical_request(
        req.method().as_str(),
        req.uri().path(),
        &signed_query,
        &as_str_pairs(&header_pairs),
        &signed_names,
        &payload_hash,
    );
    debug!(canonical_request, "Built canonical request");

    let scope = CredentialScope::for_timestamp(time, region, service);
    let trace = sign_canonical_request(
        &secret_key,
        &scope,
        &timestamp,
        canonical_request,
        payload_hash,
    );
    debug!(string_to_sign = trace.string_to_sign(), "Built string to sign");

    if bool::from(trace.signature().as_bytes().ct_eq(auth.signature.as_bytes())) {
        debug!(access_key_id = %auth.access_key_id, "Signature verification succeeded");
        Ok((auth, trace))
    } else {
        debug!(access_key_id = %auth.access_key_id, "Signature mismatch");
        Err(AuthError::SignatureMismatch)
    }
}

/// Reject presigned requests whose `X-Amz-Expires` window has passed.
///
/// Requests without the parameter never expire.
fn check_expiration(
    query: &[(String, String)],
    signed_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), AuthError> {
    let Some((_, expires)) = query.iter().find(|(name, _)| name == QUERY_EXPIRES) else {
        return Ok(());
    };

    let invalid = || AuthError::MalformedAuthorization(format!("invalid {QUERY_EXPIRES}: {expires}"));
    let seconds: u64 = expires.parse().map_err(|_| invalid())?;
    let window = i64::try_from(seconds)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .ok_or_else(invalid)?;
    let deadline = signed_at.checked_add_signed(window).ok_or_else(invalid)?;

    if now > deadline {
        debug!(%deadline, %now, "Presigned request expired");
        return Err(AuthError::RequestExpired);
    }
    Ok(())
}

/// Values of every signed header, repeated headers kept as separate pairs.
///
/// A signed `host` that is absent from the header map falls back to the URI
/// authority, which is where HTTP/2 and absolute-form requests carry it.
fn collect_signed_headers<B>(
    req: &Request<B>,
    auth: &Authorization,
) -> Result<Vec<(String, String)>, AuthError> {
    let mut pairs = Vec::with_capacity(auth.signed_headers.len());

    for name in &auth.signed_headers {
        let mut found = false;
        for value in req.headers().get_all(name.as_str()) {
            let value = value
                .to_str()
                .map_err(|_| AuthError::MissingHeader(name.clone()))?;
            pairs.push((name.clone(), value.to_owned()));
            found = true;
        }

        if !found {
            match uri_host(req.uri()) {
                Some(host) if name == HEADER_HOST => pairs.push((name.clone(), host)),
                _ => return Err(AuthError::MissingHeader(name.clone())),
            }
        }
    }

    Ok(pairs)
}
