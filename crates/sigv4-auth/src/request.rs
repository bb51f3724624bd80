//! Small helpers over `http::Request` shared by signer and verifier.

use http::Uri;
use http::uri::PathAndQuery;
use percent_encoding::percent_decode_str;

use crate::canonical::parse_query;
use crate::error::SignError;

/// `host[:port]` of the request URI, without any userinfo.
pub(crate) fn uri_host(uri: &Uri) -> Option<String> {
    let host = uri.host()?;
    Some(match uri.port_u16() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    })
}

/// Decoded query parameters of the request URI, in arrival order.
pub(crate) fn query_pairs(uri: &Uri) -> Vec<(String, String)> {
    parse_query(uri.query().unwrap_or(""))
}

/// Raw query string of the request URI, empty when absent.
pub(crate) fn raw_query(uri: &Uri) -> &str {
    uri.query().unwrap_or("")
}

/// Drop every `name=...` segment from a raw query string, leaving the rest
/// byte-for-byte as it was.
pub(crate) fn strip_query_param(query: &str, name: &str) -> String {
    query
        .split('&')
        .filter(|pair| {
            let key = pair.split_once('=').map_or(*pair, |(key, _)| key);
            !percent_decode_str(key).eq(name.bytes())
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Borrow owned pairs as `(&str, &str)`.
pub(crate) fn as_str_pairs(pairs: &[(String, String)]) -> Vec<(&str, &str)> {
    pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
}

/// Replace the query part of `uri`, keeping scheme, authority and path.
pub(crate) fn with_query(uri: &Uri, query: &str) -> Result<Uri, SignError> {
    let path = match uri.path() {
        "" => "/",
        path => path,
    };
    let path_and_query = if query.is_empty() {
        path.to_owned()
    } else {
        format!("{path}?{query}")
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(
        PathAndQuery::try_from(path_and_query).map_err(|e| SignError::InvalidUri(e.to_string()))?,
    );
    Uri::from_parts(parts).map_err(|e| SignError::InvalidUri(e.to_string()))
}
