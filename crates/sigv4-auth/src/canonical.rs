//! Canonical request construction for AWS Signature Version 4.
//!
//! This module implements the canonical request format as specified by AWS:
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! CanonicalHeaders\n
//! SignedHeaders\n
//! HashedPayload
//! ```
//!
//! where every `CanonicalHeaders` entry is itself terminated by `\n`. Both the
//! signer and the verifier go through these functions, so the same logical
//! request always canonicalizes to the same bytes regardless of header or
//! query-parameter insertion order.

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode, percent_encode, utf8_percent_encode};

/// The set of characters that must be percent-encoded.
///
/// SigV4 encodes every character except the unreserved ones
/// (A-Z, a-z, 0-9, `-`, `_`, `.`, `~`). Used for path
/// segments and for query names and values.
const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Build the full canonical request string from its components.
///
/// `query` is the raw query string as it appears on the wire; `headers` holds
/// name/value pairs in arrival order (repeated names are combined).
///
/// # Examples
///
/// ```
/// use sigv4_auth::canonical::build_canonical_request;
///
/// let canonical = build_canonical_request(
///     "GET",
///     "/test.txt",
///     "",
///     &[("host", "examplebucket.s3.amazonaws.com")],
///     &["host"],
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
/// );
/// assert!(canonical.starts_with("GET\n/test.txt\n\nhost:examplebucket.s3.amazonaws.com\n\nhost\n"));
/// ```
#[must_use]
pub fn build_canonical_request(
    method: &str,
    uri: &str,
    query: &str,
    headers: &[(&str, &str)],
    signed_headers: &[&str],
    payload_hash: &str,
) -> String {
    let canonical_uri = build_canonical_uri(uri);
    let canonical_query = canonicalize_query(query);
    let canonical_headers = build_canonical_headers(headers, signed_headers);
    let signed_headers_str = build_signed_headers_string(signed_headers);

    format!(
        "{method}\n{canonical_uri}\n{canonical_query}\n{canonical_headers}\n{signed_headers_str}\n{payload_hash}"
    )
}

/// Build the canonical URI by URI-encoding each path segment individually.
///
/// Forward slashes (`/`) are preserved. Empty paths are normalized to `/`.
/// Escapes are decoded to bytes and re-encoded, so `%ff` becomes `%FF` and
/// escapes that are not valid UTF-8 survive unchanged.
///
/// # Examples
///
/// ```
/// use sigv4_auth::canonical::build_canonical_uri;
///
/// assert_eq!(build_canonical_uri("/test.txt"), "/test.txt");
/// assert_eq!(build_canonical_uri(""), "/");
/// assert_eq!(build_canonical_uri("/a%ff"), "/a%FF");
/// ```
#[must_use]
pub fn build_canonical_uri(path: &str) -> String {
    if path.is_empty() || path == "/" {
        return "/".to_owned();
    }

    path.split('/')
        .map(|segment| {
            // Decode first so an already-encoded path is not encoded twice.
            let decoded: Vec<u8> = percent_decode(segment.as_bytes()).collect();
            percent_encode(&decoded, URI_ENCODE_SET).to_string()
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Decode a raw query string into name/value pairs for reading.
///
/// `+` decodes to a space and a parameter without `=` gets an empty value.
/// Invalid UTF-8 is replaced, so the result must not be fed back into
/// canonicalization; use [`canonicalize_query`] on the raw string for that.
///
/// # Examples
///
/// ```
/// use sigv4_auth::canonical::parse_query;
///
/// let pairs = parse_query("a=1&flag&b=x%2Fy");
/// assert_eq!(pairs[1], ("flag".to_owned(), String::new()));
/// assert_eq!(pairs[2], ("b".to_owned(), "x/y".to_owned()));
/// ```
#[must_use]
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

/// Canonical form of a raw query string.
///
/// Each name and value is decoded to bytes (`+` as a space) and re-encoded
/// with the unreserved set, so distinct byte sequences never collapse into
/// one canonical string.
///
/// # Examples
///
/// ```
/// use sigv4_auth::canonical::canonicalize_query;
///
/// assert_eq!(canonicalize_query("b=x+y&a=%ff&flag"), "a=%FF&b=x%20y&flag=");
/// ```
#[must_use]
pub fn canonicalize_query(query: &str) -> String {
    join_canonical_query(parse_canonical_query(query))
}

/// Split a raw query string into canonically encoded name/value pairs.
///
/// Pairs keep arrival order; empty segments are skipped.
#[must_use]
pub fn parse_canonical_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            (reencode_query_component(name), reencode_query_component(value))
        })
        .collect()
}

/// Sort already-encoded pairs by name, then value, and join them.
#[must_use]
pub fn join_canonical_query(mut pairs: Vec<(String, String)>) -> String {
    pairs.sort_unstable();

    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Build the canonical query string from decoded name/value pairs.
///
/// Names and values are percent-encoded with the unreserved set, then the
/// pairs are sorted by encoded name and, for duplicate names, encoded value.
/// Empty values are kept as `name=`.
///
/// # Examples
///
/// ```
/// use sigv4_auth::canonical::build_canonical_query_string;
///
/// assert_eq!(build_canonical_query_string(Vec::<(&str, &str)>::new()), "");
/// assert_eq!(
///     build_canonical_query_string([("b", "2"), ("a", "x/y"), ("c", "")]),
///     "a=x%2Fy&b=2&c="
/// );
/// ```
#[must_use]
pub fn build_canonical_query_string<'a>(params: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    join_canonical_query(
        params
            .into_iter()
            .map(|(k, v)| (uri_encode(k), uri_encode(v)))
            .collect(),
    )
}

/// Build the canonical headers block from the request headers.
///
/// Only headers listed in `signed_headers` are included. Header names are
/// lowercased, values are trimmed and inner whitespace runs collapsed to a
/// single space. Repeated headers are joined with commas in arrival order.
/// Every entry, including the last, ends with `\n`.
///
/// # Examples
///
/// ```
/// use sigv4_auth::canonical::build_canonical_headers;
///
/// let result = build_canonical_headers(
///     &[("X-Amz-Date", "20130524T000000Z"), ("Host", "example.com")],
///     &["x-amz-date", "host"],
/// );
/// assert_eq!(result, "host:example.com\nx-amz-date:20130524T000000Z\n");
/// ```
#[must_use]
pub fn build_canonical_headers(headers: &[(&str, &str)], signed_headers: &[&str]) -> String {
    let mut header_map: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let lower_name = name.to_lowercase();
        let trimmed_value = collapse_whitespace(value.trim());
        header_map
            .entry(lower_name)
            .and_modify(|existing| {
                existing.push(',');
                existing.push_str(&trimmed_value);
            })
            .or_insert(trimmed_value);
    }

    let mut sorted_signed: Vec<&str> = signed_headers.to_vec();
    sorted_signed.sort_unstable();
    sorted_signed.dedup();

    sorted_signed
        .iter()
        .filter_map(|name| {
            header_map
                .get(*name)
                .map(|value| format!("{name}:{value}\n"))
        })
        .collect()
}

/// Build the signed headers string as a semicolon-separated list of lowercase header names.
///
/// # Examples
///
/// ```
/// use sigv4_auth::canonical::build_signed_headers_string;
///
/// assert_eq!(
///     build_signed_headers_string(&["x-amz-date", "host"]),
///     "host;x-amz-date"
/// );
/// ```
#[must_use]
pub fn build_signed_headers_string(signed_headers: &[&str]) -> String {
    let mut sorted: Vec<&str> = signed_headers.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.join(";")
}

/// URI-encode a string using the AWS SigV4 encoding rules.
pub(crate) fn uri_encode(input: &str) -> String {
    utf8_percent_encode(input, URI_ENCODE_SET).to_string()
}

/// Decode one raw query component to bytes and re-encode it.
fn reencode_query_component(raw: &str) -> String {
    let plus_as_space: Vec<u8> = raw
        .bytes()
        .map(|b| if b == b'+' { b' ' } else { b })
        .collect();
    let decoded: Vec<u8> = percent_decode(&plus_as_space).collect();
    percent_encode(&decoded, URI_ENCODE_SET).to_string()
}

/// Collapse consecutive whitespace characters in a string to a single space.
fn collapse_whitespace(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut prev_was_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            result.push(ch);
            prev_was_space = false;
        }
    }
    result
}
