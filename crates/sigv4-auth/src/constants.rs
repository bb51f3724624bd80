//! Header names, query parameter names, and formats fixed by the protocol.

/// The only supported signing algorithm.
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// `date` header (IMF-fixdate on the signing side).
pub const HEADER_DATE: &str = "date";
/// `x-amz-date` header carrying the basic ISO 8601 timestamp.
pub const HEADER_X_AMZ_DATE: &str = "x-amz-date";
/// `authorization` header.
pub const HEADER_AUTHORIZATION: &str = "authorization";
/// `host` header.
pub const HEADER_HOST: &str = "host";

/// Presigned signature parameter.
pub const QUERY_SIGNATURE: &str = "X-Amz-Signature";
/// Presigned algorithm parameter.
pub const QUERY_ALGORITHM: &str = "X-Amz-Algorithm";
/// Presigned credential parameter.
pub const QUERY_CREDENTIAL: &str = "X-Amz-Credential";
/// Presigned timestamp parameter.
pub const QUERY_DATE: &str = "X-Amz-Date";
/// Presigned signed-headers parameter.
pub const QUERY_SIGNED_HEADERS: &str = "X-Amz-SignedHeaders";
/// Presigned validity window in seconds.
pub const QUERY_EXPIRES: &str = "X-Amz-Expires";

/// Basic ISO 8601 timestamp, e.g. `20150830T123600Z`.
pub const ISO8601_BASIC_FORMAT: &str = "%Y%m%dT%H%M%SZ";
/// HTTP `Date` header format, e.g. `Sun, 30 Aug 2015 12:36:00 GMT`.
pub const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";
