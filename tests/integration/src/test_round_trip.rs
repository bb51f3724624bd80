//! Requests signed by this crate verify with this crate.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::{TimeZone, Utc};
    use sigv4_auth::{AuthError, AuthorizationSource, SignatureLocation, sign_request};

    use crate::{ACCESS_KEY, REGION, SERVICE, credential, json_request, signer, verifier};

    #[test]
    fn test_should_verify_header_signed_request() -> anyhow::Result<()> {
        let mut req = json_request(r#"{"action":"query","limit":10}"#)?;
        let signed = signer().sign(&mut req, &credential(), SignatureLocation::Headers)?;

        let (auth, trace) = verifier(false)?.verify(&req)?;
        assert_eq!(auth.access_key_id, ACCESS_KEY);
        assert_eq!(auth.source, AuthorizationSource::Header);
        assert_eq!(trace.signature(), signed.signature());
        assert_eq!(trace.canonical_request(), signed.canonical_request());
        Ok(())
    }

    #[test]
    fn test_should_reject_request_before_signing() -> anyhow::Result<()> {
        let req = json_request(r#"{"action":"query"}"#)?;
        let result = verifier(false)?.verify(&req);
        assert!(matches!(result, Err(AuthError::MalformedAuthorization(_))));
        Ok(())
    }

    #[test]
    fn test_should_verify_presigned_request() -> anyhow::Result<()> {
        let mut req = http::Request::get("http://localhost:9527/app?user=peter%20parker&page=2")
            .body(Vec::new())?;
        signer().sign(
            &mut req,
            &credential(),
            SignatureLocation::QueryString { expires_in: None },
        )?;

        assert!(!req.headers().contains_key("authorization"));
        let (auth, _) = verifier(false)?.verify(&req)?;
        assert_eq!(auth.source, AuthorizationSource::QueryString);
        assert!(auth.contains_signed_header("host"));
        Ok(())
    }

    #[test]
    fn test_should_verify_presigned_request_within_window() -> anyhow::Result<()> {
        let signed_at = Utc.with_ymd_and_hms(2024, 1, 15, 23, 59, 0).unwrap();
        let mut req = http::Request::get("http://localhost:9527/app").body(Vec::new())?;
        signer().with_time(signed_at).sign(
            &mut req,
            &credential(),
            SignatureLocation::QueryString {
                expires_in: Some(Duration::from_secs(120)),
            },
        )?;

        let verifier = verifier(true)?;
        let later = Utc.with_ymd_and_hms(2024, 1, 16, 0, 0, 30).unwrap();
        assert!(verifier.verify_at(&req, later).is_ok());

        let too_late = Utc.with_ymd_and_hms(2024, 1, 16, 0, 1, 1).unwrap();
        assert!(matches!(
            verifier.verify_at(&req, too_late),
            Err(AuthError::RequestExpired)
        ));
        Ok(())
    }

    #[test]
    fn test_should_sign_with_date_header_time() -> anyhow::Result<()> {
        let mut req = json_request("{}")?;
        req.headers_mut()
            .insert("date", http::HeaderValue::from_static("Mon, 15 Jan 2024 10:00:00 GMT"));
        signer().sign(&mut req, &credential(), SignatureLocation::Headers)?;

        assert_eq!(
            req.headers().get("x-amz-date").map(http::HeaderValue::as_bytes),
            Some(b"20240115T100000Z".as_slice())
        );
        let (auth, _) = verifier(false)?.verify(&req)?;
        assert_eq!(auth.credential_date(), "20240115");
        assert!(auth.contains_signed_header("date"));
        Ok(())
    }

    #[test]
    fn test_should_verify_after_re_signing() -> anyhow::Result<()> {
        let mut req = json_request(r#"{"n":1}"#)?;
        let signer = signer();
        signer.sign(&mut req, &credential(), SignatureLocation::Headers)?;
        *req.body_mut() = br#"{"n":2}"#.to_vec();
        signer.sign(&mut req, &credential(), SignatureLocation::Headers)?;

        let (auth, _) = verifier(false)?.verify(&req)?;
        assert!(!auth.contains_signed_header("authorization"));
        Ok(())
    }

    #[test]
    fn test_should_sign_with_free_function() -> anyhow::Result<()> {
        let mut req = http::Request::put("http://localhost:9527/app/items/42")
            .header("content-type", "text/plain")
            .header("x-trace-id", "abc")
            .header("x-trace-id", "def")
            .body(b"hello".to_vec())?;
        sign_request(&mut req, &credential(), REGION, SERVICE, SignatureLocation::Headers)?;

        let (auth, trace) = verifier(false)?.verify(&req)?;
        assert!(auth.contains_signed_header("x-trace-id"));
        assert!(trace.canonical_request().contains("\nx-trace-id:abc,def\n"));
        Ok(())
    }

    #[test]
    fn test_should_accept_empty_and_large_bodies() -> anyhow::Result<()> {
        for body in [Vec::new(), vec![b'x'; 1 << 20]] {
            let mut req = http::Request::post("http://localhost:9527/app").body(body)?;
            signer().sign(&mut req, &credential(), SignatureLocation::Headers)?;
            verifier(false)?.verify(&req)?;
        }
        Ok(())
    }
}
