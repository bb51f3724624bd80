//! Any change to a signed component invalidates the signature.

#[cfg(test)]
mod tests {
    use http::{HeaderValue, Method, Request};
    use sigv4_auth::{AuthError, SignatureLocation};

    use crate::{credential, json_request, signer, verifier};

    fn signed() -> anyhow::Result<Request<Vec<u8>>> {
        let mut req = json_request(r#"{"action":"query","limit":10}"#)?;
        signer().sign(&mut req, &credential(), SignatureLocation::Headers)?;
        Ok(req)
    }

    fn presigned() -> anyhow::Result<Request<Vec<u8>>> {
        let mut req = Request::get("http://localhost:9527/app?limit=10").body(Vec::new())?;
        signer().sign(
            &mut req,
            &credential(),
            SignatureLocation::QueryString { expires_in: None },
        )?;
        Ok(req)
    }

    fn assert_mismatch(req: &Request<Vec<u8>>) -> anyhow::Result<()> {
        let result = verifier(false)?.verify(req);
        assert!(
            matches!(result, Err(AuthError::SignatureMismatch)),
            "expected signature mismatch, got {result:?}"
        );
        Ok(())
    }

    #[test]
    fn test_should_reject_changed_body() -> anyhow::Result<()> {
        let mut req = signed()?;
        *req.body_mut() = br#"{"action":"query","limit":11}"#.to_vec();
        assert_mismatch(&req)
    }

    #[test]
    fn test_should_reject_changed_method() -> anyhow::Result<()> {
        let mut req = signed()?;
        *req.method_mut() = Method::PUT;
        assert_mismatch(&req)
    }

    #[test]
    fn test_should_reject_changed_path() -> anyhow::Result<()> {
        let mut req = signed()?;
        *req.uri_mut() = "http://localhost:9527/admin".parse()?;
        assert_mismatch(&req)
    }

    #[test]
    fn test_should_reject_changed_signed_header() -> anyhow::Result<()> {
        let mut req = signed()?;
        req.headers_mut()
            .insert("content-type", HeaderValue::from_static("text/plain"));
        assert_mismatch(&req)
    }

    #[test]
    fn test_should_ignore_added_unsigned_header() -> anyhow::Result<()> {
        let mut req = signed()?;
        req.headers_mut()
            .insert("x-forwarded-for", HeaderValue::from_static("10.0.0.1"));
        verifier(false)?.verify(&req)?;
        Ok(())
    }

    #[test]
    fn test_should_reject_changed_signature() -> anyhow::Result<()> {
        let mut req = signed()?;
        let value = req
            .headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| {
                let (head, signature) = v.rsplit_once('=').unwrap_or((v, ""));
                let flipped: String = signature
                    .chars()
                    .rev()
                    .collect();
                format!("{head}={flipped}")
            })
            .ok_or_else(|| anyhow::anyhow!("missing authorization header"))?;
        req.headers_mut()
            .insert("authorization", HeaderValue::from_str(&value)?);
        assert_mismatch(&req)
    }

    #[test]
    fn test_should_reject_changed_presigned_query() -> anyhow::Result<()> {
        let mut req = presigned()?;
        let uri = req.uri().to_string().replace("limit=10", "limit=1000");
        *req.uri_mut() = uri.parse()?;
        assert_mismatch(&req)
    }

    #[test]
    fn test_should_reject_query_added_after_presigning() -> anyhow::Result<()> {
        let mut req = presigned()?;
        let uri = format!("{}&admin=true", req.uri());
        *req.uri_mut() = uri.parse()?;
        assert_mismatch(&req)
    }

    #[test]
    fn test_should_reject_swapped_non_utf8_query_escape() -> anyhow::Result<()> {
        let mut req = Request::get("http://localhost:9527/app?k=%FF").body(Vec::new())?;
        signer().sign(
            &mut req,
            &credential(),
            SignatureLocation::QueryString { expires_in: None },
        )?;
        let signed = req.uri().to_string();
        assert!(signed.contains("k=%FF"));
        verifier(false)?.verify(&req)?;

        for replacement in ["k=%FE", "k=%C0", "k=%EF%BF%BD"] {
            *req.uri_mut() = signed.replace("k=%FF", replacement).parse()?;
            assert_mismatch(&req)?;
        }
        Ok(())
    }

    #[test]
    fn test_should_reject_swapped_non_utf8_path_escape() -> anyhow::Result<()> {
        let mut req = Request::get("http://localhost:9527/a%FF?x=%FF").body(Vec::new())?;
        signer().sign(&mut req, &credential(), SignatureLocation::Headers)?;
        verifier(false)?.verify(&req)?;

        *req.uri_mut() = "http://localhost:9527/a%FE?x=%FF".parse()?;
        assert_mismatch(&req)?;

        *req.uri_mut() = "http://localhost:9527/a%FF?x=%C0".parse()?;
        assert_mismatch(&req)
    }

    #[test]
    fn test_should_reject_presigned_url_on_other_host() -> anyhow::Result<()> {
        let mut req = presigned()?;
        req.headers_mut().remove("host");
        let uri = req.uri().to_string().replace("localhost:9527", "evil.example:9527");
        *req.uri_mut() = uri.parse()?;
        assert_mismatch(&req)
    }
}
