//! Credential scope, timestamp and key lookup failures.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use http::HeaderValue;
    use sigv4_auth::{AuthError, RequestSigner, SignatureLocation, StaticCredentialProvider, Verifier};
    use sigv4_core::{CoreError, Credential, SigV4Config};

    use crate::{REGION, SERVICE, credential, json_request, signer, verifier};

    #[test]
    fn test_should_reject_other_region() -> anyhow::Result<()> {
        let mut req = json_request("{}")?;
        RequestSigner::new("us-west-2", SERVICE)?.sign(
            &mut req,
            &credential(),
            SignatureLocation::Headers,
        )?;

        let result = verifier(false)?.verify(&req);
        assert!(matches!(
            result,
            Err(AuthError::ScopeMismatch { region, .. }) if region == "us-west-2"
        ));
        Ok(())
    }

    #[test]
    fn test_should_reject_other_service() -> anyhow::Result<()> {
        let mut req = json_request("{}")?;
        RequestSigner::new(REGION, "admin_api")?.sign(
            &mut req,
            &credential(),
            SignatureLocation::Headers,
        )?;

        let result = verifier(false)?.verify(&req);
        assert!(matches!(
            result,
            Err(AuthError::ScopeMismatch { service, .. }) if service == "admin_api"
        ));
        Ok(())
    }

    #[test]
    fn test_should_reject_unknown_access_key() -> anyhow::Result<()> {
        let mut req = json_request("{}")?;
        signer().sign(
            &mut req,
            &Credential::new("venom", "symbiote")?,
            SignatureLocation::Headers,
        )?;

        let result = verifier(false)?.verify(&req);
        assert!(matches!(result, Err(AuthError::UnknownAccessKey(id)) if id == "venom"));
        Ok(())
    }

    #[test]
    fn test_should_reject_wrong_secret() -> anyhow::Result<()> {
        let mut req = json_request("{}")?;
        signer().sign(
            &mut req,
            &Credential::new("spiderman", "not-the-secret")?,
            SignatureLocation::Headers,
        )?;

        let result = verifier(false)?.verify(&req);
        assert!(matches!(result, Err(AuthError::SignatureMismatch)));
        Ok(())
    }

    #[test]
    fn test_should_reject_timestamp_from_other_day() -> anyhow::Result<()> {
        let mut req = json_request("{}")?;
        req.headers_mut()
            .insert("date", HeaderValue::from_static("Mon, 15 Jan 2024 10:00:00 GMT"));
        signer().sign(&mut req, &credential(), SignatureLocation::Headers)?;
        req.headers_mut()
            .insert("x-amz-date", HeaderValue::from_static("20240116T100000Z"));

        let result = verifier(false)?.verify(&req);
        assert!(matches!(result, Err(AuthError::TimestampScopeMismatch { .. })));
        Ok(())
    }

    #[test]
    fn test_should_reject_missing_timestamp() -> anyhow::Result<()> {
        let mut req = json_request("{}")?;
        signer().sign(&mut req, &credential(), SignatureLocation::Headers)?;
        req.headers_mut().remove("x-amz-date");

        let result = verifier(false)?.verify(&req);
        assert!(matches!(result, Err(AuthError::MissingTimestamp)));
        Ok(())
    }

    #[test]
    fn test_should_look_up_keys_through_closure() -> anyhow::Result<()> {
        let mut req = json_request("{}")?;
        signer().sign(&mut req, &credential(), SignatureLocation::Headers)?;

        let lookup = |id: &str| (id == "spiderman").then(|| "@C*u0NrTxs@Y89m#".to_owned());
        let verifier = Verifier::new(SigV4Config::new(REGION, SERVICE), Arc::new(lookup))?;
        verifier.verify(&req)?;
        Ok(())
    }

    #[test]
    fn test_should_reject_duplicate_provider_key() {
        let result = StaticCredentialProvider::default()
            .with_credential("spiderman", "a")
            .and_then(|p| p.with_credential("spiderman", "b"));
        assert!(matches!(result, Err(CoreError::DuplicateAccessKey(id)) if id == "spiderman"));
    }
}
