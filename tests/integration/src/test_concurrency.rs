//! One verifier shared across threads.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use sigv4_auth::{AuthError, SignatureLocation};

    use crate::{credential, json_request, signer, verifier};

    #[test]
    fn test_should_verify_from_many_threads() -> anyhow::Result<()> {
        let verifier = Arc::new(verifier(false)?);

        let mut requests = Vec::new();
        for i in 0..32 {
            let mut req = json_request(&format!(r#"{{"page":{i}}}"#))?;
            signer().sign(&mut req, &credential(), SignatureLocation::Headers)?;
            if i % 4 == 0 {
                *req.body_mut() = b"{}".to_vec();
            }
            requests.push(req);
        }

        thread::scope(|scope| {
            let handles: Vec<_> = requests
                .iter()
                .enumerate()
                .map(|(i, req)| {
                    let verifier = Arc::clone(&verifier);
                    scope.spawn(move || (i, verifier.verify(req)))
                })
                .collect();

            for handle in handles {
                let (i, result) = handle.join().expect("verification thread panicked");
                if i % 4 == 0 {
                    assert!(matches!(result, Err(AuthError::SignatureMismatch)));
                } else {
                    assert!(result.is_ok(), "request {i} should verify: {result:?}");
                }
            }
        });
        Ok(())
    }
}
