//! GatewayService unit tests.

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use rust_decimal_macros::dec;

    use gateway_store::{KeyStore, KeyStoreOptions, MemoryCache, RetryPolicy, cipher};
    use gateway_types::{
        CacheBackend, CacheError, ErrorKind, FunctionCode, GatewayError, TransactionRequest,
        TransactionResponse,
    };

    use crate::{GatewayService, ProcessingPolicy, TraceRegistry, TransactionProcessor};

    /// Cache that is always down.
    pub struct DownCache;

    #[async_trait]
    impl CacheBackend for DownCache {
        async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<(), CacheError> {
            Err(CacheError::Unavailable("connection refused".into()))
        }

        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
            Err(CacheError::Unavailable("connection refused".into()))
        }

        async fn delete(&self, _key: &str) -> Result<bool, CacheError> {
            Err(CacheError::Unavailable("connection refused".into()))
        }

        async fn exists(&self, _key: &str) -> Result<bool, CacheError> {
            Err(CacheError::Unavailable("connection refused".into()))
        }
    }

    fn build_service_with<B: CacheBackend>(backend: B, options: KeyStoreOptions) -> GatewayService<B> {
        let processor =
            TransactionProcessor::new(ProcessingPolicy::default(), Arc::new(TraceRegistry::default()));
        GatewayService::new(KeyStore::new(backend, options), processor)
    }

    fn build_service() -> GatewayService<Arc<MemoryCache>> {
        build_service_with(Arc::new(MemoryCache::new()), KeyStoreOptions::default())
    }

    pub fn sample_request(trace: &str) -> TransactionRequest {
        TransactionRequest {
            processing_code: "999000".into(),
            system_trace_nr: trace.into(),
            function_code: FunctionCode::Purchase,
            card_no: "4532015112830366".into(),
            card_holder: "Jane Doe".into(),
            amount_trxn: dec!(10.00),
            currency_code: "840".into(),
            expiry_date: "12/99".into(),
            cvv: "123".into(),
        }
    }

    fn seal(request: &TransactionRequest, key: &str) -> String {
        cipher::encrypt(&serde_json::to_vec(request).unwrap(), key).unwrap()
    }

    fn open(envelope: &str, key: &str) -> TransactionResponse {
        serde_json::from_slice(&cipher::decrypt(envelope, key).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_issue_key_stores_key() {
        let service = build_service();
        let issued = service.issue_key().await.unwrap();

        assert!(cipher::validate_key(&issued.key));
        assert!(
            service
                .key_store()
                .key_exists(&issued.key_identifier)
                .await
                .unwrap()
        );
        assert_eq!(
            service
                .key_store()
                .get_key(&issued.key_identifier)
                .await
                .unwrap()
                .as_deref(),
            Some(issued.key.as_str())
        );
    }

    #[tokio::test]
    async fn test_end_to_end_purchase_is_approved() {
        let service = build_service();
        let issued = service.issue_key().await.unwrap();

        let envelope = seal(&sample_request("123456"), &issued.key);
        let reply = service
            .submit(&issued.key_identifier, &envelope)
            .await
            .unwrap();

        let response = open(&reply, &issued.key);
        assert_eq!(response.response_code, "00");
        assert!(response.is_approved());
        assert_eq!(response.approval_code.len(), 6);
        assert!(response.approval_code.chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_key_is_single_use() {
        let service = build_service();
        let issued = service.issue_key().await.unwrap();

        let first = seal(&sample_request("100001"), &issued.key);
        service.submit(&issued.key_identifier, &first).await.unwrap();

        let second = seal(&sample_request("100002"), &issued.key);
        let err = service
            .submit(&issued.key_identifier, &second)
            .await
            .unwrap_err();
        assert_eq!(err, GatewayError::invalid_or_expired_key());
        assert_eq!(err.kind(), ErrorKind::Key);
    }

    #[tokio::test]
    async fn test_duplicate_trace_across_keys() {
        let service = build_service();

        let k1 = service.issue_key().await.unwrap();
        let reply = service
            .submit(&k1.key_identifier, &seal(&sample_request("555555"), &k1.key))
            .await;
        assert!(reply.is_ok());

        let k2 = service.issue_key().await.unwrap();
        let err = service
            .submit(&k2.key_identifier, &seal(&sample_request("555555"), &k2.key))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Duplicate);
    }

    #[tokio::test]
    async fn test_expired_key_is_rejected() {
        let options = KeyStoreOptions {
            default_ttl: Duration::from_millis(20),
            ..KeyStoreOptions::default()
        };
        let service = build_service_with(Arc::new(MemoryCache::new()), options);
        let issued = service.issue_key().await.unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;

        let err = service
            .submit(
                &issued.key_identifier,
                &seal(&sample_request("200000"), &issued.key),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Key);
    }

    #[tokio::test]
    async fn test_unknown_and_malformed_identifiers() {
        let service = build_service();
        let key = cipher::generate_key().unwrap();
        let envelope = seal(&sample_request("300000"), &key);

        let unknown = service
            .submit("0f8fad5b-d9cb-469f-a165-70867728950e", &envelope)
            .await
            .unwrap_err();
        assert_eq!(unknown.kind(), ErrorKind::Key);

        let malformed = service.submit("not-a-uuid", &envelope).await.unwrap_err();
        assert_eq!(malformed, GatewayError::invalid_or_expired_key());
    }

    #[tokio::test]
    async fn test_validation_failure_lists_rules_and_consumes_key() {
        let service = build_service();
        let issued = service.issue_key().await.unwrap();

        let mut request = sample_request("400000");
        request.card_no = "4532015112830367".into();
        request.cvv = "12".into();

        let err = service
            .submit(&issued.key_identifier, &seal(&request, &issued.key))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GatewayError::Validation(vec![
                "Invalid card number".into(),
                "Invalid CVV".into(),
            ])
        );
        assert!(
            !service
                .key_store()
                .key_exists(&issued.key_identifier)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_sub_cent_amount_is_rejected() {
        let service = build_service();

        for (trace, amount) in [("400001", dec!(10.005)), ("400002", dec!(0.001))] {
            let issued = service.issue_key().await.unwrap();
            let mut request = sample_request(trace);
            request.amount_trxn = amount;

            let err = service
                .submit(&issued.key_identifier, &seal(&request, &issued.key))
                .await
                .unwrap_err();
            assert_eq!(
                err,
                GatewayError::Validation(vec![
                    "Amount must have at most two decimal places".into()
                ])
            );
        }
    }

    #[tokio::test]
    async fn test_garbage_envelope_is_codec_error_and_consumes_key() {
        let service = build_service();
        let issued = service.issue_key().await.unwrap();

        let err = service
            .submit(&issued.key_identifier, "bm90IGVuY3J5cHRlZA==")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Codec);
        assert!(
            !service
                .key_store()
                .key_exists(&issued.key_identifier)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_non_json_plaintext_is_codec_error() {
        let service = build_service();
        let issued = service.issue_key().await.unwrap();
        let envelope = cipher::encrypt(b"definitely not json", &issued.key).unwrap();

        let err = service
            .submit(&issued.key_identifier, &envelope)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Codec);
    }

    #[tokio::test]
    async fn test_unavailable_store_surfaces_store_error() {
        let options = KeyStoreOptions {
            retry: RetryPolicy::new(1, Duration::from_millis(1)),
            ..KeyStoreOptions::default()
        };
        let service = build_service_with(DownCache, options);

        let err = service.issue_key().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StoreUnavailable);
    }
}
