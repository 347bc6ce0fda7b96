//! Integration tests for the verification service through its public API

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pv_core::errors::StoreError;
use pv_core::services::{
    VerificationService, VerificationServiceConfig, VerificationStore, VerifyOutcome,
};
use pv_core::VerificationRecord;

/// Minimal store, the way an embedding application would supply one
#[derive(Default)]
struct MapStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

#[async_trait]
impl VerificationStore for MapStore {
    async fn set(&self, key: &str, value: &[u8], _ttl_seconds: u64) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set_if_absent(
        &self,
        key: &str,
        value: &[u8],
        _ttl_seconds: u64,
    ) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        if entries.contains_key(key) {
            return Ok(false);
        }
        entries.insert(key.to_string(), value.to_vec());
        Ok(true)
    }

    async fn compare_and_set(
        &self,
        key: &str,
        expected: &[u8],
        value: &[u8],
    ) -> Result<bool, StoreError> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get_mut(key) {
            Some(current) if current.as_slice() == expected => {
                *current = value.to_vec();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[tokio::test]
async fn test_service_over_trait_object() {
    let store: Arc<dyn VerificationStore> = Arc::new(MapStore::default());
    let service = VerificationService::new(store.clone(), VerificationServiceConfig::default());

    let record = service.issue("+15550001111").await.unwrap();

    let stored = store.get(&record.request_id).await.unwrap().unwrap();
    assert_eq!(VerificationRecord::from_bytes(&stored).unwrap(), record);

    let outcome = service.verify(&record.request_id, record.code).await.unwrap();
    assert!(outcome.is_accepted());
}

#[tokio::test]
async fn test_records_survive_a_new_service_instance() {
    let store = Arc::new(MapStore::default());

    let record = VerificationService::new(store.clone(), VerificationServiceConfig::default())
        .issue("+15550001111")
        .await
        .unwrap();

    let restarted = VerificationService::new(store, VerificationServiceConfig::default());
    let outcome = restarted
        .verify(&record.request_id, record.code)
        .await
        .unwrap();

    assert!(matches!(outcome, VerifyOutcome::Accepted { .. }));
}

#[tokio::test]
async fn test_record_written_by_older_deployment_verifies() {
    let store = Arc::new(MapStore::default());
    let created = chrono::Utc::now().timestamp_millis();
    let legacy = format!(
        r#"{{"RequestId":"abcdefgh-ijkl-mnop-qrst-uvwxyz012345","Code":4821,"Number":"+15550001111","Count":2,"CreationTime":{}}}"#,
        created
    );
    store
        .set("abcdefgh-ijkl-mnop-qrst-uvwxyz012345", legacy.as_bytes(), 0)
        .await
        .unwrap();
    let service = VerificationService::new(store, VerificationServiceConfig::default());

    let outcome = service
        .verify("abcdefgh-ijkl-mnop-qrst-uvwxyz012345", 4821)
        .await
        .unwrap();
    assert!(outcome.is_accepted());

    // Count was 2, so this is the fourth attempt
    let outcome = service
        .verify("abcdefgh-ijkl-mnop-qrst-uvwxyz012345", 4821)
        .await
        .unwrap();
    assert_eq!(outcome, VerifyOutcome::AttemptsExceeded);
}
