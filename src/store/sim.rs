//! Simulated Memory Store (DST)
//!
//! In-memory store with deterministic ordering and fault injection for
//! deterministic simulation testing.
//!
//! `TigerStyle`: Deterministic, controllable, observable.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::constants::{LAYER_RECORDS_COUNT_MAX, LAYER_SIZE_BYTES_MAX};
use crate::dst::FaultInjector;
use crate::layer::MemoryLayer;
use crate::record::MemoryRecord;
use crate::store::error::{StoreError, StoreResult};
use crate::store::MemoryStore;

/// In-memory store for deterministic simulation testing.
///
/// Records live in a `BTreeMap` keyed by `(layer, key)` so scans and
/// searches always come back in the same order. Cloning shares the
/// underlying map.
#[derive(Clone)]
pub struct SimMemoryStore {
    records: Arc<RwLock<BTreeMap<(MemoryLayer, String), MemoryRecord>>>,
    fault_injector: Option<Arc<FaultInjector>>,
}

impl SimMemoryStore {
    /// Create an empty simulated store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(BTreeMap::new())),
            fault_injector: None,
        }
    }

    /// Create a store with fault injection.
    #[must_use]
    pub fn with_fault_injector(injector: Arc<FaultInjector>) -> Self {
        Self {
            records: Arc::new(RwLock::new(BTreeMap::new())),
            fault_injector: Some(injector),
        }
    }

    /// Check fault injection for an operation.
    ///
    /// Operation names are `store_write`, `store_read`, `store_delete` and
    /// `store_scan`, so `FaultConfig::with_filter` can target a single one.
    fn check_fault(&self, operation: &str) -> StoreResult<()> {
        if let Some(injector) = &self.fault_injector {
            if let Some(fault_type) = injector.should_inject(operation) {
                return Err(StoreError::simulated_fault(fault_type.as_str()));
            }
        }
        Ok(())
    }

    fn layer_usage(
        records: &BTreeMap<(MemoryLayer, String), MemoryRecord>,
        layer: MemoryLayer,
    ) -> (usize, usize) {
        let mut count = 0;
        let mut bytes = 0;
        for ((record_layer, _), record) in records {
            if *record_layer == layer {
                count += 1;
                bytes += record.size_bytes();
            }
        }
        (count, bytes)
    }
}

impl Default for SimMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemoryStore for SimMemoryStore {
    async fn put(&self, record: MemoryRecord) -> StoreResult<()> {
        assert!(!record.key.is_empty(), "record key must not be empty");

        self.check_fault("store_write")?;

        let mut records = self.records.write().await;
        let slot = (record.layer, record.key.clone());
        let replacing = records.contains_key(&slot);

        if !replacing {
            let (count, bytes) = Self::layer_usage(&records, record.layer);
            if count >= LAYER_RECORDS_COUNT_MAX {
                return Err(StoreError::capacity(
                    record.layer,
                    count,
                    LAYER_RECORDS_COUNT_MAX,
                    "records",
                ));
            }
            if bytes + record.size_bytes() > LAYER_SIZE_BYTES_MAX {
                return Err(StoreError::capacity(
                    record.layer,
                    bytes + record.size_bytes(),
                    LAYER_SIZE_BYTES_MAX,
                    "bytes",
                ));
            }
        }

        records.insert(slot, record);
        Ok(())
    }

    async fn get(&self, layer: MemoryLayer, key: &str) -> StoreResult<MemoryRecord> {
        assert!(!key.is_empty(), "key must not be empty");

        self.check_fault("store_read")?;

        let records = self.records.read().await;
        records
            .get(&(layer, key.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::not_found(layer, key))
    }

    async fn delete(&self, layer: MemoryLayer, key: &str) -> StoreResult<bool> {
        assert!(!key.is_empty(), "key must not be empty");

        self.check_fault("store_delete")?;

        let mut records = self.records.write().await;
        Ok(records.remove(&(layer, key.to_string())).is_some())
    }

    async fn scan_layer(&self, layer: MemoryLayer) -> StoreResult<Vec<MemoryRecord>> {
        self.check_fault("store_scan")?;

        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|((record_layer, _), _)| *record_layer == layer)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn keyword_search(
        &self,
        query: &str,
        layer: Option<MemoryLayer>,
    ) -> StoreResult<Vec<MemoryRecord>> {
        self.check_fault("store_scan")?;

        let needle = query.to_lowercase();
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|((record_layer, _), _)| layer.map_or(true, |l| l == *record_layer))
            .filter(|((_, key), record)| {
                key.to_lowercase().contains(&needle)
                    || record.data.to_lowercase().contains(&needle)
            })
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn count(&self, layer: Option<MemoryLayer>) -> StoreResult<usize> {
        let records = self.records.read().await;
        Ok(records
            .keys()
            .filter(|(record_layer, _)| layer.map_or(true, |l| l == *record_layer))
            .count())
    }

    async fn total_bytes(&self, layer: Option<MemoryLayer>) -> StoreResult<usize> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|((record_layer, _), _)| layer.map_or(true, |l| l == *record_layer))
            .map(|(_, record)| record.size_bytes())
            .sum())
    }

    async fn clear(&self) -> StoreResult<usize> {
        let mut records = self.records.write().await;
        let removed = records.len();
        records.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dst::{DeterministicRng, FaultConfig, FaultType};

    fn record(layer: MemoryLayer, key: &str, data: &str) -> MemoryRecord {
        MemoryRecord::new(layer, key, data, 1_000)
    }

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let store = SimMemoryStore::new();
        store
            .put(record(MemoryLayer::Semantic, "rust", "Rust is memory safe"))
            .await
            .unwrap();

        let fetched = store.get(MemoryLayer::Semantic, "rust").await.unwrap();
        assert_eq!(fetched.key, "rust");
        assert_eq!(fetched.data, "Rust is memory safe");
    }

    #[tokio::test]
    async fn test_get_missing_returns_not_found() {
        let store = SimMemoryStore::new();
        let err = store.get(MemoryLayer::Working, "missing").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_put_upserts() {
        let store = SimMemoryStore::new();
        store
            .put(record(MemoryLayer::Working, "task", "draft outline"))
            .await
            .unwrap();
        store
            .put(record(MemoryLayer::Working, "task", "review outline"))
            .await
            .unwrap();

        assert_eq!(store.count(None).await.unwrap(), 1);
        let fetched = store.get(MemoryLayer::Working, "task").await.unwrap();
        assert_eq!(fetched.data, "review outline");
    }

    #[tokio::test]
    async fn test_layers_are_isolated() {
        let store = SimMemoryStore::new();
        store
            .put(record(MemoryLayer::Working, "note", "working copy"))
            .await
            .unwrap();
        store
            .put(record(MemoryLayer::Semantic, "note", "semantic copy"))
            .await
            .unwrap();

        assert_eq!(store.count(Some(MemoryLayer::Working)).await.unwrap(), 1);
        assert_eq!(store.count(Some(MemoryLayer::Semantic)).await.unwrap(), 1);
        assert!(store.get(MemoryLayer::Ephemeral, "note").await.is_err());
    }

    #[tokio::test]
    async fn test_delete() {
        let store = SimMemoryStore::new();
        store
            .put(record(MemoryLayer::Ephemeral, "tmp", "scratch"))
            .await
            .unwrap();

        assert!(store.delete(MemoryLayer::Ephemeral, "tmp").await.unwrap());
        assert!(!store.delete(MemoryLayer::Ephemeral, "tmp").await.unwrap());
        assert_eq!(store.count(None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_scan_layer_ordered_by_key() {
        let store = SimMemoryStore::new();
        for key in ["charlie", "alpha", "bravo"] {
            store
                .put(record(MemoryLayer::Semantic, key, "data"))
                .await
                .unwrap();
        }

        let scanned = store.scan_layer(MemoryLayer::Semantic).await.unwrap();
        let keys: Vec<&str> = scanned.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["alpha", "bravo", "charlie"]);
    }

    #[tokio::test]
    async fn test_keyword_search_matches_key_and_data() {
        let store = SimMemoryStore::new();
        store
            .put(record(MemoryLayer::Semantic, "rust_lang", "systems language"))
            .await
            .unwrap();
        store
            .put(record(MemoryLayer::Semantic, "python", "Rust bindings exist"))
            .await
            .unwrap();
        store
            .put(record(MemoryLayer::Semantic, "go", "garbage collected"))
            .await
            .unwrap();

        let results = store.keyword_search("rust", None).await.unwrap();
        assert_eq!(results.len(), 2);

        let results = store.keyword_search("RUST", None).await.unwrap();
        assert_eq!(results.len(), 2, "search is case-insensitive");
    }

    #[tokio::test]
    async fn test_keyword_search_respects_layer_filter() {
        let store = SimMemoryStore::new();
        store
            .put(record(MemoryLayer::Working, "draft", "rust notes"))
            .await
            .unwrap();
        store
            .put(record(MemoryLayer::Semantic, "fact", "rust facts"))
            .await
            .unwrap();

        let results = store
            .keyword_search("rust", Some(MemoryLayer::Semantic))
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].key, "fact");
    }

    #[tokio::test]
    async fn test_total_bytes_tracks_payload() {
        let store = SimMemoryStore::new();
        store
            .put(record(MemoryLayer::Working, "a", "12345"))
            .await
            .unwrap();

        let bytes = store.total_bytes(None).await.unwrap();
        assert_eq!(bytes, "a".len() + "12345".len());
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let store = SimMemoryStore::new();
        store
            .put(record(MemoryLayer::Working, "a", "1"))
            .await
            .unwrap();
        store
            .put(record(MemoryLayer::Semantic, "b", "2"))
            .await
            .unwrap();

        assert_eq!(store.clear().await.unwrap(), 2);
        assert_eq!(store.count(None).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_clone_shares_state() {
        let store = SimMemoryStore::new();
        let clone = store.clone();

        store
            .put(record(MemoryLayer::Semantic, "shared", "visible to clones"))
            .await
            .unwrap();

        assert!(clone.get(MemoryLayer::Semantic, "shared").await.is_ok());
    }

    #[tokio::test]
    async fn test_fault_injection_on_write() {
        let mut injector = FaultInjector::new(DeterministicRng::new(42));
        injector.register(FaultConfig::new(FaultType::StoreWriteFail, 1.0).with_filter("write"));
        let store = SimMemoryStore::with_fault_injector(Arc::new(injector));

        let err = store
            .put(record(MemoryLayer::Working, "doomed", "never lands"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::SimulatedFault { .. }));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_fault_injection_respects_max_injections() {
        let mut injector = FaultInjector::new(DeterministicRng::new(42));
        injector.register(
            FaultConfig::new(FaultType::StoreReadFail, 1.0)
                .with_filter("read")
                .with_max_injections(1),
        );
        let store = SimMemoryStore::with_fault_injector(Arc::new(injector));

        store
            .put(record(MemoryLayer::Working, "k", "v"))
            .await
            .unwrap();

        assert!(store.get(MemoryLayer::Working, "k").await.is_err());
        assert!(store.get(MemoryLayer::Working, "k").await.is_ok());
    }
}
