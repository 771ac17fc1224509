//! Memory Record - The Stored Unit of Memory
//!
//! `TigerStyle`: Explicit fields, validation, builder pattern.
//!
//! A record is addressed by `(layer, key)` where the key is caller-supplied.
//! Records carry their own access statistics so decay scoring can run
//! without a side table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::constants::{
    RECORD_DATA_BYTES_MAX, RECORD_IMPORTANCE_DEFAULT, RECORD_IMPORTANCE_MAX,
    RECORD_IMPORTANCE_MIN, RECORD_KEY_BYTES_MAX, RECORD_METADATA_BYTES_MAX,
    RECORD_METADATA_COUNT_MAX,
};
use crate::layer::MemoryLayer;

// =============================================================================
// Memory Record
// =============================================================================

/// A single memory stored in a layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Caller-supplied key, unique within a layer
    pub key: String,
    /// Layer this record lives in
    pub layer: MemoryLayer,
    /// Main content
    pub data: String,
    /// Additional metadata
    pub metadata: HashMap<String, String>,
    /// Embedding vector (for semantic recall)
    pub embedding: Option<Vec<f32>>,
    /// Base importance (0.0-1.0)
    pub importance: f64,
    /// Current relevance score, updated by decay sweeps
    pub relevance: f64,
    /// Creation timestamp (ms since epoch)
    pub created_at_ms: u64,
    /// Last update timestamp (ms since epoch)
    pub updated_at_ms: u64,
    /// Last access timestamp (ms since epoch)
    pub last_access_ms: u64,
    /// Total number of accesses
    pub access_count: u64,
}

impl MemoryRecord {
    /// Create a new record at the given time.
    ///
    /// # Panics
    /// Panics if key or data exceed limits.
    #[must_use]
    pub fn new(
        layer: MemoryLayer,
        key: impl Into<String>,
        data: impl Into<String>,
        now_ms: u64,
    ) -> Self {
        let key = key.into();
        let data = data.into();

        // Preconditions
        assert!(!key.is_empty(), "key must not be empty");
        assert!(
            key.len() <= RECORD_KEY_BYTES_MAX,
            "key {} bytes exceeds max {}",
            key.len(),
            RECORD_KEY_BYTES_MAX
        );
        assert!(
            data.len() <= RECORD_DATA_BYTES_MAX,
            "data {} bytes exceeds max {}",
            data.len(),
            RECORD_DATA_BYTES_MAX
        );

        Self {
            key,
            layer,
            data,
            metadata: HashMap::new(),
            embedding: None,
            importance: RECORD_IMPORTANCE_DEFAULT,
            relevance: 1.0,
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
            last_access_ms: now_ms,
            access_count: 0,
        }
    }

    /// Create a builder for more complex record construction.
    #[must_use]
    pub fn builder(
        layer: MemoryLayer,
        key: impl Into<String>,
        data: impl Into<String>,
    ) -> MemoryRecordBuilder {
        MemoryRecordBuilder::new(layer, key, data)
    }

    /// Approximate stored size in bytes (key + data + metadata).
    #[must_use]
    pub fn size_bytes(&self) -> usize {
        let metadata_bytes: usize = self
            .metadata
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum();
        self.key.len() + self.data.len() + metadata_bytes
    }

    /// Record an access at the given time (rejuvenation input).
    ///
    /// Bumps the access count and resets the recency basis, so decay
    /// scoring restarts from now.
    pub fn record_access(&mut self, now_ms: u64) {
        debug_assert!(
            now_ms >= self.last_access_ms,
            "access time must not go backwards"
        );

        self.last_access_ms = now_ms;
        self.access_count += 1;
    }

    /// Update content and timestamp.
    ///
    /// # Panics
    /// Panics if data exceeds the size limit.
    pub fn update_data(&mut self, data: String, now_ms: u64) {
        assert!(
            data.len() <= RECORD_DATA_BYTES_MAX,
            "data {} bytes exceeds max {}",
            data.len(),
            RECORD_DATA_BYTES_MAX
        );
        self.data = data;
        self.updated_at_ms = now_ms;
    }

    /// Get metadata value.
    #[must_use]
    pub fn get_metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    /// Check if the record has an embedding.
    #[must_use]
    pub fn has_embedding(&self) -> bool {
        self.embedding.is_some()
    }
}

// =============================================================================
// Record Builder
// =============================================================================

/// Builder for `MemoryRecord` with fluent API.
#[derive(Debug)]
pub struct MemoryRecordBuilder {
    layer: MemoryLayer,
    key: String,
    data: String,
    metadata: HashMap<String, String>,
    embedding: Option<Vec<f32>>,
    importance: f64,
    created_at_ms: Option<u64>,
}

impl MemoryRecordBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new(layer: MemoryLayer, key: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            layer,
            key: key.into(),
            data: data.into(),
            metadata: HashMap::new(),
            embedding: None,
            importance: RECORD_IMPORTANCE_DEFAULT,
            created_at_ms: None,
        }
    }

    /// Add metadata key-value pair.
    ///
    /// # Panics
    /// Panics if the key or value exceeds `RECORD_METADATA_BYTES_MAX`.
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        assert!(
            key.len() <= RECORD_METADATA_BYTES_MAX,
            "metadata key {} bytes exceeds max {}",
            key.len(),
            RECORD_METADATA_BYTES_MAX
        );
        assert!(
            value.len() <= RECORD_METADATA_BYTES_MAX,
            "metadata value {} bytes exceeds max {}",
            value.len(),
            RECORD_METADATA_BYTES_MAX
        );
        self.metadata.insert(key, value);
        self
    }

    /// Set embedding.
    #[must_use]
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Set importance.
    ///
    /// # Panics
    /// Panics if importance is outside [0, 1].
    #[must_use]
    pub fn with_importance(mut self, importance: f64) -> Self {
        assert!(
            (RECORD_IMPORTANCE_MIN..=RECORD_IMPORTANCE_MAX).contains(&importance),
            "importance must be {}-{}: got {}",
            RECORD_IMPORTANCE_MIN,
            RECORD_IMPORTANCE_MAX,
            importance
        );
        self.importance = importance;
        self
    }

    /// Set creation timestamp (for deterministic tests).
    #[must_use]
    pub fn with_created_at_ms(mut self, ms: u64) -> Self {
        self.created_at_ms = Some(ms);
        self
    }

    /// Build the record at the given time.
    ///
    /// # Panics
    /// Panics if key, data, or metadata exceed limits.
    #[must_use]
    pub fn build(self, now_ms: u64) -> MemoryRecord {
        // Preconditions
        assert!(
            self.metadata.len() <= RECORD_METADATA_COUNT_MAX,
            "metadata {} entries exceeds max {}",
            self.metadata.len(),
            RECORD_METADATA_COUNT_MAX
        );

        let created = self.created_at_ms.unwrap_or(now_ms);
        let mut record = MemoryRecord::new(self.layer, self.key, self.data, created);
        record.metadata = self.metadata;
        record.embedding = self.embedding;
        record.importance = self.importance;
        record.updated_at_ms = now_ms.max(created);
        record
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_new() {
        let record = MemoryRecord::new(
            MemoryLayer::Semantic,
            "paris_weather".to_string(),
            "Paris has a temperate climate".to_string(),
            1000,
        );

        assert_eq!(record.key, "paris_weather");
        assert_eq!(record.layer, MemoryLayer::Semantic);
        assert_eq!(record.created_at_ms, 1000);
        assert_eq!(record.access_count, 0);
        assert!((record.relevance - 1.0).abs() < f64::EPSILON);
        assert!(record.metadata.is_empty());
        assert!(!record.has_embedding());
    }

    #[test]
    fn test_record_builder() {
        let record = MemoryRecord::builder(
            MemoryLayer::Procedural,
            "weather_api".to_string(),
            "Connect, query, parse".to_string(),
        )
        .with_metadata("source", "runbook")
        .with_importance(0.8)
        .with_embedding(vec![0.1, 0.2, 0.3])
        .build(2000);

        assert_eq!(record.get_metadata("source"), Some("runbook"));
        assert!((record.importance - 0.8).abs() < f64::EPSILON);
        assert!(record.has_embedding());
        assert_eq!(record.created_at_ms, 2000);
    }

    #[test]
    fn test_builder_with_created_at() {
        let record = MemoryRecord::builder(
            MemoryLayer::Working,
            "task".to_string(),
            "content".to_string(),
        )
        .with_created_at_ms(500)
        .build(1500);

        assert_eq!(record.created_at_ms, 500);
        assert_eq!(record.updated_at_ms, 1500);
    }

    #[test]
    fn test_record_access() {
        let mut record = MemoryRecord::new(
            MemoryLayer::Ephemeral,
            "k".to_string(),
            "v".to_string(),
            1000,
        );

        record.record_access(2000);
        record.record_access(3000);

        assert_eq!(record.access_count, 2);
        assert_eq!(record.last_access_ms, 3000);
    }

    #[test]
    fn test_update_data() {
        let mut record = MemoryRecord::new(
            MemoryLayer::Semantic,
            "k".to_string(),
            "old".to_string(),
            1000,
        );

        record.update_data("new".to_string(), 2000);

        assert_eq!(record.data, "new");
        assert_eq!(record.updated_at_ms, 2000);
        assert_eq!(record.created_at_ms, 1000);
    }

    #[test]
    fn test_size_bytes() {
        let record = MemoryRecord::builder(
            MemoryLayer::Working,
            "ab".to_string(),
            "cdef".to_string(),
        )
        .with_metadata("k", "v")
        .build(0);

        assert_eq!(record.size_bytes(), 2 + 4 + 2);
    }

    #[test]
    #[should_panic(expected = "key must not be empty")]
    fn test_empty_key_panics() {
        let _ = MemoryRecord::new(MemoryLayer::Working, String::new(), "x".to_string(), 0);
    }

    #[test]
    #[should_panic(expected = "key")]
    fn test_key_too_long_panics() {
        let long_key = "x".repeat(crate::constants::RECORD_KEY_BYTES_MAX + 1);
        let _ = MemoryRecord::new(MemoryLayer::Working, long_key, "x".to_string(), 0);
    }

    #[test]
    #[should_panic(expected = "importance must be")]
    fn test_invalid_importance_panics() {
        let _ = MemoryRecord::builder(
            MemoryLayer::Working,
            "k".to_string(),
            "v".to_string(),
        )
        .with_importance(1.5);
    }
}
