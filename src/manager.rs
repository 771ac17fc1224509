//! Memory Manager
//!
//! The top-level entry point tying layers, storage, embeddings, decay
//! and reflection together behind one lifecycle-managed facade.
//!
//! `TigerStyle`: Explicit lifecycle, graceful degradation, observable.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::config::MemoryConfig;
use crate::constants::{
    RECORD_DATA_BYTES_MAX, RECORD_IMPORTANCE_MAX, RECORD_IMPORTANCE_MIN, RECORD_KEY_BYTES_MAX,
};
use crate::decay::{self, PruneReport};
use crate::dst::SimClock;
use crate::embedding::{EmbeddingProvider, SimEmbeddingProvider};
use crate::layer::MemoryLayer;
use crate::recall::{self, RecallError, RecallOptions, RecallResult};
use crate::record::MemoryRecord;
use crate::reflection::{self, ReflectionReport};
use crate::store::{MemoryStore, SimMemoryStore, StoreError};

// =============================================================================
// Errors
// =============================================================================

/// Errors from memory manager operations.
#[derive(Debug, Error)]
pub enum MemoryError {
    /// Operation attempted before `initialize`
    #[error("memory manager not initialized")]
    NotInitialized,

    /// Invalid input
    #[error("validation error: {message}")]
    Validation {
        /// What was invalid
        message: String,
    },

    /// Store operation failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Recall operation failed
    #[error("recall error: {0}")]
    Recall(#[from] RecallError),
}

impl MemoryError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Check if this error is transient (can be retried).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Store(e) => e.is_transient(),
            Self::Recall(RecallError::Store(e)) => e.is_transient(),
            _ => false,
        }
    }
}

/// Result type for memory manager operations.
pub type MemoryResult<T> = Result<T, MemoryError>;

// =============================================================================
// Health
// =============================================================================

/// Health of a single layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerHealth {
    /// The layer
    pub layer: MemoryLayer,
    /// Number of records
    pub records: usize,
    /// Payload bytes held
    pub bytes: usize,
}

/// Overall health of the memory manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Whether `initialize` has run
    pub initialized: bool,
    /// Whether the store answered the probe
    pub store_ok: bool,
    /// Records across all layers
    pub total_records: usize,
    /// Payload bytes across all layers
    pub total_bytes: usize,
    /// Per-layer breakdown
    pub layers: Vec<LayerHealth>,
}

impl HealthStatus {
    /// Check if the manager is fully operational.
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.initialized && self.store_ok
    }
}

// =============================================================================
// Time Source
// =============================================================================

/// Where the manager reads time from.
#[derive(Clone)]
enum TimeSource {
    /// Wall clock
    System,
    /// Simulated clock for deterministic tests
    Sim(SimClock),
}

impl TimeSource {
    fn now_ms(&self) -> u64 {
        match self {
            Self::System => {
                let millis = Utc::now().timestamp_millis();
                debug_assert!(millis >= 0, "system clock before epoch");
                #[allow(clippy::cast_sign_loss)]
                let ms = millis as u64;
                ms
            }
            Self::Sim(clock) => clock.now_ms(),
        }
    }
}

// =============================================================================
// Memory Manager
// =============================================================================

/// Lifecycle-managed memory over a store and an optional embedder.
///
/// Operations other than `health_check` require `initialize` first.
pub struct MemoryManager<S: MemoryStore, E: EmbeddingProvider> {
    store: S,
    embedder: Option<E>,
    config: MemoryConfig,
    time: TimeSource,
    initialized: bool,
}

impl MemoryManager<SimMemoryStore, SimEmbeddingProvider> {
    /// Create a fully simulated manager for deterministic testing.
    ///
    /// Returns the manager and the clock that drives it.
    #[must_use]
    pub fn sim(seed: u64) -> (Self, SimClock) {
        let clock = SimClock::new();
        let manager = Self {
            store: SimMemoryStore::new(),
            embedder: Some(SimEmbeddingProvider::new(seed)),
            config: MemoryConfig::new(),
            time: TimeSource::Sim(clock.clone()),
            initialized: false,
        };
        (manager, clock)
    }

    /// Create a simulated manager with explicit parts.
    #[must_use]
    pub fn sim_with(
        store: SimMemoryStore,
        embedder: Option<SimEmbeddingProvider>,
        config: MemoryConfig,
        clock: SimClock,
    ) -> Self {
        Self {
            store,
            embedder,
            config,
            time: TimeSource::Sim(clock),
            initialized: false,
        }
    }
}

impl<S: MemoryStore, E: EmbeddingProvider> MemoryManager<S, E> {
    /// Create a manager over a store and embedder using the wall clock.
    #[must_use]
    pub fn new(store: S, embedder: Option<E>, config: MemoryConfig) -> Self {
        Self {
            store,
            embedder,
            config,
            time: TimeSource::System,
            initialized: false,
        }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Prepare the manager for use.
    ///
    /// Probes the store so misconfiguration surfaces here instead of on
    /// the first write. Calling `initialize` twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a store error if the probe fails.
    #[instrument(skip(self))]
    pub async fn initialize(&mut self) -> MemoryResult<()> {
        if self.initialized {
            return Ok(());
        }

        let records = self.store.count(None).await?;
        self.initialized = true;
        info!(records, "memory manager initialized");
        Ok(())
    }

    /// Release the manager.
    ///
    /// After shutdown every operation except `health_check` fails with
    /// `MemoryError::NotInitialized` until `initialize` runs again.
    #[instrument(skip(self))]
    pub async fn shutdown(&mut self) -> MemoryResult<()> {
        if !self.initialized {
            return Ok(());
        }

        self.initialized = false;
        info!("memory manager shut down");
        Ok(())
    }

    fn require_initialized(&self) -> MemoryResult<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(MemoryError::NotInitialized)
        }
    }

    /// Store data under `(layer, key)`, replacing any existing record.
    ///
    /// When embeddings are enabled and a provider is attached, the data
    /// is embedded before the write. Embedding failures degrade to an
    /// un-embedded record rather than failing the store.
    ///
    /// # Errors
    ///
    /// Returns `MemoryError::NotInitialized` before `initialize`, and
    /// propagates validation and store errors.
    #[instrument(skip(self, data), fields(layer = %layer))]
    pub async fn store_memory(
        &self,
        layer: MemoryLayer,
        key: &str,
        data: &str,
    ) -> MemoryResult<()> {
        self.require_initialized()?;
        if key.is_empty() {
            return Err(MemoryError::validation("key must not be empty"));
        }
        if key.len() > RECORD_KEY_BYTES_MAX {
            return Err(MemoryError::validation(format!(
                "key {} bytes exceeds max {}",
                key.len(),
                RECORD_KEY_BYTES_MAX
            )));
        }
        if data.len() > RECORD_DATA_BYTES_MAX {
            return Err(MemoryError::validation(format!(
                "data {} bytes exceeds max {}",
                data.len(),
                RECORD_DATA_BYTES_MAX
            )));
        }

        let record = MemoryRecord::new(layer, key, data, self.time.now_ms());
        self.store_record(record).await
    }

    /// Store a pre-built record, embedding its data when possible.
    ///
    /// # Errors
    ///
    /// Returns `MemoryError::NotInitialized` before `initialize`,
    /// `MemoryError::Validation` if the record's importance was mutated
    /// outside [0, 1], and propagates store errors.
    pub async fn store_record(&self, mut record: MemoryRecord) -> MemoryResult<()> {
        self.require_initialized()?;
        if !(RECORD_IMPORTANCE_MIN..=RECORD_IMPORTANCE_MAX).contains(&record.importance) {
            return Err(MemoryError::validation(format!(
                "importance must be {RECORD_IMPORTANCE_MIN}-{RECORD_IMPORTANCE_MAX}: got {}",
                record.importance
            )));
        }

        if record.embedding.is_none() && self.config.embeddings_enabled {
            if let Some(embedder) = &self.embedder {
                match embedder.embed(&record.data).await {
                    Ok(embedding) => record.embedding = Some(embedding),
                    Err(error) => {
                        warn!(%error, key = %record.key, "storing without embedding");
                    }
                }
            }
        }

        self.store.put(record).await?;
        Ok(())
    }

    /// Search memory with the configured defaults.
    ///
    /// Matched records are rejuvenated: their access stats are bumped
    /// so decay restarts from now.
    ///
    /// # Errors
    ///
    /// Returns `MemoryError::NotInitialized` before `initialize`, and
    /// propagates recall errors.
    pub async fn retrieve_memory(
        &self,
        query: &str,
        layer: Option<MemoryLayer>,
    ) -> MemoryResult<RecallResult> {
        let mut options = RecallOptions::new().with_limit(self.config.recall_limit);
        if let Some(layer) = layer {
            options = options.with_layer(layer);
        }
        self.retrieve_memory_with(query, &options).await
    }

    /// Search memory with explicit options.
    ///
    /// # Errors
    ///
    /// Returns `MemoryError::NotInitialized` before `initialize`, and
    /// propagates recall errors.
    #[instrument(skip(self, options))]
    pub async fn retrieve_memory_with(
        &self,
        query: &str,
        options: &RecallOptions,
    ) -> MemoryResult<RecallResult> {
        self.require_initialized()?;

        let embedder = if self.config.embeddings_enabled {
            self.embedder.as_ref()
        } else {
            None
        };

        let now_ms = self.time.now_ms();
        let result = recall::recall(
            &self.store,
            embedder,
            query,
            options,
            now_ms,
            self.config.decay_scale,
        )
        .await?;

        // Rejuvenate hits so recall keeps useful records alive.
        for matched in &result.matches {
            let mut record = matched.record.clone();
            record.record_access(now_ms);
            self.store.put(record).await?;
        }

        Ok(result)
    }

    /// Fetch a single record by layer and key, rejuvenating it.
    ///
    /// # Errors
    ///
    /// Returns `MemoryError::NotInitialized` before `initialize`, and
    /// `StoreError::NotFound` when the record does not exist.
    pub async fn get(&self, layer: MemoryLayer, key: &str) -> MemoryResult<MemoryRecord> {
        self.require_initialized()?;

        let mut record = self.store.get(layer, key).await?;
        record.record_access(self.time.now_ms());
        self.store.put(record.clone()).await?;
        Ok(record)
    }

    /// Delete a record. Returns `true` if a record was removed.
    ///
    /// # Errors
    ///
    /// Returns `MemoryError::NotInitialized` before `initialize`, and
    /// propagates store errors.
    pub async fn forget(&self, layer: MemoryLayer, key: &str) -> MemoryResult<bool> {
        self.require_initialized()?;
        Ok(self.store.delete(layer, key).await?)
    }

    /// Count records, optionally restricted to one layer.
    ///
    /// # Errors
    ///
    /// Returns `MemoryError::NotInitialized` before `initialize`, and
    /// propagates store errors.
    pub async fn count(&self, layer: Option<MemoryLayer>) -> MemoryResult<usize> {
        self.require_initialized()?;
        Ok(self.store.count(layer).await?)
    }

    /// Run a reflection pass and persist its insight record.
    ///
    /// # Errors
    ///
    /// Returns `MemoryError::NotInitialized` before `initialize`, and
    /// propagates store errors.
    #[instrument(skip(self))]
    pub async fn reflect(&self) -> MemoryResult<ReflectionReport> {
        self.require_initialized()?;
        Ok(reflection::reflect(&self.store, self.time.now_ms()).await?)
    }

    /// Run a decay sweep, pruning records below their layer thresholds.
    ///
    /// # Errors
    ///
    /// Returns `MemoryError::NotInitialized` before `initialize`, and
    /// propagates store errors.
    #[instrument(skip(self))]
    pub async fn prune_memory(&self) -> MemoryResult<PruneReport> {
        self.require_initialized()?;
        let report =
            decay::sweep(&self.store, self.time.now_ms(), self.config.decay_scale).await?;
        if report.pruned > 0 {
            info!(pruned = report.pruned, "decay sweep pruned records");
        }
        Ok(report)
    }

    /// Report manager health. Works before `initialize`.
    ///
    /// Store probe failures are reported via `store_ok` rather than an
    /// error.
    pub async fn health_check(&self) -> HealthStatus {
        let mut layers = Vec::new();
        let mut total_records = 0;
        let mut total_bytes = 0;
        let mut store_ok = true;

        for &layer in MemoryLayer::all() {
            let records = self.store.count(Some(layer)).await;
            let bytes = self.store.total_bytes(Some(layer)).await;
            match (records, bytes) {
                (Ok(records), Ok(bytes)) => {
                    total_records += records;
                    total_bytes += bytes;
                    layers.push(LayerHealth {
                        layer,
                        records,
                        bytes,
                    });
                }
                _ => {
                    store_ok = false;
                    break;
                }
            }
        }

        HealthStatus {
            initialized: self.initialized,
            store_ok,
            total_records,
            total_bytes,
            layers,
        }
    }
}
