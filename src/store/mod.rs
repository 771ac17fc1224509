//! Memory Store
//!
//! Layered persistence behind an async trait so production backends and
//! deterministic simulations share one interface.
//!
//! `TigerStyle`: Trait-based backends, explicit errors, assertions.

pub mod error;
pub mod sim;

pub use error::{StoreError, StoreResult};
pub use sim::SimMemoryStore;

use async_trait::async_trait;

use crate::layer::MemoryLayer;
use crate::record::MemoryRecord;

/// Async storage backend for memory records.
///
/// Records are keyed by `(layer, key)`. `put` upserts: storing under an
/// existing key replaces the record in place.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Store a record, replacing any existing record with the same layer and key.
    async fn put(&self, record: MemoryRecord) -> StoreResult<()>;

    /// Fetch a record by layer and key.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no record exists under `(layer, key)`.
    async fn get(&self, layer: MemoryLayer, key: &str) -> StoreResult<MemoryRecord>;

    /// Delete a record by layer and key. Returns `true` if a record was removed.
    async fn delete(&self, layer: MemoryLayer, key: &str) -> StoreResult<bool>;

    /// List all records in a layer, ordered by key.
    async fn scan_layer(&self, layer: MemoryLayer) -> StoreResult<Vec<MemoryRecord>>;

    /// Case-insensitive substring search over keys and data.
    ///
    /// When `layer` is `None` all layers are searched. Results are ordered
    /// by layer then key so repeated calls return identical orderings.
    async fn keyword_search(
        &self,
        query: &str,
        layer: Option<MemoryLayer>,
    ) -> StoreResult<Vec<MemoryRecord>>;

    /// Count records, optionally restricted to one layer.
    async fn count(&self, layer: Option<MemoryLayer>) -> StoreResult<usize>;

    /// Total payload bytes held, optionally restricted to one layer.
    async fn total_bytes(&self, layer: Option<MemoryLayer>) -> StoreResult<usize>;

    /// Remove every record. Returns the number of records removed.
    async fn clear(&self) -> StoreResult<usize>;
}
