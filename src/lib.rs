//! # Augment Memory
//!
//! Layered memory for AI agents: ephemeral context, working state,
//! semantic knowledge, procedural skills, and reflective insights, with
//! relevance decay, hybrid recall, and meta-cognitive reflection.
//!
//! ## Quick Start
//!
//! ```
//! use augment_memory::{MemoryLayer, MemoryManager};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), augment_memory::MemoryError> {
//! let (mut memory, clock) = MemoryManager::sim(42);
//! memory.initialize().await?;
//!
//! memory
//!     .store_memory(MemoryLayer::Semantic, "rust", "Rust guarantees memory safety")
//!     .await?;
//!
//! let result = memory.retrieve_memory("memory safety", None).await?;
//! assert!(!result.is_empty());
//!
//! clock.advance_ms(60 * 60 * 1000);
//! let report = memory.prune_memory().await?;
//! println!("pruned {} records", report.pruned);
//!
//! memory.shutdown().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Design
//!
//! Built TigerStyle: explicit unit-suffixed constants, assertions on
//! pre- and postconditions, trait seams for storage and embeddings, and
//! deterministic simulation testing so every failure reproduces from a
//! seed.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod constants;
pub mod decay;
pub mod dst;
pub mod embedding;
pub mod layer;
pub mod manager;
pub mod recall;
pub mod record;
pub mod reflection;
pub mod store;

pub use config::{load_config, ConfigError, MemoryConfig};
pub use decay::PruneReport;
pub use embedding::{EmbeddingError, EmbeddingProvider, SimEmbeddingProvider};
pub use layer::{DecayProfile, MemoryLayer};
pub use manager::{HealthStatus, LayerHealth, MemoryError, MemoryManager, MemoryResult};
pub use recall::{RecallError, RecallMatch, RecallOptions, RecallResult};
pub use record::{MemoryRecord, MemoryRecordBuilder};
pub use reflection::{KnowledgeEvolution, ReflectionReport, Trend};
pub use store::{MemoryStore, SimMemoryStore, StoreError, StoreResult};
