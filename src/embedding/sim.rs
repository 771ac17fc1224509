//! Simulated Embedding Provider (DST)
//!
//! Deterministic embeddings derived from text content. The same text
//! always produces the same vector, and similar runs reproduce exactly.
//!
//! `TigerStyle`: Deterministic, no network, fault injectable.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use async_trait::async_trait;

use crate::constants::EMBEDDING_DIMENSIONS_COUNT;
use crate::dst::{DeterministicRng, FaultInjector, FaultType};
use crate::embedding::{EmbeddingError, EmbeddingProvider, EmbeddingResult};

/// Deterministic embedding provider for simulation testing.
///
/// The vector for a text is seeded from a hash of the text combined with
/// the provider seed, then normalized to unit length.
#[derive(Clone)]
pub struct SimEmbeddingProvider {
    seed: u64,
    dimensions: usize,
    fault_injector: Option<Arc<FaultInjector>>,
}

impl SimEmbeddingProvider {
    /// Create a provider with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            dimensions: EMBEDDING_DIMENSIONS_COUNT,
            fault_injector: None,
        }
    }

    /// Attach a fault injector.
    #[must_use]
    pub fn with_fault_injector(mut self, injector: Arc<FaultInjector>) -> Self {
        self.fault_injector = Some(injector);
        self
    }

    fn check_fault(&self) -> EmbeddingResult<()> {
        if let Some(injector) = &self.fault_injector {
            if let Some(fault_type) = injector.should_inject("embed") {
                return Err(match fault_type {
                    FaultType::EmbeddingTimeout => EmbeddingError::Timeout { duration_ms: 5_000 },
                    FaultType::EmbeddingRateLimit => EmbeddingError::RateLimit {
                        retry_after_ms: 1_000,
                    },
                    _ => EmbeddingError::ServiceUnavailable {
                        message: fault_type.as_str().to_string(),
                    },
                });
            }
        }
        Ok(())
    }

    fn generate(&self, text: &str) -> Vec<f32> {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        self.seed.hash(&mut hasher);
        let mut rng = DeterministicRng::new(hasher.finish());

        let mut vector: Vec<f32> = (0..self.dimensions)
            .map(|_| {
                #[allow(clippy::cast_possible_truncation)]
                let component = (rng.next_float() * 2.0 - 1.0) as f32;
                component
            })
            .collect();

        // Normalize to unit length
        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for component in &mut vector {
                *component /= norm;
            }
        }

        vector
    }
}

#[async_trait]
impl EmbeddingProvider for SimEmbeddingProvider {
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        if text.is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        self.check_fault()?;

        let vector = self.generate(text);
        // Postcondition
        debug_assert_eq!(vector.len(), self.dimensions);
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
