//! Embedding Providers
//!
//! Text-to-vector providers behind an async trait. Semantic recall works
//! without one; when present, vector similarity sharpens ranking.
//!
//! `TigerStyle`: Trait-based providers, explicit errors, graceful degradation.

pub mod sim;

pub use sim::SimEmbeddingProvider;

use async_trait::async_trait;
use thiserror::Error;

use crate::constants::EMBEDDING_BATCH_SIZE_MAX;

// =============================================================================
// Errors
// =============================================================================

/// Errors from embedding operations.
#[derive(Debug, Clone, Error)]
pub enum EmbeddingError {
    /// Input text was empty
    #[error("empty input text")]
    EmptyInput,

    /// Request timed out
    #[error("embedding request timed out after {duration_ms}ms")]
    Timeout {
        /// Duration in milliseconds
        duration_ms: u64,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded, retry after {retry_after_ms}ms")]
    RateLimit {
        /// Suggested retry delay in milliseconds
        retry_after_ms: u64,
    },

    /// Provider unavailable
    #[error("embedding provider unavailable: {message}")]
    ServiceUnavailable {
        /// Error message
        message: String,
    },

    /// Invalid request
    #[error("invalid embedding request: {message}")]
    InvalidRequest {
        /// Error message
        message: String,
    },
}

impl EmbeddingError {
    /// Check if this error is transient (can be retried).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::RateLimit { .. } | Self::ServiceUnavailable { .. }
        )
    }
}

/// Result type for embedding operations.
pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

// =============================================================================
// Provider Trait
// =============================================================================

/// Async text embedding provider.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text into a vector.
    ///
    /// # Errors
    ///
    /// Returns `EmbeddingError::EmptyInput` if `text` is empty.
    async fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>>;

    /// Embed a batch of texts, preserving input order.
    async fn embed_batch(&self, texts: &[String]) -> EmbeddingResult<Vec<Vec<f32>>> {
        assert!(
            texts.len() <= EMBEDDING_BATCH_SIZE_MAX,
            "batch size {} exceeds max {}",
            texts.len(),
            EMBEDDING_BATCH_SIZE_MAX
        );

        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }

    /// Number of dimensions in produced vectors.
    fn dimensions(&self) -> usize;
}

// =============================================================================
// Similarity
// =============================================================================

/// Cosine similarity between two vectors, mapped from [-1, 1] to [0, 1].
///
/// Returns 0.0 when either vector is all zeros.
///
/// # Panics
/// Panics if vector lengths differ.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    assert_eq!(a.len(), b.len(), "vector dimensions must match");

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += f64::from(*x) * f64::from(*y);
        norm_a += f64::from(*x) * f64::from(*x);
        norm_b += f64::from(*y) * f64::from(*y);
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let cosine = dot / (norm_a.sqrt() * norm_b.sqrt());
    // Postcondition: shifted similarity stays in [0, 1]
    let shifted = (cosine + 1.0) / 2.0;
    debug_assert!((0.0..=1.0).contains(&shifted));
    shifted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical_vectors() {
        let v = vec![0.5_f32, 0.5, 0.5];
        let sim = cosine_similarity(&v, &v);
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_opposite_vectors() {
        let a = vec![1.0_f32, 0.0];
        let b = vec![-1.0_f32, 0.0];
        let sim = cosine_similarity(&a, &b);
        assert!(sim.abs() < 1e-9);
    }

    #[test]
    fn test_cosine_orthogonal_vectors() {
        let a = vec![1.0_f32, 0.0];
        let b = vec![0.0_f32, 1.0];
        let sim = cosine_similarity(&a, &b);
        assert!((sim - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_zero_vector() {
        let a = vec![0.0_f32, 0.0];
        let b = vec![1.0_f32, 1.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    #[should_panic(expected = "vector dimensions must match")]
    fn test_cosine_dimension_mismatch_panics() {
        let a = vec![1.0_f32];
        let b = vec![1.0_f32, 2.0];
        let _ = cosine_similarity(&a, &b);
    }

    #[test]
    fn test_error_is_transient() {
        assert!(EmbeddingError::Timeout { duration_ms: 100 }.is_transient());
        assert!(EmbeddingError::RateLimit { retry_after_ms: 50 }.is_transient());
        assert!(!EmbeddingError::EmptyInput.is_transient());
    }
}
