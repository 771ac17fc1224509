//! Memory Recall
//!
//! Query-driven retrieval across layers. Ranking blends keyword overlap,
//! vector similarity when embeddings are available, and the record's
//! current relevance. Missing signals renormalize the remaining weights
//! instead of dragging scores down.
//!
//! `TigerStyle`: Bounded results, deterministic ordering, explicit weights.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::constants::{
    RECALL_QUERY_BYTES_MAX, RECALL_RESULTS_COUNT_DEFAULT, RECALL_RESULTS_COUNT_MAX,
    RECALL_SCORE_MIN_DEFAULT, RECALL_WEIGHT_KEYWORD, RECALL_WEIGHT_RELEVANCE, RECALL_WEIGHT_VECTOR,
};
use crate::decay::relevance_score;
use crate::embedding::{cosine_similarity, EmbeddingProvider};
use crate::layer::MemoryLayer;
use crate::record::MemoryRecord;
use crate::store::{MemoryStore, StoreError};

// =============================================================================
// Errors
// =============================================================================

/// Errors from recall operations.
#[derive(Debug, Error)]
pub enum RecallError {
    /// Query was empty
    #[error("empty query")]
    EmptyQuery,

    /// Query exceeded the size limit
    #[error("query {length} bytes exceeds max {max}")]
    QueryTooLong {
        /// Actual query length in bytes
        length: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Store operation failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

// =============================================================================
// Options
// =============================================================================

/// Options for a recall query.
#[derive(Debug, Clone)]
pub struct RecallOptions {
    /// Restrict the search to one layer (None searches all layers)
    pub layer: Option<MemoryLayer>,
    /// Maximum number of matches to return
    pub limit: usize,
    /// Minimum combined score for a match
    pub min_score: f64,
}

impl RecallOptions {
    /// Create options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            layer: None,
            limit: RECALL_RESULTS_COUNT_DEFAULT,
            min_score: RECALL_SCORE_MIN_DEFAULT,
        }
    }

    /// Restrict the search to one layer.
    #[must_use]
    pub fn with_layer(mut self, layer: MemoryLayer) -> Self {
        self.layer = Some(layer);
        self
    }

    /// Set the result limit.
    ///
    /// # Panics
    /// Panics if limit is zero or exceeds `RECALL_RESULTS_COUNT_MAX`.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        assert!(limit > 0, "limit must be positive");
        assert!(
            limit <= RECALL_RESULTS_COUNT_MAX,
            "limit {limit} exceeds max {RECALL_RESULTS_COUNT_MAX}"
        );
        self.limit = limit;
        self
    }

    /// Set the minimum combined score.
    ///
    /// # Panics
    /// Panics if the score is not in [0, 1].
    #[must_use]
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&min_score),
            "min_score must be in [0, 1]"
        );
        self.min_score = min_score;
        self
    }
}

impl Default for RecallOptions {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Results
// =============================================================================

/// A single recall match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecallMatch {
    /// The matched record
    pub record: MemoryRecord,
    /// Combined score in [0, 1]
    pub score: f64,
    /// Fraction of query tokens found in the record
    pub keyword_score: f64,
    /// Vector similarity, when both sides had embeddings
    pub vector_score: Option<f64>,
}

/// Result of a recall query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecallResult {
    /// The original query
    pub query: String,
    /// Matches ordered by descending score
    pub matches: Vec<RecallMatch>,
    /// Number of records considered before filtering
    pub candidates: usize,
}

impl RecallResult {
    /// Check if any matches were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// The best match, if any.
    #[must_use]
    pub fn best(&self) -> Option<&RecallMatch> {
        self.matches.first()
    }
}

// =============================================================================
// Recall
// =============================================================================

/// Fraction of query tokens that appear in the record's key or data.
fn keyword_overlap(query_tokens: &[String], record: &MemoryRecord) -> f64 {
    assert!(!query_tokens.is_empty(), "query tokens must not be empty");

    let haystack = format!("{} {}", record.key, record.data).to_lowercase();
    let matched = query_tokens
        .iter()
        .filter(|token| haystack.contains(token.as_str()))
        .count();

    #[allow(clippy::cast_precision_loss)]
    let overlap = matched as f64 / query_tokens.len() as f64;
    overlap
}

/// Blend the available signals, renormalizing weights over those present.
fn combined_score(keyword: f64, vector: Option<f64>, relevance: f64) -> f64 {
    let mut score = RECALL_WEIGHT_KEYWORD * keyword + RECALL_WEIGHT_RELEVANCE * relevance;
    let mut weight_total = RECALL_WEIGHT_KEYWORD + RECALL_WEIGHT_RELEVANCE;

    if let Some(vector) = vector {
        score += RECALL_WEIGHT_VECTOR * vector;
        weight_total += RECALL_WEIGHT_VECTOR;
    }

    let normalized = score / weight_total;
    debug_assert!((0.0..=1.0).contains(&normalized));
    normalized
}

/// Search memory for records matching `query`.
///
/// When an embedding provider is given, the query is embedded once and
/// compared against records that carry embeddings. Embedding failures
/// degrade to keyword-and-relevance ranking rather than failing the
/// query.
///
/// Relevance is recomputed at `now_ms` from each record's decay
/// profile, so ranking reflects decay that no sweep has persisted yet.
/// `halflife_scale` stretches or compresses halflives the same way it
/// does for sweeps.
///
/// # Errors
///
/// Returns `RecallError::EmptyQuery` or `RecallError::QueryTooLong` on
/// invalid input, and propagates store errors.
pub async fn recall<S, E>(
    store: &S,
    embedder: Option<&E>,
    query: &str,
    options: &RecallOptions,
    now_ms: u64,
    halflife_scale: f64,
) -> Result<RecallResult, RecallError>
where
    S: MemoryStore + ?Sized,
    E: EmbeddingProvider + ?Sized,
{
    assert!(halflife_scale > 0.0, "halflife_scale must be positive");

    if query.trim().is_empty() {
        return Err(RecallError::EmptyQuery);
    }
    if query.len() > RECALL_QUERY_BYTES_MAX {
        return Err(RecallError::QueryTooLong {
            length: query.len(),
            max: RECALL_QUERY_BYTES_MAX,
        });
    }

    let query_tokens: Vec<String> = query
        .to_lowercase()
        .split_whitespace()
        .map(ToString::to_string)
        .collect();

    let query_embedding = match embedder {
        Some(provider) => match provider.embed(query).await {
            Ok(embedding) => Some(embedding),
            Err(error) if error.is_transient() => {
                warn!(%error, "embedding unavailable, falling back to keyword recall");
                None
            }
            Err(error) => {
                warn!(%error, "embedding rejected query, falling back to keyword recall");
                None
            }
        },
        None => None,
    };

    let layers: Vec<MemoryLayer> = match options.layer {
        Some(layer) => vec![layer],
        None => MemoryLayer::all().to_vec(),
    };

    let mut matches = Vec::new();
    let mut candidates = 0;

    for layer in layers {
        let profile = layer.decay_profile().scaled(halflife_scale);
        for record in store.scan_layer(layer).await? {
            candidates += 1;

            let keyword_score = keyword_overlap(&query_tokens, &record);
            let vector_score = match (&query_embedding, &record.embedding) {
                (Some(query_vec), Some(record_vec)) if query_vec.len() == record_vec.len() => {
                    Some(cosine_similarity(query_vec, record_vec))
                }
                _ => None,
            };

            let relevance = relevance_score(&record, &profile, now_ms);
            let score = combined_score(keyword_score, vector_score, relevance);
            if score >= options.min_score {
                matches.push(RecallMatch {
                    record,
                    score,
                    keyword_score,
                    vector_score,
                });
            }
        }
    }

    // Order by score, then layer and key for stable ties.
    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.record.layer.cmp(&b.record.layer))
            .then_with(|| a.record.key.cmp(&b.record.key))
    });
    matches.truncate(options.limit);

    // Postcondition
    debug_assert!(matches.len() <= options.limit);

    Ok(RecallResult {
        query: query.to_string(),
        matches,
        candidates,
    })
}
