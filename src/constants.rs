//! `TigerStyle` Constants
//!
//! All limits use big-endian naming: `CATEGORY_SPECIFICS_UNIT_LIMIT`
//! Example: `RECORD_DATA_BYTES_MAX` (not `MAX_RECORD_DATA`)
//!
//! Every constant includes units in the name:
//! - _`BYTES_MAX/MIN` for size limits
//! - _MS for milliseconds
//! - _`COUNT_MAX` for quantity limits

// =============================================================================
// Record Limits
// =============================================================================

/// Maximum length of a record key
pub const RECORD_KEY_BYTES_MAX: usize = 256;

/// Maximum size of record data
pub const RECORD_DATA_BYTES_MAX: usize = 1_000_000; // 1MB

/// Maximum number of metadata entries per record
pub const RECORD_METADATA_COUNT_MAX: usize = 100;

/// Maximum length of a metadata key or value
pub const RECORD_METADATA_BYTES_MAX: usize = 1024;

/// Default importance for new records
pub const RECORD_IMPORTANCE_DEFAULT: f64 = 0.5;

/// Minimum importance value
pub const RECORD_IMPORTANCE_MIN: f64 = 0.0;

/// Maximum importance value
pub const RECORD_IMPORTANCE_MAX: f64 = 1.0;

// =============================================================================
// Layer Limits
// =============================================================================

/// Maximum records per layer (sim store capacity)
pub const LAYER_RECORDS_COUNT_MAX: usize = 100_000;

/// Maximum total bytes per layer (sim store capacity)
pub const LAYER_SIZE_BYTES_MAX: usize = 256 * 1024 * 1024; // 256MB

// =============================================================================
// Decay Profiles (per-layer half-lives and prune thresholds)
// =============================================================================

/// Relevance half-life for ephemeral memories (10 minutes)
pub const DECAY_EPHEMERAL_HALFLIFE_MS: u64 = 10 * 60 * 1000;

/// Relevance half-life for working memories (6 hours)
pub const DECAY_WORKING_HALFLIFE_MS: u64 = 6 * 60 * 60 * 1000;

/// Relevance half-life for semantic memories (30 days)
pub const DECAY_SEMANTIC_HALFLIFE_MS: u64 = 30 * 24 * 60 * 60 * 1000;

/// Relevance half-life for procedural memories (30 days)
pub const DECAY_PROCEDURAL_HALFLIFE_MS: u64 = 30 * 24 * 60 * 60 * 1000;

/// Prune threshold for ephemeral memories
pub const DECAY_EPHEMERAL_PRUNE_THRESHOLD: f64 = 0.45;

/// Prune threshold for working memories
pub const DECAY_WORKING_PRUNE_THRESHOLD: f64 = 0.35;

/// Prune threshold for semantic memories
pub const DECAY_SEMANTIC_PRUNE_THRESHOLD: f64 = 0.2;

/// Prune threshold for procedural memories
pub const DECAY_PROCEDURAL_PRUNE_THRESHOLD: f64 = 0.2;

/// Records at or above this importance are never pruned
pub const DECAY_IMPORTANCE_PROTECTED_MIN: f64 = 0.9;

/// Weight of base importance in the relevance mix
pub const DECAY_WEIGHT_IMPORTANCE: f64 = 0.5;

/// Weight of recency in the relevance mix
pub const DECAY_WEIGHT_RECENCY: f64 = 0.3;

/// Weight of access frequency in the relevance mix
pub const DECAY_WEIGHT_FREQUENCY: f64 = 0.2;

/// Weight of access frequency for procedural memories (how-to knowledge
/// stays relevant while it is used)
pub const DECAY_WEIGHT_FREQUENCY_PROCEDURAL: f64 = 0.35;

/// Weight of recency for procedural memories
pub const DECAY_WEIGHT_RECENCY_PROCEDURAL: f64 = 0.15;

/// Accesses per day that saturate the frequency score
pub const DECAY_FREQUENCY_SATURATION_PER_DAY: f64 = 10.0;

// =============================================================================
// Recall Limits
// =============================================================================

/// Maximum number of recall results
pub const RECALL_RESULTS_COUNT_MAX: usize = 100;

/// Default number of recall results
pub const RECALL_RESULTS_COUNT_DEFAULT: usize = 10;

/// Maximum length of a recall query
pub const RECALL_QUERY_BYTES_MAX: usize = 10_000;

/// Weight of keyword match in the recall score
pub const RECALL_WEIGHT_KEYWORD: f64 = 0.5;

/// Weight of vector similarity in the recall score
pub const RECALL_WEIGHT_VECTOR: f64 = 0.3;

/// Weight of current relevance in the recall score
pub const RECALL_WEIGHT_RELEVANCE: f64 = 0.2;

/// Default minimum combined score for a recall match
pub const RECALL_SCORE_MIN_DEFAULT: f64 = 0.35;

// =============================================================================
// Embedding Limits
// =============================================================================

/// Number of dimensions in embeddings
pub const EMBEDDING_DIMENSIONS_COUNT: usize = 256;

/// Maximum batch size for embedding requests
pub const EMBEDDING_BATCH_SIZE_MAX: usize = 100;

// =============================================================================
// Reflection Limits
// =============================================================================

/// Number of strongest/weakest memories surfaced by a reflection pass
pub const REFLECTION_EXTREMES_COUNT: usize = 5;

/// Minimum importance delta treated as a confidence trend
pub const REFLECTION_TREND_DELTA_MIN: f64 = 0.05;

// =============================================================================
// DST (Deterministic Simulation Testing) Limits
// =============================================================================

/// Maximum probability for fault injection (1.0 = 100%)
pub const DST_FAULT_PROBABILITY_MAX: f64 = 1.0;

/// Maximum time advance per step in milliseconds
pub const DST_TIME_ADVANCE_MS_MAX: u64 = 86_400_000; // 24 hours

// =============================================================================
// Time Constants
// =============================================================================

/// Milliseconds per second
pub const TIME_MS_PER_SEC: u64 = 1000;

/// Milliseconds per minute
pub const TIME_MS_PER_MIN: u64 = 60 * TIME_MS_PER_SEC;

/// Milliseconds per hour
pub const TIME_MS_PER_HOUR: u64 = 60 * TIME_MS_PER_MIN;

/// Milliseconds per day
pub const TIME_MS_PER_DAY: u64 = 24 * TIME_MS_PER_HOUR;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decay_halflives_ordered() {
        assert!(DECAY_EPHEMERAL_HALFLIFE_MS < DECAY_WORKING_HALFLIFE_MS);
        assert!(DECAY_WORKING_HALFLIFE_MS < DECAY_SEMANTIC_HALFLIFE_MS);
    }

    #[test]
    fn test_decay_weights_sum_to_one() {
        let default_sum = DECAY_WEIGHT_IMPORTANCE + DECAY_WEIGHT_RECENCY + DECAY_WEIGHT_FREQUENCY;
        assert!((default_sum - 1.0).abs() < f64::EPSILON);

        let procedural_sum = DECAY_WEIGHT_IMPORTANCE
            + DECAY_WEIGHT_RECENCY_PROCEDURAL
            + DECAY_WEIGHT_FREQUENCY_PROCEDURAL;
        assert!((procedural_sum - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_recall_weights_sum_to_one() {
        let sum = RECALL_WEIGHT_KEYWORD + RECALL_WEIGHT_VECTOR + RECALL_WEIGHT_RELEVANCE;
        assert!((sum - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_time_constants_consistent() {
        assert_eq!(TIME_MS_PER_MIN, 60_000);
        assert_eq!(TIME_MS_PER_HOUR, 3_600_000);
        assert_eq!(TIME_MS_PER_DAY, 86_400_000);
    }
}
