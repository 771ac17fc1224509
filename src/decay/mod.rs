//! Memory Decay
//!
//! Relevance scoring and pruning. Each layer has a decay profile with a
//! half-life and prune threshold; records fade as they go unaccessed and
//! are deleted once they fall below the layer threshold.
//!
//! `TigerStyle`: Explicit scoring weights, bounded results, assertions.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{
    DECAY_FREQUENCY_SATURATION_PER_DAY, DECAY_IMPORTANCE_PROTECTED_MIN, TIME_MS_PER_DAY,
};
use crate::layer::{DecayProfile, MemoryLayer};
use crate::record::MemoryRecord;
use crate::store::{MemoryStore, StoreResult};

// =============================================================================
// Relevance Scoring
// =============================================================================

/// Compute a record's relevance at `now_ms` under a layer's decay profile.
///
/// Combines three signals:
/// - importance: the caller-assigned weight, fixed at store time
/// - recency: exponential half-life decay since the last access
/// - frequency: accesses per day, saturating at
///   `DECAY_FREQUENCY_SATURATION_PER_DAY`
///
/// Result is always in [0, 1].
#[must_use]
pub fn relevance_score(record: &MemoryRecord, profile: &DecayProfile, now_ms: u64) -> f64 {
    debug_assert!(profile.halflife_ms > 0, "halflife must be positive");

    let elapsed_ms = now_ms.saturating_sub(record.last_access_ms);

    #[allow(clippy::cast_precision_loss)]
    let recency = 0.5_f64.powf(elapsed_ms as f64 / profile.halflife_ms as f64);

    #[allow(clippy::cast_precision_loss)]
    let age_days =
        (now_ms.saturating_sub(record.created_at_ms) as f64 / TIME_MS_PER_DAY as f64).max(1.0);
    #[allow(clippy::cast_precision_loss)]
    let accesses_per_day = record.access_count as f64 / age_days;
    let frequency = (accesses_per_day / DECAY_FREQUENCY_SATURATION_PER_DAY).min(1.0);

    let score = profile.weight_importance * record.importance
        + profile.weight_recency * recency
        + profile.weight_frequency * frequency;

    // Postcondition
    debug_assert!((0.0..=1.0).contains(&score), "score {score} out of range");
    score
}

/// Check whether a record scored at `relevance` should be pruned.
///
/// Protected layers never prune. High-importance records survive
/// regardless of score.
#[must_use]
pub fn should_prune(record: &MemoryRecord, profile: &DecayProfile, relevance: f64) -> bool {
    if profile.protected {
        return false;
    }
    if record.importance >= DECAY_IMPORTANCE_PROTECTED_MIN {
        return false;
    }
    relevance < profile.prune_threshold
}

// =============================================================================
// Sweep
// =============================================================================

/// Outcome of a decay sweep.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PruneReport {
    /// Records examined across all layers
    pub examined: usize,
    /// Records whose stored relevance was refreshed
    pub rescored: usize,
    /// Records deleted
    pub pruned: usize,
    /// Deletions broken down by layer
    pub pruned_by_layer: Vec<(MemoryLayer, usize)>,
}

/// Re-score every record, persist the refreshed relevance, and delete
/// records that fell below their layer's prune threshold.
///
/// `halflife_scale` stretches (>1) or shrinks (<1) every layer's
/// half-life, normally taken from `MemoryConfig::decay_scale`.
///
/// # Errors
///
/// Returns the first store error encountered.
pub async fn sweep<S: MemoryStore + ?Sized>(
    store: &S,
    now_ms: u64,
    halflife_scale: f64,
) -> StoreResult<PruneReport> {
    assert!(halflife_scale > 0.0, "halflife_scale must be positive");

    let mut report = PruneReport::default();

    for &layer in MemoryLayer::all() {
        let profile = layer.decay_profile().scaled(halflife_scale);
        let mut pruned_in_layer = 0;

        for mut record in store.scan_layer(layer).await? {
            report.examined += 1;

            let score = relevance_score(&record, &profile, now_ms);
            if should_prune(&record, &profile, score) {
                store.delete(layer, &record.key).await?;
                pruned_in_layer += 1;
                debug!(layer = %layer, key = %record.key, score, "pruned decayed record");
            } else if (record.relevance - score).abs() > f64::EPSILON {
                record.relevance = score;
                store.put(record).await?;
                report.rescored += 1;
            }
        }

        if pruned_in_layer > 0 {
            report.pruned += pruned_in_layer;
            report.pruned_by_layer.push((layer, pruned_in_layer));
        }
    }

    Ok(report)
}
