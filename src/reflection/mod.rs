//! Reflection
//!
//! Meta-cognitive passes over stored memory. A reflection reviews every
//! record, surfaces duplicates and relevance extremes, and persists its
//! findings as a protected record in the reflective layer. Knowledge
//! evolution tracks whether repeated updates to a topic are trending
//! stronger or weaker.
//!
//! `TigerStyle`: Deterministic analysis, explicit thresholds, bounded output.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::constants::{REFLECTION_EXTREMES_COUNT, REFLECTION_TREND_DELTA_MIN};
use crate::decay::relevance_score;
use crate::layer::MemoryLayer;
use crate::record::MemoryRecord;
use crate::store::{MemoryStore, StoreResult};

// =============================================================================
// Reflection Report
// =============================================================================

/// A `(key, relevance)` pair in a reflection report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredKey {
    /// Record key
    pub key: String,
    /// Layer the record lives in
    pub layer: MemoryLayer,
    /// Relevance at reflection time
    pub relevance: f64,
}

/// Outcome of a reflection pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionReport {
    /// When the reflection ran (ms since epoch)
    pub generated_at_ms: u64,
    /// Records reviewed across all layers
    pub records_reviewed: usize,
    /// Record counts per layer
    pub layer_counts: Vec<(MemoryLayer, usize)>,
    /// Keys within a layer holding identical data
    pub duplicate_keys: Vec<(String, String)>,
    /// Highest-relevance records, strongest first
    pub strongest: Vec<ScoredKey>,
    /// Lowest-relevance records, weakest first
    pub weakest: Vec<ScoredKey>,
    /// Key of the persisted insight record
    pub insight_key: String,
}

/// Review all stored memory and persist an insight record.
///
/// The insight is written to the reflective layer with maximum
/// importance, so decay sweeps never remove it.
///
/// # Errors
///
/// Propagates store errors from the scan or the insight write.
pub async fn reflect<S: MemoryStore + ?Sized>(
    store: &S,
    now_ms: u64,
) -> StoreResult<ReflectionReport> {
    let mut records_reviewed = 0;
    let mut layer_counts = Vec::new();
    let mut duplicate_keys = Vec::new();
    let mut scored: Vec<ScoredKey> = Vec::new();

    for &layer in MemoryLayer::all() {
        let records = store.scan_layer(layer).await?;
        if !records.is_empty() {
            layer_counts.push((layer, records.len()));
        }
        records_reviewed += records.len();

        // Scan order is key order, so the first key seen for a given
        // payload is the lexicographically smallest.
        let mut seen_data: HashMap<&str, &str> = HashMap::new();
        for record in &records {
            if let Some(first_key) = seen_data.get(record.data.as_str()) {
                duplicate_keys.push(((*first_key).to_string(), record.key.clone()));
            } else {
                seen_data.insert(record.data.as_str(), record.key.as_str());
            }
        }

        let profile = layer.decay_profile();
        for record in &records {
            scored.push(ScoredKey {
                key: record.key.clone(),
                layer,
                relevance: relevance_score(record, &profile, now_ms),
            });
        }
    }

    scored.sort_by(|a, b| {
        b.relevance
            .partial_cmp(&a.relevance)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.key.cmp(&b.key))
    });

    let strongest: Vec<ScoredKey> = scored.iter().take(REFLECTION_EXTREMES_COUNT).cloned().collect();
    let weakest: Vec<ScoredKey> = scored
        .iter()
        .rev()
        .take(REFLECTION_EXTREMES_COUNT)
        .cloned()
        .collect();

    let insight_key = format!("reflection-{}", Uuid::new_v4());
    let report = ReflectionReport {
        generated_at_ms: now_ms,
        records_reviewed,
        layer_counts,
        duplicate_keys,
        strongest,
        weakest,
        insight_key: insight_key.clone(),
    };

    let insight_data = serde_json::to_string(&report)
        .map_err(|e| crate::store::StoreError::internal(format!("serialize reflection: {e}")))?;
    let insight = MemoryRecord::builder(MemoryLayer::Reflective, insight_key, insight_data)
        .with_importance(1.0)
        .build(now_ms);
    store.put(insight).await?;

    info!(
        records_reviewed = report.records_reviewed,
        duplicates = report.duplicate_keys.len(),
        "reflection pass complete"
    );

    Ok(report)
}

// =============================================================================
// Knowledge Evolution
// =============================================================================

/// Direction a body of knowledge is moving across iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Importance is rising across iterations
    Improving,
    /// Importance is falling across iterations
    Declining,
    /// Change is within `REFLECTION_TREND_DELTA_MIN`
    Steady,
}

/// Evolution summary for a set of related records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeEvolution {
    /// Number of records analyzed
    pub iterations: usize,
    /// Time from first creation to latest update (ms)
    pub span_ms: u64,
    /// Overall direction of importance
    pub trend: Trend,
    /// Key of the most recently updated record
    pub latest_key: String,
}

/// Analyze how a set of related records evolved over time.
///
/// Records are ordered by update time; the trend compares the mean
/// importance of the earlier half against the later half, so rising
/// caller confidence reads as improving knowledge.
///
/// Returns `None` when `records` is empty.
#[must_use]
pub fn analyze_knowledge_evolution(records: &[MemoryRecord]) -> Option<KnowledgeEvolution> {
    if records.is_empty() {
        return None;
    }

    let mut ordered: Vec<&MemoryRecord> = records.iter().collect();
    ordered.sort_by(|a, b| {
        a.updated_at_ms
            .cmp(&b.updated_at_ms)
            .then_with(|| a.key.cmp(&b.key))
    });

    let first_created = ordered.iter().map(|r| r.created_at_ms).min().unwrap_or(0);
    let latest = ordered.last().expect("records is non-empty");
    let span_ms = latest.updated_at_ms.saturating_sub(first_created);

    let trend = if ordered.len() < 2 {
        Trend::Steady
    } else {
        let half = ordered.len() / 2;
        let mean = |slice: &[&MemoryRecord]| {
            #[allow(clippy::cast_precision_loss)]
            let mean = slice.iter().map(|r| r.importance).sum::<f64>() / slice.len() as f64;
            mean
        };
        let earlier = mean(&ordered[..half]);
        let later = mean(&ordered[half..]);
        let delta = later - earlier;

        if delta > REFLECTION_TREND_DELTA_MIN {
            Trend::Improving
        } else if delta < -REFLECTION_TREND_DELTA_MIN {
            Trend::Declining
        } else {
            Trend::Steady
        }
    };

    Some(KnowledgeEvolution {
        iterations: ordered.len(),
        span_ms,
        trend,
        latest_key: latest.key.clone(),
    })
}
