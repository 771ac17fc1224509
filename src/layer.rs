//! Memory Layers - The Hierarchical Layer Model
//!
//! `TigerStyle`: Explicit types, exhaustive matching.
//!
//! # Design
//!
//! Memories live in one of five layers, each with its own decay profile:
//!
//! - **Ephemeral**: immediate conversational context, minutes-scale.
//! - **Working**: active task state, hours-scale.
//! - **Semantic**: long-term knowledge, weeks-scale.
//! - **Procedural**: how-to knowledge, frequency-weighted decay.
//! - **Reflective**: insights produced by reflection passes; protected.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DECAY_EPHEMERAL_HALFLIFE_MS, DECAY_EPHEMERAL_PRUNE_THRESHOLD, DECAY_PROCEDURAL_HALFLIFE_MS,
    DECAY_PROCEDURAL_PRUNE_THRESHOLD, DECAY_SEMANTIC_HALFLIFE_MS, DECAY_SEMANTIC_PRUNE_THRESHOLD,
    DECAY_WEIGHT_FREQUENCY, DECAY_WEIGHT_FREQUENCY_PROCEDURAL, DECAY_WEIGHT_IMPORTANCE,
    DECAY_WEIGHT_RECENCY, DECAY_WEIGHT_RECENCY_PROCEDURAL, DECAY_WORKING_HALFLIFE_MS,
    DECAY_WORKING_PRUNE_THRESHOLD,
};

// =============================================================================
// Memory Layer
// =============================================================================

/// The hierarchical memory layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryLayer {
    /// Short-term conversational context
    Ephemeral,
    /// Task-oriented session state
    Working,
    /// Long-term knowledge
    Semantic,
    /// How-to knowledge
    Procedural,
    /// Insights produced by reflection
    Reflective,
}

impl MemoryLayer {
    /// Get string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ephemeral => "ephemeral",
            Self::Working => "working",
            Self::Semantic => "semantic",
            Self::Procedural => "procedural",
            Self::Reflective => "reflective",
        }
    }

    /// Parse from string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ephemeral" | "short_term" => Some(Self::Ephemeral),
            "working" => Some(Self::Working),
            "semantic" | "long_term" => Some(Self::Semantic),
            "procedural" => Some(Self::Procedural),
            "reflective" | "meta" => Some(Self::Reflective),
            _ => None,
        }
    }

    /// Get all layers in order.
    #[must_use]
    pub fn all() -> &'static [MemoryLayer] {
        &[
            Self::Ephemeral,
            Self::Working,
            Self::Semantic,
            Self::Procedural,
            Self::Reflective,
        ]
    }

    /// Get the decay profile for this layer.
    #[must_use]
    pub fn decay_profile(&self) -> DecayProfile {
        match self {
            Self::Ephemeral => DecayProfile {
                halflife_ms: DECAY_EPHEMERAL_HALFLIFE_MS,
                prune_threshold: DECAY_EPHEMERAL_PRUNE_THRESHOLD,
                weight_importance: DECAY_WEIGHT_IMPORTANCE,
                weight_recency: DECAY_WEIGHT_RECENCY,
                weight_frequency: DECAY_WEIGHT_FREQUENCY,
                protected: false,
            },
            Self::Working => DecayProfile {
                halflife_ms: DECAY_WORKING_HALFLIFE_MS,
                prune_threshold: DECAY_WORKING_PRUNE_THRESHOLD,
                weight_importance: DECAY_WEIGHT_IMPORTANCE,
                weight_recency: DECAY_WEIGHT_RECENCY,
                weight_frequency: DECAY_WEIGHT_FREQUENCY,
                protected: false,
            },
            Self::Semantic => DecayProfile {
                halflife_ms: DECAY_SEMANTIC_HALFLIFE_MS,
                prune_threshold: DECAY_SEMANTIC_PRUNE_THRESHOLD,
                weight_importance: DECAY_WEIGHT_IMPORTANCE,
                weight_recency: DECAY_WEIGHT_RECENCY,
                weight_frequency: DECAY_WEIGHT_FREQUENCY,
                protected: false,
            },
            Self::Procedural => DecayProfile {
                halflife_ms: DECAY_PROCEDURAL_HALFLIFE_MS,
                prune_threshold: DECAY_PROCEDURAL_PRUNE_THRESHOLD,
                weight_importance: DECAY_WEIGHT_IMPORTANCE,
                weight_recency: DECAY_WEIGHT_RECENCY_PROCEDURAL,
                weight_frequency: DECAY_WEIGHT_FREQUENCY_PROCEDURAL,
                protected: false,
            },
            Self::Reflective => DecayProfile {
                halflife_ms: DECAY_SEMANTIC_HALFLIFE_MS,
                prune_threshold: 0.0,
                weight_importance: DECAY_WEIGHT_IMPORTANCE,
                weight_recency: DECAY_WEIGHT_RECENCY,
                weight_frequency: DECAY_WEIGHT_FREQUENCY,
                protected: true,
            },
        }
    }
}

impl std::fmt::Display for MemoryLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Decay Profile
// =============================================================================

/// How relevance decays for records in a layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayProfile {
    /// Recency half-life in milliseconds
    pub halflife_ms: u64,
    /// Records below this relevance are pruned
    pub prune_threshold: f64,
    /// Weight of base importance in the relevance mix
    pub weight_importance: f64,
    /// Weight of recency in the relevance mix
    pub weight_recency: f64,
    /// Weight of access frequency in the relevance mix
    pub weight_frequency: f64,
    /// Protected layers are never pruned
    pub protected: bool,
}

impl DecayProfile {
    /// Stretch or shrink the half-life by `factor`.
    ///
    /// # Panics
    /// Panics if `factor` is not positive.
    #[must_use]
    pub fn scaled(mut self, factor: f64) -> Self {
        assert!(factor > 0.0, "scale factor must be positive, got {factor}");

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        #[allow(clippy::cast_precision_loss)]
        let scaled_ms = (self.halflife_ms as f64 * factor) as u64;
        self.halflife_ms = scaled_ms.max(1);
        self
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_as_str() {
        assert_eq!(MemoryLayer::Ephemeral.as_str(), "ephemeral");
        assert_eq!(MemoryLayer::Working.as_str(), "working");
        assert_eq!(MemoryLayer::Semantic.as_str(), "semantic");
        assert_eq!(MemoryLayer::Procedural.as_str(), "procedural");
        assert_eq!(MemoryLayer::Reflective.as_str(), "reflective");
    }

    #[test]
    fn test_layer_parse() {
        assert_eq!(MemoryLayer::parse("ephemeral"), Some(MemoryLayer::Ephemeral));
        assert_eq!(MemoryLayer::parse("WORKING"), Some(MemoryLayer::Working));
        assert_eq!(MemoryLayer::parse("long_term"), Some(MemoryLayer::Semantic));
        assert_eq!(MemoryLayer::parse("meta"), Some(MemoryLayer::Reflective));
        assert_eq!(MemoryLayer::parse("unknown"), None);
    }

    #[test]
    fn test_profile_scaled() {
        let profile = MemoryLayer::Working.decay_profile();
        let stretched = profile.scaled(2.0);
        assert_eq!(stretched.halflife_ms, profile.halflife_ms * 2);
        assert!((stretched.prune_threshold - profile.prune_threshold).abs() < 1e-9);
    }

    #[test]
    fn test_layer_roundtrip() {
        for layer in MemoryLayer::all() {
            assert_eq!(MemoryLayer::parse(layer.as_str()), Some(*layer));
        }
    }

    #[test]
    fn test_decay_profiles_ordered_by_halflife() {
        let ephemeral = MemoryLayer::Ephemeral.decay_profile();
        let working = MemoryLayer::Working.decay_profile();
        let semantic = MemoryLayer::Semantic.decay_profile();

        assert!(ephemeral.halflife_ms < working.halflife_ms);
        assert!(working.halflife_ms < semantic.halflife_ms);
    }

    #[test]
    fn test_reflective_layer_protected() {
        assert!(MemoryLayer::Reflective.decay_profile().protected);
        assert!(!MemoryLayer::Semantic.decay_profile().protected);
    }

    #[test]
    fn test_procedural_weights_frequency_heavier() {
        let procedural = MemoryLayer::Procedural.decay_profile();
        let semantic = MemoryLayer::Semantic.decay_profile();

        assert!(procedural.weight_frequency > semantic.weight_frequency);
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&MemoryLayer::Ephemeral).unwrap();
        assert_eq!(json, "\"ephemeral\"");

        let layer: MemoryLayer = serde_json::from_str("\"procedural\"").unwrap();
        assert_eq!(layer, MemoryLayer::Procedural);
    }
}
