//! FaultInjector - Probabilistic Fault Injection
//!
//! TigerStyle: Explicit fault injection for chaos testing.

use std::collections::HashMap;
use std::sync::Mutex;

use super::rng::DeterministicRng;
use crate::constants::DST_FAULT_PROBABILITY_MAX;

/// Types of faults that can be injected.
///
/// TigerStyle: Every fault type is explicit and documented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultType {
    /// Store write operation fails
    StoreWriteFail,
    /// Store read operation fails
    StoreReadFail,
    /// Store delete operation fails
    StoreDeleteFail,
    /// Store scan/search operation fails
    StoreScanFail,
    /// Embedding request times out
    EmbeddingTimeout,
    /// Embedding provider rate limit exceeded
    EmbeddingRateLimit,
    /// Embedding provider unavailable
    EmbeddingUnavailable,
}

impl FaultType {
    /// Get the fault type name as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StoreWriteFail => "store_write_fail",
            Self::StoreReadFail => "store_read_fail",
            Self::StoreDeleteFail => "store_delete_fail",
            Self::StoreScanFail => "store_scan_fail",
            Self::EmbeddingTimeout => "embedding_timeout",
            Self::EmbeddingRateLimit => "embedding_rate_limit",
            Self::EmbeddingUnavailable => "embedding_unavailable",
        }
    }
}

/// Configuration for a specific fault.
#[derive(Debug, Clone)]
pub struct FaultConfig {
    /// The type of fault
    pub fault_type: FaultType,
    /// Probability of injection (0.0 to 1.0)
    pub probability: f64,
    /// Optional operation filter (substring match)
    pub operation_filter: Option<String>,
    /// Maximum number of injections (None = unlimited)
    pub max_injections: Option<u64>,
}

impl FaultConfig {
    /// Create a new fault configuration.
    ///
    /// # Panics
    /// Panics if probability is not in [0, 1].
    #[must_use]
    pub fn new(fault_type: FaultType, probability: f64) -> Self {
        // Precondition
        assert!(
            (0.0..=DST_FAULT_PROBABILITY_MAX).contains(&probability),
            "probability must be in [0, {}], got {}",
            DST_FAULT_PROBABILITY_MAX,
            probability
        );

        Self {
            fault_type,
            probability,
            operation_filter: None,
            max_injections: None,
        }
    }

    /// Set operation filter (fault only applies to matching operations).
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.operation_filter = Some(filter.into());
        self
    }

    /// Set maximum number of injections.
    #[must_use]
    pub fn with_max_injections(mut self, max: u64) -> Self {
        // Precondition
        assert!(max > 0, "max_injections must be positive");
        self.max_injections = Some(max);
        self
    }
}

/// Fault injector for simulation testing.
///
/// TigerStyle:
/// - Explicit fault registration
/// - Deterministic through RNG
/// - Interior mutability for sharing via Arc
#[derive(Debug)]
pub struct FaultInjector {
    /// RNG wrapped in Mutex for interior mutability (allows sharing via Arc)
    rng: Mutex<DeterministicRng>,
    configs: Vec<FaultConfig>,
    /// Current injection counts (interior mutability)
    injection_counts: Mutex<HashMap<FaultType, u64>>,
}

impl FaultInjector {
    /// Create a new fault injector with the given RNG.
    #[must_use]
    pub fn new(rng: DeterministicRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            configs: Vec::new(),
            injection_counts: Mutex::new(HashMap::new()),
        }
    }

    /// Register a fault configuration.
    ///
    /// Note: Registration must happen before sharing via Arc.
    pub fn register(&mut self, config: FaultConfig) {
        self.configs.push(config);
    }

    /// Check whether a fault should be injected for this operation.
    ///
    /// Returns the fault type to inject, or None.
    pub fn should_inject(&self, operation: &str) -> Option<FaultType> {
        for config in &self.configs {
            // Respect operation filter
            if let Some(ref filter) = config.operation_filter {
                if !operation.contains(filter.as_str()) {
                    continue;
                }
            }

            // Respect injection cap
            if let Some(max) = config.max_injections {
                let counts = self.injection_counts.lock().unwrap();
                if counts.get(&config.fault_type).copied().unwrap_or(0) >= max {
                    continue;
                }
            }

            let roll = self.rng.lock().unwrap().next_bool(config.probability);
            if roll {
                let mut counts = self.injection_counts.lock().unwrap();
                *counts.entry(config.fault_type).or_insert(0) += 1;
                return Some(config.fault_type);
            }
        }

        None
    }

    /// Total number of injections for a fault type.
    #[must_use]
    pub fn injection_count(&self, fault_type: FaultType) -> u64 {
        self.injection_counts
            .lock()
            .unwrap()
            .get(&fault_type)
            .copied()
            .unwrap_or(0)
    }
}
