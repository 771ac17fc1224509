//! Configuration
//!
//! Memory manager configuration with builder methods and environment
//! loading.
//!
//! `TigerStyle`: Explicit options, validated at the boundary.

use thiserror::Error;

use crate::constants::{RECALL_RESULTS_COUNT_DEFAULT, RECALL_RESULTS_COUNT_MAX};

/// Environment variable overriding the default recall limit.
pub const ENV_RECALL_LIMIT: &str = "AUGMENT_RECALL_LIMIT";
/// Environment variable toggling embeddings ("true"/"false").
pub const ENV_EMBEDDINGS: &str = "AUGMENT_EMBEDDINGS";
/// Environment variable scaling decay half-lives.
pub const ENV_DECAY_SCALE: &str = "AUGMENT_DECAY_SCALE";

/// Errors from configuration loading.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// An environment variable held an unparseable value
    #[error("invalid value for {variable}: {value}")]
    InvalidValue {
        /// The variable name
        variable: &'static str,
        /// The offending value
        value: String,
    },

    /// A value parsed but violated its bounds
    #[error("{variable} out of range: {message}")]
    OutOfRange {
        /// The variable name
        variable: &'static str,
        /// What bound was violated
        message: String,
    },
}

/// Configuration for a memory manager.
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// Default number of matches returned by recall
    pub recall_limit: usize,
    /// Whether to embed stored data and rank by vector similarity
    pub embeddings_enabled: bool,
    /// Multiplier applied to every layer's decay half-life
    pub decay_scale: f64,
}

impl MemoryConfig {
    /// Create a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            recall_limit: RECALL_RESULTS_COUNT_DEFAULT,
            embeddings_enabled: true,
            decay_scale: 1.0,
        }
    }

    /// Set the default recall limit.
    ///
    /// # Panics
    /// Panics if limit is zero or exceeds `RECALL_RESULTS_COUNT_MAX`.
    #[must_use]
    pub fn with_recall_limit(mut self, limit: usize) -> Self {
        assert!(limit > 0, "recall limit must be positive");
        assert!(
            limit <= RECALL_RESULTS_COUNT_MAX,
            "recall limit {limit} exceeds max {RECALL_RESULTS_COUNT_MAX}"
        );
        self.recall_limit = limit;
        self
    }

    /// Enable or disable embeddings.
    #[must_use]
    pub fn with_embeddings(mut self, enabled: bool) -> Self {
        self.embeddings_enabled = enabled;
        self
    }

    /// Set the decay half-life scale.
    ///
    /// # Panics
    /// Panics if the scale is not positive.
    #[must_use]
    pub fn with_decay_scale(mut self, scale: f64) -> Self {
        assert!(scale > 0.0, "decay scale must be positive, got {scale}");
        self.decay_scale = scale;
        self
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Load configuration from the environment, starting from defaults.
///
/// Unset variables keep their defaults. Set variables must parse and
/// pass validation.
///
/// # Errors
///
/// Returns `ConfigError` for unparseable or out-of-range values.
pub fn load_config() -> Result<MemoryConfig, ConfigError> {
    let mut config = MemoryConfig::new();

    if let Ok(value) = std::env::var(ENV_RECALL_LIMIT) {
        let limit: usize = value.parse().map_err(|_| ConfigError::InvalidValue {
            variable: ENV_RECALL_LIMIT,
            value: value.clone(),
        })?;
        if limit == 0 || limit > RECALL_RESULTS_COUNT_MAX {
            return Err(ConfigError::OutOfRange {
                variable: ENV_RECALL_LIMIT,
                message: format!("must be in [1, {RECALL_RESULTS_COUNT_MAX}], got {limit}"),
            });
        }
        config.recall_limit = limit;
    }

    if let Ok(value) = std::env::var(ENV_EMBEDDINGS) {
        config.embeddings_enabled = match value.to_lowercase().as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            _ => {
                return Err(ConfigError::InvalidValue {
                    variable: ENV_EMBEDDINGS,
                    value,
                })
            }
        };
    }

    if let Ok(value) = std::env::var(ENV_DECAY_SCALE) {
        let scale: f64 = value.parse().map_err(|_| ConfigError::InvalidValue {
            variable: ENV_DECAY_SCALE,
            value: value.clone(),
        })?;
        if scale <= 0.0 || !scale.is_finite() {
            return Err(ConfigError::OutOfRange {
                variable: ENV_DECAY_SCALE,
                message: format!("must be positive and finite, got {scale}"),
            });
        }
        config.decay_scale = scale;
    }

    Ok(config)
}
