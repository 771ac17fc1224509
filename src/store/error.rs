//! Store Errors
//!
//! `TigerStyle`: Explicit error types with context.

use thiserror::Error;

use crate::layer::MemoryLayer;

/// Errors from store operations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Record not found
    #[error("record not found: {layer}/{key}")]
    NotFound {
        /// Layer searched
        layer: MemoryLayer,
        /// Key that was not found
        key: String,
    },

    /// Validation error
    #[error("validation error: {message}")]
    Validation {
        /// Validation error message
        message: String,
    },

    /// Layer capacity exceeded
    #[error("layer {layer} full: {current}/{max} {unit}")]
    Capacity {
        /// Layer that is full
        layer: MemoryLayer,
        /// Current usage
        current: usize,
        /// Maximum allowed
        max: usize,
        /// Unit of the limit ("records" or "bytes")
        unit: &'static str,
    },

    /// Timeout error
    #[error("timeout after {duration_ms}ms")]
    Timeout {
        /// Duration in milliseconds
        duration_ms: u64,
    },

    /// Simulated fault (for DST)
    #[error("simulated fault: {fault_type}")]
    SimulatedFault {
        /// Type of simulated fault
        fault_type: String,
    },

    /// Internal error
    #[error("internal error: {message}")]
    Internal {
        /// Error message
        message: String,
    },
}

impl StoreError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(layer: MemoryLayer, key: impl Into<String>) -> Self {
        Self::NotFound {
            layer,
            key: key.into(),
        }
    }

    /// Create a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a capacity error.
    #[must_use]
    pub fn capacity(layer: MemoryLayer, current: usize, max: usize, unit: &'static str) -> Self {
        Self::Capacity {
            layer,
            current,
            max,
            unit,
        }
    }

    /// Create a timeout error.
    #[must_use]
    pub fn timeout(duration_ms: u64) -> Self {
        Self::Timeout { duration_ms }
    }

    /// Create a simulated fault error.
    #[must_use]
    pub fn simulated_fault(fault_type: impl Into<String>) -> Self {
        Self::SimulatedFault {
            fault_type: fault_type.into(),
        }
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if this is a transient error (can be retried).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::SimulatedFault { .. })
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_constructors() {
        let err = StoreError::not_found(MemoryLayer::Semantic, "k");
        assert!(matches!(err, StoreError::NotFound { key, .. } if key == "k"));

        let err = StoreError::validation("bad data");
        assert!(matches!(err, StoreError::Validation { message } if message == "bad data"));
    }

    #[test]
    fn test_error_display() {
        let err = StoreError::not_found(MemoryLayer::Working, "active_project");
        assert_eq!(err.to_string(), "record not found: working/active_project");

        let err = StoreError::capacity(MemoryLayer::Ephemeral, 10, 10, "records");
        assert_eq!(err.to_string(), "layer ephemeral full: 10/10 records");
    }

    #[test]
    fn test_is_transient() {
        assert!(StoreError::timeout(1000).is_transient());
        assert!(StoreError::simulated_fault("store_write_fail").is_transient());

        assert!(!StoreError::not_found(MemoryLayer::Semantic, "k").is_transient());
        assert!(!StoreError::validation("bad").is_transient());
    }
}
