//! # Error Types
//!
//! Structured error types for lca_core. Every failure carries enough
//! identity (field names, unit symbols, process configuration ids) for the
//! surrounding application to produce an actionable message without
//! re-deriving context.
//!
//! ## Example
//!
//! ```rust
//! use lca_core::errors::{LcaError, LcaResult};
//!
//! fn validate_quantity(value: f64) -> LcaResult<()> {
//!     if !value.is_finite() {
//!         return Err(LcaError::invalid_input(
//!             "value",
//!             value.to_string(),
//!             "Quantity value must be a finite number",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for lca_core operations
pub type LcaResult<T> = Result<T, LcaError>;

/// Structured error type for LCA computation operations.
///
/// Each variant provides specific context about what went wrong. The core
/// never logs and never recovers internally; errors unwind synchronously to
/// the caller, which translates them into user-facing messages.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum LcaError {
    /// An input value violates a construction-time contract
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A comparator was built over two different indicators
    #[error("Indicator mismatch: cannot compare '{left}' against '{right}'")]
    IndicatorMismatch { left: String, right: String },

    /// No conversion is declared for the requested unit pair
    #[error(
        "No conversion from '{from_unit}' to '{to_unit}' for process configuration '{process_config_id}'"
    )]
    MissingConversion {
        process_config_id: String,
        from_unit: String,
        to_unit: String,
    },

    /// A conversion for the unit pair is declared but carries no factor
    #[error(
        "Conversion from '{from_unit}' to '{to_unit}' for process configuration '{process_config_id}' is declared but unresolved"
    )]
    UnresolvedConversion {
        process_config_id: String,
        from_unit: String,
        to_unit: String,
    },

    /// A string phase key does not name a life-cycle phase
    #[error("Unknown life-cycle phase: '{name}'")]
    UnknownPhase { name: String },

    /// An element component references a process configuration the
    /// project does not contain
    #[error("Process configuration not found: '{process_config_id}'")]
    ProcessConfigNotFound { process_config_id: String },
}

impl LcaError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        LcaError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an IndicatorMismatch error
    pub fn indicator_mismatch(left: impl Into<String>, right: impl Into<String>) -> Self {
        LcaError::IndicatorMismatch {
            left: left.into(),
            right: right.into(),
        }
    }

    /// Create a MissingConversion error
    pub fn missing_conversion(
        process_config_id: impl Into<String>,
        from_unit: impl Into<String>,
        to_unit: impl Into<String>,
    ) -> Self {
        LcaError::MissingConversion {
            process_config_id: process_config_id.into(),
            from_unit: from_unit.into(),
            to_unit: to_unit.into(),
        }
    }

    /// Create an UnresolvedConversion error
    pub fn unresolved_conversion(
        process_config_id: impl Into<String>,
        from_unit: impl Into<String>,
        to_unit: impl Into<String>,
    ) -> Self {
        LcaError::UnresolvedConversion {
            process_config_id: process_config_id.into(),
            from_unit: from_unit.into(),
            to_unit: to_unit.into(),
        }
    }

    /// Create an UnknownPhase error
    pub fn unknown_phase(name: impl Into<String>) -> Self {
        LcaError::UnknownPhase { name: name.into() }
    }

    /// Create a ProcessConfigNotFound error
    pub fn process_config_not_found(process_config_id: impl Into<String>) -> Self {
        LcaError::ProcessConfigNotFound {
            process_config_id: process_config_id.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            LcaError::InvalidInput { .. } => "INVALID_INPUT",
            LcaError::IndicatorMismatch { .. } => "INDICATOR_MISMATCH",
            LcaError::MissingConversion { .. } => "MISSING_CONVERSION",
            LcaError::UnresolvedConversion { .. } => "UNRESOLVED_CONVERSION",
            LcaError::UnknownPhase { .. } => "UNKNOWN_PHASE",
            LcaError::ProcessConfigNotFound { .. } => "PROCESS_CONFIG_NOT_FOUND",
        }
    }

    /// Whether this error points at conversion data (declared factors),
    /// as opposed to caller-supplied input
    pub fn is_conversion_error(&self) -> bool {
        matches!(
            self,
            LcaError::MissingConversion { .. } | LcaError::UnresolvedConversion { .. }
        )
    }
}
