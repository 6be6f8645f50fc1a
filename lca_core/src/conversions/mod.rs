//! # Unit Conversions
//!
//! Conversion rules between physical units, the per-configuration set
//! they live in, and the converter that answers "given a quantity in unit
//! X, what is it in unit Y?".
//!
//! ## Structure
//!
//! - [`Conversion`] - a single declared rule (linear factor, unresolved
//!   placeholder, or identity)
//! - [`ConversionSet`] - deduplicated, direction-agnostic collection for
//!   one process configuration
//! - [`Converter`] - lookup plus numeric application, with diagnostics
//!   naming the configuration
//!
//! ## Example
//!
//! ```rust
//! use lca_core::conversions::{Conversion, ConversionSet, Converter};
//! use lca_core::units::Unit;
//!
//! let mut set = ConversionSet::new();
//! set.add(Conversion::linear(Unit::M3, Unit::Kg, 2400.0));
//!
//! let converter = Converter::new("concrete-c25", set);
//! let mass = converter.convert(2.0, &Unit::M3, &Unit::Kg).unwrap();
//! assert_eq!(mass, 4800.0);
//!
//! // the reverse direction is derived from the same declaration
//! let volume = converter.convert(4800.0, &Unit::Kg, &Unit::M3).unwrap();
//! assert!((volume - 2.0).abs() < 1e-9);
//! ```

pub mod converter;
pub mod set;

pub use converter::Converter;
pub use set::{build_conversion_sets, ConversionFactorRow, ConversionSet};

use serde::{Deserialize, Serialize};

use crate::units::Unit;

/// A declared rule for translating a value from one unit to another
/// within a single process configuration.
///
/// ## JSON Serialization
///
/// Conversions serialize with a "type" discriminator:
///
/// ```json
/// { "type": "Linear", "from": "m3", "to": "kg", "factor": 2400.0 }
/// { "type": "Unresolved", "from": "kg", "to": "MJ" }
/// { "type": "Identity", "unit": "kg" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Conversion {
    /// `to_value = from_value * factor`
    Linear { from: Unit, to: Unit, factor: f64 },
    /// The edge is known to be required but its factor is not yet defined.
    /// Applying it never yields a numeric result.
    Unresolved { from: Unit, to: Unit },
    /// Factor-1 no-op between a unit and itself
    Identity { unit: Unit },
}

impl Conversion {
    /// Create a linear conversion.
    pub fn linear(from: Unit, to: Unit, factor: f64) -> Self {
        Conversion::Linear { from, to, factor }
    }

    /// Create an unresolved placeholder conversion.
    pub fn unresolved(from: Unit, to: Unit) -> Self {
        Conversion::Unresolved { from, to }
    }

    /// Create an identity conversion.
    pub fn identity(unit: Unit) -> Self {
        Conversion::Identity { unit }
    }

    /// The unit values enter in.
    pub fn from_unit(&self) -> &Unit {
        match self {
            Conversion::Linear { from, .. } => from,
            Conversion::Unresolved { from, .. } => from,
            Conversion::Identity { unit } => unit,
        }
    }

    /// The unit values come out in.
    pub fn to_unit(&self) -> &Unit {
        match self {
            Conversion::Linear { to, .. } => to,
            Conversion::Unresolved { to, .. } => to,
            Conversion::Identity { unit } => unit,
        }
    }

    /// The numeric factor, if this conversion has one.
    pub fn factor(&self) -> Option<f64> {
        match self {
            Conversion::Linear { factor, .. } => Some(*factor),
            Conversion::Unresolved { .. } => None,
            Conversion::Identity { .. } => Some(1.0),
        }
    }

    /// Whether applying this conversion yields a numeric result.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Conversion::Unresolved { .. })
    }

    /// The same declaration viewed in the opposite direction.
    ///
    /// For linear conversions the factor becomes its reciprocal and the
    /// units swap; identity is its own inverse.
    pub fn inverted(&self) -> Conversion {
        match self {
            Conversion::Linear { from, to, factor } => Conversion::Linear {
                from: to.clone(),
                to: from.clone(),
                factor: 1.0 / factor,
            },
            Conversion::Unresolved { from, to } => Conversion::Unresolved {
                from: to.clone(),
                to: from.clone(),
            },
            Conversion::Identity { unit } => Conversion::Identity { unit: unit.clone() },
        }
    }

    /// Apply the rule to a value in the from-unit.
    ///
    /// Returns `None` only for [`Conversion::Unresolved`]; callers turn
    /// that into an `UnresolvedConversion` error carrying the owning
    /// configuration id.
    pub fn apply(&self, value: f64) -> Option<f64> {
        match self {
            Conversion::Linear { factor, .. } => Some(value * factor),
            Conversion::Unresolved { .. } => None,
            Conversion::Identity { .. } => Some(value),
        }
    }
}
