//! # lca_core - Building Life-Cycle Assessment Engine
//!
//! `lca_core` is the computational heart of Ecoframe: unit conversion,
//! per-component quantity derivation, and life-cycle indicator
//! aggregation for building LCA reports. All inputs and outputs are
//! JSON-serializable; the surrounding web application feeds it persisted
//! rows and renders what comes back.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: pure functions and value types; a report computation
//!   owns all of its intermediate state
//! - **JSON-First**: every public type implements Serialize/Deserialize
//! - **Rich Errors**: structured error variants carrying unit symbols and
//!   configuration ids, not just strings
//! - **Fail Loudly**: an unconvertible quantity aborts the computation;
//!   the engine never silently substitutes an identity or zero conversion
//!
//! ## Quick Start
//!
//! ```rust
//! use lca_core::conversions::{Conversion, ConversionSet, Converter};
//! use lca_core::units::Unit;
//!
//! let mut conversions = ConversionSet::new();
//! conversions.add(Conversion::linear(Unit::M3, Unit::Kg, 2400.0));
//!
//! let converter = Converter::new("concrete-c25", conversions);
//! let mass = converter.convert(0.5, &Unit::M3, &Unit::Kg).unwrap();
//! assert_eq!(mass, 1200.0);
//! ```
//!
//! ## Modules
//!
//! - [`units`] - physical units and unit-bound quantities
//! - [`conversions`] - conversion rules, per-configuration sets, converter
//! - [`component`] - element component quantities (layers and scalars)
//! - [`indicators`] - indicator idents, benchmark comparison, phase effects
//! - [`project`] - the data model a report computation runs over
//! - [`report`] - report computation and benchmark classification
//! - [`errors`] - structured error types

pub mod component;
pub mod conversions;
pub mod errors;
pub mod indicators;
pub mod project;
pub mod report;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use component::{ElementComponentQuantity, LayerGeometry};
pub use conversions::{Conversion, ConversionSet, Converter};
pub use errors::{LcaError, LcaResult};
pub use indicators::{
    BenchmarkRating, IndicatorEffect, IndicatorIdent, IndicatorValue, LifeCyclePhase,
    ReferenceIndicatorComparator, ReferenceIndicatorValue,
};
pub use project::{Element, ElementComponent, ProcessConfig, Project};
pub use report::{compute_report, ProjectReport};
pub use units::{Quantity, Unit};
