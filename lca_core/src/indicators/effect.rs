//! # Life-Cycle Phases and Indicator Effects
//!
//! Indicator values bucketed by the life-cycle phase they were incurred
//! in. A phase that was never populated is "value absent", never zero:
//! downstream tables distinguish "no data" from "0.0 kg CO2 eq".

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{LcaError, LcaResult};
use crate::indicators::IndicatorIdent;

/// A stage of a building element's life over which impacts aggregate.
///
/// # Example
/// ```
/// use lca_core::indicators::LifeCyclePhase;
///
/// let phase = LifeCyclePhase::from_code("end_of_life").unwrap();
/// assert_eq!(phase, LifeCyclePhase::EndOfLife);
/// assert!(LifeCyclePhase::from_code("warranty").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeCyclePhase {
    /// Sum over all phases
    Total,
    /// Manufacturing and construction
    Production,
    /// Repair and replacement over the service life
    Maintenance,
    /// Operational energy and water use
    Operation,
    /// Demolition and disposal
    EndOfLife,
    /// Reuse, recovery, recycling potential
    Recycling,
}

impl LifeCyclePhase {
    /// All phases in report order.
    pub const ALL: [LifeCyclePhase; 6] = [
        LifeCyclePhase::Total,
        LifeCyclePhase::Production,
        LifeCyclePhase::Maintenance,
        LifeCyclePhase::Operation,
        LifeCyclePhase::EndOfLife,
        LifeCyclePhase::Recycling,
    ];

    /// The string code table renderers address this phase by.
    pub fn code(&self) -> &'static str {
        match self {
            LifeCyclePhase::Total => "total",
            LifeCyclePhase::Production => "production",
            LifeCyclePhase::Maintenance => "maintenance",
            LifeCyclePhase::Operation => "operation",
            LifeCyclePhase::EndOfLife => "end_of_life",
            LifeCyclePhase::Recycling => "recycling",
        }
    }

    /// Parse a phase code.
    ///
    /// Unknown codes fail with `UnknownPhase`, so a typo in a rendering
    /// collaborator surfaces as a typed error instead of an empty column.
    pub fn from_code(code: &str) -> LcaResult<LifeCyclePhase> {
        match code {
            "total" => Ok(LifeCyclePhase::Total),
            "production" => Ok(LifeCyclePhase::Production),
            "maintenance" => Ok(LifeCyclePhase::Maintenance),
            "operation" => Ok(LifeCyclePhase::Operation),
            "end_of_life" => Ok(LifeCyclePhase::EndOfLife),
            "recycling" => Ok(LifeCyclePhase::Recycling),
            unknown => Err(LcaError::unknown_phase(unknown)),
        }
    }
}

impl fmt::Display for LifeCyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One indicator's values across life-cycle phases.
///
/// ## JSON Example
///
/// ```json
/// {
///   "ident": "gwp",
///   "values": { "production": 120.5, "end_of_life": 3.2 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorEffect {
    ident: IndicatorIdent,
    values: BTreeMap<LifeCyclePhase, f64>,
}

impl IndicatorEffect {
    /// Create an effect with no phase populated.
    pub fn new(ident: impl Into<IndicatorIdent>) -> Self {
        IndicatorEffect {
            ident: ident.into(),
            values: BTreeMap::new(),
        }
    }

    /// The indicator these values belong to.
    pub fn ident(&self) -> &IndicatorIdent {
        &self.ident
    }

    /// Set a phase value, replacing any existing one.
    pub fn set(&mut self, phase: LifeCyclePhase, value: f64) {
        self.values.insert(phase, value);
    }

    /// Add to a phase value, populating it if absent.
    pub fn accumulate(&mut self, phase: LifeCyclePhase, delta: f64) {
        *self.values.entry(phase).or_insert(0.0) += delta;
    }

    /// The value for a phase, or `None` when that phase was never
    /// populated.
    pub fn value(&self, phase: LifeCyclePhase) -> Option<f64> {
        self.values.get(&phase).copied()
    }

    /// Value for [`LifeCyclePhase::Total`].
    pub fn total(&self) -> Option<f64> {
        self.value(LifeCyclePhase::Total)
    }

    /// Value for [`LifeCyclePhase::Production`].
    pub fn production(&self) -> Option<f64> {
        self.value(LifeCyclePhase::Production)
    }

    /// Value for [`LifeCyclePhase::Maintenance`].
    pub fn maintenance(&self) -> Option<f64> {
        self.value(LifeCyclePhase::Maintenance)
    }

    /// Value for [`LifeCyclePhase::Operation`].
    pub fn operation(&self) -> Option<f64> {
        self.value(LifeCyclePhase::Operation)
    }

    /// Value for [`LifeCyclePhase::EndOfLife`].
    pub fn end_of_life(&self) -> Option<f64> {
        self.value(LifeCyclePhase::EndOfLife)
    }

    /// Value for [`LifeCyclePhase::Recycling`].
    pub fn recycling(&self) -> Option<f64> {
        self.value(LifeCyclePhase::Recycling)
    }

    /// Look up a phase value by string code, for generic table-rendering
    /// collaborators.
    ///
    /// A code that does not name a phase fails with `UnknownPhase`; a
    /// valid code whose phase was never populated yields `Ok(None)`.
    pub fn value_by_code(&self, code: &str) -> LcaResult<Option<f64>> {
        Ok(self.value(LifeCyclePhase::from_code(code)?))
    }

    /// Sum of the populated non-total phases, or `None` when no phase is
    /// populated.
    pub fn phase_sum(&self) -> Option<f64> {
        let mut sum = None;
        for (phase, value) in &self.values {
            if *phase == LifeCyclePhase::Total {
                continue;
            }
            *sum.get_or_insert(0.0) += value;
        }
        sum
    }

    /// Populate [`LifeCyclePhase::Total`] with the sum of the populated
    /// phases. Leaves the total absent when nothing is populated.
    pub fn fill_total(&mut self) {
        if let Some(sum) = self.phase_sum() {
            self.values.insert(LifeCyclePhase::Total, sum);
        }
    }

    /// Iterate over the populated phases in phase order.
    pub fn iter(&self) -> impl Iterator<Item = (LifeCyclePhase, f64)> + '_ {
        self.values.iter().map(|(phase, value)| (*phase, *value))
    }
}
