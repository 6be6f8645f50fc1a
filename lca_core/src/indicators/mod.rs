//! # Environmental Indicators
//!
//! Named environmental-impact metrics, their computed values, and the
//! reference bands they are benchmarked against.
//!
//! ## Structure
//!
//! - [`IndicatorIdent`] - string identifier with a static registry of
//!   known indicators
//! - [`IndicatorValue`] / [`ReferenceIndicatorValue`] - a computed value
//!   vs. a min/avg/max reference band
//! - [`comparator`] - better/equal/worse classification against a band
//! - [`effect`] - values aggregated per life-cycle phase
//!
//! ## Example
//!
//! ```rust
//! use lca_core::indicators::IndicatorIdent;
//!
//! let gwp = IndicatorIdent::new("gwp");
//! assert!(!gwp.is_renewable_primary_energy());
//! assert_eq!(gwp.info().unwrap().unit, "kg CO2 eq");
//!
//! let pert = IndicatorIdent::new("PERT");
//! assert!(pert.is_renewable_primary_energy());
//! ```

pub mod comparator;
pub mod effect;

pub use comparator::{BenchmarkRating, ReferenceIndicatorComparator};
pub use effect::{IndicatorEffect, LifeCyclePhase};

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Static description of a known indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorInfo {
    /// Identifier the indicator is keyed by everywhere
    pub ident: &'static str,
    /// Display name
    pub name: &'static str,
    /// Unit the indicator is reported in
    pub unit: &'static str,
    /// Whether this indicator measures renewable primary energy
    /// (for which higher values are better)
    pub renewable_primary_energy: bool,
}

/// Indicators known to the engine, in report order.
///
/// Process data may carry indicators outside this list; they aggregate
/// normally but have no display metadata and are never treated as
/// renewable primary energy.
pub const KNOWN_INDICATORS: &[IndicatorInfo] = &[
    IndicatorInfo {
        ident: "gwp",
        name: "Global warming potential",
        unit: "kg CO2 eq",
        renewable_primary_energy: false,
    },
    IndicatorInfo {
        ident: "odp",
        name: "Ozone depletion potential",
        unit: "kg R11 eq",
        renewable_primary_energy: false,
    },
    IndicatorInfo {
        ident: "pocp",
        name: "Photochemical ozone creation potential",
        unit: "kg C2H4 eq",
        renewable_primary_energy: false,
    },
    IndicatorInfo {
        ident: "ap",
        name: "Acidification potential",
        unit: "kg SO2 eq",
        renewable_primary_energy: false,
    },
    IndicatorInfo {
        ident: "ep",
        name: "Eutrophication potential",
        unit: "kg PO4 eq",
        renewable_primary_energy: false,
    },
    IndicatorInfo {
        ident: "adpe",
        name: "Abiotic depletion potential, elements",
        unit: "kg Sb eq",
        renewable_primary_energy: false,
    },
    IndicatorInfo {
        ident: "adpf",
        name: "Abiotic depletion potential, fossil fuels",
        unit: "MJ",
        renewable_primary_energy: false,
    },
    IndicatorInfo {
        ident: "pet",
        name: "Primary energy, total",
        unit: "MJ",
        renewable_primary_energy: false,
    },
    IndicatorInfo {
        ident: "pert",
        name: "Primary energy, renewable, total",
        unit: "MJ",
        renewable_primary_energy: true,
    },
    IndicatorInfo {
        ident: "penrt",
        name: "Primary energy, non-renewable, total",
        unit: "MJ",
        renewable_primary_energy: false,
    },
];

static REGISTRY: Lazy<HashMap<&'static str, &'static IndicatorInfo>> = Lazy::new(|| {
    KNOWN_INDICATORS
        .iter()
        .map(|info| (info.ident, info))
        .collect()
});

/// A named indicator identifier.
///
/// Idents are normalized to lowercase so that import rows spelled `GWP`
/// and `gwp` key the same indicator. Deserialization routes through
/// [`IndicatorIdent::new`], so the normalization holds for idents read
/// from persisted rows as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct IndicatorIdent(String);

impl IndicatorIdent {
    /// Create an ident, trimming and lowercasing the raw string.
    pub fn new(ident: impl AsRef<str>) -> Self {
        IndicatorIdent(ident.as_ref().trim().to_lowercase())
    }

    /// The normalized identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Registry metadata for this ident, when known.
    pub fn info(&self) -> Option<&'static IndicatorInfo> {
        REGISTRY.get(self.0.as_str()).copied()
    }

    /// Whether this indicator measures renewable primary energy.
    ///
    /// Unknown idents are not renewable.
    pub fn is_renewable_primary_energy(&self) -> bool {
        self.info()
            .map(|info| info.renewable_primary_energy)
            .unwrap_or(false)
    }
}

impl fmt::Display for IndicatorIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for IndicatorIdent {
    fn from(ident: &str) -> Self {
        IndicatorIdent::new(ident)
    }
}

impl From<String> for IndicatorIdent {
    fn from(ident: String) -> Self {
        IndicatorIdent::new(ident)
    }
}

impl From<IndicatorIdent> for String {
    fn from(ident: IndicatorIdent) -> Self {
        ident.0
    }
}

/// A computed value for one indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorValue {
    /// The indicator this value belongs to
    pub ident: IndicatorIdent,
    /// The computed value, in the indicator's unit
    pub value: f64,
}

impl IndicatorValue {
    /// Create an indicator value.
    pub fn new(ident: impl Into<IndicatorIdent>, value: f64) -> Self {
        IndicatorValue {
            ident: ident.into(),
            value,
        }
    }
}

/// A benchmark band (min/avg/max) for one indicator, drawn from
/// comparable buildings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceIndicatorValue {
    /// The indicator this band belongs to
    pub ident: IndicatorIdent,
    /// Lower band edge
    pub min: f64,
    /// Band average, the anchor for deviation
    pub avg: f64,
    /// Upper band edge
    pub max: f64,
}

impl ReferenceIndicatorValue {
    /// Create a reference band.
    pub fn new(ident: impl Into<IndicatorIdent>, min: f64, avg: f64, max: f64) -> Self {
        ReferenceIndicatorValue {
            ident: ident.into(),
            min,
            avg,
            max,
        }
    }
}
