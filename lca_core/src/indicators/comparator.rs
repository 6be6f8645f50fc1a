//! # Benchmark Comparison
//!
//! Classifies a computed indicator value against a reference band so the
//! caller can render a better/equal/worse badge.
//!
//! For almost every indicator a lower value is better (less global
//! warming potential, less non-renewable energy demand). Renewable
//! primary energy is the exception: a building covering more of its
//! demand renewably scores better, so the classification flips sign for
//! those indicators.

use serde::{Deserialize, Serialize};

use crate::errors::{LcaError, LcaResult};
use crate::indicators::{IndicatorValue, ReferenceIndicatorValue};

/// Classification of a computed value against a reference band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BenchmarkRating {
    /// Outside the band, on the favorable side
    Better,
    /// Within the band (inclusive)
    Equal,
    /// Outside the band, on the unfavorable side
    Worse,
}

impl BenchmarkRating {
    /// Integer form for rendering collaborators: 1 / 0 / -1.
    pub fn score(&self) -> i32 {
        match self {
            BenchmarkRating::Better => 1,
            BenchmarkRating::Equal => 0,
            BenchmarkRating::Worse => -1,
        }
    }
}

impl std::fmt::Display for BenchmarkRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BenchmarkRating::Better => "better",
            BenchmarkRating::Equal => "equal",
            BenchmarkRating::Worse => "worse",
        };
        write!(f, "{}", label)
    }
}

/// Compares one computed indicator value against one reference band.
///
/// Both sides must belong to the same indicator; construction enforces
/// that.
///
/// ## Example
///
/// ```rust
/// use lca_core::indicators::{
///     BenchmarkRating, IndicatorValue, ReferenceIndicatorComparator, ReferenceIndicatorValue,
/// };
///
/// let value = IndicatorValue::new("gwp", 0.5);
/// let band = ReferenceIndicatorValue::new("gwp", 1.0, 1.0, 1.0);
///
/// let comparator = ReferenceIndicatorComparator::new(value, band).unwrap();
/// assert_eq!(comparator.compare(), BenchmarkRating::Better);
/// assert_eq!(comparator.deviation(), -0.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceIndicatorComparator {
    value: IndicatorValue,
    reference: ReferenceIndicatorValue,
}

impl ReferenceIndicatorComparator {
    /// Create a comparator.
    ///
    /// Fails with `IndicatorMismatch` (naming both idents) when value and
    /// reference belong to different indicators.
    pub fn new(value: IndicatorValue, reference: ReferenceIndicatorValue) -> LcaResult<Self> {
        if value.ident != reference.ident {
            return Err(LcaError::indicator_mismatch(
                value.ident.as_str(),
                reference.ident.as_str(),
            ));
        }
        Ok(ReferenceIndicatorComparator { value, reference })
    }

    /// Classify the value against the band.
    ///
    /// Values above the maximum are worse, values below the minimum are
    /// better, values within the band (inclusive) are equal. For
    /// renewable-primary-energy indicators the out-of-band cases flip.
    pub fn compare(&self) -> BenchmarkRating {
        let renewable = self.value.ident.is_renewable_primary_energy();
        if self.value.value > self.reference.max {
            if renewable {
                BenchmarkRating::Better
            } else {
                BenchmarkRating::Worse
            }
        } else if self.value.value < self.reference.min {
            if renewable {
                BenchmarkRating::Worse
            } else {
                BenchmarkRating::Better
            }
        } else {
            BenchmarkRating::Equal
        }
    }

    /// Relative deviation from the band average:
    /// `(value - avg) / |avg|`.
    ///
    /// There is no zero-guard: with a zero average the result is
    /// non-finite. Callers rendering deviations are responsible for
    /// checking `is_finite()` on bands that can carry a zero average.
    pub fn deviation(&self) -> f64 {
        (self.value.value - self.reference.avg) / self.reference.avg.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comparator(ident: &str, value: f64, min: f64, avg: f64, max: f64) -> ReferenceIndicatorComparator {
        ReferenceIndicatorComparator::new(
            IndicatorValue::new(ident, value),
            ReferenceIndicatorValue::new(ident, min, avg, max),
        )
        .unwrap()
    }

    #[test]
    fn test_degenerate_band_boundaries() {
        // band collapsed to a point: exactly on it is equal
        assert_eq!(comparator("gwp", 1.0, 1.0, 1.0, 1.0).compare(), BenchmarkRating::Equal);
        assert_eq!(comparator("gwp", 0.5, 1.0, 1.0, 1.0).compare(), BenchmarkRating::Better);
        assert_eq!(comparator("gwp", 1.5, 1.0, 1.0, 1.0).compare(), BenchmarkRating::Worse);
    }

    #[test]
    fn test_scores() {
        assert_eq!(comparator("gwp", 0.5, 1.0, 1.0, 1.0).compare().score(), 1);
        assert_eq!(comparator("gwp", 1.0, 1.0, 1.0, 1.0).compare().score(), 0);
        assert_eq!(comparator("gwp", 1.5, 1.0, 1.0, 1.0).compare().score(), -1);
    }

    #[test]
    fn test_band_edges_are_inclusive() {
        assert_eq!(comparator("gwp", 1.0, 1.0, 2.0, 3.0).compare(), BenchmarkRating::Equal);
        assert_eq!(comparator("gwp", 3.0, 1.0, 2.0, 3.0).compare(), BenchmarkRating::Equal);
    }

    #[test]
    fn test_renewable_energy_flips_classification() {
        // more renewable primary energy than the benchmark is better
        assert_eq!(comparator("pert", 4.0, 1.0, 2.0, 3.0).compare(), BenchmarkRating::Better);
        assert_eq!(comparator("pert", 0.5, 1.0, 2.0, 3.0).compare(), BenchmarkRating::Worse);
        assert_eq!(comparator("pert", 2.0, 1.0, 2.0, 3.0).compare(), BenchmarkRating::Equal);
    }

    #[test]
    fn test_mismatched_idents_rejected() {
        let error = ReferenceIndicatorComparator::new(
            IndicatorValue::new("abc", 1.0),
            ReferenceIndicatorValue::new("xyz", 0.0, 1.0, 2.0),
        )
        .unwrap_err();

        assert_eq!(error.error_code(), "INDICATOR_MISMATCH");
        let message = error.to_string();
        assert!(message.contains("abc"));
        assert!(message.contains("xyz"));
    }

    #[test]
    fn test_deviation_formula() {
        assert_eq!(comparator("gwp", 0.5, 0.0, 1.0, 2.0).deviation(), -0.5);
        // negative averages anchor on their absolute value
        assert_eq!(comparator("gwp", -0.5, -2.0, -1.0, 0.0).deviation(), 0.5);
    }

    #[test]
    fn test_deviation_zero_average_is_non_finite() {
        assert!(!comparator("gwp", 1.0, -1.0, 0.0, 1.0).deviation().is_finite());
    }

    #[test]
    fn test_serialization() {
        let comparator = comparator("gwp", 0.5, 1.0, 1.0, 1.0);
        let json = serde_json::to_string(&comparator).unwrap();
        let roundtrip: ReferenceIndicatorComparator = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, comparator);
    }
}
