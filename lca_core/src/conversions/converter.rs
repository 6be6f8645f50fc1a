//! # Converter
//!
//! Resolves from/to unit pairs against a [`ConversionSet`] and performs
//! the numeric conversion. Stateless beyond the set and the configuration
//! id used in diagnostics; one instance per process configuration.

use serde::{Deserialize, Serialize};

use crate::conversions::{Conversion, ConversionSet};
use crate::errors::{LcaError, LcaResult};
use crate::units::{Quantity, Unit};

/// Pure query interface over one configuration's declared conversions.
///
/// ## Example
///
/// ```rust
/// use lca_core::conversions::{Conversion, ConversionSet, Converter};
/// use lca_core::units::Unit;
///
/// let mut set = ConversionSet::new();
/// set.add(Conversion::linear(Unit::M3, Unit::Kg, 30.0));
/// let converter = Converter::new("insulation-eps", set);
///
/// assert_eq!(converter.convert(2.0, &Unit::M3, &Unit::Kg).unwrap(), 60.0);
///
/// // no declared edge between kg and MJ for this configuration
/// assert!(converter.convert(1.0, &Unit::Kg, &Unit::Mj).is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Converter {
    process_config_id: String,
    conversions: ConversionSet,
}

impl Converter {
    /// Create a converter for one process configuration.
    pub fn new(process_config_id: impl Into<String>, conversions: ConversionSet) -> Self {
        Converter {
            process_config_id: process_config_id.into(),
            conversions,
        }
    }

    /// The configuration id used in error diagnostics.
    pub fn process_config_id(&self) -> &str {
        &self.process_config_id
    }

    /// The underlying conversion set.
    pub fn conversions(&self) -> &ConversionSet {
        &self.conversions
    }

    /// Resolve the conversion for a unit pair.
    ///
    /// Fails with `MissingConversion` when the set holds nothing for the
    /// pair; the returned conversion may still be
    /// [`Unresolved`](Conversion::Unresolved).
    pub fn resolve(&self, from: &Unit, to: &Unit) -> LcaResult<Conversion> {
        self.conversions.find(from, to).ok_or_else(|| {
            LcaError::missing_conversion(&self.process_config_id, from.symbol(), to.symbol())
        })
    }

    /// Convert a value from one unit to another.
    ///
    /// Equal units short-circuit to the value untouched, independent of
    /// the set contents. Everything else goes through the set; an absent
    /// pair fails with `MissingConversion`, a declared-but-unresolved
    /// pair with `UnresolvedConversion`.
    pub fn convert(&self, value: f64, from: &Unit, to: &Unit) -> LcaResult<f64> {
        if from == to {
            return Ok(value);
        }
        let conversion = self.resolve(from, to)?;
        conversion.apply(value).ok_or_else(|| {
            LcaError::unresolved_conversion(&self.process_config_id, from.symbol(), to.symbol())
        })
    }

    /// Convert a quantity into another unit.
    pub fn convert_quantity(&self, quantity: &Quantity, to: &Unit) -> LcaResult<Quantity> {
        let value = self.convert(quantity.value(), quantity.unit(), to)?;
        Ok(Quantity::raw(value, to.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversions::ConversionFactorRow;

    fn converter_with(conversions: Vec<Conversion>) -> Converter {
        let mut set = ConversionSet::new();
        for conversion in conversions {
            set.add(conversion);
        }
        Converter::new("test-config", set)
    }

    #[test]
    fn test_identity_short_circuit_on_empty_set() {
        let converter = converter_with(vec![]);
        let result = converter.convert(42.5, &Unit::Kg, &Unit::Kg).unwrap();
        assert_eq!(result, 42.5);
    }

    #[test]
    fn test_identity_short_circuit_ignores_set_contents() {
        // even a stored kg conversion does not interfere with kg -> kg
        let converter = converter_with(vec![Conversion::linear(Unit::Kg, Unit::M3, 0.5)]);
        assert_eq!(converter.convert(3.0, &Unit::Kg, &Unit::Kg).unwrap(), 3.0);
    }

    #[test]
    fn test_missing_conversion_fails_loudly() {
        let converter = converter_with(vec![]);
        let error = converter
            .convert(1.0, &Unit::Other("x".to_string()), &Unit::Other("y".to_string()))
            .unwrap_err();

        assert_eq!(error.error_code(), "MISSING_CONVERSION");
        let message = error.to_string();
        assert!(message.contains("test-config"));
        assert!(message.contains("'x'"));
        assert!(message.contains("'y'"));
    }

    #[test]
    fn test_unresolved_is_distinct_from_missing() {
        let converter = converter_with(vec![Conversion::unresolved(Unit::Kg, Unit::Mj)]);
        let error = converter.convert(1.0, &Unit::Kg, &Unit::Mj).unwrap_err();
        assert_eq!(error.error_code(), "UNRESOLVED_CONVERSION");
    }

    #[test]
    fn test_forward_and_reverse_fidelity() {
        let converter = converter_with(vec![Conversion::linear(
            Unit::Other("x".to_string()),
            Unit::Other("y".to_string()),
            5.0,
        )]);

        let forward = converter
            .convert(1.234, &Unit::Other("x".to_string()), &Unit::Other("y".to_string()))
            .unwrap();
        assert!((forward - 6.17).abs() < 1e-12);

        let reverse = converter
            .convert(10.0, &Unit::Other("y".to_string()), &Unit::Other("x".to_string()))
            .unwrap();
        assert!((reverse - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_string_numeric_rows_match_float_arithmetic() {
        // factor and value arrive as numeric strings from an import row
        let row: ConversionFactorRow = serde_json::from_str(
            r#"{
                "process_config_id": "test-config",
                "from_unit": "x",
                "to_unit": "y",
                "factor": "0.12345678901"
            }"#,
        )
        .unwrap();
        let converter = Converter::new("test-config", ConversionSet::from_rows([row]));

        let value: f64 = "1.23".trim().parse().unwrap();
        let reverse = converter
            .convert(value, &Unit::Other("y".to_string()), &Unit::Other("x".to_string()))
            .unwrap();

        // 1.23 / 0.12345678901
        assert!((reverse - 9.963_000_089_851_5).abs() < 1e-9);

        // 1.23 * 0.12345678901
        let forward = converter
            .convert(value, &Unit::Other("x".to_string()), &Unit::Other("y".to_string()))
            .unwrap();
        assert!((forward - 0.151_851_850_482_3).abs() < 1e-12);
    }

    #[test]
    fn test_convert_quantity() {
        let converter = converter_with(vec![Conversion::linear(Unit::M3, Unit::Kg, 2400.0)]);
        let volume = Quantity::new(0.5, Unit::M3).unwrap();

        let mass = converter.convert_quantity(&volume, &Unit::Kg).unwrap();
        assert_eq!(mass.unit(), &Unit::Kg);
        assert_eq!(mass.value(), 1200.0);
    }
}
