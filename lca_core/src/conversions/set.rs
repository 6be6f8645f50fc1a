//! # Conversion Sets
//!
//! The deduplicated, direction-agnostic collection of [`Conversion`]s for
//! one process configuration, and the raw factor rows it is assembled
//! from.
//!
//! A set is populated once (typically from persisted conversion factor
//! rows) and queried repeatedly during report computation. After
//! population it is read-only; share it across threads only
//! build-then-publish.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::conversions::Conversion;
use crate::units::{flexible_f64_opt, Unit};

/// Order-independent key for a pair of units: the two units sorted by the
/// total order over their symbols.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct UnitPair {
    lo: Unit,
    hi: Unit,
}

impl UnitPair {
    fn new(a: &Unit, b: &Unit) -> Self {
        if a <= b {
            UnitPair {
                lo: a.clone(),
                hi: b.clone(),
            }
        } else {
            UnitPair {
                lo: b.clone(),
                hi: a.clone(),
            }
        }
    }
}

/// A deduplicated collection of conversions, keyed by unordered unit pair.
///
/// At most one conversion exists per pair of units, regardless of the
/// direction it was declared in: adding a kg→m conversion and then an
/// m→kg one leaves a single entry.
///
/// ## JSON Serialization
///
/// Sets serialize as the flat list of stored conversions and are rebuilt
/// through [`ConversionSet::add`] on deserialization, so the dedup
/// invariant survives round-trips:
///
/// ```json
/// [ { "type": "Linear", "from": "m3", "to": "kg", "factor": 2400.0 } ]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Conversion>", into = "Vec<Conversion>")]
pub struct ConversionSet {
    entries: BTreeMap<UnitPair, Conversion>,
}

impl ConversionSet {
    /// Create an empty set.
    pub fn new() -> Self {
        ConversionSet {
            entries: BTreeMap::new(),
        }
    }

    /// Build a set from raw factor rows.
    ///
    /// Rows are added in order; later duplicates of an already-covered
    /// unit pair are discarded.
    pub fn from_rows(rows: impl IntoIterator<Item = ConversionFactorRow>) -> Self {
        let mut set = ConversionSet::new();
        for row in rows {
            set.add(row.into_conversion());
        }
        set
    }

    /// Add a conversion.
    ///
    /// Returns `false` (and discards the new conversion) when the set
    /// already holds a conversion for the same unordered unit pair, in
    /// either direction.
    pub fn add(&mut self, conversion: Conversion) -> bool {
        let key = UnitPair::new(conversion.from_unit(), conversion.to_unit());
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, conversion);
        true
    }

    /// Look up the conversion for a from/to unit pair.
    ///
    /// - a stored conversion declared in the requested direction is
    ///   returned unchanged;
    /// - a stored conversion declared in the opposite direction is
    ///   returned [`inverted`](Conversion::inverted);
    /// - with no entry and `from == to`, an identity conversion is
    ///   returned;
    /// - otherwise `None`.
    pub fn find(&self, from: &Unit, to: &Unit) -> Option<Conversion> {
        let key = UnitPair::new(from, to);
        match self.entries.get(&key) {
            Some(stored) if stored.from_unit() == from && stored.to_unit() == to => {
                Some(stored.clone())
            }
            Some(stored) => Some(stored.inverted()),
            None if from == to => Some(Conversion::identity(from.clone())),
            None => None,
        }
    }

    /// Number of stored conversions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set holds no conversions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the stored conversions in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Conversion> {
        self.entries.values()
    }
}

impl From<Vec<Conversion>> for ConversionSet {
    fn from(conversions: Vec<Conversion>) -> Self {
        let mut set = ConversionSet::new();
        for conversion in conversions {
            set.add(conversion);
        }
        set
    }
}

impl From<ConversionSet> for Vec<Conversion> {
    fn from(set: ConversionSet) -> Self {
        set.entries.into_values().collect()
    }
}

impl FromIterator<Conversion> for ConversionSet {
    fn from_iter<T: IntoIterator<Item = Conversion>>(iter: T) -> Self {
        let mut set = ConversionSet::new();
        for conversion in iter {
            set.add(conversion);
        }
        set
    }
}

/// A raw conversion factor row as delivered by persistence or import
/// collaborators.
///
/// The factor accepts either a JSON number or a numeric string (imports
/// routinely deliver `"0.125"`); a row without a factor declares the edge
/// as required but unresolved.
///
/// ## JSON Example
///
/// ```json
/// {
///   "process_config_id": "insulation-eps",
///   "from_unit": "m3",
///   "to_unit": "kg",
///   "factor": "30.0"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionFactorRow {
    /// The process configuration this factor belongs to
    pub process_config_id: String,

    /// Unit the factor converts from
    pub from_unit: Unit,

    /// Unit the factor converts to
    pub to_unit: Unit,

    /// `to = from * factor`; absent when the conversion is declared but
    /// not yet resolved
    #[serde(default, deserialize_with = "flexible_f64_opt")]
    pub factor: Option<f64>,
}

impl ConversionFactorRow {
    /// Turn the row into its conversion rule.
    ///
    /// Same-unit rows collapse to identity; rows without a factor become
    /// unresolved placeholders.
    pub fn into_conversion(self) -> Conversion {
        if self.from_unit == self.to_unit {
            return Conversion::identity(self.from_unit);
        }
        match self.factor {
            Some(factor) => Conversion::linear(self.from_unit, self.to_unit, factor),
            None => Conversion::unresolved(self.from_unit, self.to_unit),
        }
    }
}

/// Group factor rows into one [`ConversionSet`] per process
/// configuration id.
pub fn build_conversion_sets(
    rows: impl IntoIterator<Item = ConversionFactorRow>,
) -> HashMap<String, ConversionSet> {
    let mut sets: HashMap<String, ConversionSet> = HashMap::new();
    for row in rows {
        sets.entry(row.process_config_id.clone())
            .or_default()
            .add(row.into_conversion());
    }
    sets
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_deduplicates_reverse_direction() {
        let mut set = ConversionSet::new();
        assert!(set.add(Conversion::linear(Unit::Kg, Unit::M3, 0.5)));
        // the reverse pair is a no-op
        assert!(!set.add(Conversion::linear(Unit::M3, Unit::Kg, 2.0)));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_add_deduplicates_same_direction() {
        let mut set = ConversionSet::new();
        assert!(set.add(Conversion::linear(Unit::Kg, Unit::M3, 0.5)));
        assert!(!set.add(Conversion::linear(Unit::Kg, Unit::M3, 0.7)));
        assert_eq!(set.len(), 1);

        // the first declaration wins
        let found = set.find(&Unit::Kg, &Unit::M3).unwrap();
        assert_eq!(found.factor(), Some(0.5));
    }

    #[test]
    fn test_find_both_directions() {
        let mut set = ConversionSet::new();
        set.add(Conversion::linear(Unit::Kg, Unit::M, 2.0));

        let forward = set.find(&Unit::Kg, &Unit::M).unwrap();
        assert_eq!(forward.from_unit(), &Unit::Kg);
        assert_eq!(forward.to_unit(), &Unit::M);
        assert_eq!(forward.factor(), Some(2.0));

        let reverse = set.find(&Unit::M, &Unit::Kg).unwrap();
        assert_eq!(reverse.from_unit(), &Unit::M);
        assert_eq!(reverse.to_unit(), &Unit::Kg);
        assert_eq!(reverse.factor(), Some(0.5));
    }

    #[test]
    fn test_find_same_unit_falls_back_to_identity() {
        let set = ConversionSet::new();
        let found = set.find(&Unit::KWh, &Unit::KWh).unwrap();
        assert_eq!(found, Conversion::identity(Unit::KWh));
    }

    #[test]
    fn test_find_unknown_pair() {
        let mut set = ConversionSet::new();
        set.add(Conversion::linear(Unit::Kg, Unit::M3, 0.5));
        assert!(set.find(&Unit::Kg, &Unit::Mj).is_none());
    }

    #[test]
    fn test_find_preserves_unresolved() {
        let mut set = ConversionSet::new();
        set.add(Conversion::unresolved(Unit::Kg, Unit::Mj));

        let found = set.find(&Unit::Mj, &Unit::Kg).unwrap();
        assert!(!found.is_resolved());
        assert_eq!(found.from_unit(), &Unit::Mj);
    }

    #[test]
    fn test_free_form_units_participate() {
        let mut set = ConversionSet::new();
        set.add(Conversion::linear(
            Unit::Other("truckload".to_string()),
            Unit::M3,
            6.5,
        ));

        let found = set
            .find(&Unit::M3, &Unit::Other("truckload".to_string()))
            .unwrap();
        assert_eq!(found.factor(), Some(1.0 / 6.5));
    }

    #[test]
    fn test_row_with_string_factor() {
        let json = r#"{
            "process_config_id": "insulation-eps",
            "from_unit": "m3",
            "to_unit": "kg",
            "factor": "30.0"
        }"#;
        let row: ConversionFactorRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.factor, Some(30.0));

        let conversion = row.into_conversion();
        assert_eq!(conversion.apply(2.0), Some(60.0));
    }

    #[test]
    fn test_row_rejects_non_finite_factor() {
        let overflow = r#"{
            "process_config_id": "insulation-eps",
            "from_unit": "m3",
            "to_unit": "kg",
            "factor": 1e999
        }"#;
        assert!(serde_json::from_str::<ConversionFactorRow>(overflow).is_err());

        let textual = r#"{
            "process_config_id": "insulation-eps",
            "from_unit": "m3",
            "to_unit": "kg",
            "factor": "inf"
        }"#;
        assert!(serde_json::from_str::<ConversionFactorRow>(textual).is_err());
    }

    #[test]
    fn test_row_without_factor_is_unresolved() {
        let json = r#"{
            "process_config_id": "gravel-0-32",
            "from_unit": "kg",
            "to_unit": "MJ"
        }"#;
        let row: ConversionFactorRow = serde_json::from_str(json).unwrap();
        assert!(!row.into_conversion().is_resolved());
    }

    #[test]
    fn test_same_unit_row_collapses_to_identity() {
        let row = ConversionFactorRow {
            process_config_id: "concrete-c25".to_string(),
            from_unit: Unit::Kg,
            to_unit: Unit::Kg,
            factor: Some(3.0),
        };
        assert_eq!(row.into_conversion(), Conversion::identity(Unit::Kg));
    }

    #[test]
    fn test_build_conversion_sets_groups_by_config() {
        let rows = vec![
            ConversionFactorRow {
                process_config_id: "a".to_string(),
                from_unit: Unit::Kg,
                to_unit: Unit::M3,
                factor: Some(0.5),
            },
            ConversionFactorRow {
                process_config_id: "b".to_string(),
                from_unit: Unit::M2,
                to_unit: Unit::Kg,
                factor: Some(12.0),
            },
            // duplicate pair for "a", reverse direction: discarded
            ConversionFactorRow {
                process_config_id: "a".to_string(),
                from_unit: Unit::M3,
                to_unit: Unit::Kg,
                factor: Some(2.0),
            },
        ];

        let sets = build_conversion_sets(rows);
        assert_eq!(sets.len(), 2);
        assert_eq!(sets["a"].len(), 1);
        assert_eq!(sets["b"].len(), 1);
    }

    #[test]
    fn test_set_serialization_preserves_dedup() {
        let mut set = ConversionSet::new();
        set.add(Conversion::linear(Unit::Kg, Unit::M3, 0.5));
        set.add(Conversion::linear(Unit::M2, Unit::Kg, 12.0));

        let json = serde_json::to_string(&set).unwrap();
        let roundtrip: ConversionSet = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, set);
        assert_eq!(roundtrip.len(), 2);
    }
}
