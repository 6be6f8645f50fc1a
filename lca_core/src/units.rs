//! # Units and Quantities
//!
//! Physical units and unit-bound quantities as they appear on building
//! element components and process data sets.
//!
//! ## Design Philosophy
//!
//! The canonical units of the domain (mass, length, area, volume, piece
//! count, energy) get dedicated variants; everything else is carried as a
//! raw symbol so that conversions between otherwise-unmodeled units still
//! work. Unit equality, hashing, and ordering all go through the symbol
//! string, so a `Unit::Other("kg".into())` smuggled in from an import row
//! compares equal to [`Unit::Kg`].
//!
//! ## Example
//!
//! ```rust
//! use lca_core::units::{Quantity, Unit};
//!
//! let unit = Unit::from_symbol("m³");
//! assert_eq!(unit, Unit::M3);
//!
//! let quantity = Quantity::new(2.5, Unit::Kg).unwrap();
//! let doubled = quantity.scale(2.0);
//! assert_eq!(doubled.value(), 5.0);
//! assert_eq!(doubled.unit(), &Unit::Kg);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::errors::{LcaError, LcaResult};

/// Relative tolerance for numeric quantity comparison.
///
/// Quantities coming out of chained unit conversions differ from
/// hand-computed expectations by floating-point rounding; equality checks
/// use this relative epsilon instead of exact comparison.
pub const NUMERIC_TOLERANCE: f64 = 1e-9;

/// Tolerance-based float comparison used by [`Quantity`] equality.
pub(crate) fn nearly_equal(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    let magnitude = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= magnitude * NUMERIC_TOLERANCE
}

/// Reject NaN and infinity in deserialized numeric fields. Overflowing
/// JSON literals (`1e999`) parse as infinity and would otherwise slip
/// past construction-time validation.
fn ensure_finite<E>(value: f64) -> Result<f64, E>
where
    E: serde::de::Error,
{
    if value.is_finite() {
        Ok(value)
    } else {
        Err(E::custom(format!("non-finite numeric value '{}'", value)))
    }
}

/// Deserialize a numeric field that import collaborators may supply as a
/// JSON number or a numeric string. String input is coerced to f64 before
/// any arithmetic happens; non-finite values are rejected either way.
pub(crate) fn flexible_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => ensure_finite(value),
        Raw::Text(text) => {
            let value: f64 = text.trim().parse().map_err(|_| {
                serde::de::Error::custom(format!("invalid numeric string '{}'", text))
            })?;
            ensure_finite(value)
        }
    }
}

/// [`flexible_f64`] for optional fields; absent or empty-string input
/// deserializes to `None`.
pub(crate) fn flexible_f64_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(value)) => ensure_finite(value).map(Some),
        Some(Raw::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            let value: f64 = trimmed.parse().map_err(|_| {
                serde::de::Error::custom(format!("invalid numeric string '{}'", text))
            })?;
            ensure_finite(value).map(Some)
        }
    }
}

/// A physical unit.
///
/// The canonical set covers the units process data is declared in; the
/// `Other` variant wraps any symbol outside that set.
///
/// ## JSON Serialization
///
/// Units serialize as their plain symbol string:
///
/// ```json
/// "kg"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Unit {
    /// Mass in kilograms
    Kg,
    /// Length in metres
    M,
    /// Area in square metres
    M2,
    /// Volume in cubic metres
    M3,
    /// Piece count
    Piece,
    /// Electrical energy in kilowatt hours
    KWh,
    /// Energy in megajoules
    Mj,
    /// Any unit outside the canonical set, carried by its raw symbol
    Other(String),
}

impl Unit {
    /// All canonical units.
    pub const CANONICAL: [Unit; 7] = [
        Unit::Kg,
        Unit::M,
        Unit::M2,
        Unit::M3,
        Unit::Piece,
        Unit::KWh,
        Unit::Mj,
    ];

    /// Parse a unit symbol.
    ///
    /// Canonical symbols (including the `m²`/`m³` spellings) map to their
    /// dedicated variants; any other symbol is kept verbatim (trimmed) in
    /// [`Unit::Other`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use lca_core::units::Unit;
    ///
    /// assert_eq!(Unit::from_symbol("kg"), Unit::Kg);
    /// assert_eq!(Unit::from_symbol("m2"), Unit::M2);
    /// assert_eq!(Unit::from_symbol("truckload"), Unit::Other("truckload".to_string()));
    /// ```
    pub fn from_symbol(symbol: &str) -> Self {
        match symbol.trim() {
            "kg" => Unit::Kg,
            "m" => Unit::M,
            "m2" | "m²" => Unit::M2,
            "m3" | "m³" => Unit::M3,
            "piece" | "pcs" => Unit::Piece,
            "kWh" => Unit::KWh,
            "MJ" => Unit::Mj,
            other => Unit::Other(other.to_string()),
        }
    }

    /// The unit symbol this unit round-trips through.
    pub fn symbol(&self) -> &str {
        match self {
            Unit::Kg => "kg",
            Unit::M => "m",
            Unit::M2 => "m2",
            Unit::M3 => "m3",
            Unit::Piece => "piece",
            Unit::KWh => "kWh",
            Unit::Mj => "MJ",
            Unit::Other(symbol) => symbol,
        }
    }

    /// Whether this unit is part of the canonical set.
    pub fn is_canonical(&self) -> bool {
        !matches!(self, Unit::Other(_))
    }
}

// Equality, hashing, and ordering are by symbol value, never by variant
// identity. The total order over symbols is what the conversion-set key
// relies on.

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        self.symbol() == other.symbol()
    }
}

impl Eq for Unit {}

impl Hash for Unit {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.symbol().hash(state);
    }
}

impl PartialOrd for Unit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Unit {
    fn cmp(&self, other: &Self) -> Ordering {
        self.symbol().cmp(other.symbol())
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl From<String> for Unit {
    fn from(symbol: String) -> Self {
        Unit::from_symbol(&symbol)
    }
}

impl From<Unit> for String {
    fn from(unit: Unit) -> Self {
        unit.symbol().to_string()
    }
}

/// An immutable numeric value bound to a [`Unit`].
///
/// Construction rejects non-finite values; everything downstream can rely
/// on the value being a usable number. Deserialization is a construction
/// path and routes through [`Quantity::new`], so an overflowing JSON
/// literal (`1e999` parses as infinity) is rejected rather than smuggled
/// in.
///
/// ## JSON Example
///
/// ```json
/// { "value": 2.5, "unit": "kg" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawQuantity")]
pub struct Quantity {
    value: f64,
    unit: Unit,
}

/// Unvalidated mirror of [`Quantity`]; deserialization lands here first
/// and is then checked by [`Quantity::new`].
#[derive(Deserialize)]
struct RawQuantity {
    value: f64,
    unit: Unit,
}

impl TryFrom<RawQuantity> for Quantity {
    type Error = LcaError;

    fn try_from(raw: RawQuantity) -> Result<Self, Self::Error> {
        Quantity::new(raw.value, raw.unit)
    }
}

impl Quantity {
    /// Create a new quantity.
    ///
    /// Fails with `InvalidInput` when `value` is NaN or infinite.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lca_core::units::{Quantity, Unit};
    ///
    /// let quantity = Quantity::new(12.0, Unit::M2).unwrap();
    /// assert_eq!(quantity.value(), 12.0);
    ///
    /// assert!(Quantity::new(f64::NAN, Unit::M2).is_err());
    /// ```
    pub fn new(value: f64, unit: Unit) -> LcaResult<Self> {
        if !value.is_finite() {
            return Err(LcaError::invalid_input(
                "value",
                value.to_string(),
                "Quantity value must be a finite number",
            ));
        }
        Ok(Quantity { value, unit })
    }

    /// Crate-internal constructor for values produced by our own
    /// arithmetic, where the finite check already happened upstream.
    pub(crate) fn raw(value: f64, unit: Unit) -> Self {
        Quantity { value, unit }
    }

    /// The numeric value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The unit the value is expressed in.
    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    /// Return a new quantity with the value multiplied by `factor`,
    /// same unit.
    pub fn scale(&self, factor: f64) -> Quantity {
        Quantity {
            value: self.value * factor,
            unit: self.unit.clone(),
        }
    }
}

impl PartialEq for Quantity {
    /// Unit equality plus tolerance-based value equality
    /// (see [`NUMERIC_TOLERANCE`]).
    fn eq(&self, other: &Self) -> bool {
        self.unit == other.unit && nearly_equal(self.value, other.value)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}
