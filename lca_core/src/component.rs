//! # Element Component Quantities
//!
//! The quantity a single building-element component contributes to
//! impact computation, in the unit the downstream process data is
//! declared in.
//!
//! Two kinds of components exist:
//!
//! - **scalar components**, measured directly by their stored quantity
//!   (a door as 1 piece, a coating as 12 m²);
//! - **layers**, which occupy a sub-volume of a composite construction
//!   (an insulation layer inside a wall assembly). Their contribution is
//!   a derived volume, not their stored scalar quantity.
//!
//! In both cases the result passes through a unit [`Conversion`] before
//! it can be combined with process-level indicator factors, which are
//! expressed per declared unit (per kg, per m³, ...).

use serde::{Deserialize, Serialize};

use crate::conversions::Conversion;
use crate::errors::{LcaError, LcaResult};
use crate::units::{Quantity, Unit};

/// Geometry of a layer component within a composite construction.
///
/// Lengths are metres; `size` is the layer thickness. The area ratio
/// covers constructions where a layer only fills part of the cross
/// section (e.g. insulation between studs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerGeometry {
    /// Layer length in metres
    pub length_m: f64,

    /// Layer width in metres
    pub width_m: f64,

    /// Layer thickness in metres
    pub size_m: f64,

    /// Share of the cross-section area the layer fills, in (0, 1]
    pub area_ratio: f64,
}

impl LayerGeometry {
    /// Create a layer geometry.
    ///
    /// An absent or zero-like (≤ 0) area ratio defaults to 1, so sparse
    /// source data never collapses a layer to zero volume.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lca_core::component::LayerGeometry;
    ///
    /// let geometry = LayerGeometry::new(2.0, 3.0, 0.1, None);
    /// assert_eq!(geometry.area_ratio, 1.0);
    ///
    /// let partial = LayerGeometry::new(2.0, 3.0, 0.1, Some(0.85));
    /// assert_eq!(partial.area_ratio, 0.85);
    /// ```
    pub fn new(length_m: f64, width_m: f64, size_m: f64, area_ratio: Option<f64>) -> Self {
        let area_ratio = match area_ratio {
            Some(ratio) if ratio > 0.0 => ratio,
            _ => 1.0,
        };
        LayerGeometry {
            length_m,
            width_m,
            size_m,
            area_ratio,
        }
    }

    /// Volume of the layer per unit of base quantity, in m³.
    pub fn volume_factor(&self) -> f64 {
        self.length_m * self.width_m * self.size_m * self.area_ratio
    }
}

/// The quantity one element component contributes, staged for conversion
/// into the unit its process data is declared in.
///
/// The base quantity passed at construction already folds in the owning
/// element's overall quantity multiplied by the component's own quantity
/// factor (`element.quantity * component.quantity`). Instances are
/// transient: built per report computation, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementComponentQuantity {
    quantity: Quantity,
    conversion: Conversion,
    process_config_id: String,
    layer: Option<LayerGeometry>,
}

impl ElementComponentQuantity {
    /// Stage a scalar (non-layer) component quantity.
    pub fn component(
        quantity: Quantity,
        conversion: Conversion,
        process_config_id: impl Into<String>,
    ) -> Self {
        ElementComponentQuantity {
            quantity,
            conversion,
            process_config_id: process_config_id.into(),
            layer: None,
        }
    }

    /// Stage a layer component quantity with its geometry.
    pub fn layer(
        quantity: Quantity,
        conversion: Conversion,
        process_config_id: impl Into<String>,
        geometry: LayerGeometry,
    ) -> Self {
        ElementComponentQuantity {
            quantity,
            conversion,
            process_config_id: process_config_id.into(),
            layer: Some(geometry),
        }
    }

    /// Whether this component is a layer.
    pub fn is_layer(&self) -> bool {
        self.layer.is_some()
    }

    /// The base quantity as passed at construction.
    pub fn base_quantity(&self) -> &Quantity {
        &self.quantity
    }

    /// The staged conversion.
    pub fn conversion(&self) -> &Conversion {
        &self.conversion
    }

    /// The quantity before unit conversion.
    ///
    /// Layers yield their derived volume
    /// `base * length * width * size * area_ratio` in m³; scalar
    /// components yield the base quantity unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lca_core::component::{ElementComponentQuantity, LayerGeometry};
    /// use lca_core::conversions::Conversion;
    /// use lca_core::units::{Quantity, Unit};
    ///
    /// let staged = ElementComponentQuantity::layer(
    ///     Quantity::new(2.0, Unit::Kg).unwrap(),
    ///     Conversion::identity(Unit::M3),
    ///     "insulation-eps",
    ///     LayerGeometry::new(2.0, 3.0, 0.1, None),
    /// );
    ///
    /// let volume = staged.effective_quantity();
    /// assert_eq!(volume.unit(), &Unit::M3);
    /// assert!((volume.value() - 1.2).abs() < 1e-12);
    /// ```
    pub fn effective_quantity(&self) -> Quantity {
        match &self.layer {
            Some(geometry) => Quantity::raw(
                self.quantity.value() * geometry.volume_factor(),
                Unit::M3,
            ),
            None => self.quantity.clone(),
        }
    }

    /// The quantity in the unit required by the process data.
    ///
    /// Applies the staged conversion to
    /// [`effective_quantity`](Self::effective_quantity). An unresolved
    /// conversion fails with `UnresolvedConversion` naming the owning
    /// process configuration.
    pub fn converted_quantity(&self) -> LcaResult<Quantity> {
        let effective = self.effective_quantity();
        let value = self.conversion.apply(effective.value()).ok_or_else(|| {
            LcaError::unresolved_conversion(
                &self.process_config_id,
                self.conversion.from_unit().symbol(),
                self.conversion.to_unit().symbol(),
            )
        })?;
        Ok(Quantity::raw(value, self.conversion.to_unit().clone()))
    }
}
