//! # Project Data Structures
//!
//! The data model a report computation runs over: process configurations
//! with their conversion sets and indicator factors, building elements
//! with their components, and the benchmark bands the finished report is
//! classified against.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (version, name, timestamps)
//! ├── process_configs: HashMap<String, ProcessConfig>
//! ├── elements: HashMap<Uuid, Element>
//! └── benchmarks: Vec<ReferenceIndicatorValue>
//! ```
//!
//! ## Example
//!
//! ```rust
//! use lca_core::project::{Element, Project};
//!
//! let mut project = Project::new("Residential block A");
//! let id = project.add_element(Element::new("Exterior wall", 4.0));
//! assert!(project.elements.contains_key(&id));
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::component::LayerGeometry;
use crate::conversions::{ConversionSet, Converter};
use crate::indicators::{IndicatorIdent, LifeCyclePhase, ReferenceIndicatorValue};
use crate::units::{flexible_f64, Unit};

/// Current schema version for serialized projects
pub const SCHEMA_VERSION: &str = "0.1.0";

/// One indicator amount per declared unit of a process.
///
/// The value accepts either a JSON number or a numeric string, matching
/// what dataset imports deliver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessFactor {
    /// The indicator this factor feeds
    pub indicator: IndicatorIdent,

    /// The life-cycle phase the amount is incurred in
    pub phase: LifeCyclePhase,

    /// Amount per declared unit of the process
    #[serde(deserialize_with = "flexible_f64")]
    pub value: f64,
}

/// A material/process configuration: the unit its dataset is declared
/// in, the conversions available for it, and its indicator factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessConfig {
    /// Stable identifier, referenced by element components
    pub id: String,

    /// Display name
    pub name: String,

    /// Unit the indicator factors are expressed per
    pub declared_unit: Unit,

    /// Declared conversions for this configuration
    pub conversions: ConversionSet,

    /// Indicator amounts per declared unit
    pub factors: Vec<ProcessFactor>,
}

impl ProcessConfig {
    /// A converter over this configuration's conversions, stamped with
    /// its id for diagnostics.
    pub fn converter(&self) -> Converter {
        Converter::new(&self.id, self.conversions.clone())
    }
}

/// One component of a building element.
///
/// A component with a [`LayerGeometry`] is a layer: its contribution is
/// the derived sub-volume of the composite construction. A component
/// without one is measured directly by its stored quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementComponent {
    /// Stable identifier
    pub id: Uuid,

    /// The process configuration supplying conversions and factors
    pub process_config_id: String,

    /// Component quantity factor, multiplied with the owning element's
    /// quantity. Accepts numeric strings from import rows.
    #[serde(deserialize_with = "flexible_f64")]
    pub quantity: f64,

    /// Unit the quantity is stored in
    pub unit: Unit,

    /// Present when the component is a layer
    pub layer: Option<LayerGeometry>,
}

impl ElementComponent {
    /// Create a scalar (non-layer) component.
    pub fn new(process_config_id: impl Into<String>, quantity: f64, unit: Unit) -> Self {
        ElementComponent {
            id: Uuid::new_v4(),
            process_config_id: process_config_id.into(),
            quantity,
            unit,
            layer: None,
        }
    }

    /// Create a layer component.
    pub fn new_layer(
        process_config_id: impl Into<String>,
        quantity: f64,
        unit: Unit,
        geometry: LayerGeometry,
    ) -> Self {
        ElementComponent {
            id: Uuid::new_v4(),
            process_config_id: process_config_id.into(),
            quantity,
            unit,
            layer: Some(geometry),
        }
    }

    /// Whether this component is a layer.
    pub fn is_layer(&self) -> bool {
        self.layer.is_some()
    }
}

/// A building element (a wall assembly, a roof, a window) with its
/// components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Stable identifier
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Overall element quantity (e.g. installed area count), multiplied
    /// into every component quantity
    pub quantity: f64,

    /// The components the element is built from
    pub components: Vec<ElementComponent>,
}

impl Element {
    /// Create an element with no components.
    pub fn new(name: impl Into<String>, quantity: f64) -> Self {
        Element {
            id: Uuid::new_v4(),
            name: name.into(),
            quantity,
            components: Vec::new(),
        }
    }

    /// Add a component, builder style.
    pub fn with_component(mut self, component: ElementComponent) -> Self {
        self.components.push(component);
        self
    }
}

/// Root project container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    /// Project metadata (version, name, timestamps)
    pub meta: ProjectMetadata,

    /// Process configurations, keyed by their id
    pub process_configs: HashMap<String, ProcessConfig>,

    /// Building elements, keyed by UUID
    pub elements: HashMap<Uuid, Element>,

    /// Benchmark bands the report totals are classified against
    pub benchmarks: Vec<ReferenceIndicatorValue>,
}

impl Project {
    /// Create a new empty project.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Project {
            meta: ProjectMetadata {
                version: SCHEMA_VERSION.to_string(),
                name: name.into(),
                created: now,
                modified: now,
            },
            process_configs: HashMap::new(),
            elements: HashMap::new(),
            benchmarks: Vec::new(),
        }
    }

    /// Add a process configuration, keyed by its id.
    pub fn add_process_config(&mut self, config: ProcessConfig) {
        self.process_configs.insert(config.id.clone(), config);
        self.touch();
    }

    /// Add an element. Returns its UUID.
    pub fn add_element(&mut self, element: Element) -> Uuid {
        let id = element.id;
        self.elements.insert(id, element);
        self.touch();
        id
    }

    /// Remove an element by UUID. Returns the removed element if it
    /// existed.
    pub fn remove_element(&mut self, id: &Uuid) -> Option<Element> {
        let element = self.elements.remove(id);
        if element.is_some() {
            self.touch();
        }
        element
    }

    /// Add a benchmark band.
    pub fn add_benchmark(&mut self, benchmark: ReferenceIndicatorValue) {
        self.benchmarks.push(benchmark);
        self.touch();
    }

    /// Look up a process configuration by id.
    pub fn process_config(&self, id: &str) -> Option<&ProcessConfig> {
        self.process_configs.get(id)
    }

    /// Number of elements.
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

impl Default for Project {
    fn default() -> Self {
        Project::new("")
    }
}

/// Project metadata stored in the document header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Project name
    pub name: String,

    /// When the project was created
    pub created: DateTime<Utc>,

    /// When the project was last modified
    pub modified: DateTime<Utc>,
}
