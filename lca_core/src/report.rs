//! # Report Computation
//!
//! Pure functions that turn a [`Project`] into per-element and
//! project-wide indicator effects and classify the totals against the
//! project's benchmark bands. No I/O, no mutation of the project; every
//! call owns its intermediate state, so concurrent report computations
//! over different projects need no coordination.
//!
//! ## Pipeline
//!
//! ```text
//! ElementComponent ──▶ ElementComponentQuantity ──▶ converted quantity
//!                                                        │
//!                        ProcessFactor (per unit) ───────┤
//!                                                        ▼
//!                              IndicatorEffect (per phase, per indicator)
//! ```

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::component::ElementComponentQuantity;
use crate::errors::{LcaError, LcaResult};
use crate::indicators::{
    BenchmarkRating, IndicatorEffect, IndicatorIdent, IndicatorValue, LifeCyclePhase,
    ReferenceIndicatorComparator,
};
use crate::project::{Element, ElementComponent, ProcessConfig, Project};
use crate::units::{Quantity, Unit};

/// Indicator effects computed for one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementEffects {
    /// The element the effects belong to
    pub element_id: Uuid,

    /// Element display name, for report rendering
    pub element_name: String,

    /// One effect per indicator occurring in the element's process data
    pub effects: Vec<IndicatorEffect>,
}

/// Classification of one project total against its benchmark band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// The indicator that was classified
    pub indicator: IndicatorIdent,

    /// Better/equal/worse against the band
    pub rating: BenchmarkRating,

    /// Relative deviation from the band average; non-finite when the
    /// band average is zero
    pub deviation: f64,
}

/// The complete computed report for a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectReport {
    /// When the report was computed
    pub computed_at: DateTime<Utc>,

    /// Per-element effects, ordered by element name
    pub elements: Vec<ElementEffects>,

    /// Project-wide effects, one per indicator
    pub totals: Vec<IndicatorEffect>,

    /// Benchmark classification of the project totals
    pub benchmarks: Vec<BenchmarkResult>,
}

/// Stage the quantity one component contributes, resolved against its
/// process configuration.
///
/// The base quantity folds the owning element's overall quantity into
/// the component's own factor. Layers convert from their derived m³
/// volume; scalar components convert from their stored unit.
pub fn component_quantity(
    element: &Element,
    component: &ElementComponent,
    config: &ProcessConfig,
) -> LcaResult<ElementComponentQuantity> {
    let base = Quantity::new(element.quantity * component.quantity, component.unit.clone())?;
    let converter = config.converter();

    let staged = match &component.layer {
        Some(geometry) => {
            let conversion = converter.resolve(&Unit::M3, &config.declared_unit)?;
            ElementComponentQuantity::layer(base, conversion, &config.id, geometry.clone())
        }
        None => {
            let conversion = converter.resolve(&component.unit, &config.declared_unit)?;
            ElementComponentQuantity::component(base, conversion, &config.id)
        }
    };
    Ok(staged)
}

/// Compute the indicator effects of one element.
///
/// Every component quantity is converted into its configuration's
/// declared unit and multiplied with each indicator factor; results
/// accumulate per indicator per phase. The Total phase is filled with
/// the sum of the populated phases afterwards.
pub fn compute_element_effects(
    element: &Element,
    configs: &HashMap<String, ProcessConfig>,
) -> LcaResult<Vec<IndicatorEffect>> {
    let mut effects: BTreeMap<IndicatorIdent, IndicatorEffect> = BTreeMap::new();

    for component in &element.components {
        let config = configs
            .get(&component.process_config_id)
            .ok_or_else(|| LcaError::process_config_not_found(&component.process_config_id))?;

        let staged = component_quantity(element, component, config)?;
        let converted = staged.converted_quantity()?;

        for factor in &config.factors {
            effects
                .entry(factor.indicator.clone())
                .or_insert_with(|| IndicatorEffect::new(factor.indicator.clone()))
                .accumulate(factor.phase, converted.value() * factor.value);
        }
    }

    let mut effects: Vec<IndicatorEffect> = effects.into_values().collect();
    for effect in &mut effects {
        effect.fill_total();
    }
    Ok(effects)
}

/// Compute the full report for a project.
///
/// Fails on the first component whose process configuration is missing
/// or whose quantity cannot be converted; a report over broken data is
/// not a report.
pub fn compute_report(project: &Project) -> LcaResult<ProjectReport> {
    let mut elements: Vec<&Element> = project.elements.values().collect();
    elements.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

    let mut element_effects = Vec::with_capacity(elements.len());
    let mut totals: BTreeMap<IndicatorIdent, IndicatorEffect> = BTreeMap::new();

    for element in elements {
        let effects = compute_element_effects(element, &project.process_configs)?;

        for effect in &effects {
            let entry = totals
                .entry(effect.ident().clone())
                .or_insert_with(|| IndicatorEffect::new(effect.ident().clone()));
            for (phase, value) in effect.iter() {
                if phase != LifeCyclePhase::Total {
                    entry.accumulate(phase, value);
                }
            }
        }

        element_effects.push(ElementEffects {
            element_id: element.id,
            element_name: element.name.clone(),
            effects,
        });
    }

    let mut totals: Vec<IndicatorEffect> = totals.into_values().collect();
    for total in &mut totals {
        total.fill_total();
    }

    let benchmarks = classify_totals(&totals, project)?;

    Ok(ProjectReport {
        computed_at: Utc::now(),
        elements: element_effects,
        totals,
        benchmarks,
    })
}

/// Classify each project total that has a matching benchmark band.
///
/// Indicators without a band, and bands whose indicator never occurred
/// in the project, are skipped.
fn classify_totals(
    totals: &[IndicatorEffect],
    project: &Project,
) -> LcaResult<Vec<BenchmarkResult>> {
    let mut results = Vec::new();

    for band in &project.benchmarks {
        let Some(effect) = totals.iter().find(|effect| effect.ident() == &band.ident) else {
            continue;
        };
        let Some(total) = effect.total() else {
            continue;
        };

        let comparator = ReferenceIndicatorComparator::new(
            IndicatorValue::new(band.ident.clone(), total),
            band.clone(),
        )?;
        results.push(BenchmarkResult {
            indicator: band.ident.clone(),
            rating: comparator.compare(),
            deviation: comparator.deviation(),
        });
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::LayerGeometry;
    use crate::conversions::{Conversion, ConversionSet};
    use crate::indicators::ReferenceIndicatorValue;
    use crate::project::{ElementComponent, ProcessFactor};

    fn insulation_config() -> ProcessConfig {
        let mut conversions = ConversionSet::new();
        conversions.add(Conversion::linear(Unit::M3, Unit::Kg, 30.0));
        ProcessConfig {
            id: "insulation-eps".to_string(),
            name: "EPS insulation board".to_string(),
            declared_unit: Unit::Kg,
            conversions,
            factors: vec![
                ProcessFactor {
                    indicator: IndicatorIdent::new("gwp"),
                    phase: LifeCyclePhase::Production,
                    value: 2.0,
                },
                ProcessFactor {
                    indicator: IndicatorIdent::new("gwp"),
                    phase: LifeCyclePhase::EndOfLife,
                    value: 0.1,
                },
                ProcessFactor {
                    indicator: IndicatorIdent::new("pert"),
                    phase: LifeCyclePhase::Production,
                    value: 5.0,
                },
            ],
        }
    }

    fn plaster_config() -> ProcessConfig {
        ProcessConfig {
            id: "plaster-gypsum".to_string(),
            name: "Gypsum plaster".to_string(),
            declared_unit: Unit::M2,
            conversions: ConversionSet::new(),
            factors: vec![ProcessFactor {
                indicator: IndicatorIdent::new("gwp"),
                phase: LifeCyclePhase::Production,
                value: 1.5,
            }],
        }
    }

    fn wall_project() -> Project {
        let mut project = Project::new("Test project");
        project.add_process_config(insulation_config());
        project.add_process_config(plaster_config());

        // element quantity 1, layer component quantity 2:
        // derived volume 2 * (2*3*0.1*1) = 1.2 m³ -> 36 kg at 30 kg/m³
        let wall = Element::new("Exterior wall", 1.0)
            .with_component(ElementComponent::new_layer(
                "insulation-eps",
                2.0,
                Unit::M3,
                LayerGeometry::new(2.0, 3.0, 0.1, None),
            ))
            .with_component(ElementComponent::new(
                "plaster-gypsum",
                12.0,
                Unit::M2,
            ));
        project.add_element(wall);
        project
    }

    #[test]
    fn test_component_quantity_layer_conversion() {
        let project = wall_project();
        let element = project.elements.values().next().unwrap();
        let layer = &element.components[0];
        let config = project.process_config("insulation-eps").unwrap();

        let staged = component_quantity(element, layer, config).unwrap();
        let converted = staged.converted_quantity().unwrap();

        assert_eq!(converted.unit(), &Unit::Kg);
        assert!((converted.value() - 36.0).abs() < 1e-9);
    }

    #[test]
    fn test_scalar_component_same_unit_short_circuit() {
        // plaster declares m2 and the component is stored in m2; the
        // empty conversion set still resolves via identity
        let project = wall_project();
        let element = project.elements.values().next().unwrap();
        let plaster = &element.components[1];
        let config = project.process_config("plaster-gypsum").unwrap();

        let staged = component_quantity(element, plaster, config).unwrap();
        let converted = staged.converted_quantity().unwrap();
        assert_eq!(converted, Quantity::new(12.0, Unit::M2).unwrap());
    }

    #[test]
    fn test_element_effects_accumulate_per_phase() {
        let project = wall_project();
        let element = project.elements.values().next().unwrap();

        let effects = compute_element_effects(element, &project.process_configs).unwrap();
        assert_eq!(effects.len(), 2);

        let gwp = effects
            .iter()
            .find(|effect| effect.ident() == &IndicatorIdent::new("gwp"))
            .unwrap();
        // insulation: 36 kg * 2.0, plaster: 12 m2 * 1.5
        assert!((gwp.production().unwrap() - 90.0).abs() < 1e-9);
        assert!((gwp.end_of_life().unwrap() - 3.6).abs() < 1e-9);
        assert!((gwp.total().unwrap() - 93.6).abs() < 1e-9);
        assert_eq!(gwp.operation(), None);

        let pert = effects
            .iter()
            .find(|effect| effect.ident() == &IndicatorIdent::new("pert"))
            .unwrap();
        assert!((pert.production().unwrap() - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_process_config_fails() {
        let mut project = wall_project();
        let element = Element::new("Roof", 1.0).with_component(
            ElementComponent::new("missing-config", 1.0, Unit::Kg),
        );
        project.add_element(element);

        let error = compute_report(&project).unwrap_err();
        assert_eq!(error.error_code(), "PROCESS_CONFIG_NOT_FOUND");
        assert!(error.to_string().contains("missing-config"));
    }

    #[test]
    fn test_unconvertible_component_fails() {
        let mut project = wall_project();
        // stored in MJ, declared in kg, no conversion declared
        let element = Element::new("Heating", 1.0).with_component(
            ElementComponent::new("plaster-gypsum", 1.0, Unit::Mj),
        );
        project.add_element(element);

        let error = compute_report(&project).unwrap_err();
        assert_eq!(error.error_code(), "MISSING_CONVERSION");
    }

    #[test]
    fn test_report_totals_and_benchmarks() {
        let mut project = wall_project();
        project.add_benchmark(ReferenceIndicatorValue::new("gwp", 50.0, 80.0, 90.0));
        project.add_benchmark(ReferenceIndicatorValue::new("pert", 100.0, 150.0, 160.0));
        // no matching total computed for this one: skipped
        project.add_benchmark(ReferenceIndicatorValue::new("odp", 0.0, 1.0, 2.0));

        let report = compute_report(&project).unwrap();

        assert_eq!(report.elements.len(), 1);
        assert_eq!(report.elements[0].element_name, "Exterior wall");

        let gwp_total = report
            .totals
            .iter()
            .find(|effect| effect.ident() == &IndicatorIdent::new("gwp"))
            .unwrap();
        assert!((gwp_total.total().unwrap() - 93.6).abs() < 1e-9);

        assert_eq!(report.benchmarks.len(), 2);

        let gwp_result = &report.benchmarks[0];
        assert_eq!(gwp_result.indicator, IndicatorIdent::new("gwp"));
        // 93.6 exceeds the band maximum of 90
        assert_eq!(gwp_result.rating, BenchmarkRating::Worse);
        assert!((gwp_result.deviation - 0.17).abs() < 1e-9);

        // renewable primary energy above the band is better
        let pert_result = &report.benchmarks[1];
        assert_eq!(pert_result.rating, BenchmarkRating::Better);
    }

    #[test]
    fn test_report_serialization() {
        let project = wall_project();
        let report = compute_report(&project).unwrap();

        let json = serde_json::to_string(&report).unwrap();
        let roundtrip: ProjectReport = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.totals, report.totals);
        assert_eq!(roundtrip.elements, report.elements);
    }
}
