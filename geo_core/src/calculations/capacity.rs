//! # Axial Capacity Integration
//!
//! Steps down the pile through [`Project::analysis_depths`] and accumulates
//! shaft and toe resistance segment by segment.
//!
//! ## Per Segment (top_z → bot_z)
//!
//! ```text
//! σ'_avg = (σ'(top_z) + σ'(bot_z)) / 2
//!
//! cohesive:      ψ = su / σ'_avg
//!                α = 0.5 ψ^-0.5  (ψ ≤ 1)   |   0.5 ψ^-0.25  (ψ > 1),  0 ≤ α ≤ 1
//!                f = α su
//!                q = 9 su_avg   (su averaged over 2D below bot_z)
//!
//! cohesionless:  f = min(K σ'_avg tan δ, f_lim)
//!                q = min(Nq σ'(bot_z), q_lim)
//!
//! Rs += f × lateral area          Rp = q × toe area
//! ```
//!
//! Open sections (pipe-open, H-pile, open concrete circle) carry two
//! columns: plugged (outside friction + full toe) and unplugged (outside +
//! inside friction + steel or ring toe). The smaller maximum governs.

use serde::Serialize;
use tracing::{debug, info, warn};

use super::{CapacityMethod, CapacityStrategy};
use crate::errors::{CalcError, CalcResult, MissingProperty};
use crate::project::Project;
use crate::soil::profile::DEPTH_TOLERANCE;
use crate::soil::{SoilLayer, SoilProfile, SoilType};
use crate::tables::api::DensityClass;
use crate::units::{Dimension, Quantity, UnitSystem};

/// Toe bearing factor for cohesive soil
pub const NC_COHESIVE: f64 = 9.0;

/// Spacing (ft or m) of su samples below the toe
pub const SU_SAMPLE_STEP: f64 = 0.1;

/// Pile widths below the toe over which su is averaged
pub const SU_SAMPLE_WIDTHS: f64 = 2.0;

/// One analysis depth. Resistances are in kip (imperial) or kN (metric).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResistanceRow {
    /// Depth from grade (ft/m)
    pub z: f64,
    /// Cumulative outside shaft resistance
    pub shaft_out: f64,
    /// Cumulative inside shaft resistance (open sections only)
    pub shaft_in: f64,
    /// Toe resistance with a soil plug
    pub toe_plugged: f64,
    /// Toe resistance without a plug
    pub toe_unplugged: f64,
    /// shaft_out + toe_plugged
    pub total_plugged: f64,
    /// shaft_out + shaft_in + toe_unplugged
    pub total_unplugged: f64,
    /// Relative density of the soil at `z`, cohesionless layers only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density: Option<DensityClass>,
}

/// Result of a capacity run.
#[derive(Debug, Clone, Serialize)]
pub struct CapacityResult {
    pub method: CapacityMethod,
    pub unit_system: UnitSystem,
    /// One row per analysis segment, ordered by depth
    pub rows: Vec<ResistanceRow>,
    /// Largest plugged total
    pub plugged_max: f64,
    /// Largest unplugged total
    pub unplugged_max: f64,
    /// Governing capacity
    pub governing: f64,
    /// True when the plugged condition governs
    pub plugged: bool,
}

impl CapacityResult {
    /// Governing capacity as a force
    pub fn capacity(&self) -> Quantity {
        self.unit_system.quantity(self.governing, Dimension::Force)
    }

    /// The row at the pile toe (the deepest row)
    pub fn toe_row(&self) -> Option<&ResistanceRow> {
        self.rows.last()
    }

    /// Row at depth `z`, if `z` is one of the analysis depths
    pub fn row_at(&self, z: f64) -> Option<&ResistanceRow> {
        self.rows.iter().find(|r| (r.z - z).abs() <= DEPTH_TOLERANCE)
    }
}

/// Check every layer carries the properties `method` needs.
///
/// # Errors
///
/// * `InvalidInput` - the profile has no layers
/// * `PrecheckFailed` - lists every layer with missing properties
pub fn precheck(profile: &SoilProfile, method: CapacityMethod) -> CalcResult<()> {
    let strategy = method.strategy();
    if profile.is_empty() {
        return Err(CalcError::invalid_input("layers", "0", "No layers in soil profile"));
    }

    let system = profile.unit_system();
    let missing: Vec<MissingProperty> = profile
        .layers()
        .iter()
        .enumerate()
        .filter_map(|(i, layer)| {
            let properties: Vec<String> = strategy
                .required_properties(layer.soil_type)
                .iter()
                .filter(|p| layer.value(**p, system).is_none())
                .map(|p| p.key().to_string())
                .collect();
            (!properties.is_empty()).then(|| MissingProperty {
                layer: i + 1,
                soil_type: layer.soil_type.code().to_string(),
                properties,
            })
        })
        .collect();

    if !missing.is_empty() {
        return Err(CalcError::precheck_failed(strategy.name(), missing));
    }
    info!(
        method = strategy.name(),
        layers = profile.layers().len(),
        "analysis pre-check complete, no required properties missing"
    );
    Ok(())
}

/// Adhesion factor α for undrained shear strength `su` under effective
/// stress `sigma` (same units)
pub fn alpha(su: f64, sigma: f64) -> f64 {
    if sigma <= 0.0 {
        return 0.0;
    }
    let psi = su / sigma;
    let a = if psi <= 1.0 {
        0.5 * psi.powf(-0.5)
    } else {
        0.5 * psi.powf(-0.25)
    };
    a.clamp(0.0, 1.0)
}

/// Average su (stress units) over `SU_SAMPLE_WIDTHS` pile widths below `z`.
///
/// Samples outside the profile or in layers without su are skipped. Returns
/// `None` when no sample is usable.
fn average_su_below(profile: &SoilProfile, z: f64, width: f64) -> Option<f64> {
    let to_stress = profile.unit_system().strength_to_stress();
    let span = SU_SAMPLE_WIDTHS * width;
    let count = (span / SU_SAMPLE_STEP + 1e-9).floor() as usize;
    let samples: Vec<f64> = (0..=count)
        .map(|i| z + i as f64 * SU_SAMPLE_STEP)
        .filter_map(|zs| profile.layer_at(zs).ok().and_then(|l| l.su))
        .map(|su| su * to_stress)
        .collect();
    if samples.is_empty() {
        None
    } else {
        Some(samples.iter().sum::<f64>() / samples.len() as f64)
    }
}

/// Unit shaft (f) and toe (q) resistance for one segment
struct UnitResistance {
    f: f64,
    q: f64,
}

fn unit_resistance(
    project: &Project,
    strategy: &dyn CapacityStrategy,
    layer: &SoilLayer,
    bot_z: f64,
    sigma_avg: f64,
    sigma_bot: f64,
) -> CalcResult<UnitResistance> {
    let profile = project.profile();
    let pile = project.pile();
    let system = project.unit_system();

    match layer.soil_type {
        SoilType::Cohesive => {
            let su = layer
                .su
                .ok_or_else(|| CalcError::missing_field(format!("su (layer at {} depth)", layer.depth)))?
                * system.strength_to_stress();
            let f = alpha(su, sigma_avg) * su;
            let width = pile.width_at_length_units(bot_z);
            let q = match average_su_below(profile, bot_z, width) {
                Some(su_avg) => NC_COHESIVE * su_avg,
                None => {
                    warn!(z = bot_z, "no su samples below the toe, toe resistance taken as zero");
                    0.0
                }
            };
            Ok(UnitResistance { f, q })
        }
        SoilType::Cohesionless => {
            let n = layer
                .corr_n
                .ok_or_else(|| CalcError::missing_field(format!("corr_n (layer at {} depth)", layer.depth)))?;
            let k = strategy.k_factor(pile, n);
            let v = strategy.design_values(layer)?;
            let f = (k * sigma_avg * v.delta.to_radians().tan()).min(system.stress_from_ksf(v.f_lim));
            let q = (v.nq * sigma_bot).min(system.stress_from_ksf(v.q_lim));
            Ok(UnitResistance { f, q })
        }
    }
}

/// Run a static capacity analysis.
///
/// # Errors
///
/// * `PrecheckFailed` - layers missing properties the method needs
/// * `MissingField` / `OutOfRange` - propagated from stress and geometry
///   queries (not expected once the project and pre-check are valid)
pub fn calculate(project: &Project, method: CapacityMethod) -> CalcResult<CapacityResult> {
    let profile = project.profile();
    let pile = project.pile();
    let system = project.unit_system();
    let strategy = method.strategy();

    precheck(profile, method)?;

    let open = pile.is_open_ended();
    let nf_zone = pile.nf_zone().unwrap_or(0.0);
    let depths = project.analysis_depths();

    let mut rows = Vec::with_capacity(depths.len());
    let mut shaft_out = 0.0;
    let mut shaft_in = 0.0;

    for pair in depths.windows(2) {
        let (top_z, bot_z) = (pair[0], pair[1]);

        let sigma_top = profile.effective_stress(top_z)?;
        let sigma_bot = profile.effective_stress(bot_z)?;
        let sigma_avg = (sigma_top + sigma_bot) / 2.0;
        let layer = profile.layer_at(bot_z)?;

        let unit = unit_resistance(project, strategy, layer, bot_z, sigma_avg, sigma_bot)?;
        let f = if bot_z <= nf_zone + DEPTH_TOLERANCE { 0.0 } else { unit.f };

        let area_out = pile.side_area(top_z, bot_z, true, false)?.value();
        let area_in = if open {
            pile.side_area(top_z, bot_z, false, true)?.value()
        } else {
            0.0
        };
        shaft_out += f * area_out;
        shaft_in += f * area_in;

        let toe_plugged = unit.q * pile.cross_section_area(bot_z, true, true)?.value();
        let toe_unplugged = if open {
            unit.q * pile.cross_section_area(bot_z, false, false)?.value()
        } else {
            toe_plugged
        };

        let row = ResistanceRow {
            z: bot_z,
            shaft_out,
            shaft_in,
            toe_plugged,
            toe_unplugged,
            total_plugged: shaft_out + toe_plugged,
            total_unplugged: shaft_out + shaft_in + toe_unplugged,
            density: match layer.soil_type {
                SoilType::Cohesionless => layer.corr_n.map(DensityClass::from_n),
                SoilType::Cohesive => None,
            },
        };
        debug!(
            z = bot_z,
            soil_type = %layer.soil_type,
            f = f,
            q = unit.q,
            total_plugged = row.total_plugged,
            total_unplugged = row.total_unplugged,
            "analysis step"
        );
        rows.push(row);
    }

    let plugged_max = rows.iter().map(|r| r.total_plugged).fold(0.0, f64::max);
    let unplugged_max = rows.iter().map(|r| r.total_unplugged).fold(0.0, f64::max);
    let (governing, plugged) = if open {
        (plugged_max.min(unplugged_max), !(unplugged_max < plugged_max))
    } else {
        (plugged_max, true)
    };

    let result = CapacityResult {
        method,
        unit_system: system,
        rows,
        plugged_max,
        unplugged_max,
        governing,
        plugged,
    };
    info!(
        method = strategy.name(),
        steps = result.rows.len(),
        capacity = %format!("{:.2}", result.capacity()),
        plugged = result.plugged,
        "capacity analysis complete"
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piles::{Pile, PileInput, PileType};
    use crate::soil::{LayerInput, SoilDescription};
    use crate::units::Unit;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn sand_profile() -> SoilProfile {
        SoilProfile::new(UnitSystem::Imperial, 50.0)
            .unwrap()
            .with_layer(
                LayerInput::new(SoilType::Cohesionless, 40.0)
                    .with_tuw(100.0)
                    .with_corr_n(20.0)
                    .with_desc(SoilDescription::Sand),
            )
            .unwrap()
    }

    fn clay_profile() -> SoilProfile {
        SoilProfile::new(UnitSystem::Imperial, 50.0)
            .unwrap()
            .with_layer(LayerInput::new(SoilType::Cohesive, 40.0).with_tuw(100.0).with_su(1000.0))
            .unwrap()
    }

    fn square_pile(length: f64) -> Pile {
        Pile::new(
            UnitSystem::Imperial,
            PileInput::new(PileType::Concrete, length).with_shape("square-solid").with_side(12.0),
        )
        .unwrap()
    }

    #[test]
    fn test_alpha() {
        assert_relative_eq!(alpha(1.0, 1.0), 0.5, epsilon = 1e-12);
        // soft clay caps at 1
        assert_eq!(alpha(0.1, 1.0), 1.0);
        assert_relative_eq!(alpha(16.0, 1.0), 0.25, epsilon = 1e-12);
        assert_eq!(alpha(1.0, 0.0), 0.0);
    }

    #[test]
    fn test_precheck_aggregates() {
        let profile = SoilProfile::new(UnitSystem::Imperial, 5.0)
            .unwrap()
            .with_layer(LayerInput::new(SoilType::Cohesionless, 5.0))
            .unwrap()
            .with_layer(LayerInput::new(SoilType::Cohesive, 5.0).with_tuw(110.0))
            .unwrap()
            .with_layer(LayerInput::new(SoilType::Cohesionless, 5.0).with_tuw(110.0).with_corr_n(10.0))
            .unwrap();

        let err = precheck(&profile, CapacityMethod::RevisedApi).unwrap_err();
        match err {
            CalcError::PrecheckFailed { method, missing } => {
                assert_eq!(method, "Revised API");
                assert_eq!(missing.len(), 2);
                assert_eq!(missing[0].layer, 1);
                assert_eq!(missing[0].properties, vec!["tuw", "corr_n"]);
                assert_eq!(missing[1].layer, 2);
                assert_eq!(missing[1].properties, vec!["su"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = precheck(&profile, CapacityMethod::Olson90).unwrap_err();
        match err {
            CalcError::PrecheckFailed { missing, .. } => {
                assert_eq!(missing.len(), 3);
                assert_eq!(missing[2].properties, vec!["soil_desc"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_sand_api_by_hand() {
        // 1 ft square, 10 ft long, dry sand 100 pcf, N = 20 (medium)
        let project = Project::new("hand", sand_profile(), square_pile(10.0)).unwrap();
        let result = calculate(&project, CapacityMethod::RevisedApi).unwrap();
        assert!(result.plugged);
        assert_eq!(result.capacity().unit(), Unit::Kip);

        // shaft: K = 1, δ = 25°, σ' average over 0-10 ft is 0.5 ksf below the limit
        let shaft = 1.0 * 0.5 * 25.0_f64.to_radians().tan() * 4.0 * 10.0;
        // toe: Nq = 20, σ' = 1.0 ksf
        let toe = 20.0 * 1.0 * 1.0;
        let toe_row = result.toe_row().unwrap();
        assert_eq!(toe_row.z, 10.0);
        assert_relative_eq!(toe_row.shaft_out, shaft, epsilon = 1e-9);
        assert_relative_eq!(toe_row.toe_plugged, toe, epsilon = 1e-9);
        assert_relative_eq!(result.governing, shaft + toe, epsilon = 1e-9);
        assert_eq!(toe_row.shaft_in, 0.0);
        assert_eq!(toe_row.total_unplugged, toe_row.total_plugged);
        assert_eq!(toe_row.density, Some(DensityClass::Medium));
    }

    #[test]
    fn test_sand_olson_by_hand() {
        // same pile and sand; Olson sand, N = 20: δ = 35°, f_lim = 1.9,
        // Nq = 120, q_lim = 190 ksf; K = 0.70 + 0.015·20 = 1.0
        let project = Project::new("hand", sand_profile(), square_pile(20.0)).unwrap();
        let result = calculate(&project, CapacityMethod::Olson90).unwrap();
        let tan = 35.0_f64.to_radians().tan();

        // at 10 ft: σ'_avg = 0.5 ksf, σ'(10) = 1.0 ksf, toe under its limit
        let row = result.row_at(10.0).unwrap();
        assert_relative_eq!(row.shaft_out, 1.0 * 0.5 * tan * 4.0 * 10.0, epsilon = 1e-9);
        assert_relative_eq!(row.toe_plugged, 120.0 * 1.0 * 1.0, epsilon = 1e-9);

        // at the 20 ft toe Nq·σ' = 240 ksf, capped at q_lim
        let toe_row = result.toe_row().unwrap();
        assert_eq!(toe_row.z, 20.0);
        assert_relative_eq!(toe_row.shaft_out, 1.0 * 1.0 * tan * 4.0 * 20.0, epsilon = 1e-9);
        assert_relative_eq!(toe_row.toe_plugged, 190.0, epsilon = 1e-9);
        assert_relative_eq!(result.governing, toe_row.total_plugged, epsilon = 1e-9);
    }

    #[test]
    fn test_olson_shaft_limit() {
        // K = 1.0 again; f reaches f_lim = 1.9 ksf below about 27 ft, so
        // sum step by step
        let pile = Pile::new(
            UnitSystem::Imperial,
            PileInput::new(PileType::Concrete, 38.0).with_shape("square-solid").with_side(12.0),
        )
        .unwrap();
        let project = Project::new("deep", sand_profile(), pile).unwrap();
        let result = calculate(&project, CapacityMethod::Olson90).unwrap();

        let tan = 35.0_f64.to_radians().tan();
        let mut shaft = 0.0;
        let mut capped = false;
        for w in project.analysis_depths().windows(2) {
            let avg = (w[0] + w[1]) / 2.0 * 0.1;
            let f = 1.0 * avg * tan;
            capped |= f > 1.9;
            shaft += f.min(1.9) * 4.0 * (w[1] - w[0]);
        }
        assert!(capped);
        assert_relative_eq!(result.toe_row().unwrap().shaft_out, shaft, epsilon = 1e-9);
    }

    #[test]
    fn test_clay_by_hand() {
        // su = 1 ksf, σ'(5 ft) = 0.5 ksf: ψ at the midpoint of the first step
        // is large so α < 1
        let project = Project::new("clay", clay_profile(), square_pile(10.0)).unwrap();
        let result = calculate(&project, CapacityMethod::RevisedApi).unwrap();
        let toe_row = result.toe_row().unwrap();

        // 9 su over a 1 ft² toe, su uniform below
        assert_relative_eq!(toe_row.toe_plugged, 9.0, epsilon = 1e-9);
        assert_eq!(toe_row.density, None);

        let mut shaft = 0.0;
        for w in project.analysis_depths().windows(2) {
            let avg = (w[0] + w[1]) / 2.0 * 0.1;
            shaft += alpha(1.0, avg) * 1.0 * 4.0 * (w[1] - w[0]);
        }
        assert_relative_eq!(toe_row.shaft_out, shaft, epsilon = 1e-9);
    }

    #[test]
    fn test_no_friction_zone() {
        let pile = Pile::new(
            UnitSystem::Imperial,
            PileInput::new(PileType::Concrete, 10.0)
                .with_shape("square-solid")
                .with_side(12.0)
                .with_nf_zone(4.0),
        )
        .unwrap();
        let project = Project::new("nf", sand_profile(), pile).unwrap();
        let result = calculate(&project, CapacityMethod::RevisedApi).unwrap();
        assert_eq!(result.row_at(4.0).unwrap().shaft_out, 0.0);
        assert!(result.row_at(4.5).unwrap().shaft_out > 0.0);
    }

    #[test]
    fn test_open_pipe_governs_by_minimum() {
        let pile = Pile::new(
            UnitSystem::Imperial,
            PileInput::new(PileType::PipeOpen, 30.0).with_diameter(24.0).with_thickness(0.5),
        )
        .unwrap();
        let project = Project::new("pipe", sand_profile(), pile).unwrap();
        let result = calculate(&project, CapacityMethod::RevisedApi).unwrap();

        assert_relative_eq!(
            result.governing,
            result.plugged_max.min(result.unplugged_max),
            epsilon = 1e-12
        );
        assert_eq!(result.plugged, !(result.unplugged_max < result.plugged_max));

        let toe_row = result.toe_row().unwrap();
        assert!(toe_row.shaft_in > 0.0);
        // plug area over ring area
        let ratio = PI / (PI * (4.0 - (23.0_f64 / 12.0).powi(2)) / 4.0);
        assert_relative_eq!(toe_row.toe_plugged / toe_row.toe_unplugged, ratio, epsilon = 1e-9);
    }

    #[test]
    fn test_methods_differ_only_in_cohesionless() {
        let project = Project::new("clay", clay_profile(), square_pile(10.0)).unwrap();
        let api = calculate(&project, CapacityMethod::RevisedApi).unwrap();
        let olson = CapacityMethod::Olson90.run(&project).unwrap();
        assert_relative_eq!(api.governing, olson.governing, epsilon = 1e-12);

        let project = Project::new("sand", sand_profile(), square_pile(10.0)).unwrap();
        let api = calculate(&project, CapacityMethod::RevisedApi).unwrap();
        let olson = calculate(&project, CapacityMethod::Olson90).unwrap();
        assert!((api.governing - olson.governing).abs() > 1e-6);
    }

    #[test]
    fn test_totals_never_decrease_in_shaft() {
        let project = Project::new("sand", sand_profile(), square_pile(30.0)).unwrap();
        let result = calculate(&project, CapacityMethod::Olson90).unwrap();
        assert!(result
            .rows
            .windows(2)
            .all(|w| w[1].shaft_out >= w[0].shaft_out && w[1].z > w[0].z));
    }
}
