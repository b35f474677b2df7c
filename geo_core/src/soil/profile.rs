//! # Soil Profile
//!
//! An ordered, append-only stack of soil layers with a water table, and the
//! in-situ stress calculation.
//!
//! ## Stress Model
//!
//! ```text
//! u(z)  = max(z - z_w, 0) * γ_w
//! σ(z)  = Σ h_i * γ_i (layers above z) + (z - z_top) * γ_k + surcharge
//! σ'(z) = σ(z) - u(z)
//! ```
//!
//! `surcharge` is the weight of the water column standing above grade when
//! the water table is negative (offshore). Points above the mudline but below
//! the water surface carry the water column only.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::layer::{LayerInput, SoilLayer};
use super::{LayerValue, SoilProperty};
use crate::errors::{CalcError, CalcResult};
use crate::units::{Dimension, Quantity, UnitSystem};

/// Depths closer than this are treated as the same point (layer interfaces)
pub const DEPTH_TOLERANCE: f64 = 1e-9;

/// Which stress component to return from [`SoilProfile::calculate_stress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StressKind {
    Total,
    PoreWater,
    #[default]
    Effective,
    All,
}

impl std::str::FromStr for StressKind {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "total" => Ok(StressKind::Total),
            "pore_water" | "pore" => Ok(StressKind::PoreWater),
            "effective" => Ok(StressKind::Effective),
            "all" => Ok(StressKind::All),
            _ => Err(CalcError::invalid_input(
                "kind",
                s,
                "Choose from total, pore_water, effective, all",
            )),
        }
    }
}

/// Total, pore-water and effective stress at one depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressComponents {
    pub total: Quantity,
    pub pore_water: Quantity,
    pub effective: Quantity,
}

/// Result of [`SoilProfile::calculate_stress`]: one component or all three.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StressValue {
    Single(Quantity),
    All(StressComponents),
}

impl StressValue {
    /// The single component, if one was requested
    pub fn single(self) -> Option<Quantity> {
        match self {
            StressValue::Single(q) => Some(q),
            StressValue::All(_) => None,
        }
    }

    /// All three components, if `StressKind::All` was requested
    pub fn all(self) -> Option<StressComponents> {
        match self {
            StressValue::All(c) => Some(c),
            StressValue::Single(_) => None,
        }
    }
}

/// Layered soil profile.
///
/// Created with a water table, then layers are appended top to bottom. Layers
/// cannot be removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilProfile {
    unit_system: UnitSystem,
    water_table: f64,
    layers: Vec<SoilLayer>,
}

impl SoilProfile {
    /// Create an empty profile.
    ///
    /// `water_table` is the depth to the water table in ft/m; negative for
    /// water standing above grade.
    pub fn new(unit_system: UnitSystem, water_table: f64) -> CalcResult<Self> {
        if !water_table.is_finite() {
            return Err(CalcError::invalid_input(
                "water_table",
                water_table.to_string(),
                "Water table depth must be a finite number",
            ));
        }
        Ok(SoilProfile {
            unit_system,
            water_table,
            layers: Vec::new(),
        })
    }

    /// Append a layer below the current bottom of the profile.
    pub fn add_layer(&mut self, input: LayerInput) -> CalcResult<&mut Self> {
        let layer = SoilLayer::from_input(input, self.total_depth())?;
        debug!(
            layer = self.layers.len() + 1,
            soil_type = %layer.soil_type,
            depth = layer.depth,
            "added soil layer"
        );
        self.layers.push(layer);
        Ok(self)
    }

    /// Builder-style variant of [`add_layer`](Self::add_layer)
    pub fn with_layer(mut self, input: LayerInput) -> CalcResult<Self> {
        self.add_layer(input)?;
        Ok(self)
    }

    pub fn unit_system(&self) -> UnitSystem {
        self.unit_system
    }

    /// Depth to the water table (ft/m); negative above grade
    pub fn water_table(&self) -> f64 {
        self.water_table
    }

    pub fn layers(&self) -> &[SoilLayer] {
        &self.layers
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Sum of all layer heights
    pub fn total_depth(&self) -> f64 {
        self.layers.last().map_or(0.0, |l| l.depth)
    }

    /// Bottom depth of every layer, top to bottom
    pub fn layer_depths(&self) -> Vec<f64> {
        self.layers.iter().map(|l| l.depth).collect()
    }

    fn require_layers(&self) -> CalcResult<()> {
        if self.layers.is_empty() {
            return Err(CalcError::invalid_input(
                "layers",
                "0",
                "No layers in soil profile",
            ));
        }
        Ok(())
    }

    fn unit_weight(&self, index: usize) -> CalcResult<f64> {
        self.layers[index]
            .tuw
            .ok_or_else(|| CalcError::missing_field(format!("layers[{}].tuw", index + 1)))
    }

    /// Σ h·γ for layers `0..=last` (raw, before the stress factor)
    fn weight_through(&self, last: usize) -> CalcResult<f64> {
        let mut weight = 0.0;
        for i in 0..=last {
            weight += self.layers[i].height * self.unit_weight(i)?;
        }
        Ok(weight)
    }

    /// Check that a stress query at `z` is physically meaningful.
    fn check_stress_depth(&self, z: f64) -> CalcResult<()> {
        self.require_layers()?;
        let max_depth = self.total_depth();
        let unit = self.unit_system.unit(Dimension::Length);
        if !z.is_finite() || z > max_depth + DEPTH_TOLERANCE {
            return Err(CalcError::out_of_range(
                "z",
                format!("{} {}", z, unit),
                format!("Beyond the total soil profile depth of {} {}", max_depth, unit),
            ));
        }
        let wt = self.water_table;
        if (z < 0.0 && wt >= 0.0) || (z < wt && wt < 0.0) {
            return Err(CalcError::out_of_range(
                "z",
                format!("{} {}", z, unit),
                "Nothing but thin air at this depth",
            ));
        }
        Ok(())
    }

    /// Total, pore-water and effective stress at depth `z`.
    pub fn stress_components(&self, z: f64) -> CalcResult<StressComponents> {
        self.check_stress_depth(z)?;

        let system = self.unit_system;
        let to_stress = system.weight_to_stress();
        let gamma_w = system.gamma_water();
        let wt = self.water_table;

        let pore = super::depth_below_water_table(z, wt) * gamma_w * to_stress;
        let water_body = if z >= 0.0 && wt < 0.0 {
            wt.abs() * gamma_w * to_stress
        } else {
            0.0
        };

        let first = &self.layers[0];
        let total = if z < 0.0 && wt < 0.0 {
            pore
        } else if z < first.height - DEPTH_TOLERANCE {
            z * self.unit_weight(0)? * to_stress + water_body
        } else if let Some(ix) = self
            .layers
            .iter()
            .position(|l| (l.depth - z).abs() <= DEPTH_TOLERANCE)
        {
            self.weight_through(ix)? * to_stress + water_body
        } else {
            // z sits strictly inside layer `ixc`, below the interface of layer `ixp`
            let ixp = self
                .layers
                .iter()
                .rposition(|l| l.depth < z)
                .ok_or_else(|| CalcError::Internal {
                    message: format!("no interface above z = {}", z),
                })?;
            let ixc = ixp + 1;
            let partial = (z - self.layers[ixp].depth) * self.unit_weight(ixc)?;
            (self.weight_through(ixp)? + partial) * to_stress + water_body
        };

        let stress = Dimension::Stress;
        Ok(StressComponents {
            total: system.quantity(total, stress),
            pore_water: system.quantity(pore, stress),
            effective: system.quantity(total - pore, stress),
        })
    }

    /// Stress at depth `z`, returning the requested component(s).
    ///
    /// # Errors
    ///
    /// * `OutOfRange` - `z` is deeper than the profile, above grade with the
    ///   water table at or below grade, or above the water surface offshore
    /// * `MissingField` - a layer contributing to the stress has no unit weight
    pub fn calculate_stress(&self, z: f64, kind: StressKind) -> CalcResult<StressValue> {
        let s = self.stress_components(z)?;
        Ok(match kind {
            StressKind::Total => StressValue::Single(s.total),
            StressKind::PoreWater => StressValue::Single(s.pore_water),
            StressKind::Effective => StressValue::Single(s.effective),
            StressKind::All => StressValue::All(s),
        })
    }

    /// Effective stress magnitude at `z` in the system's stress unit
    pub fn effective_stress(&self, z: f64) -> CalcResult<f64> {
        Ok(self.stress_components(z)?.effective.value())
    }

    /// Index of the layer containing depth `z`.
    ///
    /// A depth on an interface belongs to the layer whose bottom it is; grade
    /// (z = 0) belongs to the first layer.
    pub fn layer_index_at(&self, z: f64) -> CalcResult<usize> {
        self.require_layers()?;
        let max_depth = self.total_depth();
        if !z.is_finite() || z < 0.0 || z > max_depth + DEPTH_TOLERANCE {
            return Err(CalcError::out_of_range(
                "z",
                z.to_string(),
                format!("Depth must lie within the soil profile [0, {}]", max_depth),
            ));
        }
        Ok(self
            .layers
            .iter()
            .position(|l| l.depth >= z - DEPTH_TOLERANCE)
            .unwrap_or(self.layers.len() - 1))
    }

    /// The layer containing depth `z` (see [`layer_index_at`](Self::layer_index_at))
    pub fn layer_at(&self, z: f64) -> CalcResult<&SoilLayer> {
        Ok(&self.layers[self.layer_index_at(z)?])
    }

    /// Value of a layer property at depth `z`.
    ///
    /// Returns `Ok(None)` when the layer exists but the property was not given.
    pub fn get_soil_prop(&self, z: f64, property: SoilProperty) -> CalcResult<Option<LayerValue>> {
        Ok(self.layer_at(z)?.value(property, self.unit_system))
    }

    /// Same as [`get_soil_prop`](Self::get_soil_prop) with the property named
    /// by its input key (e.g. `"corr_n"`).
    pub fn get_soil_prop_by_name(&self, z: f64, property: &str) -> CalcResult<Option<LayerValue>> {
        let property: SoilProperty = property.parse()?;
        self.get_soil_prop(z, property)
    }
}

impl std::fmt::Display for SoilProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let system = self.unit_system;
        let len = system.unit(Dimension::Length);
        let opt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{}", v));

        writeln!(f, "Unit System: {}", system)?;
        writeln!(f, "Water Table: {} {}", self.water_table, len)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:>5}  {:<12}  {:<11}  {:>8}  {:>8}  {:>8}  {:>7}  {:>7}  {:>9}  {:>9}  {:>8}",
            "Layer", "Soil Type", "Soil Desc", "Depth", "Height", "TUW", "Field N", "Corr. N", "Field Phi", "Calc. Phi", "Shear Su"
        )?;
        for (i, l) in self.layers.iter().enumerate() {
            writeln!(
                f,
                "{:>5}  {:<12}  {:<11}  {:>8}  {:>8}  {:>8}  {:>7}  {:>7}  {:>9}  {:>9}  {:>8}",
                i + 1,
                l.soil_type.code(),
                l.soil_desc.map_or("-", |d| d.code()),
                l.depth,
                l.height,
                opt(l.tuw),
                opt(l.field_n),
                opt(l.corr_n),
                opt(l.field_phi),
                opt(l.calc_phi),
                opt(l.su),
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Units: depth/height ({}), TUW ({}), phi (deg), Su ({})",
            len,
            system.unit(Dimension::UnitWeight),
            system.unit(Dimension::SoilStrength)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soil::SoilType;
    use crate::units::Unit;
    use approx::assert_relative_eq;

    fn single_layer() -> SoilProfile {
        SoilProfile::new(UnitSystem::Imperial, 10.0)
            .unwrap()
            .with_layer(LayerInput::new(SoilType::Cohesionless, 16.0).with_tuw(90.0))
            .unwrap()
    }

    fn two_layers() -> SoilProfile {
        SoilProfile::new(UnitSystem::Imperial, 10.0)
            .unwrap()
            .with_layer(LayerInput::new(SoilType::Cohesionless, 5.0).with_tuw(90.0))
            .unwrap()
            .with_layer(LayerInput::new(SoilType::Cohesive, 11.0).with_tuw(110.0))
            .unwrap()
    }

    fn offshore() -> SoilProfile {
        SoilProfile::new(UnitSystem::Imperial, -7.0)
            .unwrap()
            .with_layer(LayerInput::new(SoilType::Cohesionless, 4.5).with_tuw(90.0))
            .unwrap()
            .with_layer(LayerInput::new(SoilType::Cohesive, 4.5).with_tuw(110.0))
            .unwrap()
    }

    #[test]
    fn test_depths_accumulate() {
        let p = two_layers();
        assert_eq!(p.layer_depths(), vec![5.0, 16.0]);
        assert_eq!(p.total_depth(), 16.0);
    }

    #[test]
    fn test_single_layer_stresses() {
        let p = single_layer();
        let a = p.stress_components(6.0).unwrap();
        assert_relative_eq!(a.total.value(), 0.540, epsilon = 1e-9);
        assert_eq!(a.pore_water.value(), 0.0);
        assert_relative_eq!(a.effective.value(), 0.540, epsilon = 1e-9);
        assert_eq!(a.total.unit(), Unit::KipPerFt2);

        let b = p.stress_components(14.0).unwrap();
        assert_relative_eq!(b.total.value(), 1.260, epsilon = 1e-9);
        assert_relative_eq!(b.pore_water.value(), 0.2496, epsilon = 1e-9);
        assert_relative_eq!(b.effective.value(), 1.0104, epsilon = 1e-9);
    }

    #[test]
    fn test_interface_and_inside_layer() {
        let p = two_layers();
        assert_relative_eq!(p.stress_components(6.0).unwrap().total.value(), 0.560, epsilon = 1e-9);
        // exactly on the interface: first layer only, no double counting
        assert_relative_eq!(p.stress_components(5.0).unwrap().total.value(), 0.450, epsilon = 1e-9);
        // bottom of the profile
        assert_relative_eq!(p.stress_components(16.0).unwrap().total.value(), 1.660, epsilon = 1e-9);
    }

    #[test]
    fn test_offshore_water_column() {
        let p = offshore();
        let above = p.stress_components(-3.0).unwrap();
        assert_relative_eq!(above.total.value(), 0.2496, epsilon = 1e-9);
        assert_relative_eq!(above.pore_water.value(), 0.2496, epsilon = 1e-9);
        assert_relative_eq!(above.effective.value(), 0.0, epsilon = 1e-12);

        let at_mudline = p.stress_components(0.0).unwrap();
        assert_relative_eq!(at_mudline.total.value(), 7.0 * 0.0624, epsilon = 1e-9);
        assert_relative_eq!(at_mudline.effective.value(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_kind_selection() {
        let p = single_layer();
        let total = p.calculate_stress(14.0, StressKind::Total).unwrap().single().unwrap();
        assert_relative_eq!(total.value(), 1.26, epsilon = 1e-9);
        let all = p.calculate_stress(14.0, StressKind::All).unwrap();
        assert!(all.single().is_none());
        assert!(all.all().is_some());
        assert_eq!("pore_water".parse::<StressKind>().unwrap(), StressKind::PoreWater);
        assert!("shear".parse::<StressKind>().is_err());
    }

    #[test]
    fn test_range_errors() {
        let p = single_layer();
        assert_eq!(p.stress_components(16.5).unwrap_err().error_code(), "OUT_OF_RANGE");
        assert_eq!(p.stress_components(-1.0).unwrap_err().error_code(), "OUT_OF_RANGE");
        // above the water surface offshore
        assert_eq!(offshore().stress_components(-8.0).unwrap_err().error_code(), "OUT_OF_RANGE");

        let empty = SoilProfile::new(UnitSystem::Metric, 2.0).unwrap();
        assert!(empty.stress_components(1.0).unwrap_err().is_validation());
    }

    #[test]
    fn test_missing_unit_weight() {
        let p = SoilProfile::new(UnitSystem::Imperial, 10.0)
            .unwrap()
            .with_layer(LayerInput::new(SoilType::Cohesive, 5.0))
            .unwrap();
        let err = p.stress_components(2.0).unwrap_err();
        assert_eq!(err, CalcError::missing_field("layers[1].tuw"));
    }

    #[test]
    fn test_metric_stresses() {
        let p = SoilProfile::new(UnitSystem::Metric, 2.0)
            .unwrap()
            .with_layer(LayerInput::new(SoilType::Cohesionless, 5.0).with_tuw(18.0))
            .unwrap();
        let s = p.stress_components(4.0).unwrap();
        assert_eq!(s.total.unit(), Unit::KnPerM2);
        assert_relative_eq!(s.total.value(), 72.0, epsilon = 1e-9);
        assert_relative_eq!(s.pore_water.value(), 2.0 * 9.81, epsilon = 1e-9);
    }

    #[test]
    fn test_layer_lookup_at_interfaces() {
        let p = two_layers();
        assert_eq!(p.layer_index_at(0.0).unwrap(), 0);
        assert_eq!(p.layer_index_at(4.9).unwrap(), 0);
        assert_eq!(p.layer_index_at(5.0).unwrap(), 0);
        assert_eq!(p.layer_index_at(5.1).unwrap(), 1);
        assert_eq!(p.layer_index_at(16.0).unwrap(), 1);
        assert!(p.layer_index_at(-0.1).is_err());
        assert!(p.layer_index_at(16.1).is_err());
    }

    #[test]
    fn test_get_soil_prop() {
        let p = two_layers();
        let t = p.get_soil_prop(8.0, SoilProperty::SoilType).unwrap();
        assert_eq!(t, Some(LayerValue::SoilType(SoilType::Cohesive)));
        let tuw = p.get_soil_prop_by_name(2.0, "tuw").unwrap().unwrap();
        assert_eq!(tuw.as_f64(), Some(90.0));
        assert_eq!(p.get_soil_prop(2.0, SoilProperty::Su).unwrap(), None);
        assert!(p.get_soil_prop_by_name(2.0, "color").unwrap_err().is_validation());
        assert!(p.get_soil_prop(20.0, SoilProperty::Tuw).is_err());
    }

    #[test]
    fn test_display_lists_layers() {
        let text = two_layers().to_string();
        assert!(text.contains("Water Table: 10 ft"));
        assert!(text.contains("cohesionless"));
        assert!(text.contains("cohesive"));
    }
}
