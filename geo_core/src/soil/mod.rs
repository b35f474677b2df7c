//! # Soil
//!
//! Soil classification, layer properties, and the layered [`SoilProfile`]
//! that computes in-situ stresses.
//!
//! ## Sign Conventions
//!
//! - **Depth** `z`: positive downward from the ground surface (mudline),
//!   negative above it
//! - **Water table**: depth to the phreatic surface, same convention; a
//!   negative value means standing water above grade (offshore)
//!
//! ## Example
//!
//! ```rust
//! use geo_core::soil::{LayerInput, SoilProfile, SoilType, StressKind};
//! use geo_core::units::UnitSystem;
//!
//! let mut profile = SoilProfile::new(UnitSystem::Imperial, 10.0).unwrap();
//! profile.add_layer(LayerInput::new(SoilType::Cohesionless, 16.0).with_tuw(90.0)).unwrap();
//!
//! let s = profile.stress_components(14.0).unwrap();
//! assert!((s.total.value() - 1.26).abs() < 1e-9);
//! assert!((s.pore_water.value() - 0.2496).abs() < 1e-9);
//! ```

pub mod layer;
pub mod profile;

pub use layer::{LayerInput, SoilLayer};
pub use profile::{SoilProfile, StressComponents, StressKind, StressValue};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::{CalcError, CalcResult};
use crate::units::Quantity;

/// Broad soil behaviour class driving the resistance model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoilType {
    /// Clays: undrained (total stress) behaviour
    Cohesive,
    /// Sands, gravels, silts: drained (effective stress) behaviour
    Cohesionless,
}

impl SoilType {
    pub const ALL: [SoilType; 2] = [SoilType::Cohesive, SoilType::Cohesionless];

    /// Code string used in inputs and error messages
    pub fn code(&self) -> &'static str {
        match self {
            SoilType::Cohesive => "cohesive",
            SoilType::Cohesionless => "cohesionless",
        }
    }
}

impl FromStr for SoilType {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "cohesive" | "clay" => Ok(SoilType::Cohesive),
            "cohesionless" | "sand" => Ok(SoilType::Cohesionless),
            _ => Err(CalcError::invalid_input(
                "soil_type",
                s,
                "Soil type can only be 'cohesive' or 'cohesionless'",
            )),
        }
    }
}

impl std::fmt::Display for SoilType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Grain-size description of a cohesionless layer (Olson-90 table key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SoilDescription {
    Gravel,
    SandGravel,
    Sand,
    SandSilt,
    Silt,
}

impl SoilDescription {
    pub const ALL: [SoilDescription; 5] = [
        SoilDescription::Gravel,
        SoilDescription::SandGravel,
        SoilDescription::Sand,
        SoilDescription::SandSilt,
        SoilDescription::Silt,
    ];

    /// Code string (e.g. "sand-silt")
    pub fn code(&self) -> &'static str {
        match self {
            SoilDescription::Gravel => "gravel",
            SoilDescription::SandGravel => "sand-gravel",
            SoilDescription::Sand => "sand",
            SoilDescription::SandSilt => "sand-silt",
            SoilDescription::Silt => "silt",
        }
    }
}

impl FromStr for SoilDescription {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        let key = s.trim().to_lowercase().replace(['_', ' '], "-");
        SoilDescription::ALL
            .into_iter()
            .find(|d| d.code() == key)
            .ok_or_else(|| CalcError::lookup_failed("soil descriptions", s))
    }
}

impl std::fmt::Display for SoilDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Names of the per-layer properties that can be queried by depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoilProperty {
    SoilType,
    SoilDesc,
    Height,
    Depth,
    Tuw,
    FieldN,
    CorrN,
    FieldPhi,
    CalcPhi,
    Su,
}

impl SoilProperty {
    pub const ALL: [SoilProperty; 10] = [
        SoilProperty::SoilType,
        SoilProperty::SoilDesc,
        SoilProperty::Height,
        SoilProperty::Depth,
        SoilProperty::Tuw,
        SoilProperty::FieldN,
        SoilProperty::CorrN,
        SoilProperty::FieldPhi,
        SoilProperty::CalcPhi,
        SoilProperty::Su,
    ];

    /// Input key for this property
    pub fn key(&self) -> &'static str {
        match self {
            SoilProperty::SoilType => "soil_type",
            SoilProperty::SoilDesc => "soil_desc",
            SoilProperty::Height => "height",
            SoilProperty::Depth => "depth",
            SoilProperty::Tuw => "tuw",
            SoilProperty::FieldN => "field_n",
            SoilProperty::CorrN => "corr_n",
            SoilProperty::FieldPhi => "field_phi",
            SoilProperty::CalcPhi => "calc_phi",
            SoilProperty::Su => "su",
        }
    }
}

impl FromStr for SoilProperty {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        let key = s.trim().to_lowercase();
        SoilProperty::ALL
            .into_iter()
            .find(|p| p.key() == key)
            .ok_or_else(|| {
                let allowed: Vec<&str> = SoilProperty::ALL.iter().map(|p| p.key()).collect();
                CalcError::invalid_input(
                    "property",
                    s,
                    format!("Unknown soil property; allowed: {}", allowed.join(", ")),
                )
            })
    }
}

impl std::fmt::Display for SoilProperty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Value of a layer property returned by [`SoilProfile::get_soil_prop`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum LayerValue {
    SoilType(SoilType),
    SoilDesc(SoilDescription),
    /// A dimensioned value (height, unit weight, friction angle, su)
    Quantity(Quantity),
    /// A dimensionless count (SPT-N)
    Count(f64),
}

impl LayerValue {
    /// Numeric magnitude, if the value is numeric
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            LayerValue::Quantity(q) => Some(q.value()),
            LayerValue::Count(n) => Some(*n),
            _ => None,
        }
    }
}

/// Depth below the water table, `max(z - water_table, 0)`.
///
/// Both arguments use the same sign convention (positive downward).
pub fn depth_below_water_table(z: f64, water_table: f64) -> f64 {
    (z - water_table).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soil_type_parsing() {
        assert_eq!("cohesive".parse::<SoilType>().unwrap(), SoilType::Cohesive);
        assert_eq!(" Cohesionless ".parse::<SoilType>().unwrap(), SoilType::Cohesionless);
        assert!("rock".parse::<SoilType>().is_err());
    }

    #[test]
    fn test_description_parsing() {
        assert_eq!("sand_silt".parse::<SoilDescription>().unwrap(), SoilDescription::SandSilt);
        assert_eq!("Sand-Gravel".parse::<SoilDescription>().unwrap(), SoilDescription::SandGravel);
        let err = "peat".parse::<SoilDescription>().unwrap_err();
        assert_eq!(err.error_code(), "LOOKUP_FAILED");
    }

    #[test]
    fn test_property_parsing() {
        assert_eq!("corr_n".parse::<SoilProperty>().unwrap(), SoilProperty::CorrN);
        let err = "plasticity".parse::<SoilProperty>().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_serde_codes() {
        let json = serde_json::to_string(&SoilDescription::SandGravel).unwrap();
        assert_eq!(json, "\"sand-gravel\"");
        let json = serde_json::to_string(&SoilType::Cohesionless).unwrap();
        assert_eq!(json, "\"cohesionless\"");
    }

    #[test]
    fn test_depth_below_water_table() {
        assert_eq!(depth_below_water_table(6.0, 10.0), 0.0);
        assert_eq!(depth_below_water_table(14.0, 10.0), 4.0);
        assert_eq!(depth_below_water_table(-3.0, -7.0), 4.0);
    }
}
