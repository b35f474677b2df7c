//! Soil layers.
//!
//! [`LayerInput`] is what callers describe (JSON or builder); [`SoilLayer`] is
//! what a [`SoilProfile`](super::SoilProfile) stores after validation, with
//! its cumulative depth filled in.

use serde::{Deserialize, Serialize};

use super::{LayerValue, SoilDescription, SoilProperty, SoilType};
use crate::errors::{CalcError, CalcResult};
use crate::units::{Dimension, UnitSystem};

/// A soil layer as supplied by the caller.
///
/// Values use the input units of the profile's unit system: height in ft/m,
/// unit weight in lb/ft³ or kN/m³, su in lb/ft² or kN/m², angles in degrees.
///
/// ## JSON Example
///
/// ```json
/// {
///   "soil_type": "cohesionless",
///   "soil_desc": "sand",
///   "height": 16.0,
///   "tuw": 90.0,
///   "corr_n": 12
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerInput {
    pub soil_type: SoilType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soil_desc: Option<SoilDescription>,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuw: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_n: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corr_n: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_phi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calc_phi: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub su: Option<f64>,
}

impl LayerInput {
    /// Start a layer with only its type and height
    pub fn new(soil_type: SoilType, height: f64) -> Self {
        LayerInput {
            soil_type,
            soil_desc: None,
            height,
            tuw: None,
            field_n: None,
            corr_n: None,
            field_phi: None,
            calc_phi: None,
            su: None,
        }
    }

    pub fn with_desc(mut self, desc: SoilDescription) -> Self {
        self.soil_desc = Some(desc);
        self
    }

    /// Total unit weight
    pub fn with_tuw(mut self, tuw: f64) -> Self {
        self.tuw = Some(tuw);
        self
    }

    pub fn with_field_n(mut self, n: f64) -> Self {
        self.field_n = Some(n);
        self
    }

    /// Corrected SPT-N
    pub fn with_corr_n(mut self, n: f64) -> Self {
        self.corr_n = Some(n);
        self
    }

    pub fn with_field_phi(mut self, phi: f64) -> Self {
        self.field_phi = Some(phi);
        self
    }

    pub fn with_calc_phi(mut self, phi: f64) -> Self {
        self.calc_phi = Some(phi);
        self
    }

    /// Undrained shear strength
    pub fn with_su(mut self, su: f64) -> Self {
        self.su = Some(su);
        self
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(CalcError::invalid_input(
                "height",
                self.height.to_string(),
                "Layer height must be a positive number",
            ));
        }
        let optional = [
            ("tuw", self.tuw),
            ("field_n", self.field_n),
            ("corr_n", self.corr_n),
            ("field_phi", self.field_phi),
            ("calc_phi", self.calc_phi),
            ("su", self.su),
        ];
        for (field, value) in optional {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(CalcError::invalid_input(
                        field,
                        v.to_string(),
                        "Soil properties must be non-negative numbers",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// A validated layer stored in a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilLayer {
    pub soil_type: SoilType,
    pub soil_desc: Option<SoilDescription>,
    pub height: f64,
    /// Depth from grade to the bottom of this layer
    pub depth: f64,
    pub tuw: Option<f64>,
    pub field_n: Option<f64>,
    pub corr_n: Option<f64>,
    pub field_phi: Option<f64>,
    pub calc_phi: Option<f64>,
    pub su: Option<f64>,
}

impl SoilLayer {
    pub(crate) fn from_input(input: LayerInput, depth_above: f64) -> CalcResult<Self> {
        input.validate()?;
        Ok(SoilLayer {
            soil_type: input.soil_type,
            soil_desc: input.soil_desc,
            height: input.height,
            depth: depth_above + input.height,
            tuw: input.tuw,
            field_n: input.field_n,
            corr_n: input.corr_n,
            field_phi: input.field_phi,
            calc_phi: input.calc_phi,
            su: input.su,
        })
    }

    /// Depth from grade to the top of this layer
    pub fn top(&self) -> f64 {
        self.depth - self.height
    }

    pub fn is_cohesive(&self) -> bool {
        self.soil_type == SoilType::Cohesive
    }

    /// Value of a named property, tagged with units of `system`.
    ///
    /// Returns `None` when the property was not supplied for this layer.
    pub fn value(&self, property: SoilProperty, system: UnitSystem) -> Option<LayerValue> {
        let quantity = |v: Option<f64>, dim: Dimension| v.map(|v| LayerValue::Quantity(system.quantity(v, dim)));
        match property {
            SoilProperty::SoilType => Some(LayerValue::SoilType(self.soil_type)),
            SoilProperty::SoilDesc => self.soil_desc.map(LayerValue::SoilDesc),
            SoilProperty::Height => quantity(Some(self.height), Dimension::Length),
            SoilProperty::Depth => quantity(Some(self.depth), Dimension::Length),
            SoilProperty::Tuw => quantity(self.tuw, Dimension::UnitWeight),
            SoilProperty::FieldN => self.field_n.map(LayerValue::Count),
            SoilProperty::CorrN => self.corr_n.map(LayerValue::Count),
            SoilProperty::FieldPhi => quantity(self.field_phi, Dimension::Angle),
            SoilProperty::CalcPhi => quantity(self.calc_phi, Dimension::Angle),
            SoilProperty::Su => quantity(self.su, Dimension::SoilStrength),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::Unit;

    #[test]
    fn test_builder() {
        let input = LayerInput::new(SoilType::Cohesive, 11.0).with_tuw(110.0).with_su(800.0);
        assert_eq!(input.tuw, Some(110.0));
        assert_eq!(input.su, Some(800.0));
        assert!(input.corr_n.is_none());
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(LayerInput::new(SoilType::Cohesive, 0.0).validate().is_err());
        assert!(LayerInput::new(SoilType::Cohesive, -2.0).validate().is_err());
        let err = LayerInput::new(SoilType::Cohesionless, 5.0)
            .with_corr_n(-3.0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, CalcError::InvalidInput { ref field, .. } if field == "corr_n"));
    }

    #[test]
    fn test_layer_values() {
        let layer = SoilLayer::from_input(
            LayerInput::new(SoilType::Cohesive, 11.0).with_tuw(110.0).with_su(800.0),
            5.0,
        )
        .unwrap();
        assert_eq!(layer.depth, 16.0);
        assert_eq!(layer.top(), 5.0);

        let su = layer.value(SoilProperty::Su, UnitSystem::Imperial).unwrap();
        assert_eq!(su, LayerValue::Quantity(crate::units::Quantity::new(800.0, Unit::LbPerFt2)));
        assert!(layer.value(SoilProperty::CorrN, UnitSystem::Imperial).is_none());
    }

    #[test]
    fn test_json_defaults() {
        let json = r#"{ "soil_type": "cohesionless", "height": 16.0, "tuw": 90.0 }"#;
        let input: LayerInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.soil_type, SoilType::Cohesionless);
        assert!(input.soil_desc.is_none());
        assert_eq!(input.tuw, Some(90.0));
    }
}
