//! # Analysis Input
//!
//! The JSON document describing one analysis: unit system, water table, soil
//! layers, and optionally a pile and capacity method.
//!
//! ## JSON Example
//!
//! ```json
//! {
//!   "name": "Pier 4",
//!   "unit_system": "English",
//!   "water_table": 10.0,
//!   "layers": [
//!     { "soil_type": "cohesionless", "soil_desc": "sand", "height": 5.0, "tuw": 90.0, "corr_n": 8 },
//!     { "soil_type": "cohesive", "height": 30.0, "tuw": 110.0, "su": 1200 }
//!   ],
//!   "pile": { "pile_type": "pipe-closed", "diameter": 16, "thickness": 0.5, "length": 30 },
//!   "method": "api"
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::CapacityMethod;
use crate::errors::{CalcError, CalcResult};
use crate::piles::{Pile, PileInput};
use crate::project::Project;
use crate::soil::{LayerInput, SoilProfile};
use crate::units::UnitSystem;

/// One analysis as read from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInput {
    #[serde(default, alias = "label")]
    pub name: String,
    #[serde(default)]
    pub unit_system: UnitSystem,
    /// Depth to the water table (ft/m); negative above grade
    pub water_table: f64,
    pub layers: Vec<LayerInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pile: Option<PileInput>,
    #[serde(default)]
    pub method: CapacityMethod,
}

impl AnalysisInput {
    /// Parse from a JSON string
    pub fn from_json(json: &str) -> CalcResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the soil profile, appending layers in order.
    pub fn build_profile(&self) -> CalcResult<SoilProfile> {
        let mut profile = SoilProfile::new(self.unit_system, self.water_table)?;
        for (i, layer) in self.layers.iter().enumerate() {
            profile.add_layer(layer.clone()).map_err(|e| match e {
                CalcError::InvalidInput { field, value, reason } => {
                    CalcError::invalid_input(format!("layers[{}].{}", i + 1, field), value, reason)
                }
                other => other,
            })?;
        }
        Ok(profile)
    }

    /// Build the pile.
    ///
    /// # Errors
    ///
    /// * `MissingField` - the document has no pile
    pub fn build_pile(&self) -> CalcResult<Pile> {
        let input = self.pile.clone().ok_or_else(|| CalcError::missing_field("pile"))?;
        Pile::new(self.unit_system, input)
    }

    /// Build the full project (profile and pile)
    pub fn build_project(&self) -> CalcResult<Project> {
        Project::new(self.name.clone(), self.build_profile()?, self.build_pile()?)
    }
}
