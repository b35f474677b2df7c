//! Method-specific soil models behind the shared capacity loop.

use crate::errors::{CalcError, CalcResult};
use crate::piles::Pile;
use crate::soil::{SoilLayer, SoilProperty, SoilType};
use crate::tables::{api, olson90, DesignValues};

/// The parts of a static capacity method that differ between methods.
///
/// Cohesive soils are handled identically by every method (α method and
/// 9·su toe), so only the cohesionless models live here.
pub trait CapacityStrategy: Send + Sync {
    /// Name used in messages and reports
    fn name(&self) -> &'static str;

    /// Layer properties the method needs for a soil type
    fn required_properties(&self, soil_type: SoilType) -> &'static [SoilProperty];

    /// Lateral earth pressure coefficient for a cohesionless layer
    fn k_factor(&self, pile: &Pile, corr_n: f64) -> f64;

    /// δ, f_lim, Nq, q_lim for a cohesionless layer
    fn design_values(&self, layer: &SoilLayer) -> CalcResult<DesignValues>;
}

fn corrected_n(layer: &SoilLayer) -> CalcResult<f64> {
    layer
        .corr_n
        .ok_or_else(|| CalcError::missing_field(format!("corr_n (layer at {} depth)", layer.depth)))
}

/// Revised API method
#[derive(Debug, Clone, Copy, Default)]
pub struct RevisedApi;

impl CapacityStrategy for RevisedApi {
    fn name(&self) -> &'static str {
        "Revised API"
    }

    fn required_properties(&self, soil_type: SoilType) -> &'static [SoilProperty] {
        match soil_type {
            SoilType::Cohesive => &[SoilProperty::Tuw, SoilProperty::Su],
            SoilType::Cohesionless => &[SoilProperty::Tuw, SoilProperty::CorrN],
        }
    }

    fn k_factor(&self, pile: &Pile, _corr_n: f64) -> f64 {
        if pile.is_full_displacement() {
            1.0
        } else {
            0.8
        }
    }

    fn design_values(&self, layer: &SoilLayer) -> CalcResult<DesignValues> {
        Ok(api::design_values(corrected_n(layer)?))
    }
}

/// Olson (1990) method
#[derive(Debug, Clone, Copy, Default)]
pub struct Olson90;

impl CapacityStrategy for Olson90 {
    fn name(&self) -> &'static str {
        "Olson 90"
    }

    fn required_properties(&self, soil_type: SoilType) -> &'static [SoilProperty] {
        match soil_type {
            SoilType::Cohesive => &[SoilProperty::Tuw, SoilProperty::Su],
            SoilType::Cohesionless => &[SoilProperty::Tuw, SoilProperty::CorrN, SoilProperty::SoilDesc],
        }
    }

    fn k_factor(&self, pile: &Pile, corr_n: f64) -> f64 {
        let base = if pile.is_full_displacement() { 0.70 } else { 0.16 };
        base + 0.015 * corr_n
    }

    fn design_values(&self, layer: &SoilLayer) -> CalcResult<DesignValues> {
        let desc = layer
            .soil_desc
            .ok_or_else(|| CalcError::missing_field(format!("soil_desc (layer at {} depth)", layer.depth)))?;
        Ok(olson90::design_values(desc, corrected_n(layer)?))
    }
}
