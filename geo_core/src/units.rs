//! # Unit Types
//!
//! Unit systems and a light unit-tagged quantity type for geotechnical results.
//!
//! ## Design Philosophy
//!
//! A full dimensional-analysis library is overkill here: the engine only ever
//! deals with a handful of dimensions (length, area, unit weight, stress,
//! force, angle). Each public result is a [`Quantity`], an `f64` paired with a
//! [`Unit`] tag. Arithmetic is explicit:
//!
//! - scaling by `f64` is infallible (`Mul<f64>`, `Div<f64>`)
//! - addition converts the right-hand side into the left-hand unit and fails
//!   when the dimensions differ
//! - multiplication combines dimensions (length × unit weight = stress,
//!   stress × area = force, length × length = area)
//!
//! ## Unit Systems
//!
//! | Dimension      | Metric | Imperial |
//! |----------------|--------|----------|
//! | Length         | m      | ft       |
//! | Pile length    | m      | ft       |
//! | Pile diameter  | cm     | in       |
//! | Unit weight    | kN/m³  | lb/ft³   |
//! | Stress         | kN/m²  | kip/ft²  |
//! | Soil strength  | kN/m²  | lb/ft²   |
//! | Force          | kN     | kip      |
//! | Area           | m²     | ft²      |
//! | Section area   | cm²    | in²      |
//! | Angle          | deg    | deg      |
//!
//! ## Example
//!
//! ```rust
//! use geo_core::units::{Quantity, Unit, UnitSystem};
//!
//! let stress = Quantity::new(1.26, Unit::KipPerFt2);
//! let metric = stress.to_system(UnitSystem::Metric);
//! assert_eq!(metric.unit(), Unit::KnPerM2);
//! assert!((metric.value() - 60.329).abs() < 1e-3);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Div, Mul};

use crate::errors::{CalcError, CalcResult};

// ============================================================================
// Unit Systems and Dimensions
// ============================================================================

/// Unit system of a soil profile, a pile, or a whole project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// SI units (m, cm, kN)
    #[serde(alias = "SI", alias = "si")]
    Metric,
    /// US customary units (ft, in, kip)
    #[default]
    #[serde(alias = "English", alias = "english")]
    Imperial,
}

/// Unit weight of water in lb/ft³
pub const GAMMA_WATER_PCF: f64 = 62.4;

/// Unit weight of water in kN/m³
pub const GAMMA_WATER_KN_M3: f64 = 9.81;

impl UnitSystem {
    /// Both systems, for iteration
    pub const ALL: [UnitSystem; 2] = [UnitSystem::Metric, UnitSystem::Imperial];

    /// The concrete unit this system uses for a dimension
    pub fn unit(self, dimension: Dimension) -> Unit {
        use Dimension::*;
        match (self, dimension) {
            (UnitSystem::Metric, Length | PileLength) => Unit::Meter,
            (UnitSystem::Metric, PileDiameter) => Unit::Centimeter,
            (UnitSystem::Metric, UnitWeight) => Unit::KnPerM3,
            (UnitSystem::Metric, Stress | SoilStrength) => Unit::KnPerM2,
            (UnitSystem::Metric, Force) => Unit::KiloNewton,
            (UnitSystem::Metric, Area) => Unit::SqMeter,
            (UnitSystem::Metric, SectionArea) => Unit::SqCentimeter,
            (UnitSystem::Imperial, Length | PileLength) => Unit::Foot,
            (UnitSystem::Imperial, PileDiameter) => Unit::Inch,
            (UnitSystem::Imperial, UnitWeight) => Unit::LbPerFt3,
            (UnitSystem::Imperial, Stress) => Unit::KipPerFt2,
            (UnitSystem::Imperial, SoilStrength) => Unit::LbPerFt2,
            (UnitSystem::Imperial, Force) => Unit::Kip,
            (UnitSystem::Imperial, Area) => Unit::SqFoot,
            (UnitSystem::Imperial, SectionArea) => Unit::SqInch,
            (_, Angle) => Unit::Degree,
        }
    }

    /// Tag a raw value with this system's unit for `dimension`
    pub fn quantity(self, value: f64, dimension: Dimension) -> Quantity {
        Quantity::new(value, self.unit(dimension))
    }

    /// Unit weight of water in this system's unit-weight unit
    pub fn gamma_water(self) -> f64 {
        match self {
            UnitSystem::Metric => GAMMA_WATER_KN_M3,
            UnitSystem::Imperial => GAMMA_WATER_PCF,
        }
    }

    /// Factor turning (length × unit weight) into this system's stress unit.
    ///
    /// ft × lb/ft³ gives lb/ft², so imperial divides by 1000 to reach kip/ft².
    pub fn weight_to_stress(self) -> f64 {
        match self {
            UnitSystem::Metric => 1.0,
            UnitSystem::Imperial => 1.0 / 1000.0,
        }
    }

    /// Factor turning soil-strength input (su) into this system's stress unit
    pub fn strength_to_stress(self) -> f64 {
        self.unit(Dimension::SoilStrength).factor_to(self.unit(Dimension::Stress))
    }

    /// Factor turning a pile-diameter value into the length unit (in → ft, cm → m)
    pub fn diameter_to_length(self) -> f64 {
        self.unit(Dimension::PileDiameter).factor_to(self.unit(Dimension::Length))
    }

    /// Factor turning a section area into the area unit (in² → ft², cm² → m²)
    pub fn section_area_to_area(self) -> f64 {
        self.unit(Dimension::SectionArea).factor_to(self.unit(Dimension::Area))
    }

    /// Convert a stress given in kip/ft² (how design tables are published)
    /// into this system's stress unit
    pub fn stress_from_ksf(self, ksf: f64) -> f64 {
        ksf * Unit::KipPerFt2.factor_to(self.unit(Dimension::Stress))
    }

    /// Spacing of the regular depth grid used by capacity analyses
    pub fn analysis_step(self) -> f64 {
        match self {
            UnitSystem::Metric => 0.2,
            UnitSystem::Imperial => 0.5,
        }
    }

    /// Display name
    pub fn display_name(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "Metric (SI)",
            UnitSystem::Imperial => "Imperial (English)",
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Logical dimension of an input or output value.
///
/// Several dimensions share a physical kind but differ in the unit the user
/// supplies (pile diameters in inches while depths are in feet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Length,
    PileLength,
    PileDiameter,
    UnitWeight,
    Stress,
    SoilStrength,
    Force,
    Area,
    SectionArea,
    Angle,
}

/// Physical kind of a unit; conversion is only defined within one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Length,
    Area,
    UnitWeight,
    Stress,
    Force,
    Angle,
}

// ============================================================================
// Units
// ============================================================================

// lbf -> N, and the foot
const LBF_N: f64 = 4.448_221_615_260_5;
const FT_M: f64 = 0.3048;

macro_rules! define_units {
    ($( $variant:ident => ($symbol:expr, $kind:ident, $si:expr, $metric:ident, $imperial:ident) ),+ $(,)?) => {
        /// Concrete unit of measure.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Unit {
            $( $variant ),+
        }

        impl Unit {
            /// All supported units
            pub const ALL: &'static [Unit] = &[$( Unit::$variant ),+];

            /// Printable symbol (e.g. "kip/ft²")
            pub fn symbol(self) -> &'static str {
                match self {
                    $( Unit::$variant => $symbol ),+
                }
            }

            /// Physical kind
            pub fn kind(self) -> Kind {
                match self {
                    $( Unit::$variant => Kind::$kind ),+
                }
            }

            /// Multiplier to the SI base unit of this kind (m, m², kN/m³, kN/m², kN, deg)
            pub fn si_factor(self) -> f64 {
                match self {
                    $( Unit::$variant => $si ),+
                }
            }

            /// The equivalent unit in another system
            pub fn counterpart(self, system: UnitSystem) -> Unit {
                match (self, system) {
                    $(
                        (Unit::$variant, UnitSystem::Metric) => Unit::$metric,
                        (Unit::$variant, UnitSystem::Imperial) => Unit::$imperial,
                    )+
                }
            }
        }
    };
}

define_units! {
    Meter        => ("m",       Length,     1.0,                            Meter,        Foot),
    Foot         => ("ft",      Length,     FT_M,                           Meter,        Foot),
    Centimeter   => ("cm",      Length,     0.01,                           Centimeter,   Inch),
    Inch         => ("in",      Length,     FT_M / 12.0,                    Centimeter,   Inch),
    SqMeter      => ("m²",      Area,       1.0,                            SqMeter,      SqFoot),
    SqFoot       => ("ft²",     Area,       FT_M * FT_M,                    SqMeter,      SqFoot),
    SqCentimeter => ("cm²",     Area,       1.0e-4,                         SqCentimeter, SqInch),
    SqInch       => ("in²",     Area,       FT_M * FT_M / 144.0,            SqCentimeter, SqInch),
    KnPerM3      => ("kN/m³",   UnitWeight, 1.0,                            KnPerM3,      LbPerFt3),
    LbPerFt3     => ("lb/ft³",  UnitWeight, LBF_N / 1000.0 / (FT_M * FT_M * FT_M), KnPerM3, LbPerFt3),
    KnPerM2      => ("kN/m²",   Stress,     1.0,                            KnPerM2,      KipPerFt2),
    KipPerFt2    => ("kip/ft²", Stress,     LBF_N / (FT_M * FT_M),          KnPerM2,      KipPerFt2),
    LbPerFt2     => ("lb/ft²",  Stress,     LBF_N / 1000.0 / (FT_M * FT_M), KnPerM2,      LbPerFt2),
    KiloNewton   => ("kN",      Force,      1.0,                            KiloNewton,   Kip),
    Kip          => ("kip",     Force,      LBF_N,                          KiloNewton,   Kip),
    Degree       => ("deg",     Angle,      1.0,                            Degree,       Degree),
}

impl Unit {
    /// Multiplier converting a value in `self` into `target`.
    ///
    /// Callers must pass units of the same kind; use [`Quantity::to`] for a
    /// checked conversion.
    pub fn factor_to(self, target: Unit) -> f64 {
        self.si_factor() / target.si_factor()
    }

    /// True when this unit belongs to the imperial system
    pub fn is_imperial(self) -> bool {
        self.counterpart(UnitSystem::Imperial) == self && self.kind() != Kind::Angle
    }

    fn si_base(kind: Kind) -> Unit {
        match kind {
            Kind::Length => Unit::Meter,
            Kind::Area => Unit::SqMeter,
            Kind::UnitWeight => Unit::KnPerM3,
            Kind::Stress => Unit::KnPerM2,
            Kind::Force => Unit::KiloNewton,
            Kind::Angle => Unit::Degree,
        }
    }

    fn imperial_base(kind: Kind) -> Unit {
        match kind {
            Kind::Length => Unit::Foot,
            Kind::Area => Unit::SqFoot,
            Kind::UnitWeight => Unit::LbPerFt3,
            Kind::Stress => Unit::KipPerFt2,
            Kind::Force => Unit::Kip,
            Kind::Angle => Unit::Degree,
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// ============================================================================
// Quantity
// ============================================================================

/// A magnitude tagged with its unit.
///
/// Serializes as `{ "value": 0.54, "unit": "KipPerFt2" }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    value: f64,
    unit: Unit,
}

impl Quantity {
    /// Create from a raw value and its unit
    pub fn new(value: f64, unit: Unit) -> Self {
        Quantity { value, unit }
    }

    /// Zero in the given unit
    pub fn zero(unit: Unit) -> Self {
        Quantity { value: 0.0, unit }
    }

    /// Dimensionless magnitude in the quantity's own unit
    pub fn value(self) -> f64 {
        self.value
    }

    /// The unit tag
    pub fn unit(self) -> Unit {
        self.unit
    }

    /// Physical kind of the quantity
    pub fn kind(self) -> Kind {
        self.unit.kind()
    }

    /// Convert into another unit of the same kind
    pub fn to(self, target: Unit) -> CalcResult<Quantity> {
        if self.unit.kind() != target.kind() {
            return Err(CalcError::invalid_input(
                "unit",
                format!("{} -> {}", self.unit, target),
                "Cannot convert between different dimensions",
            ));
        }
        Ok(Quantity::new(self.value * self.unit.factor_to(target), target))
    }

    /// Convert into the equivalent unit of another system.
    ///
    /// Always succeeds since a unit and its counterpart share a kind.
    pub fn to_system(self, system: UnitSystem) -> Quantity {
        let target = self.unit.counterpart(system);
        Quantity::new(self.value * self.unit.factor_to(target), target)
    }

    /// Add two quantities of the same kind; the result keeps `self`'s unit
    pub fn checked_add(self, rhs: Quantity) -> CalcResult<Quantity> {
        let rhs = rhs.to(self.unit)?;
        Ok(Quantity::new(self.value + rhs.value, self.unit))
    }

    /// Multiply two quantities, combining their dimensions.
    ///
    /// Supported products: length × length, length × unit weight, and
    /// stress × area. The result is expressed in imperial units when both
    /// operands are imperial, otherwise in SI.
    pub fn checked_mul(self, rhs: Quantity) -> CalcResult<Quantity> {
        let kind = match (self.kind(), rhs.kind()) {
            (Kind::Length, Kind::Length) => Kind::Area,
            (Kind::Length, Kind::UnitWeight) | (Kind::UnitWeight, Kind::Length) => Kind::Stress,
            (Kind::Stress, Kind::Area) | (Kind::Area, Kind::Stress) => Kind::Force,
            (a, b) => {
                return Err(CalcError::invalid_input(
                    "unit",
                    format!("{:?} x {:?}", a, b),
                    "Unsupported unit product",
                ))
            }
        };
        let si_value = self.value * self.unit.si_factor() * rhs.value * rhs.unit.si_factor();
        let product = Quantity::new(si_value, Unit::si_base(kind));
        if self.unit.is_imperial() && rhs.unit.is_imperial() {
            product.to(Unit::imperial_base(kind))
        } else {
            Ok(product)
        }
    }
}

impl Mul<f64> for Quantity {
    type Output = Quantity;
    fn mul(self, rhs: f64) -> Self::Output {
        Quantity::new(self.value * rhs, self.unit)
    }
}

impl Div<f64> for Quantity {
    type Output = Quantity;
    fn div(self, rhs: f64) -> Self::Output {
        Quantity::new(self.value / rhs, self.unit)
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match f.precision() {
            Some(p) => write!(f, "{:.*} {}", p, self.value, self.unit),
            None => write!(f, "{} {}", self.value, self.unit),
        }
    }
}
