//! HP section properties.
//!
//! Values are tabulated in inches. Metric piles use the same section names
//! with converted values (cm, cm²).
//!
//! ```rust
//! use geo_core::tables::hpile;
//! use geo_core::units::UnitSystem;
//!
//! let hp = hpile::lookup("HP12X53", UnitSystem::Imperial).unwrap();
//! assert_eq!(hp.area, 15.5);
//! assert_eq!(hp.box_perimeter, 47.65);
//! ```

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;

use crate::errors::{CalcError, CalcResult};
use crate::units::{Dimension, Unit, UnitSystem};

/// Properties of one HP section.
///
/// Lengths in in/cm, areas in in²/cm². The box values describe the
/// rectangle enclosing the flanges, used when the section plugs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HPileSection {
    pub name: &'static str,
    pub area: f64,
    pub perimeter: f64,
    pub box_area: f64,
    pub box_perimeter: f64,
    pub depth: f64,
    pub web_thickness: f64,
    pub flange_width: f64,
    pub flange_thickness: f64,
}

impl HPileSection {
    #[allow(clippy::too_many_arguments)]
    const fn new(
        name: &'static str,
        area: f64,
        perimeter: f64,
        box_area: f64,
        box_perimeter: f64,
        depth: f64,
        web_thickness: f64,
        flange_width: f64,
        flange_thickness: f64,
    ) -> Self {
        HPileSection {
            name,
            area,
            perimeter,
            box_area,
            box_perimeter,
            depth,
            web_thickness,
            flange_width,
            flange_thickness,
        }
    }

    /// Same section with lengths and areas expressed in `system`
    pub fn in_system(&self, system: UnitSystem) -> HPileSection {
        let l = Unit::Inch.factor_to(system.unit(Dimension::PileDiameter));
        let a = Unit::SqInch.factor_to(system.unit(Dimension::SectionArea));
        HPileSection {
            name: self.name,
            area: self.area * a,
            perimeter: self.perimeter * l,
            box_area: self.box_area * a,
            box_perimeter: self.box_perimeter * l,
            depth: self.depth * l,
            web_thickness: self.web_thickness * l,
            flange_width: self.flange_width * l,
            flange_thickness: self.flange_thickness * l,
        }
    }
}

/// Tabulated sections (inches)
pub static HPILE_SECTIONS: [HPileSection; 11] = [
    HPileSection::new("HP8X36", 10.6, 47.77, 65.40, 32.35, 8.02, 0.445, 8.155, 0.445),
    HPileSection::new("HP10X42", 12.4, 58.87, 97.73, 39.55, 9.7, 0.415, 10.075, 0.42),
    HPileSection::new("HP10X57", 16.8, 59.75, 102.1, 40.43, 9.99, 0.565, 10.225, 0.565),
    HPileSection::new("HP12X53", 15.5, 70.87, 141.9, 47.65, 11.78, 0.435, 12.045, 0.435),
    HPileSection::new("HP12X63", 18.4, 71.35, 144.8, 48.13, 11.94, 0.515, 12.125, 0.515),
    HPileSection::new("HP12X74", 21.8, 71.91, 148.2, 48.69, 12.13, 0.605, 12.215, 0.61),
    HPileSection::new("HP12X84", 24.6, 72.37, 151.0, 49.15, 12.28, 0.685, 12.295, 0.685),
    HPileSection::new("HP14X73", 21.4, 84.55, 198.5, 56.39, 13.61, 0.505, 14.585, 0.505),
    HPileSection::new("HP14X89", 26.1, 85.21, 203.2, 57.05, 13.83, 0.615, 14.695, 0.615),
    HPileSection::new("HP14X102", 30.0, 85.75, 207.1, 57.59, 14.01, 0.705, 14.785, 0.705),
    HPileSection::new("HP14X117", 34.4, 86.35, 211.5, 58.19, 14.21, 0.805, 14.885, 0.805),
];

static IMPERIAL: Lazy<HashMap<&'static str, HPileSection>> =
    Lazy::new(|| HPILE_SECTIONS.iter().map(|s| (s.name, *s)).collect());

static METRIC: Lazy<HashMap<&'static str, HPileSection>> = Lazy::new(|| {
    HPILE_SECTIONS
        .iter()
        .map(|s| (s.name, s.in_system(UnitSystem::Metric)))
        .collect()
});

/// Look up a section by name (case-insensitive), in the units of `system`.
pub fn lookup(name: &str, system: UnitSystem) -> CalcResult<HPileSection> {
    let key = name.trim().to_uppercase();
    let table = match system {
        UnitSystem::Imperial => &IMPERIAL,
        UnitSystem::Metric => &METRIC,
    };
    table.get(key.as_str()).copied().ok_or_else(|| {
        CalcError::lookup_failed(
            format!("{} H-pile sections ({})", system.display_name(), names().join(", ")),
            name,
        )
    })
}

/// Section names in table order
pub fn names() -> Vec<&'static str> {
    HPILE_SECTIONS.iter().map(|s| s.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lookup_imperial() {
        let hp = lookup("hp14x117", UnitSystem::Imperial).unwrap();
        assert_eq!(hp.name, "HP14X117");
        assert_eq!(hp.perimeter, 86.35);
        assert_eq!(hp.flange_width, 14.885);
    }

    #[test]
    fn test_lookup_metric_converts() {
        let hp = lookup("HP8X36", UnitSystem::Metric).unwrap();
        assert_relative_eq!(hp.area, 10.6 * 6.4516, epsilon = 1e-9);
        assert_relative_eq!(hp.depth, 8.02 * 2.54, epsilon = 1e-9);
    }

    #[test]
    fn test_unknown_section() {
        let err = lookup("HP9X99", UnitSystem::Imperial).unwrap_err();
        assert_eq!(err.error_code(), "LOOKUP_FAILED");
        assert!(err.to_string().contains("HP9X99"));
    }

    #[test]
    fn test_box_encloses_section() {
        for s in HPILE_SECTIONS.iter() {
            assert!(s.box_area > s.area, "{}", s.name);
            assert!(s.box_perimeter < s.perimeter, "{}", s.name);
        }
    }
}
