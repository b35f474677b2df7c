//! Olson (1990) design values for cohesionless soil, keyed by soil
//! description and banded by corrected SPT-N.
//!
//! Gravel and sand-gravel share one table.

use super::{band_for, DesignValues, NBand};
use crate::soil::SoilDescription;

pub static GRAVEL: [NBand; 4] = [
    NBand::new(4.0, "0 - 4", DesignValues::new(20.0, 1.4, 12.0, 60.0)),
    NBand::new(10.0, "5 - 10", DesignValues::new(25.0, 1.7, 20.0, 100.0)),
    NBand::new(30.0, "11 - 30", DesignValues::new(30.0, 2.0, 40.0, 200.0)),
    NBand::new(f64::INFINITY, "> 30", DesignValues::new(35.0, 2.4, 60.0, 250.0)),
];

pub static SAND: [NBand; 6] = [
    NBand::new(4.0, "0 - 4", DesignValues::new(20.0, 1.0, 50.0, 40.0)),
    NBand::new(10.0, "5 - 10", DesignValues::new(30.0, 1.1, 120.0, 120.0)),
    NBand::new(30.0, "11 - 30", DesignValues::new(35.0, 1.9, 120.0, 190.0)),
    NBand::new(50.0, "31 - 50", DesignValues::new(40.0, 2.6, 120.0, 190.0)),
    NBand::new(100.0, "51 - 100", DesignValues::new(40.0, 3.7, 130.0, 200.0)),
    NBand::new(f64::INFINITY, "> 100", DesignValues::new(40.0, 3.8, 220.0, 530.0)),
];

pub static SAND_SILT: [NBand; 7] = [
    NBand::new(4.0, "0 - 4", DesignValues::new(10.0, 1.0, 10.0, 10.0)),
    NBand::new(10.0, "5 - 10", DesignValues::new(10.0, 1.0, 20.0, 40.0)),
    NBand::new(30.0, "11 - 30", DesignValues::new(15.0, 1.4, 50.0, 110.0)),
    NBand::new(50.0, "31 - 50", DesignValues::new(20.0, 2.0, 100.0, 160.0)),
    NBand::new(100.0, "51 - 100", DesignValues::new(30.0, 2.0, 100.0, 200.0)),
    NBand::new(200.0, "101 - 200", DesignValues::new(34.0, 20.0, 100.0, 200.0)),
    NBand::new(f64::INFINITY, "> 200", DesignValues::new(40.0, 20.0, 100.0, 200.0)),
];

pub static SILT: [NBand; 5] = [
    NBand::new(4.0, "0 - 4", DesignValues::new(10.0, 1.0, 10.0, 40.0)),
    NBand::new(10.0, "5 - 10", DesignValues::new(15.0, 1.0, 10.0, 40.0)),
    NBand::new(30.0, "11 - 30", DesignValues::new(20.0, 1.4, 10.0, 40.0)),
    NBand::new(50.0, "31 - 50", DesignValues::new(20.0, 1.4, 12.0, 60.0)),
    NBand::new(f64::INFINITY, "> 50", DesignValues::new(25.0, 1.4, 12.0, 60.0)),
];

/// Table for a soil description
pub fn table(desc: SoilDescription) -> &'static [NBand] {
    match desc {
        SoilDescription::Gravel | SoilDescription::SandGravel => &GRAVEL,
        SoilDescription::Sand => &SAND,
        SoilDescription::SandSilt => &SAND_SILT,
        SoilDescription::Silt => &SILT,
    }
}

/// Design values for a soil description and corrected SPT-N
pub fn design_values(desc: SoilDescription, corr_n: f64) -> DesignValues {
    band_for(table(desc), corr_n).values
}
