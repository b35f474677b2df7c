//! # Empirical Design Tables
//!
//! Published design values used by the capacity methods, compiled in as
//! static data.
//!
//! - [`api`] - Revised API shaft and toe values for cohesionless soils,
//!   banded by corrected SPT-N
//! - [`olson90`] - Olson (1990) values, banded by soil description and N
//! - [`hpile`] - HP section properties
//!
//! Stress limits are published in kip/ft²; convert with
//! [`UnitSystem::stress_from_ksf`](crate::units::UnitSystem::stress_from_ksf).

pub mod api;
pub mod hpile;
pub mod olson90;

pub use hpile::{HPileSection, HPILE_SECTIONS};

use serde::Serialize;

/// Shaft and toe design values for one SPT-N band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DesignValues {
    /// Soil-pile friction angle δ (degrees)
    pub delta: f64,
    /// Limiting unit shaft resistance (kip/ft²)
    pub f_lim: f64,
    /// Bearing capacity factor
    pub nq: f64,
    /// Limiting unit toe resistance (kip/ft²)
    pub q_lim: f64,
}

impl DesignValues {
    const fn new(delta: f64, f_lim: f64, nq: f64, q_lim: f64) -> Self {
        DesignValues {
            delta,
            f_lim,
            nq,
            q_lim,
        }
    }
}

/// One row of a banded table: applies while `N <= max_n`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NBand {
    /// Upper bound of the band (inclusive); `f64::INFINITY` for the last band
    pub max_n: f64,
    /// Printable range, e.g. "11 - 30"
    pub range: &'static str,
    pub values: DesignValues,
}

impl NBand {
    const fn new(max_n: f64, range: &'static str, values: DesignValues) -> Self {
        NBand { max_n, range, values }
    }
}

/// First band whose upper bound is at or above `n`.
///
/// Tables always end with an unbounded band, so every finite `n` matches.
/// The last band is returned for anything that compares false (NaN).
pub(crate) fn band_for(bands: &'static [NBand], n: f64) -> &'static NBand {
    let last = &bands[bands.len() - 1];
    bands.iter().find(|b| n <= b.max_n).unwrap_or(last)
}
