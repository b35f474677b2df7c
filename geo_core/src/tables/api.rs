//! Revised API design values for cohesionless soil.
//!
//! | Density      | N (bpf) | δ (deg) | f_lim (ksf) | Nq | q_lim (ksf) |
//! |--------------|---------|---------|-------------|----|-------------|
//! | Very loose   | 0 - 4   | 15      | 1.0         | 8  | 40          |
//! | Loose        | 5 - 10  | 20      | 1.4         | 12 | 60          |
//! | Medium       | 11 - 30 | 25      | 1.7         | 20 | 100         |
//! | Dense        | 31 - 50 | 30      | 2.0         | 40 | 200         |
//! | Very dense   | > 50    | 35      | 2.4         | 50 | 250         |

use serde::{Deserialize, Serialize};

use super::{band_for, DesignValues, NBand};

/// Relative density class of a cohesionless layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DensityClass {
    VeryLoose,
    Loose,
    Medium,
    Dense,
    VeryDense,
}

impl DensityClass {
    pub const ALL: [DensityClass; 5] = [
        DensityClass::VeryLoose,
        DensityClass::Loose,
        DensityClass::Medium,
        DensityClass::Dense,
        DensityClass::VeryDense,
    ];

    /// Classify by corrected SPT-N
    pub fn from_n(corr_n: f64) -> Self {
        let band = band_for(&API_TABLE, corr_n);
        let ix = API_TABLE
            .iter()
            .position(|b| std::ptr::eq(b, band))
            .unwrap_or(API_TABLE.len() - 1);
        DensityClass::ALL[ix]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DensityClass::VeryLoose => "Very loose",
            DensityClass::Loose => "Loose",
            DensityClass::Medium => "Medium",
            DensityClass::Dense => "Dense",
            DensityClass::VeryDense => "Very dense",
        }
    }
}

/// Bands in the same order as [`DensityClass::ALL`]
pub static API_TABLE: [NBand; 5] = [
    NBand::new(4.0, "0 - 4", DesignValues::new(15.0, 1.0, 8.0, 40.0)),
    NBand::new(10.0, "5 - 10", DesignValues::new(20.0, 1.4, 12.0, 60.0)),
    NBand::new(30.0, "11 - 30", DesignValues::new(25.0, 1.7, 20.0, 100.0)),
    NBand::new(50.0, "31 - 50", DesignValues::new(30.0, 2.0, 40.0, 200.0)),
    NBand::new(f64::INFINITY, "> 50", DesignValues::new(35.0, 2.4, 50.0, 250.0)),
];

/// Design values for a corrected SPT-N
pub fn design_values(corr_n: f64) -> DesignValues {
    band_for(&API_TABLE, corr_n).values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_edges() {
        assert_eq!(design_values(4.0).nq, 8.0);
        assert_eq!(design_values(5.0).nq, 12.0);
        assert_eq!(design_values(10.0).delta, 20.0);
        assert_eq!(design_values(30.0).f_lim, 1.7);
        assert_eq!(design_values(50.0).q_lim, 200.0);
        assert_eq!(design_values(51.0).q_lim, 250.0);
    }

    #[test]
    fn test_density_class() {
        assert_eq!(DensityClass::from_n(0.0), DensityClass::VeryLoose);
        assert_eq!(DensityClass::from_n(12.0), DensityClass::Medium);
        assert_eq!(DensityClass::from_n(80.0), DensityClass::VeryDense);
    }
}
