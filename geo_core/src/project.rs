//! # Project
//!
//! The `Project` pairs one soil profile with one pile and is what capacity
//! methods run against.
//!
//! ## Structure
//!
//! ```text
//! Project
//! ├── meta: ProjectMetadata (name, id, creation time - in memory only)
//! ├── profile: SoilProfile
//! └── pile: Pile
//! ```
//!
//! Both parts must share a unit system, and the pile toe must lie within the
//! profile.
//!
//! ## Example
//!
//! ```rust
//! use geo_core::piles::{Pile, PileInput, PileType};
//! use geo_core::project::Project;
//! use geo_core::soil::{LayerInput, SoilProfile, SoilType};
//! use geo_core::units::UnitSystem;
//!
//! let profile = SoilProfile::new(UnitSystem::Imperial, 10.0)
//!     .unwrap()
//!     .with_layer(LayerInput::new(SoilType::Cohesionless, 50.0).with_tuw(120.0).with_corr_n(15.0))
//!     .unwrap();
//! let pile = Pile::new(
//!     UnitSystem::Imperial,
//!     PileInput::new(PileType::Concrete, 40.0).with_shape("square-solid").with_side(16.0),
//! )
//! .unwrap();
//!
//! let project = Project::new("Pier 4", profile, pile).unwrap();
//! assert_eq!(project.z_layer_pile(), vec![0.0, 10.0, 40.0, 50.0]);
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::errors::{CalcError, CalcResult};
use crate::piles::Pile;
use crate::soil::profile::DEPTH_TOLERANCE;
use crate::soil::SoilProfile;
use crate::units::UnitSystem;

/// Name used when none is given
pub const DEFAULT_PROJECT_NAME: &str = "New Project";

/// Identification of an analysis run. Not persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectMetadata {
    pub id: Uuid,
    pub name: String,
    pub created: DateTime<Utc>,
}

/// A soil profile and a pile, checked for consistency.
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub meta: ProjectMetadata,
    profile: SoilProfile,
    pile: Pile,
}

impl Project {
    /// Combine a profile and a pile.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` - the unit systems differ, the profile has no layers,
    ///   or the pile toe is deeper than the profile
    pub fn new(name: impl Into<String>, profile: SoilProfile, pile: Pile) -> CalcResult<Self> {
        if profile.unit_system() != pile.unit_system() {
            return Err(CalcError::invalid_input(
                "unit_system",
                format!("profile: {}, pile: {}", profile.unit_system(), pile.unit_system()),
                "Soil profile and pile must use the same unit system",
            ));
        }
        if profile.is_empty() {
            return Err(CalcError::invalid_input("layers", "0", "No layers in soil profile"));
        }
        if pile.pen_depth() > profile.total_depth() + DEPTH_TOLERANCE {
            return Err(CalcError::invalid_input(
                "pen_depth",
                pile.pen_depth().to_string(),
                format!(
                    "Pile toe lies below the bottom of the soil profile ({})",
                    profile.total_depth()
                ),
            ));
        }

        let name = name.into();
        Ok(Project {
            meta: ProjectMetadata {
                id: Uuid::new_v4(),
                name: if name.trim().is_empty() {
                    DEFAULT_PROJECT_NAME.to_string()
                } else {
                    name
                },
                created: Utc::now(),
            },
            profile,
            pile,
        })
    }

    pub fn unit_system(&self) -> UnitSystem {
        self.profile.unit_system()
    }

    pub fn profile(&self) -> &SoilProfile {
        &self.profile
    }

    pub fn pile(&self) -> &Pile {
        &self.pile
    }

    /// Depths where either the soil or the pile changes: grade, layer
    /// bottoms, the water table (clamped to grade) and the pile's critical
    /// depths. Sorted, no duplicates.
    pub fn z_layer_pile(&self) -> Vec<f64> {
        let mut depths = vec![0.0, self.profile.water_table().max(0.0)];
        depths.extend(self.profile.layer_depths());
        depths.extend(self.pile.critical_depths());
        sort_unique(depths)
    }

    /// Depths a capacity analysis steps through: [`z_layer_pile`](Self::z_layer_pile)
    /// plus a regular grid from grade, all capped at the pile toe.
    pub fn analysis_depths(&self) -> Vec<f64> {
        let step = self.unit_system().analysis_step();
        let bottom = self.profile.total_depth();
        let toe = self.pile.pen_depth();

        let grid = (0..)
            .map(|i| i as f64 * step)
            .take_while(|z| *z < bottom);
        let depths = grid
            .chain(self.z_layer_pile())
            .filter(|z| *z <= toe + DEPTH_TOLERANCE)
            .collect();
        sort_unique(depths)
    }
}

fn sort_unique(mut depths: Vec<f64>) -> Vec<f64> {
    depths.sort_by(|a, b| a.total_cmp(b));
    depths.dedup_by(|a, b| (*a - *b).abs() <= DEPTH_TOLERANCE);
    depths
}

impl std::fmt::Display for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Project ID: {}", self.meta.id)?;
        writeln!(f, "Project Name: {}", self.meta.name)?;
        writeln!(f, "Created: {}", self.meta.created.format("%Y-%m-%d %H:%M:%S UTC"))?;
        write!(f, "Unit System: {}", self.unit_system())
    }
}
