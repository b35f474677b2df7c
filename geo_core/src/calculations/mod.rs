//! # Capacity Calculations
//!
//! Axial pile capacity by static methods. Each calculation follows the
//! pattern:
//!
//! - input: a validated [`Project`](crate::project::Project)
//! - [`CapacityResult`] - resistance profile and governing capacity
//!   (JSON-serializable)
//! - `calculate(project, method) -> CalcResult<CapacityResult>` - pure
//!
//! ## Available Methods
//!
//! - [`CapacityMethod::RevisedApi`] - Revised API (cohesionless K of 1.0 or 0.8)
//! - [`CapacityMethod::Olson90`] - Olson (1990), N-dependent K and tables by
//!   soil description
//!
//! Both methods share the integration loop in [`capacity`]; they differ only
//! in the pieces behind [`CapacityStrategy`].

pub mod capacity;
pub mod methods;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::{CalcError, CalcResult};
use crate::project::Project;

pub use capacity::{calculate, precheck, CapacityResult, ResistanceRow};
pub use methods::{CapacityStrategy, Olson90, RevisedApi};

/// Static capacity method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CapacityMethod {
    #[default]
    #[serde(rename = "api", alias = "revised_api", alias = "API")]
    RevisedApi,
    #[serde(rename = "olson90", alias = "olson_90", alias = "Olson90")]
    Olson90,
}

impl CapacityMethod {
    pub const ALL: [CapacityMethod; 2] = [CapacityMethod::RevisedApi, CapacityMethod::Olson90];

    /// The strategy implementing this method's soil models
    pub fn strategy(&self) -> &'static dyn CapacityStrategy {
        match self {
            CapacityMethod::RevisedApi => &RevisedApi,
            CapacityMethod::Olson90 => &Olson90,
        }
    }

    pub fn display_name(&self) -> &'static str {
        self.strategy().name()
    }

    /// Run this method against a project
    pub fn run(&self, project: &Project) -> CalcResult<CapacityResult> {
        calculate(project, *self)
    }
}

impl FromStr for CapacityMethod {
    type Err = CalcError;

    fn from_str(s: &str) -> CalcResult<Self> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "api" | "revised_api" => Ok(CapacityMethod::RevisedApi),
            "olson90" | "olson_90" => Ok(CapacityMethod::Olson90),
            _ => Err(CalcError::invalid_input(
                "method",
                s,
                "Capacity method can only be 'api' or 'olson90'",
            )),
        }
    }
}

impl std::fmt::Display for CapacityMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
