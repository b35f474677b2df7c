//! # geo_core - Geotechnical Calculation Engine
//!
//! `geo_core` computes in-situ soil stresses and the axial capacity of driven
//! piles. All inputs and outputs are JSON-serializable so the engine can sit
//! behind a CLI, a service, or an assistant.
//!
//! ## Design Philosophy
//!
//! - **Validated at construction**: profiles, piles and projects reject bad
//!   input when built, so queries only fail on out-of-range depths
//! - **Pure queries**: built values are immutable; every query is a function
//!   of its arguments
//! - **Unit-tagged results**: stresses, areas and forces come back as
//!   [`Quantity`](units::Quantity) values
//! - **Rich Errors**: structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use geo_core::calculations::CapacityMethod;
//! use geo_core::piles::{Pile, PileInput, PileType};
//! use geo_core::project::Project;
//! use geo_core::soil::{LayerInput, SoilProfile, SoilType};
//! use geo_core::units::UnitSystem;
//!
//! let profile = SoilProfile::new(UnitSystem::Imperial, 10.0)
//!     .unwrap()
//!     .with_layer(LayerInput::new(SoilType::Cohesionless, 60.0).with_tuw(120.0).with_corr_n(25.0))
//!     .unwrap();
//! let pile = Pile::new(
//!     UnitSystem::Imperial,
//!     PileInput::new(PileType::PipeClosed, 40.0).with_diameter(16.0).with_thickness(0.5),
//! )
//! .unwrap();
//!
//! let project = Project::new("Pier 4", profile, pile).unwrap();
//! let result = CapacityMethod::RevisedApi.run(&project).unwrap();
//! assert!(result.capacity().value() > 0.0);
//! ```
//!
//! ## Modules
//!
//! - [`soil`] - Soil layers, profiles and stresses
//! - [`piles`] - Pile definitions and geometry
//! - [`project`] - A profile and a pile, checked for consistency
//! - [`calculations`] - Static capacity methods (Revised API, Olson 90)
//! - [`tables`] - Empirical design tables and H-pile sections
//! - [`units`] - Unit systems and unit-tagged quantities
//! - [`input`] / [`file_io`] - JSON documents and file operations
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod errors;
pub mod file_io;
pub mod input;
pub mod piles;
pub mod project;
pub mod soil;
pub mod tables;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate, CapacityMethod, CapacityResult, ResistanceRow};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_analysis, save_json};
pub use input::AnalysisInput;
pub use piles::{Pile, PileInput, PileType};
pub use project::{Project, ProjectMetadata};
pub use soil::{LayerInput, SoilProfile, SoilType, StressKind};
pub use units::{Quantity, Unit, UnitSystem};
