//! # Piles
//!
//! Driven pile definitions and their geometry as a function of depth.
//!
//! A [`Pile`] is built from a [`PileInput`] (JSON or struct literal) and a
//! unit system. Construction validates everything up front; afterwards the
//! pile is immutable and all geometry queries are pure.
//!
//! ## Coordinates
//!
//! Depth `z` is measured from grade. Position `x` is measured along the pile
//! from its top:
//!
//! ```text
//! x = L - Dp + z
//! ```
//!
//! where `L` is the total length and `Dp` the penetration depth. `Dp > L`
//! means the pile top is below grade.
//!
//! ## Input Units
//!
//! Lengths (`length`, `pen_depth`, `nf_zone`, taper segment lengths) in ft/m;
//! cross-section dimensions (`side`, `diameter`, `thickness`, taper widths) in
//! in/cm.

mod geometry;
pub mod shapes;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::tables::hpile::{self, HPileSection};
use crate::units::{Dimension, UnitSystem};

/// Taper sums closer than this to the pile length are accepted
const TAPER_LENGTH_TOLERANCE: f64 = 1e-6;

/// Pile type as named in inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PileType {
    Concrete,
    PipeOpen,
    PipeClosed,
    HPile,
    Timber,
    CastInPlace,
}

impl PileType {
    pub const ALL: [PileType; 6] = [
        PileType::Concrete,
        PileType::PipeOpen,
        PileType::PipeClosed,
        PileType::HPile,
        PileType::Timber,
        PileType::CastInPlace,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            PileType::Concrete => "concrete",
            PileType::PipeOpen => "pipe-open",
            PileType::PipeClosed => "pipe-closed",
            PileType::HPile => "h-pile",
            PileType::Timber => "timber",
            PileType::CastInPlace => "cast-in-place",
        }
    }

    /// Whether a pile of this type may have taper breakpoints
    pub fn can_taper(&self) -> bool {
        matches!(self, PileType::Concrete | PileType::Timber | PileType::CastInPlace)
    }
}

impl std::fmt::Display for PileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One taper breakpoint: the width `dimension` (in/cm) reached at the end of
/// a segment of `length` (ft/m), segments measured down from the pile top.
///
/// Serialized as a `[dimension, length]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct TaperPoint {
    pub dimension: f64,
    pub length: f64,
}

impl TaperPoint {
    pub fn new(dimension: f64, length: f64) -> Self {
        TaperPoint { dimension, length }
    }
}

impl From<(f64, f64)> for TaperPoint {
    fn from((dimension, length): (f64, f64)) -> Self {
        TaperPoint { dimension, length }
    }
}

impl From<TaperPoint> for (f64, f64) {
    fn from(p: TaperPoint) -> Self {
        (p.dimension, p.length)
    }
}

/// Pile definition as supplied by the caller.
///
/// `shape` is the concrete shape for concrete piles and the section name for
/// H-piles; it is ignored for other types.
///
/// ## JSON Example
///
/// ```json
/// {
///   "pile_type": "concrete",
///   "shape": "square-solid",
///   "side": 16,
///   "length": 40,
///   "pen_depth": 38,
///   "taper_dims": [[14, 20], [12, 20]]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PileInput {
    pub pile_type: PileType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
    pub length: f64,
    /// Defaults to `length`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pen_depth: Option<f64>,
    /// No-friction zone measured from grade
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nf_zone: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taper_dims: Option<Vec<TaperPoint>>,
}

impl PileInput {
    /// Start an input with only type and total length
    pub fn new(pile_type: PileType, length: f64) -> Self {
        PileInput {
            pile_type,
            shape: None,
            side: None,
            diameter: None,
            thickness: None,
            length,
            pen_depth: None,
            nf_zone: None,
            taper_dims: None,
        }
    }

    pub fn with_shape(mut self, shape: impl Into<String>) -> Self {
        self.shape = Some(shape.into());
        self
    }

    pub fn with_side(mut self, side: f64) -> Self {
        self.side = Some(side);
        self
    }

    pub fn with_diameter(mut self, diameter: f64) -> Self {
        self.diameter = Some(diameter);
        self
    }

    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = Some(thickness);
        self
    }

    pub fn with_pen_depth(mut self, pen_depth: f64) -> Self {
        self.pen_depth = Some(pen_depth);
        self
    }

    pub fn with_nf_zone(mut self, nf_zone: f64) -> Self {
        self.nf_zone = Some(nf_zone);
        self
    }

    pub fn with_taper(mut self, taper: Vec<TaperPoint>) -> Self {
        self.taper_dims = Some(taper);
        self
    }

    fn required(value: Option<f64>, field: &str, what: &str) -> CalcResult<f64> {
        value.ok_or_else(|| CalcError::missing_field(format!("{} (required for {} piles)", field, what)))
    }
}

/// Concrete pile cross-section with the dimensions it needs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "kebab-case")]
pub enum ConcreteShape {
    SquareSolid { side: f64 },
    /// Hollow square; `diameter` is the void. Bearing uses the solid area.
    SquareHollow { side: f64, diameter: f64 },
    CircleClosed { diameter: f64 },
    CircleOpen { diameter: f64, thickness: f64 },
    Hexagon { side: f64 },
    Octagon { side: f64 },
}

impl ConcreteShape {
    pub const NAMES: [&'static str; 6] = [
        "square-solid",
        "square-hollow",
        "circle-closed",
        "circle-open",
        "hexagon",
        "octagon",
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ConcreteShape::SquareSolid { .. } => "square-solid",
            ConcreteShape::SquareHollow { .. } => "square-hollow",
            ConcreteShape::CircleClosed { .. } => "circle-closed",
            ConcreteShape::CircleOpen { .. } => "circle-open",
            ConcreteShape::Hexagon { .. } => "hexagon",
            ConcreteShape::Octagon { .. } => "octagon",
        }
    }

    fn from_input(input: &PileInput) -> CalcResult<Self> {
        let shape = input
            .shape
            .as_deref()
            .ok_or_else(|| CalcError::missing_field("shape (required for concrete piles)"))?;
        let side = || PileInput::required(input.side, "side", shape);
        let diameter = || PileInput::required(input.diameter, "diameter", shape);
        let thickness = || PileInput::required(input.thickness, "thickness", shape);
        match shape.trim().to_lowercase().as_str() {
            "square-solid" => Ok(ConcreteShape::SquareSolid { side: side()? }),
            "square-hollow" => Ok(ConcreteShape::SquareHollow {
                side: side()?,
                diameter: diameter()?,
            }),
            "circle-closed" => Ok(ConcreteShape::CircleClosed { diameter: diameter()? }),
            "circle-open" => Ok(ConcreteShape::CircleOpen {
                diameter: diameter()?,
                thickness: thickness()?,
            }),
            "hexagon" => Ok(ConcreteShape::Hexagon { side: side()? }),
            "octagon" => Ok(ConcreteShape::Octagon { side: side()? }),
            _ => Err(CalcError::invalid_input(
                "shape",
                shape,
                format!("Allowed concrete pile shapes: {}", ConcreteShape::NAMES.join(", ")),
            )),
        }
    }
}

/// Cross-section of a pile, by type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "pile_type", rename_all = "kebab-case")]
pub enum PileSection {
    Concrete(ConcreteShape),
    PipeOpen { diameter: f64, thickness: f64 },
    PipeClosed { diameter: f64, thickness: f64 },
    HPile { section: HPileSection },
    Timber { diameter: f64 },
    CastInPlace { diameter: f64 },
}

impl PileSection {
    pub fn pile_type(&self) -> PileType {
        match self {
            PileSection::Concrete(_) => PileType::Concrete,
            PileSection::PipeOpen { .. } => PileType::PipeOpen,
            PileSection::PipeClosed { .. } => PileType::PipeClosed,
            PileSection::HPile { .. } => PileType::HPile,
            PileSection::Timber { .. } => PileType::Timber,
            PileSection::CastInPlace { .. } => PileType::CastInPlace,
        }
    }

    /// Characteristic width at the top (in/cm): side for polygons, outside
    /// diameter for circles, section depth for H-piles
    pub fn top_dimension(&self) -> f64 {
        match *self {
            PileSection::Concrete(shape) => match shape {
                ConcreteShape::SquareSolid { side }
                | ConcreteShape::SquareHollow { side, .. }
                | ConcreteShape::Hexagon { side }
                | ConcreteShape::Octagon { side } => side,
                ConcreteShape::CircleClosed { diameter } | ConcreteShape::CircleOpen { diameter, .. } => diameter,
            },
            PileSection::PipeOpen { diameter, .. }
            | PileSection::PipeClosed { diameter, .. }
            | PileSection::Timber { diameter }
            | PileSection::CastInPlace { diameter } => diameter,
            PileSection::HPile { section } => section.depth,
        }
    }

    /// Wall thickness of open sections that can take a soil plug
    pub fn wall_thickness(&self) -> Option<f64> {
        match *self {
            PileSection::Concrete(ConcreteShape::CircleOpen { thickness, .. })
            | PileSection::PipeOpen { thickness, .. } => Some(thickness),
            _ => None,
        }
    }

    /// Open sections can plug: pipe-open, H-piles and open concrete circles
    pub fn is_open_ended(&self) -> bool {
        matches!(
            self,
            PileSection::PipeOpen { .. }
                | PileSection::HPile { .. }
                | PileSection::Concrete(ConcreteShape::CircleOpen { .. })
        )
    }

    /// Shape name for display
    pub fn shape_name(&self) -> &'static str {
        match self {
            PileSection::Concrete(shape) => shape.name(),
            PileSection::HPile { section } => section.name,
            _ => "circular",
        }
    }
}

/// A validated pile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pile {
    unit_system: UnitSystem,
    section: PileSection,
    length: f64,
    pen_depth: f64,
    nf_zone: Option<f64>,
    taper: Vec<TaperPoint>,
}

impl Pile {
    /// Validate an input and build the pile.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` - non-positive values, an unknown concrete shape, a
    ///   taper on a pipe or H-pile, or an inconsistent taper
    /// * `MissingField` - a dimension the pile type or shape requires
    /// * `LookupFailed` - an unknown H-pile section
    pub fn new(unit_system: UnitSystem, input: PileInput) -> CalcResult<Self> {
        let pen_depth = input.pen_depth.unwrap_or(input.length);
        let positive = [
            ("side", input.side),
            ("diameter", input.diameter),
            ("thickness", input.thickness),
            ("length", Some(input.length)),
            ("pen_depth", Some(pen_depth)),
            ("nf_zone", input.nf_zone),
        ];
        for (field, value) in positive {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(CalcError::invalid_input(
                        field,
                        v.to_string(),
                        "Pile properties must be positive numbers",
                    ));
                }
            }
        }

        let what = input.pile_type.code();
        let section = match input.pile_type {
            PileType::Concrete => PileSection::Concrete(ConcreteShape::from_input(&input)?),
            PileType::PipeOpen => PileSection::PipeOpen {
                diameter: PileInput::required(input.diameter, "diameter", what)?,
                thickness: PileInput::required(input.thickness, "thickness", what)?,
            },
            PileType::PipeClosed => PileSection::PipeClosed {
                diameter: PileInput::required(input.diameter, "diameter", what)?,
                thickness: PileInput::required(input.thickness, "thickness", what)?,
            },
            PileType::HPile => {
                let name = input
                    .shape
                    .as_deref()
                    .ok_or_else(|| CalcError::missing_field("shape (H-pile section name)"))?;
                PileSection::HPile {
                    section: hpile::lookup(name, unit_system)?,
                }
            }
            PileType::Timber => PileSection::Timber {
                diameter: PileInput::required(input.diameter, "diameter", what)?,
            },
            PileType::CastInPlace => PileSection::CastInPlace {
                diameter: PileInput::required(input.diameter, "diameter", what)?,
            },
        };

        if let Some(t) = section.wall_thickness() {
            let d = section.top_dimension();
            if 2.0 * t >= d {
                return Err(CalcError::invalid_input(
                    "thickness",
                    t.to_string(),
                    format!("Wall thickness must be less than half the diameter ({})", d),
                ));
            }
        }

        let taper = match input.taper_dims {
            None => Vec::new(),
            Some(taper) => {
                if !input.pile_type.can_taper() {
                    return Err(CalcError::invalid_input(
                        "taper_dims",
                        format!("{:?}", taper),
                        format!("{} piles cannot be tapered", what),
                    ));
                }
                validate_taper(&taper, section.top_dimension(), input.length)?;
                taper
            }
        };

        Ok(Pile {
            unit_system,
            section,
            length: input.length,
            pen_depth,
            nf_zone: input.nf_zone,
            taper,
        })
    }

    pub fn unit_system(&self) -> UnitSystem {
        self.unit_system
    }

    pub fn section(&self) -> &PileSection {
        &self.section
    }

    pub fn pile_type(&self) -> PileType {
        self.section.pile_type()
    }

    /// Total length (ft/m)
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Penetration depth (ft/m); also the depth of the toe
    pub fn pen_depth(&self) -> f64 {
        self.pen_depth
    }

    pub fn nf_zone(&self) -> Option<f64> {
        self.nf_zone
    }

    pub fn taper(&self) -> &[TaperPoint] {
        &self.taper
    }

    pub fn is_tapered(&self) -> bool {
        !self.taper.is_empty()
    }

    /// Depth of the pile top; negative when the top stands above grade
    pub fn top_depth(&self) -> f64 {
        self.pen_depth - self.length
    }

    pub fn is_open_ended(&self) -> bool {
        self.section.is_open_ended()
    }

    /// Solid and closed sections displace their full volume of soil
    pub fn is_full_displacement(&self) -> bool {
        !self.section.is_open_ended()
    }
}

fn validate_taper(taper: &[TaperPoint], top: f64, length: f64) -> CalcResult<()> {
    let invalid = |reason: &str| {
        CalcError::invalid_input("taper_dims", format!("{:?}", taper), reason.to_string())
    };

    if taper.is_empty() {
        return Err(invalid("Taper list cannot be empty"));
    }
    if taper
        .iter()
        .any(|p| !(p.dimension.is_finite() && p.length.is_finite()) || p.dimension <= 0.0 || p.length <= 0.0)
    {
        return Err(invalid("Taper dimensions and lengths must be positive numbers"));
    }
    if taper.windows(2).any(|w| w[1].dimension > w[0].dimension) {
        return Err(invalid("Subsequent taper dimensions cannot be larger than preceding ones"));
    }
    if taper.iter().any(|p| p.dimension > top) {
        return Err(invalid("Taper dimensions cannot be larger than the top pile dimension"));
    }
    if taper.iter().all(|p| p.dimension == top) {
        return Err(invalid(
            "Not a tapered pile: every taper dimension equals the top dimension",
        ));
    }
    let total: f64 = taper.iter().map(|p| p.length).sum();
    if (total - length).abs() > TAPER_LENGTH_TOLERANCE {
        return Err(invalid("Sum of taper segment lengths must equal the total pile length"));
    }
    Ok(())
}

impl std::fmt::Display for Pile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let dia = self.unit_system.unit(Dimension::PileDiameter);
        let len = self.unit_system.unit(Dimension::PileLength);
        let dim = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{} {}", v, dia));

        let (side, diameter, thickness) = match self.section {
            PileSection::Concrete(shape) => match shape {
                ConcreteShape::SquareSolid { side }
                | ConcreteShape::Hexagon { side }
                | ConcreteShape::Octagon { side } => (Some(side), None, None),
                ConcreteShape::SquareHollow { side, diameter } => (Some(side), Some(diameter), None),
                ConcreteShape::CircleClosed { diameter } => (None, Some(diameter), None),
                ConcreteShape::CircleOpen { diameter, thickness } => (None, Some(diameter), Some(thickness)),
            },
            PileSection::PipeOpen { diameter, thickness } | PileSection::PipeClosed { diameter, thickness } => {
                (None, Some(diameter), Some(thickness))
            }
            PileSection::HPile { .. } => (None, None, None),
            PileSection::Timber { diameter } | PileSection::CastInPlace { diameter } => (None, Some(diameter), None),
        };

        writeln!(f, "Pile Details:")?;
        writeln!(f, "------------")?;
        writeln!(f, "Type: {}", self.pile_type())?;
        writeln!(f, "Shape: {}", self.section.shape_name())?;
        writeln!(f, "Side: {}", dim(side))?;
        writeln!(f, "Diameter: {}", dim(diameter))?;
        writeln!(f, "Thickness: {}", dim(thickness))?;
        writeln!(f, "Total Length: {} {}", self.length, len)?;
        writeln!(f, "Penetration Depth: {} {}", self.pen_depth, len)?;
        match self.nf_zone {
            Some(nf) => writeln!(f, "No-Friction Zone: {} {}", nf, len)?,
            None => writeln!(f, "No-Friction Zone: -")?,
        }
        if self.taper.is_empty() {
            write!(f, "Taper Dims [d, l]: -")
        } else {
            let points: Vec<String> = self
                .taper
                .iter()
                .map(|p| format!("[{} {}, {} {}]", p.dimension, dia, p.length, len))
                .collect();
            write!(f, "Taper Dims [d, l]: {}", points.join(", "))
        }
    }
}
