//! Depth-dependent pile geometry: width, toe area, lateral area and the
//! depths where the geometry changes.

use super::shapes;
use super::{ConcreteShape, Pile, PileSection};
use crate::errors::{CalcError, CalcResult};
use crate::units::{Dimension, Quantity};

/// Positions within this distance of a pile end count as on the pile
const POSITION_TOLERANCE: f64 = 1e-9;

/// Piecewise-linear interpolation, clamped to the end values.
fn interpolate(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    if x <= xs[0] {
        return ys[0];
    }
    for i in 1..xs.len() {
        if x <= xs[i] {
            let t = (x - xs[i - 1]) / (xs[i] - xs[i - 1]);
            return ys[i - 1] + t * (ys[i] - ys[i - 1]);
        }
    }
    ys[ys.len() - 1]
}

impl Pile {
    /// Position along the pile, from its top, of depth `z`
    pub fn position_of(&self, z: f64) -> f64 {
        self.length - self.pen_depth + z
    }

    fn on_pile(&self, x: f64) -> bool {
        x >= -POSITION_TOLERANCE && x <= self.length + POSITION_TOLERANCE
    }

    /// (position, width) control points from the top of the pile down
    fn control_points(&self) -> (Vec<f64>, Vec<f64>) {
        let top = self.section.top_dimension();
        if self.taper.is_empty() {
            return (vec![0.0, self.length], vec![top, top]);
        }
        let mut positions = vec![0.0];
        let mut widths = vec![top];
        let mut x = 0.0;
        for p in &self.taper {
            x += p.length;
            positions.push(x);
            widths.push(p.dimension);
        }
        (positions, widths)
    }

    /// Raw width at depth `z` in the section unit (in/cm)
    pub(crate) fn width_at(&self, z: f64) -> f64 {
        let (xs, ys) = self.control_points();
        interpolate(self.position_of(z), &xs, &ys)
    }

    /// Side or diameter at depth `z`, interpolated along the taper.
    ///
    /// Positions beyond either end take the end value.
    pub fn dimension_at(&self, z: f64) -> Quantity {
        self.unit_system
            .quantity(self.width_at(z), Dimension::PileDiameter)
    }

    /// Width at depth `z` in the length unit (ft/m)
    pub(crate) fn width_at_length_units(&self, z: f64) -> f64 {
        self.width_at(z) * self.unit_system.diameter_to_length()
    }

    /// Cross-sectional area at depth `z`, in ft²/m².
    ///
    /// * `soil_plug` - open pipes and open concrete circles return the full
    ///   circle instead of the ring
    /// * `box_area` - H-piles return the enclosing box area instead of the
    ///   steel area
    ///
    /// Zero when `z` falls outside the pile.
    pub fn cross_section_area(&self, z: f64, soil_plug: bool, box_area: bool) -> CalcResult<Quantity> {
        if !z.is_finite() || z < 0.0 {
            return Err(CalcError::out_of_range("z", z.to_string(), "Depth cannot be negative here"));
        }
        let system = self.unit_system;
        let area = if !self.on_pile(self.position_of(z)) {
            0.0
        } else {
            let k = system.diameter_to_length();
            let a = self.width_at(z) * k;
            match self.section {
                PileSection::Concrete(shape) => match shape {
                    ConcreteShape::SquareSolid { .. } | ConcreteShape::SquareHollow { .. } => shapes::square(a),
                    ConcreteShape::Hexagon { .. } => shapes::hexagon(a),
                    ConcreteShape::Octagon { .. } => shapes::octagon(a),
                    ConcreteShape::CircleClosed { .. } => shapes::circle(a),
                    ConcreteShape::CircleOpen { thickness, .. } => {
                        if soil_plug {
                            shapes::circle(a)
                        } else {
                            shapes::ring(a, thickness * k)
                        }
                    }
                },
                PileSection::PipeOpen { thickness, .. } => {
                    if soil_plug {
                        shapes::circle(a)
                    } else {
                        shapes::ring(a, thickness * k)
                    }
                }
                PileSection::HPile { section } => {
                    let steel = if box_area { section.box_area } else { section.area };
                    steel * system.section_area_to_area()
                }
                PileSection::PipeClosed { .. } | PileSection::Timber { .. } | PileSection::CastInPlace { .. } => {
                    shapes::circle(a)
                }
            }
        };
        Ok(system.quantity(area, Dimension::Area))
    }

    /// Lateral area between depths `z1` and `z2`, in ft²/m².
    ///
    /// * `box_area` - H-piles use the box perimeter
    /// * `inside` - open sections return the inner wall area; for H-piles the
    ///   steel perimeter not on the box. Closed sections have no inner wall.
    ///
    /// Zero when either end falls outside the pile.
    pub fn side_area(&self, z1: f64, z2: f64, box_area: bool, inside: bool) -> CalcResult<Quantity> {
        if !z1.is_finite() || !z2.is_finite() || z1 < 0.0 || z2 < 0.0 {
            return Err(CalcError::out_of_range(
                "z",
                format!("[{}, {}]", z1, z2),
                "Depth cannot be negative here",
            ));
        }
        if z2 <= z1 {
            return Err(CalcError::out_of_range(
                "z2",
                z2.to_string(),
                format!("Must be larger than z1 = {}", z1),
            ));
        }

        let system = self.unit_system;
        let zero = Ok(Quantity::zero(system.unit(Dimension::Area)));
        if !self.on_pile(self.position_of(z1)) || !self.on_pile(self.position_of(z2)) {
            return zero;
        }
        if inside && !self.is_open_ended() {
            return zero;
        }

        let k = system.diameter_to_length();
        let h = z2 - z1;
        let a1 = self.width_at(z1) * k;
        let a2 = self.width_at(z2) * k;

        let area = match self.section {
            PileSection::Concrete(shape) => match shape {
                ConcreteShape::SquareSolid { .. } | ConcreteShape::SquareHollow { .. } => {
                    4.0 * shapes::trapezoid(a1, a2, h)
                }
                ConcreteShape::Hexagon { .. } => 6.0 * shapes::trapezoid(a1, a2, h),
                ConcreteShape::Octagon { .. } => 8.0 * shapes::trapezoid(a1, a2, h),
                ConcreteShape::CircleClosed { .. } => shapes::frustum_side(a1, a2, h),
                ConcreteShape::CircleOpen { thickness, .. } => open_wall(a1, a2, h, thickness * k, inside),
            },
            PileSection::PipeOpen { thickness, .. } => open_wall(a1, a2, h, thickness * k, inside),
            PileSection::HPile { section } => {
                let perimeter = if inside {
                    section.perimeter - section.box_perimeter
                } else if box_area {
                    section.box_perimeter
                } else {
                    section.perimeter
                };
                perimeter * k * h
            }
            PileSection::PipeClosed { .. } | PileSection::Timber { .. } | PileSection::CastInPlace { .. } => {
                shapes::frustum_side(a1, a2, h)
            }
        };
        Ok(system.quantity(area, Dimension::Area))
    }

    /// Depths where the pile geometry changes, sorted and de-duplicated:
    /// the pile top when below grade, the toe, every taper breakpoint below
    /// grade, and the bottom of the no-friction zone.
    pub fn critical_depths(&self) -> Vec<f64> {
        let mut depths = Vec::new();
        if self.pen_depth > self.length {
            depths.push(self.pen_depth - self.length);
        }
        if self.taper.is_empty() {
            depths.push(self.pen_depth);
        } else {
            let mut x = 0.0;
            for p in &self.taper {
                x += p.length;
                let z = x - self.length + self.pen_depth;
                if z > 0.0 {
                    depths.push(z);
                }
            }
        }
        if let Some(nf) = self.nf_zone {
            depths.push(nf);
        }
        depths.sort_by(|a, b| a.total_cmp(b));
        depths.dedup_by(|a, b| (*a - *b).abs() <= POSITION_TOLERANCE);
        depths
    }
}

/// Outer or inner frustum of an open section with wall thickness `t`
fn open_wall(a1: f64, a2: f64, h: f64, t: f64, inside: bool) -> f64 {
    if inside {
        shapes::frustum_side(a1 - 2.0 * t, a2 - 2.0 * t, h)
    } else {
        shapes::frustum_side(a1, a2, h)
    }
}

#[cfg(test)]
mod tests {
    use super::super::{PileInput, PileType, TaperPoint};
    use super::*;
    use crate::units::{Unit, UnitSystem};
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn tapered_square() -> Pile {
        // 16 in at the top, 14 in at 20 ft, 12 in at the toe (40 ft)
        Pile::new(
            UnitSystem::Imperial,
            PileInput::new(PileType::Concrete, 40.0)
                .with_shape("square-solid")
                .with_side(16.0)
                .with_taper(vec![TaperPoint::new(14.0, 20.0), TaperPoint::new(12.0, 20.0)]),
        )
        .unwrap()
    }

    fn open_pipe() -> Pile {
        Pile::new(
            UnitSystem::Imperial,
            PileInput::new(PileType::PipeOpen, 50.0)
                .with_diameter(24.0)
                .with_thickness(1.0)
                .with_pen_depth(45.0),
        )
        .unwrap()
    }

    #[test]
    fn test_interpolate_clamps() {
        let xs = [0.0, 10.0, 20.0];
        let ys = [4.0, 2.0, 1.0];
        assert_eq!(interpolate(-5.0, &xs, &ys), 4.0);
        assert_eq!(interpolate(5.0, &xs, &ys), 3.0);
        assert_eq!(interpolate(15.0, &xs, &ys), 1.5);
        assert_eq!(interpolate(25.0, &xs, &ys), 1.0);
    }

    #[test]
    fn test_taper_dimension() {
        let pile = tapered_square();
        assert_eq!(pile.dimension_at(0.0).value(), 16.0);
        assert_eq!(pile.dimension_at(0.0).unit(), Unit::Inch);
        assert_relative_eq!(pile.dimension_at(10.0).value(), 15.0, epsilon = 1e-12);
        assert_relative_eq!(pile.dimension_at(30.0).value(), 13.0, epsilon = 1e-12);
        assert_eq!(pile.dimension_at(40.0).value(), 12.0);
        // beyond the toe the last value holds
        assert_eq!(pile.dimension_at(60.0).value(), 12.0);
    }

    #[test]
    fn test_dimension_never_increases_with_depth() {
        let pile = tapered_square();
        let mut last = f64::INFINITY;
        for i in 0..=80 {
            let d = pile.dimension_at(i as f64 * 0.5).value();
            assert!(d <= last + 1e-12);
            last = d;
        }
    }

    #[test]
    fn test_square_areas() {
        let pile = tapered_square();
        let toe = pile.cross_section_area(40.0, false, false).unwrap();
        assert_eq!(toe.unit(), Unit::SqFoot);
        assert_relative_eq!(toe.value(), 1.0, epsilon = 1e-12);

        // four trapezoids between 16 in and 15 in over 10 ft
        let side = pile.side_area(0.0, 10.0, false, false).unwrap();
        assert_relative_eq!(side.value(), 4.0 * (16.0 + 15.0) / 24.0 * 10.0, epsilon = 1e-9);

        // below the toe there is no pile
        assert_eq!(pile.cross_section_area(41.0, false, false).unwrap().value(), 0.0);
    }

    #[test]
    fn test_pipe_plug_and_ring() {
        let pile = open_pipe();
        let plugged = pile.cross_section_area(45.0, true, false).unwrap().value();
        let ring = pile.cross_section_area(45.0, false, false).unwrap().value();
        assert_relative_eq!(plugged, PI, epsilon = 1e-12);
        assert_relative_eq!(ring, PI * (4.0 - (22.0_f64 / 12.0).powi(2)) / 4.0, epsilon = 1e-12);

        let outside = pile.side_area(10.0, 20.0, false, false).unwrap().value();
        let inner = pile.side_area(10.0, 20.0, false, true).unwrap().value();
        assert_relative_eq!(outside, PI * 2.0 * 10.0, epsilon = 1e-9);
        assert_relative_eq!(inner, PI * (22.0 / 12.0) * 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_toe_is_on_pile_despite_rounding() {
        let pile = Pile::new(
            UnitSystem::Imperial,
            PileInput::new(PileType::Timber, 30.0).with_diameter(12.0).with_pen_depth(25.3),
        )
        .unwrap();
        assert!(pile.cross_section_area(25.3, false, false).unwrap().value() > 0.0);
    }

    #[test]
    fn test_closed_sections_have_no_inner_wall() {
        let pile = Pile::new(
            UnitSystem::Imperial,
            PileInput::new(PileType::PipeClosed, 40.0).with_diameter(12.0).with_thickness(0.5),
        )
        .unwrap();
        assert_eq!(pile.side_area(0.0, 5.0, false, true).unwrap().value(), 0.0);
        assert!(pile.side_area(0.0, 5.0, false, false).unwrap().value() > 0.0);
    }

    #[test]
    fn test_hpile_areas() {
        let pile = Pile::new(
            UnitSystem::Imperial,
            PileInput::new(PileType::HPile, 40.0).with_shape("HP12X53"),
        )
        .unwrap();
        assert_relative_eq!(
            pile.cross_section_area(40.0, false, false).unwrap().value(),
            15.5 / 144.0,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            pile.cross_section_area(40.0, true, true).unwrap().value(),
            141.9 / 144.0,
            epsilon = 1e-12
        );
        let full = pile.side_area(0.0, 12.0, false, false).unwrap().value();
        let boxed = pile.side_area(0.0, 12.0, true, false).unwrap().value();
        let inner = pile.side_area(0.0, 12.0, false, true).unwrap().value();
        assert_relative_eq!(full, 70.87, epsilon = 1e-9);
        assert_relative_eq!(boxed, 47.65, epsilon = 1e-9);
        assert_relative_eq!(boxed + inner, full, epsilon = 1e-9);
    }

    #[test]
    fn test_metric_hexagon() {
        let pile = Pile::new(
            UnitSystem::Metric,
            PileInput::new(PileType::Concrete, 10.0).with_shape("hexagon").with_side(20.0),
        )
        .unwrap();
        let area = pile.cross_section_area(5.0, false, false).unwrap();
        assert_eq!(area.unit(), Unit::SqMeter);
        assert_relative_eq!(area.value(), shapes::hexagon(0.2), epsilon = 1e-12);
        let side = pile.side_area(1.0, 2.0, false, false).unwrap();
        assert_relative_eq!(side.value(), 6.0 * 0.2, epsilon = 1e-12);

        // below the toe and on the missing inner wall: zero, still in m²
        let past_toe = pile.side_area(10.5, 11.0, false, false).unwrap();
        assert_eq!(past_toe, Quantity::zero(Unit::SqMeter));
        assert_eq!(pile.side_area(1.0, 2.0, false, true).unwrap(), Quantity::zero(Unit::SqMeter));
    }

    #[test]
    fn test_query_errors() {
        let pile = open_pipe();
        assert!(pile.cross_section_area(-1.0, false, false).is_err());
        assert!(pile.side_area(-1.0, 2.0, false, false).is_err());
        assert!(pile.side_area(5.0, 5.0, false, false).is_err());
        assert!(pile.side_area(6.0, 5.0, false, false).is_err());
    }

    #[test]
    fn test_critical_depths() {
        assert_eq!(open_pipe().critical_depths(), vec![45.0]);

        // pile top 5 ft below grade, breakpoints at 25 and 45
        let sunk = Pile::new(
            UnitSystem::Imperial,
            PileInput::new(PileType::Concrete, 40.0)
                .with_shape("square-solid")
                .with_side(16.0)
                .with_pen_depth(45.0)
                .with_nf_zone(5.0)
                .with_taper(vec![TaperPoint::new(14.0, 20.0), TaperPoint::new(12.0, 20.0)]),
        )
        .unwrap();
        assert_eq!(sunk.critical_depths(), vec![5.0, 25.0, 45.0]);

        // pile top above grade: the first breakpoint is above grade and dropped
        let proud = Pile::new(
            UnitSystem::Imperial,
            PileInput::new(PileType::Concrete, 40.0)
                .with_shape("square-solid")
                .with_side(16.0)
                .with_pen_depth(15.0)
                .with_taper(vec![TaperPoint::new(14.0, 20.0), TaperPoint::new(12.0, 20.0)]),
        )
        .unwrap();
        assert_eq!(proud.critical_depths(), vec![15.0]);
    }
}
