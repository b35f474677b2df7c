//! Plane and lateral area formulas.
//!
//! All inputs share one length unit; outputs are in that unit squared.

use std::f64::consts::{PI, SQRT_2};

/// Square of side `a`
pub fn square(a: f64) -> f64 {
    a * a
}

/// Regular hexagon of side `a`
pub fn hexagon(a: f64) -> f64 {
    1.5 * 3.0_f64.sqrt() * a * a
}

/// Regular octagon of side `a`
pub fn octagon(a: f64) -> f64 {
    2.0 * (1.0 + SQRT_2) * a * a
}

/// Circle of diameter `d`
pub fn circle(d: f64) -> f64 {
    PI * d * d / 4.0
}

/// Annulus of outside diameter `d` and wall thickness `t`
pub fn ring(d: f64, t: f64) -> f64 {
    let inner = d - 2.0 * t;
    PI * (d * d - inner * inner) / 4.0
}

/// Trapezoid with parallel sides `a1`, `a2` and height `h`
pub fn trapezoid(a1: f64, a2: f64, h: f64) -> f64 {
    (a1 + a2) / 2.0 * h
}

/// Lateral area of a conical frustum with end diameters `d1`, `d2` and
/// height `h`
pub fn frustum_side(d1: f64, d2: f64, h: f64) -> f64 {
    let slant = (((d1 - d2) / 2.0).powi(2) + h * h).sqrt();
    PI * (d1 + d2) / 2.0 * slant
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_plane_areas() {
        assert_eq!(square(2.0), 4.0);
        assert_relative_eq!(hexagon(1.0), 2.598_076_211, epsilon = 1e-9);
        assert_relative_eq!(octagon(1.0), 4.828_427_125, epsilon = 1e-9);
        assert_relative_eq!(circle(2.0), PI, epsilon = 1e-12);
        // full wall: ring equals the circle
        assert_relative_eq!(ring(2.0, 1.0), circle(2.0), epsilon = 1e-12);
        assert_relative_eq!(ring(2.0, 0.5), PI * 3.0 / 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_lateral_areas() {
        assert_eq!(trapezoid(1.0, 3.0, 2.0), 4.0);
        // cylinder when the ends match
        assert_relative_eq!(frustum_side(1.0, 1.0, 3.0), PI * 3.0, epsilon = 1e-12);
        // 3-4-5 slant
        assert_relative_eq!(frustum_side(8.0, 2.0, 4.0), PI * 5.0 * 5.0, epsilon = 1e-12);
    }
}
