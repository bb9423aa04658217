//! Field geometry primitives shared by the whole engine.
//!
//! Coordinates are chart-oriented: `+x` is the performers' left and `+y` is
//! forward (the direction of a forward march). On a chart drawn with `y`
//! growing downward, a positive rotation angle appears clockwise.

pub use kurbo::{Point, Vec2};

/// Distance covered by one marching step, in field units per count.
pub const STEP_SIZE: f64 = 1.0;

/// Gate-turn sweep in radians per count (a quarter turn in 8 counts).
pub const GATE_TURN_RATE: f64 = std::f64::consts::PI / 16.0;

/// Pinwheel sweep in radians per count (a quarter turn in 8 counts).
pub const PINWHEEL_RATE: f64 = std::f64::consts::PI / 16.0;

/// Unit vector with the direction of `v`, or zero when `v` has no length.
pub fn unit(v: Vec2) -> Vec2 {
    let len = v.hypot();
    if len == 0.0 { Vec2::ZERO } else { v / len }
}

/// `v` rotated a quarter turn (positive rotation).
pub fn perp(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// `p` rotated by `theta` radians about `pivot`.
pub fn rotate_about(p: Point, pivot: Point, theta: f64) -> Point {
    let v = p - pivot;
    let (sin, cos) = theta.sin_cos();
    pivot + Vec2::new(cos * v.x - sin * v.y, sin * v.x + cos * v.y)
}

/// Field axis a corner leg runs along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Axis {
    X,
    Y,
}

impl Axis {
    pub(crate) fn direction(self, sign: f64) -> Vec2 {
        match self {
            Axis::X => Vec2::new(sign, 0.0),
            Axis::Y => Vec2::new(0.0, sign),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_handles_zero_length() {
        assert_eq!(unit(Vec2::ZERO), Vec2::ZERO);
        let u = unit(Vec2::new(3.0, 4.0));
        assert!((u.hypot() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn perp_is_orthogonal() {
        let v = Vec2::new(2.5, -1.0);
        assert_eq!(v.dot(perp(v)), 0.0);
    }

    #[test]
    fn rotate_about_quarter_turn() {
        let p = rotate_about(
            Point::new(1.0, 0.0),
            Point::ZERO,
            std::f64::consts::FRAC_PI_2,
        );
        assert!((p.x - 0.0).abs() < 1e-12);
        assert!((p.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rotate_about_offset_pivot() {
        let pivot = Point::new(2.0, 2.0);
        let p = rotate_about(Point::new(3.0, 2.0), pivot, std::f64::consts::PI);
        assert!((p.x - 1.0).abs() < 1e-12);
        assert!((p.y - 2.0).abs() < 1e-12);
    }
}
