//! The instantaneous spatial shape of one rank.

use crate::core::{Point, unit};
use crate::error::{DrillError, DrillResult};

/// Geometric class of a rank's path between its two endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Shape {
    /// Straight segment; `control` is the exact midpoint.
    Line,
    /// Quadratic Bézier; `control` is the off-axis control point.
    Curve,
    /// Two-segment polyline; `control` is the pivot vertex.
    Corner,
}

/// Where a rank stands: two endpoints plus a third point whose meaning
/// depends on [`Shape`].
///
/// `head` and `tail` are the rank's leading and trailing endpoints (the
/// gate-turn, expand and corner commands are named after them). Positions
/// are plain values; every transformation produces a fresh one and
/// propagation clones rather than shares.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RankPosition {
    pub head: Point,
    pub tail: Point,
    pub control: Point,
    pub shape: Shape,
}

impl RankPosition {
    /// Straight rank from `head` to `tail`, control at the midpoint.
    pub fn line(head: Point, tail: Point) -> Self {
        Self {
            head,
            tail,
            control: head.midpoint(tail),
            shape: Shape::Line,
        }
    }

    /// Curved rank with an explicit Bézier control point.
    pub fn curve(head: Point, tail: Point, control: Point) -> Self {
        Self {
            head,
            tail,
            control,
            shape: Shape::Curve,
        }
    }

    /// Bent rank pivoting at `vertex`.
    pub fn corner(head: Point, tail: Point, vertex: Point) -> Self {
        Self {
            head,
            tail,
            control: vertex,
            shape: Shape::Corner,
        }
    }

    pub fn midpoint(&self) -> Point {
        self.head.midpoint(self.tail)
    }

    /// Unit vector pointing from tail to head; zero when the endpoints
    /// coincide.
    pub fn axis(&self) -> crate::core::Vec2 {
        unit(self.head - self.tail)
    }

    /// Marching length of the shape: endpoint distance for lines and
    /// curves, the two leg lengths for a corner.
    pub fn path_length(&self) -> f64 {
        match self.shape {
            Shape::Line | Shape::Curve => self.head.distance(self.tail),
            Shape::Corner => {
                self.tail.distance(self.control) + self.control.distance(self.head)
            }
        }
    }

    /// Re-pin the control to the exact midpoint when the shape is a line.
    /// Every transformation ends with this so the line invariant survives
    /// floating-point drift.
    pub(crate) fn normalized(mut self) -> Self {
        if self.shape == Shape::Line {
            self.control = self.midpoint();
        }
        self
    }

    pub fn validate(&self) -> DrillResult<()> {
        for (label, p) in [
            ("head", self.head),
            ("tail", self.tail),
            ("control", self.control),
        ] {
            if !p.x.is_finite() || !p.y.is_finite() {
                return Err(DrillError::validation(format!(
                    "rank position {label} must be finite"
                )));
            }
        }
        if self.shape == Shape::Line && self.control != self.midpoint() {
            return Err(DrillError::validation(
                "line control point must be the exact midpoint",
            ));
        }
        Ok(())
    }
}
