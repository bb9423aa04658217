//! Movement commands and the geometry each kind applies to a rank.

use crate::core::{
    Axis, GATE_TURN_RATE, PINWHEEL_RATE, Point, STEP_SIZE, Vec2, perp, rotate_about,
};
use crate::error::{DrillError, DrillResult};
use crate::position::{RankPosition, Shape};

/// Closed set of movement primitives.
///
/// Corner variants read lead-then-trail: `CornerLeftForward` sends the
/// leading endpoint left while the trailing endpoint keeps marching forward.
/// `Conflict` is reserved for reconciliation output and is never stored in a
/// move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CommandKind {
    MarkTime,
    Halt,
    Forward,
    Back,
    LeftSlide,
    RightSlide,
    GateHeadCw,
    GateHeadCcw,
    GateTailCw,
    GateTailCcw,
    PinwheelCw,
    PinwheelCcw,
    ExpandHead,
    ExpandTail,
    ExpandBoth,
    CondenseHead,
    CondenseTail,
    CondenseBoth,
    FlattenToEnds,
    FlattenToMid,
    CurveLeft,
    CurveRight,
    CornerForwardLeft,
    CornerForwardRight,
    CornerBackLeft,
    CornerBackRight,
    CornerLeftForward,
    CornerLeftBack,
    CornerRightForward,
    CornerRightBack,
    FollowPath,
    DirectToPoint,
    Conflict,
}

impl CommandKind {
    /// Chart abbreviation used when a command carries no name override.
    pub fn default_label(self) -> &'static str {
        match self {
            Self::MarkTime => "MT",
            Self::Halt => "HLT",
            Self::Forward => "FM",
            Self::Back => "BM",
            Self::LeftSlide => "LS",
            Self::RightSlide => "RS",
            Self::GateHeadCw => "GTCW (H)",
            Self::GateHeadCcw => "GTCCW (H)",
            Self::GateTailCw => "GTCW (T)",
            Self::GateTailCcw => "GTCCW (T)",
            Self::PinwheelCw => "PWCW",
            Self::PinwheelCcw => "PWCCW",
            Self::ExpandHead => "EXP (H)",
            Self::ExpandTail => "EXP (T)",
            Self::ExpandBoth => "EXP",
            Self::CondenseHead => "CND (H)",
            Self::CondenseTail => "CND (T)",
            Self::CondenseBoth => "CND",
            Self::FlattenToEnds => "FTE",
            Self::FlattenToMid => "FTM",
            Self::CurveLeft => "CVL",
            Self::CurveRight => "CVR",
            Self::CornerForwardLeft => "CNR FL",
            Self::CornerForwardRight => "CNR FR",
            Self::CornerBackLeft => "CNR BL",
            Self::CornerBackRight => "CNR BR",
            Self::CornerLeftForward => "CNR LF",
            Self::CornerLeftBack => "CNR LB",
            Self::CornerRightForward => "CNR RF",
            Self::CornerRightBack => "CNR RB",
            Self::FollowPath => "FTP",
            Self::DirectToPoint => "DTP",
            Self::Conflict => "<conflict>",
        }
    }
}

/// One movement instruction applied to a rank within a move.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Command {
    pub kind: CommandKind,
    pub counts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<RankPosition>,
}

impl Command {
    pub fn new(kind: CommandKind, counts: u32) -> Self {
        Self {
            kind,
            counts,
            name: None,
            destination: None,
        }
    }

    pub fn direct_to_point(counts: u32, destination: RankPosition) -> Self {
        Self {
            kind: CommandKind::DirectToPoint,
            counts,
            name: None,
            destination: Some(destination),
        }
    }

    /// Conflict placeholder spanning `counts`. Reconciliation output only;
    /// edit operations reject it and it never persists.
    pub fn conflict(counts: u32) -> Self {
        Self {
            kind: CommandKind::Conflict,
            counts,
            name: None,
            destination: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The name override, or the kind's default abbreviation.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(self.kind.default_label())
    }

    pub fn validate(&self) -> DrillResult<()> {
        if self.kind == CommandKind::Conflict {
            return Err(DrillError::ConflictTarget);
        }
        if self.counts == 0 {
            return Err(DrillError::validation("command counts must be at least 1"));
        }
        match (self.kind, &self.destination) {
            (CommandKind::DirectToPoint, Some(dest)) => dest.validate(),
            (CommandKind::DirectToPoint, None) => Err(DrillError::validation(
                "direct-to-point requires a destination",
            )),
            (_, Some(_)) => Err(DrillError::validation(
                "only direct-to-point carries a destination",
            )),
            (_, None) => Ok(()),
        }
    }

    /// Position after `counts` of this command, starting from `base`.
    ///
    /// `counts` is cumulative progress from the command's start, clamped to
    /// `[0, self.counts]`; fractional values render partial progress. The
    /// same path serves commits and playback: `apply(base, total)` is the
    /// committed result and `apply(base, c)` is continuous in `c`. Partial
    /// progress always re-applies from `base`, never from an earlier partial
    /// result.
    pub fn apply(&self, base: &RankPosition, counts: f64) -> RankPosition {
        let total = f64::from(self.counts);
        let counts = counts.clamp(0.0, total);
        if counts == 0.0 {
            return *base;
        }
        let t = counts / total;

        match self.kind {
            CommandKind::MarkTime | CommandKind::Halt | CommandKind::FollowPath => *base,
            CommandKind::Conflict => *base,
            CommandKind::Forward => translated(base, Vec2::new(0.0, STEP_SIZE * counts)),
            CommandKind::Back => translated(base, Vec2::new(0.0, -STEP_SIZE * counts)),
            CommandKind::LeftSlide => translated(base, Vec2::new(STEP_SIZE * counts, 0.0)),
            CommandKind::RightSlide => translated(base, Vec2::new(-STEP_SIZE * counts, 0.0)),
            CommandKind::GateHeadCw => gated(base, Hinge::Tail, GATE_TURN_RATE * counts),
            CommandKind::GateHeadCcw => gated(base, Hinge::Tail, -GATE_TURN_RATE * counts),
            CommandKind::GateTailCw => gated(base, Hinge::Head, GATE_TURN_RATE * counts),
            CommandKind::GateTailCcw => gated(base, Hinge::Head, -GATE_TURN_RATE * counts),
            CommandKind::PinwheelCw => pinwheeled(base, PINWHEEL_RATE * counts),
            CommandKind::PinwheelCcw => pinwheeled(base, -PINWHEEL_RATE * counts),
            CommandKind::ExpandHead => spread(base, 1.0, 0.0, STEP_SIZE * counts),
            CommandKind::ExpandTail => spread(base, 0.0, 1.0, STEP_SIZE * counts),
            CommandKind::ExpandBoth => spread(base, 0.5, 0.5, STEP_SIZE * counts),
            CommandKind::CondenseHead => spread(base, 1.0, 0.0, -STEP_SIZE * counts),
            CommandKind::CondenseTail => spread(base, 0.0, 1.0, -STEP_SIZE * counts),
            CommandKind::CondenseBoth => spread(base, 0.5, 0.5, -STEP_SIZE * counts),
            CommandKind::FlattenToEnds => flattened_to_ends(base, t),
            CommandKind::FlattenToMid => flattened_to_mid(base, t),
            CommandKind::CurveLeft => curved(base, STEP_SIZE * counts),
            CommandKind::CurveRight => curved(base, -STEP_SIZE * counts),
            CommandKind::CornerForwardLeft => cornered(base, Axis::Y, 1.0, Axis::X, 1.0, t),
            CommandKind::CornerForwardRight => cornered(base, Axis::Y, 1.0, Axis::X, -1.0, t),
            CommandKind::CornerBackLeft => cornered(base, Axis::Y, -1.0, Axis::X, 1.0, t),
            CommandKind::CornerBackRight => cornered(base, Axis::Y, -1.0, Axis::X, -1.0, t),
            CommandKind::CornerLeftForward => cornered(base, Axis::X, 1.0, Axis::Y, 1.0, t),
            CommandKind::CornerLeftBack => cornered(base, Axis::X, 1.0, Axis::Y, -1.0, t),
            CommandKind::CornerRightForward => cornered(base, Axis::X, -1.0, Axis::Y, 1.0, t),
            CommandKind::CornerRightBack => cornered(base, Axis::X, -1.0, Axis::Y, -1.0, t),
            CommandKind::DirectToPoint => match &self.destination {
                Some(destination) => toward(base, destination, t),
                None => *base,
            },
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.label(), self.counts)
    }
}

fn translated(base: &RankPosition, delta: Vec2) -> RankPosition {
    RankPosition {
        head: base.head + delta,
        tail: base.tail + delta,
        control: base.control + delta,
        shape: base.shape,
    }
    .normalized()
}

#[derive(Clone, Copy)]
enum Hinge {
    Head,
    Tail,
}

/// Swing the free endpoint (and the control) about the hinged endpoint.
fn gated(base: &RankPosition, hinge: Hinge, theta: f64) -> RankPosition {
    let (pivot, swung) = match hinge {
        Hinge::Tail => (base.tail, base.head),
        Hinge::Head => (base.head, base.tail),
    };
    let swung = rotate_about(swung, pivot, theta);
    let control = rotate_about(base.control, pivot, theta);
    let (head, tail) = match hinge {
        Hinge::Tail => (swung, pivot),
        Hinge::Head => (pivot, swung),
    };
    RankPosition {
        head,
        tail,
        control,
        shape: base.shape,
    }
    .normalized()
}

fn pinwheeled(base: &RankPosition, theta: f64) -> RankPosition {
    let pivot = if base.shape == Shape::Line {
        base.midpoint()
    } else {
        base.control
    };
    RankPosition {
        head: rotate_about(base.head, pivot, theta),
        tail: rotate_about(base.tail, pivot, theta),
        control: pivot,
        shape: base.shape,
    }
    .normalized()
}

/// Displace the endpoints along the rank's own axis; positive `amount`
/// expands, negative condenses. A degenerate rank (coincident endpoints)
/// has no axis and stays put.
fn spread(base: &RankPosition, head_share: f64, tail_share: f64, amount: f64) -> RankPosition {
    let axis = base.axis();
    RankPosition {
        head: base.head + axis * (amount * head_share),
        tail: base.tail - axis * (amount * tail_share),
        control: base.control,
        shape: base.shape,
    }
    .normalized()
}

fn flattened_to_mid(base: &RankPosition, t: f64) -> RankPosition {
    if base.shape == Shape::Line {
        return *base;
    }
    let shape = if t >= 1.0 { Shape::Line } else { base.shape };
    RankPosition {
        head: base.head,
        tail: base.tail,
        control: base.control.lerp(base.midpoint(), t),
        shape,
    }
    .normalized()
}

/// Pull each endpoint toward its projection on the line through the control
/// parallel to the head-tail axis; the three points are collinear at `t = 1`.
fn flattened_to_ends(base: &RankPosition, t: f64) -> RankPosition {
    if base.shape == Shape::Line {
        return *base;
    }
    let axis = base.axis();
    if axis == Vec2::ZERO {
        return *base;
    }
    let project = |p: Point| base.control + axis * (p - base.control).dot(axis);
    let shape = if t >= 1.0 { Shape::Line } else { base.shape };
    RankPosition {
        head: base.head.lerp(project(base.head), t),
        tail: base.tail.lerp(project(base.tail), t),
        control: base.control,
        shape,
    }
    .normalized()
}

/// Offset the control perpendicular to the head-tail axis. Positive `amount`
/// bulges toward `perp(axis)`. The result degrades to a line only when the
/// three points come out exactly collinear.
fn curved(base: &RankPosition, amount: f64) -> RankPosition {
    let anchor = if base.shape == Shape::Line {
        base.midpoint()
    } else {
        base.control
    };
    let control = anchor + perp(base.axis()) * amount;
    let cross = (base.tail - base.head).cross(control - base.head);
    let shape = if cross == 0.0 { Shape::Line } else { Shape::Curve };
    RankPosition {
        head: base.head,
        tail: base.tail,
        control,
        shape,
    }
    .normalized()
}

/// Pivot the rank through a right angle. The leading endpoint is the one
/// farther along the trailing travel direction (head on ties); it walks off
/// along the lead axis while the trailing endpoint closes on the pivot along
/// the trail axis, both covering the rank's path length over the command.
fn cornered(
    base: &RankPosition,
    lead_axis: Axis,
    lead_sign: f64,
    trail_axis: Axis,
    trail_sign: f64,
    t: f64,
) -> RankPosition {
    let lead_dir = lead_axis.direction(lead_sign);
    let trail_dir = trail_axis.direction(trail_sign);
    let length = base.path_length();

    let head_leads = base.head.to_vec2().dot(trail_dir) >= base.tail.to_vec2().dot(trail_dir);
    let pivot = if base.shape == Shape::Corner {
        base.control
    } else if head_leads {
        base.head
    } else {
        base.tail
    };

    let (lead_from, trail_from) = if head_leads {
        (base.head, base.tail)
    } else {
        (base.tail, base.head)
    };
    let lead_to = lead_from + lead_dir * (length * t);
    let trail_to = trail_from + trail_dir * (length * t);
    let (head, tail) = if head_leads {
        (lead_to, trail_to)
    } else {
        (trail_to, lead_to)
    };

    if t >= 1.0 {
        RankPosition::line(head, tail)
    } else {
        RankPosition {
            head,
            tail,
            control: pivot,
            shape: Shape::Corner,
        }
    }
}

/// Interpolate toward `destination`; exactly the destination at `t = 1`.
/// In transit the shape is Curve if either side is a curve, the shared shape
/// when both sides agree, and Corner otherwise.
fn toward(base: &RankPosition, destination: &RankPosition, t: f64) -> RankPosition {
    if t >= 1.0 {
        return *destination;
    }
    let shape = if base.shape == Shape::Curve || destination.shape == Shape::Curve {
        Shape::Curve
    } else if base.shape == destination.shape {
        base.shape
    } else {
        Shape::Corner
    };
    RankPosition {
        head: base.head.lerp(destination.head, t),
        tail: base.tail.lerp(destination.tail, t),
        control: base.control.lerp(destination.control, t),
        shape,
    }
    .normalized()
}
