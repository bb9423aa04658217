#![forbid(unsafe_code)]

pub mod command;
pub mod core;
pub mod drill;
pub mod dsl;
pub mod error;
pub mod guide;
pub mod position;
pub mod reconcile;
pub mod timeline;

pub use command::{Command, CommandKind};
pub use core::{GATE_TURN_RATE, PINWHEEL_RATE, Point, STEP_SIZE, Vec2};
pub use drill::{DEFAULT_COUNTS_PER_MEASURE, DEFAULT_TEMPO_BPM, Drill};
pub use dsl::DrillBuilder;
pub use error::{DrillError, DrillResult};
pub use position::{RankPosition, Shape};
pub use reconcile::{Consolidated, consolidate};
pub use timeline::{Move, RankTrack};
