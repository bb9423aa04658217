//! # Drillform guide (v0.1.0)
//!
//! This module is a standalone, end-to-end walkthrough of drillform's architecture and public
//! API. It is intentionally detailed so future phases (and external integrations) can build on a
//! shared mental model of what "a drill" means in this codebase.
//!
//! If you are looking for copy/paste commands, start with the repository `README.md`.
//! If you are implementing new features, start here.
//!
//! ---
//!
//! ## Core concepts
//!
//! - [`RankPosition`](crate::RankPosition): one rank on the chart (head, tail, control, shape)
//! - [`Command`](crate::Command): a movement primitive with a duration in counts
//! - [`Move`](crate::Move): one timed segment; every rank gets its own command timeline
//! - [`Drill`](crate::Drill): the whole document: moves, the rank registry, tempo maps
//! - [`consolidate`](crate::consolidate): folds several ranks' timelines into one view
//! - [`DrillBuilder`](crate::DrillBuilder): checked construction for programmatic use
//!
//! Editing is explicitly staged:
//!
//! 1. Validate the edit against the move (budget, indices, command well-formedness)
//! 2. Apply it to the rank's timeline and refold that rank's end position
//! 3. Propagate forward: [`Drill::propagate`](crate::Drill::propagate)
//!
//! A [`Drill`](crate::Drill) that only changes through its methods therefore always satisfies
//! [`Drill::validate`](crate::Drill::validate).
//!
//! ---
//!
//! ## The chart frame
//!
//! Positions live on a flat field in f64 steps. `+x` points to the performers' left, `+y` points
//! forward (toward the audience), and one unit is one standard step
//! ([`STEP_SIZE`](crate::STEP_SIZE)). Angles grow counterclockwise in this frame; charts are
//! usually rendered with the y axis flipped, so a positive rotation appears clockwise on paper,
//! which is why the clockwise command variants apply positive angles.
//!
//! A rank is a short segment of performers: `head` and `tail` are its endpoints, `control` bows
//! it into a curve or pins the vertex of a corner. For a [`Shape::Line`](crate::Shape) the
//! control always sits exactly at the midpoint; the constructors and every transformation keep
//! that pinned.
//!
//! ---
//!
//! ## Pure transformations
//!
//! [`Command::apply`](crate::Command::apply) never mutates: it takes the position a command
//! started from and a number of elapsed counts, and returns where the rank stands. Passing
//! `counts = 0.0` returns the base unchanged; passing the full duration returns the end
//! position; anything between renders mid-stride geometry, including fractional counts.
//!
//! Re-applying from the base (instead of stepping incrementally) is what keeps playback exact:
//! scrubbing a chart back and forth cannot accumulate drift, and landmark counts hit exact
//! coordinates. `DirectToPoint` at full duration returns the destination itself.
//!
//! ---
//!
//! ## Building a drill (Rust DSL)
//!
//! JSON is supported via Serde, but programmatic assembly reads better through the builder:
//!
//! ```rust,no_run
//! use drillform::{Command, CommandKind, DrillBuilder, Point, RankPosition};
//!
//! # fn main() -> anyhow::Result<()> {
//! let drill = DrillBuilder::new("pregame", 8)?
//!     .rank("A", RankPosition::line(Point::new(0.0, 0.0), Point::new(8.0, 0.0)))?
//!     .rank("B", RankPosition::line(Point::new(0.0, 4.0), Point::new(8.0, 4.0)))?
//!     .command("A", Command::new(CommandKind::MarkTime, 8))?
//!     .command("B", Command::new(CommandKind::MarkTime, 8))?
//!     .next_move(16)?
//!     .comment("push to the front hash")
//!     .command("A", Command::new(CommandKind::Forward, 16))?
//!     .command("B", Command::new(CommandKind::Forward, 16))?
//!     .build()?;
//!
//! // Halfway through the second move, rank A is 8 steps downfield.
//! let halfway = drill.position_at_partial_count(1, "A", 8.0)?;
//! assert_eq!(halfway.head, Point::new(0.0, 8.0));
//!
//! let json = serde_json::to_string_pretty(&drill)?;
//! # let _ = json;
//! # Ok(())
//! # }
//! ```
//!
//! Notes:
//!
//! - [`Drill::validate`](crate::Drill::validate) is called by the builder's `build`.
//! - Commands land in the most recently opened move; `next_move` chains every rank's start from
//!   the previous move's end.
//!
//! ---
//!
//! ## Propagation
//!
//! Moves chain: a rank begins each move exactly where the previous move left it. Editing an
//! early move therefore ripples forward through the rest of the drill: every later move's start
//! is overwritten with its predecessor's end and its end refolded. Propagation is strictly
//! forward; editing a later move never rewrites an earlier one. There is no early stop, so a
//! mid-drill edit that happens to land on the old position still refreshes everything after it.
//! A rank missing from a later move panics mid-propagation: the editing API keeps the registry
//! and every move's keys aligned, so that state only arises in a document mutated outside it.
//!
//! ---
//!
//! ## Reconciliation and group edits
//!
//! Editing several ranks at once needs a single timeline to point at.
//! [`consolidate`](crate::consolidate) walks the selection against its lexicographically
//! smallest rank: where every rank's command active at the same offset matches in kind and
//! counts, the consolidated timeline shows that command; where they diverge, it shows a `Conflict` marker
//! spanning the disagreement. Conflict entries cannot be edited through
//! ([`DrillError::ConflictTarget`](crate::DrillError)); agreeing entries map back to each rank's
//! own command indices.
//!
//! The `group_*` methods on [`Drill`](crate::Drill) consume that mapping. They stage the edit on
//! a copy of the move and commit only if it succeeds for every selected rank, so a budget
//! overrun in one rank cannot leave the others half-edited.
//!
//! ---
//!
//! ## Persistence and the CLI
//!
//! The whole document serializes to JSON with Serde; loading back and re-validating yields an
//! equal document. The `drillform` binary wraps the common read paths: `info` summarizes a
//! drill, `validate` checks it, `chart` prints every rank's position at a count, and `reconcile`
//! prints the consolidated timeline of a rank selection.
