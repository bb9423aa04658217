//! Reconciliation of several ranks' timelines into one consolidated view.
//!
//! Group editing needs a single timeline to point at. Where the selected
//! ranks agree (the command active at the same offset matches in kind and
//! counts) the consolidated timeline shows their shared commands; where
//! they diverge it shows `Conflict` markers. The view is computed on
//! demand and never stored.

use std::collections::{BTreeMap, BTreeSet};

use crate::command::Command;
use crate::error::{DrillError, DrillResult};
use crate::timeline::{Move, RankTrack};

/// The consolidated timeline of a rank selection, with a per-entry map back
/// to each rank's own command indices.
#[derive(Clone, Debug, PartialEq)]
pub struct Consolidated {
    commands: Vec<Command>,
    sources: Vec<Option<BTreeMap<String, usize>>>,
}

impl Consolidated {
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn is_conflict(&self, index: usize) -> bool {
        matches!(self.sources.get(index), Some(None))
    }

    pub fn total_counts(&self) -> u32 {
        self.commands.iter().map(|c| c.counts).sum()
    }

    /// Each selected rank's command index behind consolidated entry `index`.
    /// Conflict entries have no sources and cannot be edited through.
    pub fn source_indices(&self, index: usize) -> DrillResult<&BTreeMap<String, usize>> {
        match self.sources.get(index) {
            Some(Some(map)) => Ok(map),
            Some(None) => Err(DrillError::ConflictTarget),
            None => Err(DrillError::index(index, self.sources.len())),
        }
    }
}

/// Consolidate the selected ranks' timelines within one move.
///
/// The lexicographically smallest rank is the reference. Its commands are
/// walked in order with a running offset: a command agrees when the command
/// active at that offset in every other selected rank has the same kind and
/// counts (names and destinations are not compared). Disagreeing spans
/// accumulate and flush as a single `Conflict` entry before the next
/// agreement; whatever timeline length remains beyond the consolidated
/// total becomes one final `Conflict`.
#[tracing::instrument(skip(mov))]
pub fn consolidate(mov: &Move, ranks: &BTreeSet<String>) -> DrillResult<Consolidated> {
    for rank in ranks {
        mov.track(rank)?;
    }
    let mut out = Consolidated {
        commands: Vec::new(),
        sources: Vec::new(),
    };
    let Some(reference) = ranks.iter().next() else {
        return Ok(out);
    };
    if ranks.len() == 1 {
        let track = mov.track(reference)?;
        for (index, command) in track.commands.iter().enumerate() {
            out.commands.push(command.clone());
            out.sources
                .push(Some(BTreeMap::from([(reference.clone(), index)])));
        }
        return Ok(out);
    }

    let reference_track = mov.track(reference)?;
    let mut offset: u32 = 0;
    let mut pending: u32 = 0;
    for (ref_index, ref_command) in reference_track.commands.iter().enumerate() {
        let mut sources = BTreeMap::from([(reference.clone(), ref_index)]);
        let mut agree = true;
        for rank in ranks {
            if rank == reference {
                continue;
            }
            match command_at(mov.track(rank)?, offset) {
                Some((index, other))
                    if other.kind == ref_command.kind && other.counts == ref_command.counts =>
                {
                    sources.insert(rank.clone(), index);
                }
                _ => {
                    agree = false;
                    break;
                }
            }
        }
        if agree {
            if pending > 0 {
                out.commands.push(Command::conflict(pending));
                out.sources.push(None);
                pending = 0;
            }
            out.commands.push(ref_command.clone());
            out.sources.push(Some(sources));
        } else {
            pending += ref_command.counts;
        }
        offset += ref_command.counts;
    }

    // Whatever the consolidated entries do not cover, in any selected rank,
    // is one trailing conflict. This absorbs a still pending span as well as
    // extra length in longer ranks.
    let consolidated = out.total_counts();
    let mut longest: u32 = 0;
    for rank in ranks {
        longest = longest.max(mov.track(rank)?.used_counts());
    }
    if longest > consolidated {
        out.commands.push(Command::conflict(longest - consolidated));
        out.sources.push(None);
    }
    Ok(out)
}

/// The command active at `offset` counts into the track: the one whose own
/// running-offset interval contains `offset`. None when the timeline is too
/// short.
fn command_at(track: &RankTrack, offset: u32) -> Option<(usize, &Command)> {
    let mut at: u32 = 0;
    for (index, command) in track.commands.iter().enumerate() {
        if offset < at + command.counts {
            return Some((index, command));
        }
        at += command.counts;
    }
    None
}
