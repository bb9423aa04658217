//! One timed segment of the drill: per-rank command timelines with cached
//! start and end positions.

use std::collections::BTreeMap;

use crate::command::Command;
use crate::error::{DrillError, DrillResult};
use crate::position::RankPosition;

/// One rank's slice of a move.
///
/// `end` is a cache: it always equals the fold of `commands` over `start`.
/// Every edit operation refreshes it; `validate` rejects a stale value.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RankTrack {
    pub start: RankPosition,
    pub end: RankPosition,
    pub commands: Vec<Command>,
}

impl RankTrack {
    /// Track with no commands, standing at `position`.
    pub fn at_rest(position: RankPosition) -> Self {
        Self {
            start: position,
            end: position,
            commands: Vec::new(),
        }
    }

    pub fn used_counts(&self) -> u32 {
        self.commands.iter().map(|c| c.counts).sum()
    }

    /// The end position implied by folding every command over `start`.
    pub fn folded_end(&self) -> RankPosition {
        self.commands.iter().fold(self.start, |pos, command| {
            command.apply(&pos, f64::from(command.counts))
        })
    }

    pub(crate) fn refold(&mut self) {
        self.end = self.folded_end();
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Move {
    pub total_counts: u32, // count budget shared by every rank
    pub comment: String,
    pub ranks: BTreeMap<String, RankTrack>,
}

impl Move {
    pub fn new(total_counts: u32) -> Self {
        Self {
            total_counts,
            comment: String::new(),
            ranks: BTreeMap::new(),
        }
    }

    pub fn track(&self, rank: &str) -> DrillResult<&RankTrack> {
        self.ranks
            .get(rank)
            .ok_or_else(|| DrillError::unknown_rank(rank))
    }

    fn track_mut(&mut self, rank: &str) -> DrillResult<&mut RankTrack> {
        self.ranks
            .get_mut(rank)
            .ok_or_else(|| DrillError::unknown_rank(rank))
    }

    pub fn used_counts(&self, rank: &str) -> DrillResult<u32> {
        Ok(self.track(rank)?.used_counts())
    }

    /// Append a command, keeping the rank within the move's count budget.
    pub fn add_command(&mut self, rank: &str, command: Command) -> DrillResult<()> {
        command.validate()?;
        let budget = self.total_counts;
        let track = self.track_mut(rank)?;
        let used = track.used_counts();
        if u64::from(used) + u64::from(command.counts) > u64::from(budget) {
            return Err(DrillError::BudgetExceeded {
                used,
                requested: command.counts,
                budget,
            });
        }
        track.commands.push(command);
        track.refold();
        Ok(())
    }

    /// Remove the commands at `indices`; duplicates are tolerated.
    pub fn remove_commands(&mut self, rank: &str, indices: &[usize]) -> DrillResult<()> {
        let track = self.track_mut(rank)?;
        let picked = checked_indices(indices, track.commands.len())?;
        for &i in picked.iter().rev() {
            track.commands.remove(i);
        }
        track.refold();
        Ok(())
    }

    /// Override a command's display label; `None` restores the default.
    pub fn rename_command(
        &mut self,
        rank: &str,
        index: usize,
        name: Option<String>,
    ) -> DrillResult<()> {
        let track = self.track_mut(rank)?;
        let len = track.commands.len();
        let Some(command) = track.commands.get_mut(index) else {
            return Err(DrillError::index(index, len));
        };
        command.name = name;
        track.refold();
        Ok(())
    }

    /// Shift the selection one slot earlier. A selection touching index 0
    /// leaves the timeline untouched and reports success.
    pub fn move_up(&mut self, rank: &str, indices: &[usize]) -> DrillResult<()> {
        let track = self.track_mut(rank)?;
        let picked = checked_indices(indices, track.commands.len())?;
        if picked.is_empty() || picked[0] == 0 {
            return Ok(());
        }
        for &i in &picked {
            track.commands.swap(i - 1, i);
        }
        track.refold();
        Ok(())
    }

    /// Shift the selection one slot later; a selection touching the last
    /// index is a no-op.
    pub fn move_down(&mut self, rank: &str, indices: &[usize]) -> DrillResult<()> {
        let track = self.track_mut(rank)?;
        let len = track.commands.len();
        let picked = checked_indices(indices, len)?;
        if picked.is_empty() || picked[picked.len() - 1] + 1 == len {
            return Ok(());
        }
        for &i in picked.iter().rev() {
            track.commands.swap(i, i + 1);
        }
        track.refold();
        Ok(())
    }

    /// Collapse the selected commands into one of their shared kind. The
    /// merged command sits at the lowest selected index with the summed
    /// counts, no name, and the last selected command's destination. Fewer
    /// than two selected commands is a no-op.
    pub fn merge_commands(&mut self, rank: &str, indices: &[usize]) -> DrillResult<()> {
        let track = self.track_mut(rank)?;
        let picked = checked_indices(indices, track.commands.len())?;
        if picked.len() < 2 {
            return Ok(());
        }
        let kind = track.commands[picked[0]].kind;
        if picked.iter().any(|&i| track.commands[i].kind != kind) {
            return Err(DrillError::HeterogeneousMerge);
        }
        let merged = Command {
            kind,
            counts: picked.iter().map(|&i| track.commands[i].counts).sum(),
            name: None,
            destination: track.commands[picked[picked.len() - 1]].destination.clone(),
        };
        for &i in picked.iter().rev() {
            track.commands.remove(i);
        }
        track.commands.insert(picked[0], merged);
        track.refold();
        Ok(())
    }

    /// Split the command at `index` into two of the same kind with counts
    /// `at_count` and the remainder. Neither half keeps the name.
    pub fn split_command(&mut self, rank: &str, index: usize, at_count: u32) -> DrillResult<()> {
        let track = self.track_mut(rank)?;
        let len = track.commands.len();
        let Some(command) = track.commands.get(index) else {
            return Err(DrillError::index(index, len));
        };
        if at_count == 0 || at_count >= command.counts {
            return Err(DrillError::InvalidSplit {
                at_count,
                counts: command.counts,
            });
        }
        let first = Command {
            kind: command.kind,
            counts: at_count,
            name: None,
            destination: command.destination.clone(),
        };
        let second = Command {
            kind: command.kind,
            counts: command.counts - at_count,
            name: None,
            destination: command.destination.clone(),
        };
        track.commands.splice(index..=index, [first, second]);
        track.refold();
        Ok(())
    }

    /// Read-only partial fold: the rank's position `counts` into the move.
    /// Fractional counts render partial progress of the active command;
    /// counts beyond the timeline clamp to the end position.
    pub fn position_at(&self, rank: &str, counts: f64) -> DrillResult<RankPosition> {
        let track = self.track(rank)?;
        let mut pos = track.start;
        let mut remaining = counts.max(0.0);
        for command in &track.commands {
            let span = f64::from(command.counts);
            if remaining < span {
                return Ok(command.apply(&pos, remaining));
            }
            pos = command.apply(&pos, span);
            remaining -= span;
        }
        Ok(pos)
    }

    pub fn validate(&self) -> DrillResult<()> {
        if self.total_counts == 0 {
            return Err(DrillError::validation("move total_counts must be at least 1"));
        }
        for (rank, track) in &self.ranks {
            track.start.validate()?;
            track.end.validate()?;
            let mut used: u64 = 0;
            for command in &track.commands {
                command.validate()?;
                used += u64::from(command.counts);
            }
            if used > u64::from(self.total_counts) {
                return Err(DrillError::validation(format!(
                    "rank '{rank}' uses {used} of the move's {} counts",
                    self.total_counts
                )));
            }
            if track.end != track.folded_end() {
                return Err(DrillError::validation(format!(
                    "rank '{rank}' has a stale end position; it must equal the command fold"
                )));
            }
        }
        Ok(())
    }
}

/// Bounds-check a selection and return it sorted and deduplicated.
fn checked_indices(indices: &[usize], len: usize) -> DrillResult<Vec<usize>> {
    let mut picked = indices.to_vec();
    picked.sort_unstable();
    picked.dedup();
    if let Some(&last) = picked.last()
        && last >= len
    {
        return Err(DrillError::index(last, len));
    }
    Ok(picked)
}
