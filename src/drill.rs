//! The drill document: an ordered run of moves over a fixed rank registry,
//! plus the tempo maps that place counts in real time.

use std::collections::{BTreeMap, BTreeSet};

use crate::command::Command;
use crate::error::{DrillError, DrillResult};
use crate::position::RankPosition;
use crate::reconcile::{Consolidated, consolidate};
use crate::timeline::{Move, RankTrack};

pub const DEFAULT_TEMPO_BPM: u32 = 120;
pub const DEFAULT_COUNTS_PER_MEASURE: u32 = 4;

/// A complete drill.
///
/// Every move carries a track for every registered rank, and adjacent moves
/// chain: a rank starts each move exactly where the previous move left it.
/// All editing goes through methods that re-propagate positions forward, so
/// the chaining invariant holds after every call that returns `Ok`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Drill {
    pub title: String,
    pub moves: Vec<Move>,
    pub ranks: BTreeSet<String>,
    /// Measure (numbered from 1) to beats per minute.
    pub tempo_changes: BTreeMap<u32, u32>,
    /// Measure (numbered from 1) to counts per measure.
    pub counts_changes: BTreeMap<u32, u32>,
}

impl Drill {
    /// A drill with one empty opening move and no ranks. The opening move
    /// obeys the same rule as [`Drill::add_move`]: at least 1 count.
    pub fn new(title: impl Into<String>, opening_counts: u32) -> DrillResult<Self> {
        if opening_counts == 0 {
            return Err(DrillError::validation("a move needs at least 1 count"));
        }
        Ok(Self {
            title: title.into(),
            moves: vec![Move::new(opening_counts)],
            ranks: BTreeSet::new(),
            tempo_changes: BTreeMap::new(),
            counts_changes: BTreeMap::new(),
        })
    }

    fn check_move(&self, index: usize) -> DrillResult<()> {
        if index >= self.moves.len() {
            return Err(DrillError::index(index, self.moves.len()));
        }
        Ok(())
    }

    pub fn total_counts(&self) -> u64 {
        self.moves.iter().map(|m| u64::from(m.total_counts)).sum()
    }

    /// Register a rank standing at `position` for the whole drill.
    pub fn add_rank(&mut self, name: impl Into<String>, position: RankPosition) -> DrillResult<()> {
        let name = name.into();
        position.validate()?;
        if self.ranks.contains(&name) {
            return Err(DrillError::DuplicateRank(name));
        }
        for mov in &mut self.moves {
            mov.ranks
                .insert(name.clone(), RankTrack::at_rest(position));
        }
        self.ranks.insert(name);
        Ok(())
    }

    pub fn delete_rank(&mut self, name: &str) -> DrillResult<()> {
        if !self.ranks.remove(name) {
            return Err(DrillError::unknown_rank(name));
        }
        for mov in &mut self.moves {
            mov.ranks.remove(name);
        }
        Ok(())
    }

    /// Insert an empty move of `counts` counts at `at_index`. Every rank
    /// starts it where the predecessor ends (at index 0, where the old first
    /// move started).
    pub fn add_move(&mut self, counts: u32, at_index: usize) -> DrillResult<()> {
        if counts == 0 {
            return Err(DrillError::validation("a move needs at least 1 count"));
        }
        if at_index > self.moves.len() {
            return Err(DrillError::index(at_index, self.moves.len()));
        }
        let mut mov = Move::new(counts);
        for rank in &self.ranks {
            let position = if at_index == 0 {
                self.moves[0].track(rank)?.start
            } else {
                self.moves[at_index - 1].track(rank)?.end
            };
            mov.ranks.insert(rank.clone(), RankTrack::at_rest(position));
        }
        self.moves.insert(at_index, mov);
        self.propagate_all_from(at_index);
        Ok(())
    }

    /// Delete a move. The last remaining move cannot be deleted.
    pub fn delete_move(&mut self, index: usize) -> DrillResult<()> {
        self.check_move(index)?;
        if self.moves.len() == 1 {
            return Err(DrillError::validation("a drill keeps at least one move"));
        }
        self.moves.remove(index);
        self.propagate_all_from(index.saturating_sub(1));
        Ok(())
    }

    // Single-rank command edits: validate the move index, delegate, then
    // ripple that rank's positions forward.

    pub fn add_command(&mut self, move_index: usize, rank: &str, command: Command) -> DrillResult<()> {
        self.check_move(move_index)?;
        self.moves[move_index].add_command(rank, command)?;
        self.propagate(rank, move_index);
        Ok(())
    }

    pub fn remove_commands(
        &mut self,
        move_index: usize,
        rank: &str,
        indices: &[usize],
    ) -> DrillResult<()> {
        self.check_move(move_index)?;
        self.moves[move_index].remove_commands(rank, indices)?;
        self.propagate(rank, move_index);
        Ok(())
    }

    pub fn rename_command(
        &mut self,
        move_index: usize,
        rank: &str,
        index: usize,
        name: Option<String>,
    ) -> DrillResult<()> {
        self.check_move(move_index)?;
        self.moves[move_index].rename_command(rank, index, name)?;
        self.propagate(rank, move_index);
        Ok(())
    }

    pub fn move_up(&mut self, move_index: usize, rank: &str, indices: &[usize]) -> DrillResult<()> {
        self.check_move(move_index)?;
        self.moves[move_index].move_up(rank, indices)?;
        self.propagate(rank, move_index);
        Ok(())
    }

    pub fn move_down(
        &mut self,
        move_index: usize,
        rank: &str,
        indices: &[usize],
    ) -> DrillResult<()> {
        self.check_move(move_index)?;
        self.moves[move_index].move_down(rank, indices)?;
        self.propagate(rank, move_index);
        Ok(())
    }

    pub fn merge_commands(
        &mut self,
        move_index: usize,
        rank: &str,
        indices: &[usize],
    ) -> DrillResult<()> {
        self.check_move(move_index)?;
        self.moves[move_index].merge_commands(rank, indices)?;
        self.propagate(rank, move_index);
        Ok(())
    }

    pub fn split_command(
        &mut self,
        move_index: usize,
        rank: &str,
        index: usize,
        at_count: u32,
    ) -> DrillResult<()> {
        self.check_move(move_index)?;
        self.moves[move_index].split_command(rank, index, at_count)?;
        self.propagate(rank, move_index);
        Ok(())
    }

    // Group edits operate on the consolidated view of the selected ranks.
    // Each one translates consolidated indices to per-rank indices, applies
    // every per-rank edit to a staged copy of the move, and commits only if
    // all of them succeed.

    pub fn group_add_command(
        &mut self,
        move_index: usize,
        ranks: &BTreeSet<String>,
        command: Command,
    ) -> DrillResult<()> {
        self.check_move(move_index)?;
        let mut staged = self.moves[move_index].clone();
        for rank in ranks {
            staged.add_command(rank, command.clone())?;
        }
        self.moves[move_index] = staged;
        self.propagate_ranks(ranks, move_index);
        Ok(())
    }

    pub fn group_remove_commands(
        &mut self,
        move_index: usize,
        ranks: &BTreeSet<String>,
        indices: &[usize],
    ) -> DrillResult<()> {
        self.check_move(move_index)?;
        let cons = consolidate(&self.moves[move_index], ranks)?;
        let per_rank = per_rank_indices(&cons, indices)?;
        let mut staged = self.moves[move_index].clone();
        for (rank, picked) in &per_rank {
            staged.remove_commands(rank, picked)?;
        }
        self.moves[move_index] = staged;
        self.propagate_ranks(ranks, move_index);
        Ok(())
    }

    pub fn group_rename_command(
        &mut self,
        move_index: usize,
        ranks: &BTreeSet<String>,
        index: usize,
        name: Option<String>,
    ) -> DrillResult<()> {
        self.check_move(move_index)?;
        let cons = consolidate(&self.moves[move_index], ranks)?;
        let sources = cons.source_indices(index)?;
        let mut staged = self.moves[move_index].clone();
        for (rank, &source) in sources {
            staged.rename_command(rank, source, name.clone())?;
        }
        self.moves[move_index] = staged;
        self.propagate_ranks(ranks, move_index);
        Ok(())
    }

    pub fn group_move_up(
        &mut self,
        move_index: usize,
        ranks: &BTreeSet<String>,
        indices: &[usize],
    ) -> DrillResult<()> {
        self.check_move(move_index)?;
        let cons = consolidate(&self.moves[move_index], ranks)?;
        let per_rank = per_rank_indices(&cons, indices)?;
        // Whole-group no-op if any rank's selection already sits first.
        if per_rank.values().any(|picked| picked.contains(&0)) {
            return Ok(());
        }
        let mut staged = self.moves[move_index].clone();
        for (rank, picked) in &per_rank {
            staged.move_up(rank, picked)?;
        }
        self.moves[move_index] = staged;
        self.propagate_ranks(ranks, move_index);
        Ok(())
    }

    pub fn group_move_down(
        &mut self,
        move_index: usize,
        ranks: &BTreeSet<String>,
        indices: &[usize],
    ) -> DrillResult<()> {
        self.check_move(move_index)?;
        let cons = consolidate(&self.moves[move_index], ranks)?;
        let per_rank = per_rank_indices(&cons, indices)?;
        for (rank, picked) in &per_rank {
            let len = self.moves[move_index].track(rank)?.commands.len();
            if picked.iter().any(|&i| i + 1 == len) {
                return Ok(());
            }
        }
        let mut staged = self.moves[move_index].clone();
        for (rank, picked) in &per_rank {
            staged.move_down(rank, picked)?;
        }
        self.moves[move_index] = staged;
        self.propagate_ranks(ranks, move_index);
        Ok(())
    }

    pub fn group_merge_commands(
        &mut self,
        move_index: usize,
        ranks: &BTreeSet<String>,
        indices: &[usize],
    ) -> DrillResult<()> {
        self.check_move(move_index)?;
        let cons = consolidate(&self.moves[move_index], ranks)?;
        let per_rank = per_rank_indices(&cons, indices)?;
        let mut staged = self.moves[move_index].clone();
        for (rank, picked) in &per_rank {
            staged.merge_commands(rank, picked)?;
        }
        self.moves[move_index] = staged;
        self.propagate_ranks(ranks, move_index);
        Ok(())
    }

    pub fn group_split_command(
        &mut self,
        move_index: usize,
        ranks: &BTreeSet<String>,
        index: usize,
        at_count: u32,
    ) -> DrillResult<()> {
        self.check_move(move_index)?;
        let cons = consolidate(&self.moves[move_index], ranks)?;
        let sources = cons.source_indices(index)?;
        let mut staged = self.moves[move_index].clone();
        for (rank, &source) in sources {
            staged.split_command(rank, source, at_count)?;
        }
        self.moves[move_index] = staged;
        self.propagate_ranks(ranks, move_index);
        Ok(())
    }

    /// Ripple `rank`'s chained positions forward: every move after `from`
    /// starts where its predecessor ended, with its end refolded. Strictly
    /// forward, never backward, no early stop.
    ///
    /// Panics when `rank` has no track in a later move. Every `Drill` method
    /// keeps the rank registry and each move's keys aligned, so a gap can
    /// only come from a document mutated outside the API.
    #[tracing::instrument(skip(self))]
    pub fn propagate(&mut self, rank: &str, from: usize) {
        for i in (from + 1)..self.moves.len() {
            let handoff = self.moves[i - 1]
                .ranks
                .get(rank)
                .expect("rank track present in every move")
                .end;
            let track = self.moves[i]
                .ranks
                .get_mut(rank)
                .expect("rank track present in every move");
            track.start = handoff;
            track.refold();
        }
    }

    fn propagate_ranks(&mut self, ranks: &BTreeSet<String>, from: usize) {
        for rank in ranks {
            self.propagate(rank, from);
        }
    }

    fn propagate_all_from(&mut self, from: usize) {
        let ranks: Vec<String> = self.ranks.iter().cloned().collect();
        for rank in &ranks {
            self.propagate(rank, from);
        }
    }

    /// A rank's position `counts` counts into the move at `move_index`.
    #[tracing::instrument(skip(self))]
    pub fn position_at_partial_count(
        &self,
        move_index: usize,
        rank: &str,
        counts: f64,
    ) -> DrillResult<RankPosition> {
        self.check_move(move_index)?;
        self.moves[move_index].position_at(rank, counts)
    }

    /// Counts per measure in effect at `measure` (numbered from 1).
    pub fn counts_per_measure_at(&self, measure: u32) -> u32 {
        self.counts_changes
            .range(..=measure)
            .next_back()
            .map(|(_, &counts)| counts)
            .unwrap_or(DEFAULT_COUNTS_PER_MEASURE)
    }

    /// Beats per minute in effect at `measure` (numbered from 1).
    pub fn tempo_at_measure(&self, measure: u32) -> u32 {
        self.tempo_changes
            .range(..=measure)
            .next_back()
            .map(|(_, &bpm)| bpm)
            .unwrap_or(DEFAULT_TEMPO_BPM)
    }

    /// The measure containing the zero-based count `count`.
    pub fn measure_of_count(&self, count: u64) -> u32 {
        let mut measure: u32 = 1;
        let mut remaining = count;
        loop {
            let span = u64::from(self.counts_per_measure_at(measure).max(1));
            if remaining < span {
                return measure;
            }
            remaining -= span;
            measure += 1;
        }
    }

    pub fn tempo_at_count(&self, count: u64) -> u32 {
        self.tempo_at_measure(self.measure_of_count(count))
    }

    /// Wall-clock seconds one count occupies at `count`.
    pub fn seconds_per_count_at(&self, count: u64) -> f64 {
        60.0 / f64::from(self.tempo_at_count(count).max(1))
    }

    pub fn validate(&self) -> DrillResult<()> {
        if self.moves.is_empty() {
            return Err(DrillError::validation("a drill keeps at least one move"));
        }
        for (&measure, &bpm) in &self.tempo_changes {
            if measure == 0 || bpm == 0 {
                return Err(DrillError::validation(
                    "tempo changes need a measure and bpm of at least 1",
                ));
            }
        }
        for (&measure, &counts) in &self.counts_changes {
            if measure == 0 || counts == 0 {
                return Err(DrillError::validation(
                    "counts-per-measure changes need a measure and counts of at least 1",
                ));
            }
        }
        for (i, mov) in self.moves.iter().enumerate() {
            if !mov.ranks.keys().eq(self.ranks.iter()) {
                return Err(DrillError::validation(format!(
                    "move {i} tracks do not match the rank registry"
                )));
            }
            mov.validate()?;
        }
        for (i, pair) in self.moves.windows(2).enumerate() {
            for (rank, track) in &pair[1].ranks {
                let Some(prev) = pair[0].ranks.get(rank) else {
                    continue;
                };
                if track.start != prev.end {
                    return Err(DrillError::validation(format!(
                        "rank '{rank}' does not chain from move {i} into move {}",
                        i + 1
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Translate consolidated indices into per-rank command indices.
fn per_rank_indices(
    cons: &Consolidated,
    indices: &[usize],
) -> DrillResult<BTreeMap<String, Vec<usize>>> {
    let mut per_rank: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for &index in indices {
        for (rank, &source) in cons.source_indices(index)? {
            per_rank.entry(rank.clone()).or_default().push(source);
        }
    }
    Ok(per_rank)
}
