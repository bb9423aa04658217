use crate::{
    command::Command,
    drill::Drill,
    error::{DrillError, DrillResult},
    position::RankPosition,
};

pub struct DrillBuilder {
    drill: Drill,
}

impl DrillBuilder {
    pub fn new(title: impl Into<String>, opening_counts: u32) -> DrillResult<Self> {
        Ok(Self {
            drill: Drill::new(title, opening_counts)?,
        })
    }

    pub fn rank(mut self, name: impl Into<String>, position: RankPosition) -> DrillResult<Self> {
        self.drill.add_rank(name, position)?;
        Ok(self)
    }

    pub fn tempo_change(mut self, measure: u32, bpm: u32) -> DrillResult<Self> {
        if measure == 0 || bpm == 0 {
            return Err(DrillError::validation(
                "tempo changes need a measure and bpm of at least 1",
            ));
        }
        self.drill.tempo_changes.insert(measure, bpm);
        Ok(self)
    }

    pub fn counts_change(mut self, measure: u32, counts: u32) -> DrillResult<Self> {
        if measure == 0 || counts == 0 {
            return Err(DrillError::validation(
                "counts-per-measure changes need a measure and counts of at least 1",
            ));
        }
        self.drill.counts_changes.insert(measure, counts);
        Ok(self)
    }

    /// Open a new move after the current one; later `command` calls land in it.
    pub fn next_move(mut self, counts: u32) -> DrillResult<Self> {
        let at = self.drill.moves.len();
        self.drill.add_move(counts, at)?;
        Ok(self)
    }

    pub fn comment(mut self, text: impl Into<String>) -> Self {
        if let Some(mov) = self.drill.moves.last_mut() {
            mov.comment = text.into();
        }
        self
    }

    pub fn command(mut self, rank: &str, command: Command) -> DrillResult<Self> {
        let current = self.drill.moves.len() - 1;
        self.drill.add_command(current, rank, command)?;
        Ok(self)
    }

    pub fn build(self) -> DrillResult<Drill> {
        self.drill.validate()?;
        Ok(self.drill)
    }
}
