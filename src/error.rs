pub type DrillResult<T> = Result<T, DrillError>;

/// Failure taxonomy for drill editing. Every edit operation validates fully
/// before mutating, so a returned error means nothing was applied.
#[derive(thiserror::Error, Debug)]
pub enum DrillError {
    #[error("unknown rank '{0}'")]
    UnknownRank(String),

    #[error("rank '{0}' already exists")]
    DuplicateRank(String),

    #[error("command counts exceed the move budget: {used} used + {requested} requested > {budget}")]
    BudgetExceeded {
        used: u32,
        requested: u32,
        budget: u32,
    },

    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("cannot merge commands of different kinds")]
    HeterogeneousMerge,

    #[error("edit targets a conflict placeholder, not a real command")]
    ConflictTarget,

    #[error("invalid split point {at_count} for a command of {counts} counts")]
    InvalidSplit { at_count: u32, counts: u32 },

    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DrillError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn index(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    pub fn unknown_rank(name: impl Into<String>) -> Self {
        Self::UnknownRank(name.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            DrillError::unknown_rank("A")
                .to_string()
                .contains("unknown rank")
        );
        assert!(
            DrillError::index(4, 2)
                .to_string()
                .contains("out of range")
        );
        assert!(
            DrillError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(
            DrillError::InvalidSplit {
                at_count: 12,
                counts: 8
            }
            .to_string()
            .contains("split point 12")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = DrillError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
