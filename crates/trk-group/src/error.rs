use thiserror::Error;

use trk_core::Rank;

#[derive(Debug, Error)]
pub enum GroupError {
    #[error("rank {rank} is outside a group of size {size}")]
    InvalidRank { rank: Rank, size: usize },

    #[error("a group needs at least one rank")]
    EmptyGroup,

    #[error("rank {0} has left the group")]
    Disconnected(Rank),
}

pub type GroupResult<T> = Result<T, GroupError>;
