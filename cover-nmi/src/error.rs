use std::fmt;
use thiserror::Error;

/// Which of the two covers an error or statistic refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverSide {
    A,
    B,
}

impl fmt::Display for CoverSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverSide::A => write!(f, "cover A"),
            CoverSide::B => write!(f, "cover B"),
        }
    }
}

/// Errors raised while evaluating NMI between two covers.
///
/// Ids in the variants are the original node/community ids of the
/// input tables, never internal dense indices.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NmiError {
    #[error("invalid cover row {row} (node {node_id}, community {community_id}): {reason}")]
    InvalidCover {
        row: usize,
        node_id: i64,
        community_id: i64,
        reason: String,
    },

    #[error("{side} has no community left after removing empty/universal ones")]
    EmptyCover { side: CoverSide },

    #[error("zero marginal entropy for community {community_id} of {side}")]
    ZeroMarginal { side: CoverSide, community_id: u64 },

    #[error("evaluation cancelled")]
    Cancelled,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type NmiResult<T> = Result<T, NmiError>;
