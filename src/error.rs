//! Error types shared by partitioning and both multipliers.

use thiserror::Error;

/// Everything that can go wrong before a multiplication starts.
///
/// All checks happen up front; once the units of work are scheduled the
/// operation runs to completion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BlockMulError {
    #[error("invalid {what}: {value}")]
    InvalidArgument { what: &'static str, value: usize },

    #[error("block size {block_size} does not evenly divide matrix dimension {dimension}")]
    InvalidBlockSize { dimension: usize, block_size: usize },

    #[error("{what} mismatch: expected {expected}, found {found}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("matrix is not square: row {row} has {found} cells, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}

pub type Result<T> = std::result::Result<T, BlockMulError>;

impl From<rayon::ThreadPoolBuildError> for BlockMulError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        BlockMulError::ThreadPool(err.to_string())
    }
}
