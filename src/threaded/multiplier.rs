//! Blocked concurrent multiplier.

use super::atomic_cells::multiply_atomic_cells;
use super::per_block::multiply_per_block;
use crate::blocked::BlockPartition;
use crate::error::{BlockMulError, Result};
use crate::matrix::Matrix;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, debug_span};

/// How partial block products reach the result matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Accumulation {
    /// One task per output block; contraction blocks run in sequence inside
    /// the task. No shared writes.
    #[default]
    PerOutputBlock,
    /// One task per `(block_row, block_col, block_k)` triple; cells are
    /// accumulated with atomic adds.
    AtomicCells,
}

impl Accumulation {
    /// Number of units of work scheduled for a grid of `blocks_per_side`.
    pub fn unit_count(self, blocks_per_side: usize) -> usize {
        match self {
            Accumulation::PerOutputBlock => blocks_per_side * blocks_per_side,
            Accumulation::AtomicCells => blocks_per_side * blocks_per_side * blocks_per_side,
        }
    }
}

impl fmt::Display for Accumulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accumulation::PerOutputBlock => f.write_str("per-block"),
            Accumulation::AtomicCells => f.write_str("atomic"),
        }
    }
}

impl FromStr for Accumulation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "per-block" => Ok(Accumulation::PerOutputBlock),
            "atomic" => Ok(Accumulation::AtomicCells),
            other => Err(format!("unknown accumulation '{}', expected 'per-block' or 'atomic'", other)),
        }
    }
}

/// Settings for a [`BlockMultiplier`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockMultiplierConfig {
    /// Worker threads. `None` uses rayon's global pool.
    pub threads: Option<usize>,
    pub accumulation: Accumulation,
}

impl BlockMultiplierConfig {
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_accumulation(mut self, accumulation: Accumulation) -> Self {
        self.accumulation = accumulation;
        self
    }
}

/// Multiplies two partitioned matrices on a bounded worker pool.
///
/// The pool is built once and reused for every call, so units of work never
/// outnumber the configured threads no matter how many blocks there are.
///
/// # Example
///
/// ```
/// use blockmul::{Accumulation, BlockMultiplier, BlockMultiplierConfig, BlockPartition, Matrix};
///
/// let a = Matrix::from_fn(4, |r, c| (r + c) as i64);
/// let b = Matrix::identity(4);
/// let pa = BlockPartition::build(&a, 2).unwrap();
/// let pb = BlockPartition::build(&b, 2).unwrap();
///
/// let config = BlockMultiplierConfig::default()
///     .with_threads(2)
///     .with_accumulation(Accumulation::AtomicCells);
/// let mul = BlockMultiplier::new(config).unwrap();
///
/// assert_eq!(mul.multiply(&pa, &pb, &a, &b).unwrap(), a);
/// ```
#[derive(Debug)]
pub struct BlockMultiplier {
    config: BlockMultiplierConfig,
    pool: Option<rayon::ThreadPool>,
}

impl BlockMultiplier {
    /// # Errors
    ///
    /// [`BlockMulError::InvalidArgument`] for zero threads,
    /// [`BlockMulError::ThreadPool`] if the pool cannot be started.
    pub fn new(config: BlockMultiplierConfig) -> Result<Self> {
        let pool = match config.threads {
            Some(0) => {
                return Err(BlockMulError::InvalidArgument {
                    what: "thread count",
                    value: 0,
                });
            }
            Some(threads) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("blockmul-{}", i))
                    .build()?,
            ),
            None => None,
        };

        Ok(BlockMultiplier { config, pool })
    }

    pub fn config(&self) -> &BlockMultiplierConfig {
        &self.config
    }

    /// Computes `a * b` block by block.
    ///
    /// `pa` and `pb` must be partitions of `a` and `b` with the same block
    /// size. Blocks until every unit of work has finished.
    ///
    /// # Errors
    ///
    /// [`BlockMulError::ShapeMismatch`] if the partitions disagree on block
    /// size or grid size, or a matrix is not the size its partition covers.
    pub fn multiply(
        &self,
        pa: &BlockPartition,
        pb: &BlockPartition,
        a: &Matrix,
        b: &Matrix,
    ) -> Result<Matrix> {
        check_operands(pa, pb, a, b)?;

        let accumulation = self.config.accumulation;
        let span = debug_span!(
            "multiply_blocked",
            dimension = pa.dimension(),
            block_size = pa.block_size(),
            %accumulation
        );
        let _guard = span.enter();

        debug!(
            units = accumulation.unit_count(pa.blocks_per_side()),
            threads = self.current_threads(),
            "scheduling block products"
        );

        let run = || match accumulation {
            Accumulation::PerOutputBlock => multiply_per_block(pa, pb, a, b),
            Accumulation::AtomicCells => multiply_atomic_cells(pa, pb, a, b),
        };

        let c = match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        };

        debug!("all block products joined");
        Ok(c)
    }

    fn current_threads(&self) -> usize {
        match &self.pool {
            Some(pool) => pool.current_num_threads(),
            None => rayon::current_num_threads(),
        }
    }
}

fn check_operands(pa: &BlockPartition, pb: &BlockPartition, a: &Matrix, b: &Matrix) -> Result<()> {
    if pa.block_size() != pb.block_size() {
        return Err(BlockMulError::ShapeMismatch {
            what: "block size",
            expected: pa.block_size(),
            found: pb.block_size(),
        });
    }
    if pa.blocks_per_side() != pb.blocks_per_side() {
        return Err(BlockMulError::ShapeMismatch {
            what: "blocks per side",
            expected: pa.blocks_per_side(),
            found: pb.blocks_per_side(),
        });
    }
    for m in [a, b] {
        if m.dim() != pa.dimension() {
            return Err(BlockMulError::ShapeMismatch {
                what: "matrix dimension",
                expected: pa.dimension(),
                found: m.dim(),
            });
        }
    }
    Ok(())
}
