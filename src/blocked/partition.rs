//! Splitting a square matrix into a grid of equally sized blocks.

use crate::error::{BlockMulError, Result};
use crate::matrix::Matrix;
use std::ops::{Index, Range};
use tracing::trace;

/// Top-left cell of one block, in the source matrix's coordinates.
///
/// Both offsets are multiples of the partition's block size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockIndex {
    pub start_row: usize,
    pub start_col: usize,
}

impl BlockIndex {
    pub fn new(start_row: usize, start_col: usize) -> Self {
        BlockIndex {
            start_row,
            start_col,
        }
    }

    /// Source rows covered by this block.
    pub fn rows(&self, block_size: usize) -> Range<usize> {
        self.start_row..self.start_row + block_size
    }

    /// Source columns covered by this block.
    pub fn cols(&self, block_size: usize) -> Range<usize> {
        self.start_col..self.start_col + block_size
    }
}

/// Grid of block offsets derived from one matrix and one block size.
///
/// Only offsets are stored, never cell values: the matrix the partition was
/// built from has to be passed alongside it when multiplying. The grid is
/// `blocks_per_side × blocks_per_side`, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockPartition {
    block_size: usize,
    blocks_per_side: usize,
    blocks: Vec<BlockIndex>,
}

impl BlockPartition {
    /// Partitions `matrix` into `block_size × block_size` blocks.
    ///
    /// Walks the matrix in strides of `block_size` along both axes and
    /// records each block's offset at grid position
    /// `(row / block_size, col / block_size)`.
    ///
    /// # Errors
    ///
    /// - [`BlockMulError::InvalidArgument`] if `block_size` or the matrix
    ///   dimension is zero.
    /// - [`BlockMulError::InvalidBlockSize`] if `block_size` does not divide
    ///   the dimension. Trailing rows and columns are never dropped silently.
    ///
    /// # Example
    ///
    /// ```
    /// use blockmul::{BlockIndex, BlockPartition, Matrix};
    ///
    /// let m = Matrix::zeros(6);
    /// let p = BlockPartition::build(&m, 3).unwrap();
    ///
    /// assert_eq!(p.blocks_per_side(), 2);
    /// assert_eq!(p[(1, 0)], BlockIndex::new(3, 0));
    /// ```
    pub fn build(matrix: &Matrix, block_size: usize) -> Result<Self> {
        Self::for_dimension(matrix.dim(), block_size)
    }

    /// Same as [`build`](Self::build), from a dimension alone.
    pub fn for_dimension(dimension: usize, block_size: usize) -> Result<Self> {
        if block_size == 0 {
            return Err(BlockMulError::InvalidArgument {
                what: "block size",
                value: block_size,
            });
        }
        if dimension == 0 {
            return Err(BlockMulError::InvalidArgument {
                what: "matrix dimension",
                value: dimension,
            });
        }
        if dimension % block_size != 0 {
            return Err(BlockMulError::InvalidBlockSize {
                dimension,
                block_size,
            });
        }

        let blocks_per_side = dimension / block_size;
        let mut blocks = vec![BlockIndex::new(0, 0); blocks_per_side * blocks_per_side];

        for mat_row in (0..dimension).step_by(block_size) {
            for mat_col in (0..dimension).step_by(block_size) {
                let (block_row, block_col) = (mat_row / block_size, mat_col / block_size);
                blocks[block_row * blocks_per_side + block_col] = BlockIndex::new(mat_row, mat_col);
            }
        }

        trace!(dimension, block_size, blocks_per_side, "built block partition");

        Ok(BlockPartition {
            block_size,
            blocks_per_side,
            blocks,
        })
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of blocks along one side of the grid.
    pub fn blocks_per_side(&self) -> usize {
        self.blocks_per_side
    }

    /// Side length of the matrix this partition covers.
    pub fn dimension(&self) -> usize {
        self.block_size * self.blocks_per_side
    }

    pub fn get(&self, block_row: usize, block_col: usize) -> Option<&BlockIndex> {
        if block_row < self.blocks_per_side && block_col < self.blocks_per_side {
            Some(&self.blocks[block_row * self.blocks_per_side + block_col])
        } else {
            None
        }
    }

    /// All blocks with their grid position, row by row.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &BlockIndex)> + '_ {
        let side = self.blocks_per_side;
        self.blocks
            .iter()
            .enumerate()
            .map(move |(i, block)| ((i / side, i % side), block))
    }
}

impl Index<(usize, usize)> for BlockPartition {
    type Output = BlockIndex;

    fn index(&self, (block_row, block_col): (usize, usize)) -> &BlockIndex {
        match self.get(block_row, block_col) {
            Some(block) => block,
            None => panic!(
                "block ({}, {}) out of range for {}x{} block grid",
                block_row, block_col, self.blocks_per_side, self.blocks_per_side
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets_are_block_multiples() {
        let p = BlockPartition::for_dimension(12, 4).unwrap();
        assert_eq!(p.blocks_per_side(), 3);
        assert_eq!(p.dimension(), 12);

        for ((br, bc), block) in p.iter() {
            assert_eq!(block.start_row, br * 4);
            assert_eq!(block.start_col, bc * 4);
            assert!(block.start_row + 4 <= 12);
            assert!(block.start_col + 4 <= 12);
        }
    }

    #[test]
    fn test_single_block() {
        let p = BlockPartition::build(&Matrix::zeros(5), 5).unwrap();
        assert_eq!(p.blocks_per_side(), 1);
        assert_eq!(p[(0, 0)], BlockIndex::new(0, 0));
    }

    #[test]
    fn test_block_size_one() {
        let p = BlockPartition::build(&Matrix::zeros(3), 1).unwrap();
        assert_eq!(p.blocks_per_side(), 3);
        assert_eq!(p[(2, 1)], BlockIndex::new(2, 1));
    }

    #[test]
    fn test_rejects_non_divisible() {
        let err = BlockPartition::build(&Matrix::zeros(10), 3).unwrap_err();
        assert_eq!(
            err,
            BlockMulError::InvalidBlockSize {
                dimension: 10,
                block_size: 3
            }
        );
    }

    #[test]
    fn test_rejects_zero_block_size() {
        let err = BlockPartition::build(&Matrix::zeros(4), 0).unwrap_err();
        assert!(matches!(err, BlockMulError::InvalidArgument { what: "block size", .. }));
    }

    #[test]
    fn test_rejects_empty_matrix() {
        let err = BlockPartition::build(&Matrix::zeros(0), 2).unwrap_err();
        assert!(matches!(err, BlockMulError::InvalidArgument { what: "matrix dimension", .. }));
    }

    #[test]
    fn test_block_larger_than_matrix() {
        assert!(BlockPartition::build(&Matrix::zeros(2), 4).is_err());
    }

    #[test]
    fn test_get_out_of_range() {
        let p = BlockPartition::for_dimension(4, 2).unwrap();
        assert!(p.get(1, 1).is_some());
        assert!(p.get(2, 0).is_none());
        assert!(p.get(0, 2).is_none());
    }

    #[test]
    #[should_panic(expected = "block (0, 2) out of range for 2x2 block grid")]
    fn test_index_block_col_past_end_panics() {
        let p = BlockPartition::for_dimension(4, 2).unwrap();
        let _block = p[(0, 2)];
    }

    #[test]
    fn test_block_ranges() {
        let block = BlockIndex::new(4, 8);
        assert_eq!(block.rows(4), 4..8);
        assert_eq!(block.cols(4), 8..12);
    }
}
