//! One unit of work per block triple, accumulating with atomics.

use crate::blocked::BlockPartition;
use crate::kernels::scalar_block::block_product;
use crate::matrix::Matrix;
use rayon::prelude::*;
use std::sync::atomic::{AtomicI64, Ordering};

/// Blocked multiply with one task per `(block_row, block_col, block_k)`.
///
/// Tasks that share `(block_row, block_col)` write the same cells, so every
/// cell is an `AtomicI64` and each update is a single `fetch_add`. Relaxed
/// ordering is enough: nothing reads the cells until the join, which
/// publishes all writes.
pub(crate) fn multiply_atomic_cells(
    pa: &BlockPartition,
    pb: &BlockPartition,
    a: &Matrix,
    b: &Matrix,
) -> Matrix {
    let bs = pa.block_size();
    let side = pa.blocks_per_side();
    let n = pa.dimension();
    let (a_data, b_data) = (a.as_slice(), b.as_slice());

    let cells: Vec<AtomicI64> = (0..n * n).map(|_| AtomicI64::new(0)).collect();

    (0..side * side * side).into_par_iter().for_each(|unit| {
        let block_row = unit / (side * side);
        let block_col = (unit / side) % side;
        let block_k = unit % side;

        let row0 = block_row * bs;
        let col0 = block_col * bs;

        block_product(
            a_data,
            b_data,
            n,
            &pa[(block_row, block_k)],
            &pb[(block_k, block_col)],
            bs,
            |i, j, sum| {
                cells[(row0 + i) * n + col0 + j].fetch_add(sum, Ordering::Relaxed);
            },
        );
    });

    let data = cells.into_iter().map(AtomicI64::into_inner).collect();
    Matrix::from_raw(n, data)
}
