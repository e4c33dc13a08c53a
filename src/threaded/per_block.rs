//! One unit of work per output block.

use crate::blocked::BlockPartition;
use crate::kernels::scalar_block::block_product;
use crate::matrix::Matrix;
use rayon::prelude::*;

/// Blocked multiply with one task per `(block_row, block_col)`.
///
/// Each task walks the contraction blocks sequentially and sums into its own
/// tile, so no two tasks touch the same memory. Tiles are copied into the
/// result after the join.
pub(crate) fn multiply_per_block(
    pa: &BlockPartition,
    pb: &BlockPartition,
    a: &Matrix,
    b: &Matrix,
) -> Matrix {
    let bs = pa.block_size();
    let side = pa.blocks_per_side();
    let n = pa.dimension();
    let (a_data, b_data) = (a.as_slice(), b.as_slice());

    let tiles: Vec<Vec<i64>> = (0..side * side)
        .into_par_iter()
        .map(|idx| {
            let (block_row, block_col) = (idx / side, idx % side);
            let mut tile = vec![0i64; bs * bs];

            for block_k in 0..side {
                block_product(
                    a_data,
                    b_data,
                    n,
                    &pa[(block_row, block_k)],
                    &pb[(block_k, block_col)],
                    bs,
                    |i, j, sum| {
                        let cell = &mut tile[i * bs + j];
                        *cell = cell.wrapping_add(sum);
                    },
                );
            }
            tile
        })
        .collect();

    let mut c = Matrix::zeros(n);
    let out = c.as_mut_slice();
    for (idx, tile) in tiles.iter().enumerate() {
        let (row0, col0) = ((idx / side) * bs, (idx % side) * bs);
        for (i, tile_row) in tile.chunks_exact(bs).enumerate() {
            let start = (row0 + i) * n + col0;
            out[start..start + bs].copy_from_slice(tile_row);
        }
    }
    c
}
