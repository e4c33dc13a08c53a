//! Scalar block × block kernel.

use crate::blocked::BlockIndex;

/// Multiplies one block of A by one block of B.
///
/// `a` and `b` are the full row-major operands of side `n`; `block_a` and
/// `block_b` pick the `block_size × block_size` sub-blocks to multiply. For
/// every local output cell `(i, j)` the partial dot product over the block's
/// `k` range is handed to `emit(i, j, sum)`. The caller decides where that
/// partial sum is accumulated.
///
/// Arithmetic wraps on overflow.
#[inline]
pub fn block_product<F>(
    a: &[i64],
    b: &[i64],
    n: usize,
    block_a: &BlockIndex,
    block_b: &BlockIndex,
    block_size: usize,
    mut emit: F,
) where
    F: FnMut(usize, usize, i64),
{
    debug_assert!(block_a.start_row + block_size <= n && block_a.start_col + block_size <= n);
    debug_assert!(block_b.start_row + block_size <= n && block_b.start_col + block_size <= n);

    for i in 0..block_size {
        let a_row = &a[(block_a.start_row + i) * n + block_a.start_col..][..block_size];
        for j in 0..block_size {
            let b_col = block_b.start_col + j;
            let mut sum = 0i64;
            for (k, &a_val) in a_row.iter().enumerate() {
                let b_val = b[(block_b.start_row + k) * n + b_col];
                sum = sum.wrapping_add(a_val.wrapping_mul(b_val));
            }
            emit(i, j, sum);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_off_diagonal_blocks() {
        // 4×4 operands, multiply A's top-right block by B's bottom-left block.
        let a: Vec<i64> = (0..16).collect();
        let b: Vec<i64> = (0..16).map(|v| v * 2).collect();

        let mut tile = [0i64; 4];
        block_product(
            &a,
            &b,
            4,
            &BlockIndex::new(0, 2),
            &BlockIndex::new(2, 0),
            2,
            |i, j, s| tile[i * 2 + j] += s,
        );

        // A block: [[2, 3], [6, 7]], B block: [[16, 18], [24, 26]]
        assert_eq!(tile, [2 * 16 + 3 * 24, 2 * 18 + 3 * 26, 6 * 16 + 7 * 24, 6 * 18 + 7 * 26]);
    }

    #[test]
    fn test_emits_every_cell_once() {
        let a = vec![1i64; 9];
        let b = vec![1i64; 9];
        let mut calls = Vec::new();

        block_product(&a, &b, 3, &BlockIndex::new(0, 0), &BlockIndex::new(0, 0), 3, |i, j, s| {
            calls.push((i, j, s))
        });

        assert_eq!(calls.len(), 9);
        assert!(calls.iter().all(|&(_, _, s)| s == 3));
    }
}
