use super::Matrix;
use crate::error::{BlockMulError, Result};

/// Serial matrix multiplication using i-j-k loop order.
///
/// Plain triple loop over two [`Matrix`] operands, one full dot product per
/// output cell. Walking B down a column jumps a whole row per step, so this
/// gets slow quickly as `n` grows.
///
/// It is the reference the blocked multiplier is checked and timed against.
///
/// Arithmetic wraps on overflow, same as the blocked multiplier, so the
/// two always agree cell for cell.
///
/// # Errors
///
/// Returns [`BlockMulError::ShapeMismatch`] if `a` and `b` differ in size.
pub fn multiply_serial(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    if a.dim() != b.dim() {
        return Err(BlockMulError::ShapeMismatch {
            what: "operand dimension",
            expected: a.dim(),
            found: b.dim(),
        });
    }

    let n = a.dim();
    let (a, b) = (a.as_slice(), b.as_slice());
    let mut c = Matrix::zeros(n);
    let out = c.as_mut_slice();

    for i in 0..n {
        for j in 0..n {
            let mut sum = 0i64;
            for p in 0..n {
                sum = sum.wrapping_add(a[i * n + p].wrapping_mul(b[p * n + j]));
            }
            out[i * n + j] = sum;
        }
    }

    Ok(c)
}
