//! Square integer matrix multiplication, serial vs blocked-concurrent.
//!
//! I wrote this to measure how much a blocked, multi-threaded multiply
//! actually buys over the textbook triple loop, and at which block sizes.
//! The blocked path splits both operands into equal square blocks, computes
//! every block-pair product as an independent unit of work on a thread pool,
//! and sums the partial products into the right output region.
//!
//! ## Usage
//!
//! ```
//! use blockmul::{multiply_blocked, multiply_serial, Matrix};
//!
//! let a = Matrix::from_fn(8, |r, c| (r * 8 + c) as i64);
//! let b = Matrix::from_fn(8, |r, c| (r as i64) - (c as i64));
//!
//! let serial = multiply_serial(&a, &b).unwrap();
//! let blocked = multiply_blocked(&a, &b, 2).unwrap();
//!
//! assert_eq!(serial, blocked);
//! ```
//!
//! For control over the thread count or the accumulation strategy, build
//! the partitions yourself and use a [`BlockMultiplier`]:
//!
//! ```
//! use blockmul::{BlockMultiplier, BlockMultiplierConfig, BlockPartition, Matrix};
//!
//! let a = Matrix::identity(6);
//! let pa = BlockPartition::build(&a, 3).unwrap();
//!
//! let mul = BlockMultiplier::new(BlockMultiplierConfig::default().with_threads(2)).unwrap();
//! assert_eq!(mul.multiply(&pa, &pa, &a, &a).unwrap(), a);
//! ```
//!
//! ## What's inside
//!
//! - `matrix`: the square `Matrix` type and the serial i-j-k baseline
//! - `blocked`: block offsets and partition construction
//! - `kernels`: the scalar block × block kernel
//! - `threaded`: the concurrent multiplier on a bounded rayon pool

pub mod blocked;
pub mod error;
pub mod kernels;
pub mod matrix;
pub mod threaded;

pub use blocked::{BlockIndex, BlockPartition};
pub use error::{BlockMulError, Result};
pub use matrix::Matrix;
pub use matrix::naive_ijk::multiply_serial;
pub use threaded::{Accumulation, BlockMultiplier, BlockMultiplierConfig};

/// Blocked multiply: partitions both operands with `block_size` and runs the
/// default [`BlockMultiplier`] on rayon's global pool.
///
/// # Errors
///
/// Anything [`BlockPartition::build`] or [`BlockMultiplier::multiply`]
/// reports: zero or non-dividing block size, empty or mismatched operands.
pub fn multiply_blocked(a: &Matrix, b: &Matrix, block_size: usize) -> Result<Matrix> {
    let pa = BlockPartition::build(a, block_size)?;
    let pb = BlockPartition::build(b, block_size)?;
    BlockMultiplier::new(BlockMultiplierConfig::default())?.multiply(&pa, &pb, a, b)
}
