//! Inner kernels.
//!
//! These compute the product of one block pair. The threaded multipliers
//! schedule them and decide how partial sums reach the result matrix.

pub mod scalar_block;
