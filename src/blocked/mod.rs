//! Block decomposition of square matrices.
//!
//! A [`BlockPartition`] is a grid of [`BlockIndex`] offsets. It describes
//! where each block sits in the source matrix but holds none of its values,
//! so the multiplier reads cells straight out of the original operands.

pub mod partition;

pub use partition::{BlockIndex, BlockPartition};
