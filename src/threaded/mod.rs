//! Concurrent blocked multiplication.
//!
//! [`BlockMultiplier`] fans block products out over a rayon pool and joins
//! before returning. Two accumulation strategies are available:
//! - `per_block`: one task per output block, no shared writes (default)
//! - `atomic_cells`: one task per block triple, atomic per-cell adds

mod atomic_cells;
mod multiplier;
mod per_block;

pub use multiplier::{Accumulation, BlockMultiplier, BlockMultiplierConfig};
