//! Square matrix type and the serial baseline.
//!
//! The serial multiplier is the ground truth the blocked multiplier is
//! checked and timed against.

pub mod naive_ijk;
pub mod square;

pub use square::Matrix;
