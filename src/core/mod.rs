//! Core dose-calculation data structures for the 2D radiotherapy model.
//!
//! Everything here is synchronous, deterministic numeric array processing:
//! a patient [`Grid`], cardinal-angle [`Beam`]s with precomputed sensitivity
//! matrices, and a [`DoseCalculator`] that superposes their weighted
//! contributions.

pub mod beam;
pub mod dose;
pub mod grid;
pub mod optimize;

pub use beam::{Beam, BeamAngle};
pub use dose::DoseCalculator;
pub use grid::Grid;
pub use optimize::{DoseTarget, LinearProgramOptimizer, WeightOptimizer};
