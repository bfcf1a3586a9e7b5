//! dosesim: a 2D radiotherapy dose engine.
//!
//! Models a square water patient with a circular planning target volume,
//! irradiated by parallel beamlets from the four cardinal directions. Each
//! beam precomputes a sensitivity matrix mapping every beamlet to its
//! unit-weight exponential-attenuation dose at every voxel, and a
//! [`core::DoseCalculator`] superposes the weighted contributions into one
//! dose field. Fluence optimization and dose-volume histograms are explicit
//! extension points that report [`error::Error::NotImplemented`].
//!
//! With the `python` feature enabled the engine is exposed to Python as the
//! `dosesim` extension module.

pub mod core;
pub mod error;

#[cfg(feature = "python")]
mod python;
