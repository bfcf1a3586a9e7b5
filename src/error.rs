use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the dose-calculation core.
///
/// All failures are precondition violations detected at construction or
/// update time; the engine never attempts partial computation after one.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid construction parameter: even/non-positive grid size, tumor
    /// radius outside the grid, disallowed beam angle, wrong beamlet parity,
    /// or non-finite numeric input.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A vector or matrix dimension does not match the grid/beamlet layout
    /// it is being combined with.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Functionality that is an explicit extension point (weight optimizer,
    /// dose-volume histogram) and has no implementation yet.
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),
}
