use crate::core::{DoseCalculator, Grid};
use crate::error::{Error, Result};
use ndarray::Array2;

/// Per-voxel dose prescription: the optimizer must keep the delivered dose
/// within `[lower, upper]` at every voxel.
#[derive(Debug, Clone)]
pub struct DoseTarget {
    lower: Array2<f64>,
    upper: Array2<f64>,
}

impl DoseTarget {
    /// Create a target for `grid`, validating both bound arrays.
    ///
    /// Errors:
    /// - `Error::ShapeMismatch` if either array is not `size` x `size`.
    /// - `Error::Configuration` if any bound is non-finite or a lower bound
    ///   exceeds its upper bound.
    pub fn new(grid: &Grid, lower: Array2<f64>, upper: Array2<f64>) -> Result<Self> {
        let shape = (grid.size(), grid.size());
        if lower.dim() != shape || upper.dim() != shape {
            return Err(Error::ShapeMismatch(format!(
                "dose bounds must be {}x{}, got {:?} and {:?}",
                grid.size(),
                grid.size(),
                lower.dim(),
                upper.dim()
            )));
        }
        for (lo, hi) in lower.iter().zip(upper.iter()) {
            if !lo.is_finite() || !hi.is_finite() {
                return Err(Error::Configuration("dose bounds must be finite".into()));
            }
            if lo > hi {
                return Err(Error::Configuration(format!(
                    "lower dose bound {lo} exceeds upper bound {hi}"
                )));
            }
        }
        Ok(Self { lower, upper })
    }

    /// Per-voxel lower bounds.
    #[inline]
    pub fn lower(&self) -> &Array2<f64> {
        &self.lower
    }

    /// Per-voxel upper bounds.
    #[inline]
    pub fn upper(&self) -> &Array2<f64> {
        &self.upper
    }
}

/// Contract for a future fluence optimizer.
///
/// An implementation solves for one non-negative weight vector per attached
/// beam (returned in beam order, each of that beam's beamlet count) such
/// that the superposed dose satisfies `target` while minimizing its
/// objective, via a linear or quadratic program over the beams' sensitivity
/// matrices. The core stays decoupled from whatever objective that is.
pub trait WeightOptimizer {
    /// Solve for beamlet weights against a prescription.
    fn optimize(&self, calculator: &DoseCalculator, target: &DoseTarget)
        -> Result<Vec<Vec<f64>>>;
}

/// Placeholder for the linear-programming optimizer.
///
/// No algorithm exists yet; invoking it reports that honestly instead of
/// returning a meaningless weight vector.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinearProgramOptimizer;

impl WeightOptimizer for LinearProgramOptimizer {
    fn optimize(
        &self,
        _calculator: &DoseCalculator,
        _target: &DoseTarget,
    ) -> Result<Vec<Vec<f64>>> {
        Err(Error::NotImplemented("linear-programming weight optimizer"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_rejects_wrong_shape() -> Result<()> {
        let grid = Grid::new(5, 1.5, 0.1)?;
        let lower = Array2::<f64>::zeros((4, 4));
        let upper = Array2::<f64>::ones((4, 4));
        let err = DoseTarget::new(&grid, lower, upper).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch(_)));
        Ok(())
    }

    #[test]
    fn target_rejects_inverted_bounds() -> Result<()> {
        let grid = Grid::new(5, 1.5, 0.1)?;
        let lower = Array2::<f64>::ones((5, 5));
        let upper = Array2::<f64>::zeros((5, 5));
        let err = DoseTarget::new(&grid, lower, upper).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        Ok(())
    }

    #[test]
    fn optimizer_is_an_explicit_stub() -> Result<()> {
        let grid = Grid::new(5, 1.5, 0.1)?;
        let target = DoseTarget::new(
            &grid,
            Array2::<f64>::zeros((5, 5)),
            Array2::<f64>::ones((5, 5)),
        )?;
        let calc = DoseCalculator::new(grid, Vec::new())?;
        let err = LinearProgramOptimizer.optimize(&calc, &target).unwrap_err();
        assert!(matches!(err, Error::NotImplemented(_)));
        Ok(())
    }
}
