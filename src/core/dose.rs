use crate::core::{Beam, Grid};
use crate::error::{Error, Result};
use ndarray::Array2;

/// Aggregates the weighted dose of every beamlet of every attached beam into
/// one dose field over the patient grid.
///
/// Owns exactly one [`Grid`] and the [`Beam`]s built against it; beams built
/// against a different grid size are rejected at construction. The dose
/// array is pure linear superposition, so no optimization or normalization
/// happens here.
#[derive(Debug)]
pub struct DoseCalculator {
    grid: Grid,
    beams: Vec<Beam>,
    dose: Array2<f64>,
}

impl DoseCalculator {
    /// Attach `beams` to `grid`.
    ///
    /// Errors:
    /// - `Error::ShapeMismatch` if any beam was built against a different
    ///   grid size, or its sensitivity matrix does not have `size^2` columns.
    pub fn new(grid: Grid, beams: Vec<Beam>) -> Result<Self> {
        for (k, beam) in beams.iter().enumerate() {
            check_beam_shape(&grid, beam, k)?;
        }
        let size = grid.size();
        let dose = Array2::<f64>::zeros((size, size));
        Ok(Self { grid, beams, dose })
    }

    /// Attach one more beam, subject to the same shape checks as [`new`].
    ///
    /// [`new`]: Self::new
    pub fn attach_beam(&mut self, beam: Beam) -> Result<()> {
        check_beam_shape(&self.grid, &beam, self.beams.len())?;
        self.beams.push(beam);
        Ok(())
    }

    /// The patient grid.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The attached beams, in attachment order.
    #[inline]
    pub fn beams(&self) -> &[Beam] {
        &self.beams
    }

    /// The dose field from the most recent [`calculate_dose`] call
    /// (all zeros before the first call).
    ///
    /// [`calculate_dose`]: Self::calculate_dose
    #[inline]
    pub fn dose_array(&self) -> &Array2<f64> {
        &self.dose
    }

    /// Update the weights of the beam at `beam_index`.
    ///
    /// Errors:
    /// - `Error::Configuration` if the index is out of range.
    /// - Propagates the beam's own weight validation.
    pub fn set_beamlet_weights(&mut self, beam_index: usize, weights: &[f64]) -> Result<()> {
        let n = self.beams.len();
        let beam = self.beams.get_mut(beam_index).ok_or_else(|| {
            Error::Configuration(format!("beam index {beam_index} out of range for {n} beams"))
        })?;
        beam.set_weights(weights)
    }

    /// Recompute the dose field as the weighted sum of every beamlet's
    /// sensitivity row, reshaped onto the grid.
    ///
    /// The array is zeroed first, so repeated calls with unchanged weights
    /// return identical results rather than accumulating.
    pub fn calculate_dose(&mut self) -> &Array2<f64> {
        let size = self.grid.size();
        self.dose.fill(0.0);
        for beam in &self.beams {
            let sensitivity = beam.sensitivity_matrix();
            for (i, &weight) in beam.weights().iter().enumerate() {
                for row in 0..size {
                    for col in 0..size {
                        self.dose[[row, col]] += weight * sensitivity[[i, row * size + col]];
                    }
                }
            }
        }
        &self.dose
    }

    /// Dose-volume histogram over the PTV and healthy tissue.
    ///
    /// Extension point only: the underlying model has never defined one, so
    /// invoking this is an error rather than a silent no-op.
    pub fn dose_volume_histogram(&self) -> Result<Array2<f64>> {
        Err(Error::NotImplemented("dose-volume histogram"))
    }
}

fn check_beam_shape(grid: &Grid, beam: &Beam, index: usize) -> Result<()> {
    let size = grid.size();
    let voxels = size * size;
    if beam.grid_size() != size {
        return Err(Error::ShapeMismatch(format!(
            "beam {index} was built against a {}-voxel grid, expected {size}",
            beam.grid_size()
        )));
    }
    if beam.sensitivity_matrix().ncols() != voxels {
        return Err(Error::ShapeMismatch(format!(
            "beam {index} sensitivity matrix has {} columns, expected {voxels}",
            beam.sensitivity_matrix().ncols()
        )));
    }
    Ok(())
}
