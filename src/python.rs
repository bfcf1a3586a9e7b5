use ndarray::Array2;
use numpy::{IntoPyArray, PyArray2, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::core::{Beam, BeamAngle, DoseCalculator, Grid};

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Python-facing wrapper around the Rust dose-calculation core.
///
/// API:
/// - __new__(size, tumor_radius=7.0, attenuation_coefficient=0.1)
/// - add_beam(angle_degrees, beamlet_count=None)
/// - set_beamlet_weights(beam_index, weights)
/// - calculate_dose() -> np.ndarray, shape (size, size)
/// - get_tissue_mask() -> np.ndarray, shape (size, size)
#[pyclass]
pub struct DosePlan {
    calc: DoseCalculator,
}

#[pymethods]
impl DosePlan {
    /// Build a plan over a square water patient with a circular PTV.
    ///
    /// Parameters
    /// - size: voxels per side (odd int, > 0)
    /// - tumor_radius: PTV radius (float, > 0, within the grid)
    /// - attenuation_coefficient: linear attenuation per unit depth (float, > 0)
    ///
    /// Errors: raises ValueError on invalid parameters.
    #[new]
    #[pyo3(signature = (size, tumor_radius=7.0, attenuation_coefficient=0.1))]
    fn new(size: usize, tumor_radius: f64, attenuation_coefficient: f64) -> PyResult<Self> {
        let grid = Grid::new(size, tumor_radius, attenuation_coefficient).map_err(py_err)?;
        let calc = DoseCalculator::new(grid, Vec::new()).map_err(py_err)?;
        Ok(Self { calc })
    }

    /// Attach a beam at one of the four cardinal angles (degrees).
    ///
    /// `beamlet_count` defaults to the grid size, one beamlet per column at
    /// the isocenter; it must be odd when given.
    #[pyo3(signature = (angle_degrees, beamlet_count=None))]
    fn add_beam(&mut self, angle_degrees: u32, beamlet_count: Option<usize>) -> PyResult<()> {
        let angle = BeamAngle::from_degrees(angle_degrees).map_err(py_err)?;
        let beam = match beamlet_count {
            Some(n) => Beam::with_beamlet_count(self.calc.grid(), angle, n),
            None => Beam::new(self.calc.grid(), angle),
        }
        .map_err(py_err)?;
        self.calc.attach_beam(beam).map_err(py_err)
    }

    /// Number of attached beams.
    fn num_beams(&self) -> usize {
        self.calc.beams().len()
    }

    /// Replace the weights of beam `beam_index` from a 1-D float64 array.
    ///
    /// Errors: raises ValueError on a wrong-length or non-finite vector.
    fn set_beamlet_weights(
        &mut self,
        beam_index: usize,
        weights: PyReadonlyArray1<'_, f64>,
    ) -> PyResult<()> {
        let slice = weights.as_slice().map_err(py_err)?;
        self.calc
            .set_beamlet_weights(beam_index, slice)
            .map_err(py_err)
    }

    /// Recompute and return the dose field as a (size, size) float64 array.
    fn calculate_dose<'py>(&mut self, py: Python<'py>) -> PyResult<Py<PyArray2<f64>>> {
        let dose: Array2<f64> = self.calc.calculate_dose().clone();
        Ok(dose.into_pyarray(py).to_owned().into())
    }

    /// Return the binary tissue mask (1 = tumor, 0 = healthy) as a
    /// (size, size) uint8 array.
    fn get_tissue_mask<'py>(&self, py: Python<'py>) -> PyResult<Py<PyArray2<u8>>> {
        let mask = self.calc.grid().tissue_mask();
        Ok(mask.into_pyarray(py).to_owned().into())
    }
}

/// The dosesim Python module entry point.
#[pymodule]
fn dosesim(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<DosePlan>()?;
    Ok(())
}
