use crate::core::Grid;
use crate::error::{Error, Result};
use ndarray::Array2;

/// Travel direction of a beam. Only the four cardinal angles are supported:
/// any other angle must be rejected at the boundary, which is what keeps the
/// angle handling a pure index permutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeamAngle {
    /// Travelling in +y: enters at row 0 and penetrates downward.
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl BeamAngle {
    /// Parse an angle in degrees.
    ///
    /// Errors:
    /// - `Error::Configuration` for anything outside {0, 90, 180, 270}.
    pub fn from_degrees(degrees: u32) -> Result<Self> {
        match degrees {
            0 => Ok(Self::Deg0),
            90 => Ok(Self::Deg90),
            180 => Ok(Self::Deg180),
            270 => Ok(Self::Deg270),
            other => Err(Error::Configuration(format!(
                "beam angle must be one of 0, 90, 180, 270 degrees, got {other}"
            ))),
        }
    }

    /// The angle in degrees.
    #[inline]
    pub fn degrees(self) -> u32 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Number of counter-clockwise quarter-turns relating this angle's
    /// contribution map to the 0-degree map.
    #[inline]
    pub fn quarter_turns(self) -> usize {
        (self.degrees() / 90) as usize
    }
}

/// Map an index pair of an `n` x `n` matrix through `quarter_turns`
/// counter-clockwise quarter-turns, in closed form.
///
/// One turn sends `(i, j)` to `(n - 1 - j, i)`; repeated turns compose to a
/// direct permutation, so no intermediate rotated arrays are built.
#[inline]
fn rotate_index(quarter_turns: usize, n: usize, i: usize, j: usize) -> (usize, usize) {
    match quarter_turns % 4 {
        0 => (i, j),
        1 => (n - 1 - j, i),
        2 => (n - 1 - i, n - 1 - j),
        _ => (j, n - 1 - i),
    }
}

/// A parallel beam of independently weighted beamlets aimed at a [`Grid`]
/// from one of the four cardinal directions.
///
/// Each beamlet travels in a straight line with no divergence and deposits
/// `exp(-mu * depth)` along the single grid column it is aligned with at the
/// isocenter; off-grid beamlets contribute nothing. The per-beamlet
/// contributions are precomputed at construction into a sensitivity matrix
/// of shape `(beamlet_count, size^2)`; row `b` is beamlet `b`'s unit-weight
/// dose to every row-major-flattened voxel. The matrix depends only on the
/// grid and the angle, never on the weights.
#[derive(Debug, Clone)]
pub struct Beam {
    angle: BeamAngle,
    beamlet_count: usize,
    grid_size: usize,
    beamlet_weights: Vec<f64>,
    sensitivity: Array2<f64>,
}

impl Beam {
    /// Create a beam with one beamlet per grid column at the isocenter
    /// (`beamlet_count == grid.size()`). Weights start at 1.
    pub fn new(grid: &Grid, angle: BeamAngle) -> Result<Self> {
        Self::with_beamlet_count(grid, angle, grid.size())
    }

    /// Create a beam with an explicit beamlet count.
    ///
    /// The count must be odd so the central beamlet passes through the grid
    /// center; counts wider than the grid are fine (the extra beamlets miss
    /// the patient and contribute zero), as are narrower ones.
    ///
    /// Errors:
    /// - `Error::Configuration` if `beamlet_count` is zero or even.
    pub fn with_beamlet_count(grid: &Grid, angle: BeamAngle, beamlet_count: usize) -> Result<Self> {
        if beamlet_count == 0 || beamlet_count % 2 == 0 {
            return Err(Error::Configuration(format!(
                "beamlet count must be odd and positive, got {beamlet_count}"
            )));
        }
        let sensitivity = compute_sensitivity(grid, angle, beamlet_count);
        Ok(Self {
            angle,
            beamlet_count,
            grid_size: grid.size(),
            beamlet_weights: vec![1.0; beamlet_count],
            sensitivity,
        })
    }

    /// Beam travel direction.
    #[inline]
    pub fn angle(&self) -> BeamAngle {
        self.angle
    }

    /// Number of beamlets.
    #[inline]
    pub fn beamlet_count(&self) -> usize {
        self.beamlet_count
    }

    /// Side length of the grid this beam was built against.
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Current beamlet weights.
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.beamlet_weights
    }

    /// Unit-weight dose contributions, shape `(beamlet_count, grid_size^2)`.
    #[inline]
    pub fn sensitivity_matrix(&self) -> &Array2<f64> {
        &self.sensitivity
    }

    /// Centered entry coordinate of each beamlet at the isocenter plane,
    /// built on the same integer steps as the grid axes.
    pub fn beamlet_coordinates(&self) -> Vec<f64> {
        let half = (self.beamlet_count / 2) as f64;
        (0..self.beamlet_count).map(|b| b as f64 - half).collect()
    }

    /// Replace all beamlet weights.
    ///
    /// Errors:
    /// - `Error::ShapeMismatch` if the length differs from `beamlet_count`
    ///   (a short vector is rejected, never truncated).
    /// - `Error::Configuration` if any weight is NaN or infinite.
    pub fn set_weights(&mut self, new_weights: &[f64]) -> Result<()> {
        if new_weights.len() != self.beamlet_count {
            return Err(Error::ShapeMismatch(format!(
                "expected {} beamlet weights, got {}",
                self.beamlet_count,
                new_weights.len()
            )));
        }
        if !new_weights.iter().all(|w| w.is_finite()) {
            return Err(Error::Configuration(
                "beamlet weights must be finite".into(),
            ));
        }
        self.beamlet_weights.clear();
        self.beamlet_weights.extend_from_slice(new_weights);
        Ok(())
    }

    /// Grid column a beamlet lands on at the isocenter, if it hits the grid
    /// at all. Resolved purely on indices: beamlet `b` sits at centered
    /// offset `b - beamlet_count/2`, and the grid column at that offset is
    /// `offset + grid_size/2`.
    #[inline]
    pub fn aligned_column(&self, beamlet: usize) -> Option<usize> {
        aligned_column(self.beamlet_count, self.grid_size, beamlet)
    }
}

#[inline]
fn aligned_column(beamlet_count: usize, grid_size: usize, beamlet: usize) -> Option<usize> {
    let offset = beamlet as isize - (beamlet_count / 2) as isize;
    let col = offset + (grid_size / 2) as isize;
    if (0..grid_size as isize).contains(&col) {
        Some(col as usize)
    } else {
        None
    }
}

/// Build the `(beamlet_count, size^2)` sensitivity matrix for one angle.
///
/// The 0-degree contribution of an aligned beamlet is `exp(-mu * depth)`
/// down its column, `depth = 0..size-1` from the entry row. Other angles
/// reuse the same values through the quarter-turn index permutation, then
/// everything is flattened row-major.
fn compute_sensitivity(grid: &Grid, angle: BeamAngle, beamlet_count: usize) -> Array2<f64> {
    let size = grid.size();
    let mu = grid.attenuation_coefficient();
    let turns = angle.quarter_turns();

    let mut sensitivity = Array2::<f64>::zeros((beamlet_count, size * size));
    for b in 0..beamlet_count {
        let Some(col) = aligned_column(beamlet_count, size, b) else {
            continue;
        };
        for depth in 0..size {
            let dose = (-mu * depth as f64).exp();
            let (r, c) = rotate_index(turns, size, depth, col);
            sensitivity[[b, r * size + c]] = dose;
        }
    }
    sensitivity
}
