use crate::error::{Error, Result};
use ndarray::Array2;

/// A 2D square water patient with a circular planning target volume (PTV)
/// centered at the origin.
///
/// The grid is `size` voxels per side with `size` odd, so a center voxel
/// exists and the coordinate axes run over the integers
/// `-size/2 ..= size/2`. Geometry is immutable once built.
#[derive(Debug, Clone)]
pub struct Grid {
    size: usize,
    tumor_radius: f64,
    attenuation_coefficient: f64,
}

impl Grid {
    /// Create a grid after validating its parameters.
    ///
    /// Errors:
    /// - `Error::Configuration` if `size` is zero or even, if `tumor_radius`
    ///   is non-positive or larger than half the grid extent, or if
    ///   `attenuation_coefficient` is non-positive. All reals must be finite.
    pub fn new(size: usize, tumor_radius: f64, attenuation_coefficient: f64) -> Result<Self> {
        if size == 0 || size % 2 == 0 {
            return Err(Error::Configuration(format!(
                "grid size must be odd and positive, got {size}"
            )));
        }
        if !tumor_radius.is_finite() || tumor_radius <= 0.0 {
            return Err(Error::Configuration(
                "tumor_radius must be finite and > 0".into(),
            ));
        }
        let half_extent = (size / 2) as f64;
        if tumor_radius > half_extent {
            return Err(Error::Configuration(format!(
                "tumor_radius {tumor_radius} exceeds half the grid extent {half_extent}"
            )));
        }
        if !attenuation_coefficient.is_finite() || attenuation_coefficient <= 0.0 {
            return Err(Error::Configuration(
                "attenuation_coefficient must be finite and > 0".into(),
            ));
        }
        Ok(Self {
            size,
            tumor_radius,
            attenuation_coefficient,
        })
    }

    /// Number of voxels per side.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Radius of the circular PTV.
    #[inline]
    pub fn tumor_radius(&self) -> f64 {
        self.tumor_radius
    }

    /// Linear attenuation coefficient per unit depth.
    #[inline]
    pub fn attenuation_coefficient(&self) -> f64 {
        self.attenuation_coefficient
    }

    /// Half the grid extent: the largest coordinate on either axis.
    #[inline]
    pub fn half_extent(&self) -> f64 {
        (self.size / 2) as f64
    }

    /// Centered coordinate of voxel index `i` along either axis.
    ///
    /// Index 0 maps to `-size/2`, the center voxel to 0, and `size - 1` to
    /// `+size/2`. Alignment with beamlets is done on indices, never by
    /// comparing these floats.
    #[inline]
    pub fn coordinate(&self, i: usize) -> f64 {
        i as f64 - (self.size / 2) as f64
    }

    /// The full centered coordinate axis (identical for x and y).
    pub fn coordinates(&self) -> Vec<f64> {
        (0..self.size).map(|i| self.coordinate(i)).collect()
    }

    /// Binary tissue classification: 1 for tumor, 0 for healthy tissue.
    ///
    /// A voxel is tumor when its center lies strictly inside the PTV circle,
    /// `sqrt(x^2 + y^2) < tumor_radius`. Pure function of `size` and
    /// `tumor_radius`.
    pub fn tissue_mask(&self) -> Array2<u8> {
        let mut mask = Array2::<u8>::zeros((self.size, self.size));
        for row in 0..self.size {
            for col in 0..self.size {
                let x = self.coordinate(col);
                let y = self.coordinate(row);
                if (x * x + y * y).sqrt() < self.tumor_radius {
                    mask[[row, col]] = 1;
                }
            }
        }
        mask
    }
}
