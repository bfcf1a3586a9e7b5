use dosesim::core::{Beam, BeamAngle, Grid};
use dosesim::error::{Error, Result};

const ANGLES: [BeamAngle; 4] = [
    BeamAngle::Deg0,
    BeamAngle::Deg90,
    BeamAngle::Deg180,
    BeamAngle::Deg270,
];

/// The sensitivity matrix is (beamlet_count, size^2) at every angle,
/// whether the beam is narrower or wider than the patient.
#[test]
fn sensitivity_shape_invariant() -> Result<()> {
    let grid = Grid::new(7, 2.0, 0.1)?;
    for &angle in &ANGLES {
        for &count in &[3usize, 7, 11] {
            let beam = Beam::with_beamlet_count(&grid, angle, count)?;
            assert_eq!(
                beam.sensitivity_matrix().dim(),
                (count, 49),
                "wrong sensitivity shape for angle {} with {count} beamlets",
                angle.degrees()
            );
        }
    }
    Ok(())
}

/// Every aligned beamlet's contribution strictly decreases with penetration
/// depth when the attenuation coefficient is positive.
#[test]
fn exponential_decay_is_strictly_monotonic() -> Result<()> {
    let grid = Grid::new(7, 2.0, 0.3)?;
    let beam = Beam::new(&grid, BeamAngle::Deg0)?;
    let s = beam.sensitivity_matrix();
    for b in 0..beam.beamlet_count() {
        let col = beam
            .aligned_column(b)
            .expect("every beamlet aligns when count == size");
        for depth in 0..6 {
            let shallow = s[[b, depth * 7 + col]];
            let deep = s[[b, (depth + 1) * 7 + col]];
            assert!(
                shallow > deep,
                "beamlet {b} dose must strictly decrease with depth: {shallow} vs {deep}"
            );
        }
    }
    Ok(())
}

/// The 90-degree sensitivity map equals the 0-degree map rotated one
/// counter-clockwise quarter-turn, bit for bit.
#[test]
fn quarter_turn_consistency() -> Result<()> {
    let grid = Grid::new(5, 1.5, 0.1)?;
    let n = 5usize;
    let s0 = Beam::new(&grid, BeamAngle::Deg0)?;
    let s90 = Beam::new(&grid, BeamAngle::Deg90)?;
    let (a, b) = (s0.sensitivity_matrix(), s90.sensitivity_matrix());
    for beamlet in 0..5 {
        for row in 0..n {
            for col in 0..n {
                // rot90 CCW: rotated[row, col] == unrotated[col, n-1-row].
                let rotated = b[[beamlet, row * n + col]];
                let unrotated = a[[beamlet, col * n + (n - 1 - row)]];
                assert_eq!(
                    rotated, unrotated,
                    "90-degree map differs from quarter-turned 0-degree map \
                     at beamlet {beamlet}, voxel ({row}, {col})"
                );
            }
        }
    }
    Ok(())
}

/// Opposing angles are two quarter-turns apart: the 180-degree map is the
/// 0-degree map flipped on both axes.
#[test]
fn opposing_angles_are_mirrored() -> Result<()> {
    let grid = Grid::new(5, 1.5, 0.1)?;
    let n = 5usize;
    let s0 = Beam::new(&grid, BeamAngle::Deg0)?;
    let s180 = Beam::new(&grid, BeamAngle::Deg180)?;
    let (a, b) = (s0.sensitivity_matrix(), s180.sensitivity_matrix());
    for beamlet in 0..5 {
        for row in 0..n {
            for col in 0..n {
                assert_eq!(
                    b[[beamlet, row * n + col]],
                    a[[beamlet, (n - 1 - row) * n + (n - 1 - col)]],
                    "180-degree map must be the double-flipped 0-degree map"
                );
            }
        }
    }
    Ok(())
}

/// Oblique angles are rejected at the boundary, never approximated.
#[test]
fn oblique_angle_rejected() {
    let err = BeamAngle::from_degrees(45).unwrap_err();
    assert!(
        matches!(err, Error::Configuration(_)),
        "45 degrees must be a configuration error, got {err}"
    );
    assert!(BeamAngle::from_degrees(30).is_err());
    assert!(BeamAngle::from_degrees(360).is_err());
}

/// A short weight vector is rejected outright rather than truncated.
#[test]
fn short_weight_vector_rejected() -> Result<()> {
    let grid = Grid::new(5, 1.5, 0.1)?;
    let mut beam = Beam::new(&grid, BeamAngle::Deg0)?;
    let err = beam.set_weights(&[1.0, 1.0, 1.0, 1.0]).unwrap_err();
    assert!(
        matches!(err, Error::ShapeMismatch(_)),
        "4 weights on a 5-beamlet beam must be a shape mismatch, got {err}"
    );
    Ok(())
}

/// Beamlets that miss the patient have all-zero sensitivity rows, as in the
/// original 51-beamlet plan over a 31-voxel patient.
#[test]
fn off_grid_beamlets_contribute_nothing() -> Result<()> {
    let grid = Grid::new(5, 1.5, 0.1)?;
    let beam = Beam::with_beamlet_count(&grid, BeamAngle::Deg0, 9)?;
    let s = beam.sensitivity_matrix();
    for b in [0usize, 1, 7, 8] {
        assert!(beam.aligned_column(b).is_none(), "beamlet {b} misses the grid");
        for v in 0..25 {
            assert_eq!(s[[b, v]], 0.0, "off-grid beamlet {b} must deposit nothing");
        }
    }
    for b in 2..=6 {
        assert!(
            s.row(b).iter().any(|&v| v > 0.0),
            "on-grid beamlet {b} must deposit dose"
        );
    }
    Ok(())
}
