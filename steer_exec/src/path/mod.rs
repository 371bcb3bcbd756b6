//! # Path
//!
//! This module defines the path model used by the reference generator. A path
//! is a sequence of segments, each of which is either a straight line, a
//! circular arc of fixed radius, or a spin on the spot. Each segment carries
//! the reference pose it starts from along with the speed profile data needed
//! to traverse it.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// Internal
use util::params;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A path defining the desired trajectory of the robot.
#[derive(Clone, Serialize, Deserialize, Debug)]
pub struct Path {
    pub segs: Vec<PathSegment>,
}

/// The state of the reference at a given distance along a segment.
#[derive(Debug, Copy, Clone, Serialize)]
pub struct SegmentState {
    /// Reference position in the world frame
    pub position_m: Vector2<f64>,

    /// Reference heading in radians
    pub psi_rad: f64,

    /// Curvature radius of the reference at this point.
    ///
    /// Straight lines have an infinite radius, spins on the spot a radius of
    /// zero. Signed, positive radii curve to the left.
    pub rho_m: f64,
}

// -----------------------------------------------------------------------------------------------
// ENUMS
// -----------------------------------------------------------------------------------------------

/// A single segment of a path.
#[derive(Debug, Copy, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PathSegment {
    /// A straight line starting at the reference point and running along the
    /// tangent direction.
    Line {
        /// X coordinate of the segment start point in the world frame
        x_ref_m: f64,

        /// Y coordinate of the segment start point in the world frame
        y_ref_m: f64,

        /// Heading of the segment in radians
        tangent_rad: f64,

        /// Length of the segment in meters
        length_m: f64,

        /// Cruise speed for the segment in meters/second
        v_des_ms: f64,

        /// Acceleration limit used to reach the cruise speed
        accel_mss: f64,
    },

    /// A circular arc of fixed radius, starting at the reference point with
    /// the given tangent.
    Arc {
        /// X coordinate of the segment start point in the world frame
        x_ref_m: f64,

        /// Y coordinate of the segment start point in the world frame
        y_ref_m: f64,

        /// Heading of the arc tangent at the start point in radians
        tangent_rad: f64,

        /// Signed radius of the arc in meters.
        ///
        /// Follows the right hand rule about the robot's Z+ (upwards) axis,
        /// so that a positive radius curves to the left and a negative radius
        /// to the right.
        radius_m: f64,

        /// Arc length of the segment in meters
        length_m: f64,

        /// Cruise speed for the segment in meters/second
        v_des_ms: f64,

        /// Acceleration limit used to reach the cruise speed
        accel_mss: f64,
    },

    /// A turn on the spot at the reference point.
    SpinInPlace {
        /// X coordinate of the spin point in the world frame
        x_ref_m: f64,

        /// Y coordinate of the spin point in the world frame
        y_ref_m: f64,

        /// Heading at the start of the spin in radians
        tangent_rad: f64,

        /// Signed heading change of the spin in radians, positive
        /// anticlockwise
        sweep_rad: f64,

        /// Rate at which the reference heading is swept in radians/second
        rate_rads: f64,
    },
}

/// Potential errors that can occur when building a path.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("Could not load the path file: {0}")]
    LoadError(#[from] params::LoadError),

    /// The path file parsed but contains no segments.
    #[error("The path contains no segments")]
    EmptyPath,

    /// The path contains invalid segments. The contained vector provides the
    /// indices of the segments which were invalid.
    #[error("The path contains invalid segments at index(s) {0:?}")]
    InvalidSegments(Vec<usize>),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Path {
    /// Load a path from a TOML file.
    ///
    /// The file path is relative to the "otter_sw/paths" directory. The
    /// loaded path is validated before being returned.
    pub fn load(path_file: &str) -> Result<Self, PathError> {
        let mut file_path = util::host::get_otter_sw_root()
            .map_err(|_| PathError::LoadError(params::LoadError::SwRootNotSet))?;
        file_path.push("paths");
        file_path.push(path_file);

        let path: Path = params::load_file(&file_path)?;

        path.validate()?;

        Ok(path)
    }

    /// Check that the path contains at least one segment and that every
    /// segment is valid.
    pub fn validate(&self) -> Result<(), PathError> {
        if self.segs.is_empty() {
            return Err(PathError::EmptyPath);
        }

        let invalid_seg_indexes: Vec<usize> = self
            .segs
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_valid())
            .map(|(i, _)| i)
            .collect();

        if !invalid_seg_indexes.is_empty() {
            return Err(PathError::InvalidSegments(invalid_seg_indexes));
        }

        Ok(())
    }

    /// Get the total traverse length of the path in meters.
    ///
    /// Spin segments contribute no translation and therefore no length.
    pub fn total_length_m(&self) -> f64 {
        self.segs
            .iter()
            .map(|s| match s {
                PathSegment::Line { length_m, .. } => *length_m,
                PathSegment::Arc { length_m, .. } => *length_m,
                PathSegment::SpinInPlace { .. } => 0.0,
            })
            .sum()
    }
}

impl PathSegment {
    /// Check the segment data is usable.
    ///
    /// All fields must be finite, traverse lengths and rates must be
    /// positive, speeds non-negative, and arc radii non-zero.
    pub fn is_valid(&self) -> bool {
        match *self {
            PathSegment::Line {
                x_ref_m,
                y_ref_m,
                tangent_rad,
                length_m,
                v_des_ms,
                accel_mss,
            } => {
                [x_ref_m, y_ref_m, tangent_rad, length_m, v_des_ms, accel_mss]
                    .iter()
                    .all(|v| v.is_finite())
                    && length_m > 0.0
                    && v_des_ms >= 0.0
                    && accel_mss > 0.0
            }
            PathSegment::Arc {
                x_ref_m,
                y_ref_m,
                tangent_rad,
                radius_m,
                length_m,
                v_des_ms,
                accel_mss,
            } => {
                [
                    x_ref_m, y_ref_m, tangent_rad, radius_m, length_m, v_des_ms, accel_mss,
                ]
                .iter()
                .all(|v| v.is_finite())
                    && radius_m != 0.0
                    && length_m > 0.0
                    && v_des_ms >= 0.0
                    && accel_mss > 0.0
            }
            PathSegment::SpinInPlace {
                x_ref_m,
                y_ref_m,
                tangent_rad,
                sweep_rad,
                rate_rads,
            } => {
                [x_ref_m, y_ref_m, tangent_rad, sweep_rad, rate_rads]
                    .iter()
                    .all(|v| v.is_finite())
                    && sweep_rad != 0.0
                    && rate_rads > 0.0
            }
        }
    }

    /// Get the length of the segment's advance coordinate.
    ///
    /// For lines and arcs this is the traverse length in meters, for spins
    /// the magnitude of the sweep in radians.
    pub fn param_length(&self) -> f64 {
        match *self {
            PathSegment::Line { length_m, .. } => length_m,
            PathSegment::Arc { length_m, .. } => length_m,
            PathSegment::SpinInPlace { sweep_rad, .. } => sweep_rad.abs(),
        }
    }

    /// Get the reference state at the given advance coordinate along the
    /// segment.
    ///
    /// The advance coordinate is not range-checked, values beyond
    /// `param_length` extrapolate the segment.
    pub fn state_at(&self, s: f64) -> SegmentState {
        match *self {
            PathSegment::Line {
                x_ref_m,
                y_ref_m,
                tangent_rad,
                ..
            } => SegmentState {
                position_m: Vector2::new(
                    x_ref_m + s * tangent_rad.cos(),
                    y_ref_m + s * tangent_rad.sin(),
                ),
                psi_rad: tangent_rad,
                rho_m: f64::INFINITY,
            },
            PathSegment::Arc {
                x_ref_m,
                y_ref_m,
                tangent_rad,
                radius_m,
                ..
            } => {
                // Integrating the unit tangent around the circle from the
                // start point gives the position in terms of the swept
                // heading, valid for either sign of radius
                let psi_rad = tangent_rad + s / radius_m;

                SegmentState {
                    position_m: Vector2::new(
                        x_ref_m + radius_m * (psi_rad.sin() - tangent_rad.sin()),
                        y_ref_m + radius_m * (tangent_rad.cos() - psi_rad.cos()),
                    ),
                    psi_rad,
                    rho_m: radius_m,
                }
            }
            PathSegment::SpinInPlace {
                x_ref_m,
                y_ref_m,
                tangent_rad,
                sweep_rad,
                ..
            } => SegmentState {
                position_m: Vector2::new(x_ref_m, y_ref_m),
                psi_rad: tangent_rad + s * sweep_rad.signum(),
                rho_m: 0.0,
            },
        }
    }

    /// Get the reference state at the end of the segment.
    pub fn end_state(&self) -> SegmentState {
        self.state_at(self.param_length())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
