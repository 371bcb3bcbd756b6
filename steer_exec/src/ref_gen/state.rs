//! Reference generation module state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use serde::Serialize;

// Internal
use super::Params;
use crate::path::{Path, PathError, PathSegment, SegmentState};
use util::{module::State, params, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Reference generation module state
#[derive(Default)]
pub struct RefGen {
    params: Params,

    /// The path being walked
    path: Option<Path>,

    /// Index of the segment currently being walked
    seg_index: usize,

    /// Advance coordinate along the current segment. Meters for lines and
    /// arcs, radians for spins.
    seg_advance: f64,

    /// Current speed of the profile along the segment
    speed_ms: f64,

    report: StatusReport,
}

/// Input data to reference generation.
#[derive(Debug, Copy, Clone, Default)]
pub struct InputData {
    /// Time since the previous cycle in seconds
    pub dt_s: f64,
}

/// The desired state emitted each cycle, consumed by steering control.
#[derive(Debug, Copy, Clone, Serialize)]
pub struct RefState {
    /// Desired X position in the world frame
    pub x_des_m: f64,

    /// Desired Y position in the world frame
    pub y_des_m: f64,

    /// Desired heading in radians
    pub psi_des_rad: f64,

    /// Curvature radius of the reference in meters. Infinite for straight
    /// references, zero for spins on the spot (no curvature feed-forward in
    /// either case).
    pub rho_des_m: f64,

    /// Desired speed in meters/second
    pub v_des_ms: f64,
}

/// Status report for reference generation processing.
#[derive(Debug, Copy, Clone, Default, Serialize)]
pub struct StatusReport {
    /// Index of the segment being walked
    pub seg_index: usize,

    /// Advance coordinate along the current segment
    pub seg_advance: f64,

    /// Current speed of the profile
    pub speed_ms: f64,

    /// True when the final segment has been completed
    pub path_complete: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Potential errors that can occur during processing of the module.
#[derive(Debug, thiserror::Error)]
pub enum RefGenError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(params::LoadError),

    /// A path is already loaded. This error occurs when attempting to set a
    /// new path before the current one has finished.
    #[error("Attempted to set a path while one is already loaded")]
    PathAlreadySet,

    /// The path to be loaded failed validation.
    #[error("The path is invalid: {0}")]
    InvalidPath(PathError),

    /// Attempted to generate a reference when no path has been set.
    #[error("No path has been set")]
    NoPath,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for RefState {
    fn default() -> Self {
        RefState {
            x_des_m: 0.0,
            y_des_m: 0.0,
            psi_des_rad: 0.0,
            rho_des_m: f64::INFINITY,
            v_des_ms: 0.0,
        }
    }
}

impl State for RefGen {
    type InitData = &'static str;
    type InitError = RefGenError;

    type InputData = InputData;
    type OutputData = RefState;
    type StatusReport = StatusReport;
    type ProcError = RefGenError;

    /// Initialise the RefGen module.
    ///
    /// Expected init data is the path to the parameter file.
    fn init(&mut self, init_data: Self::InitData, _session: &Session) -> Result<(), RefGenError> {
        self.params = match params::load(init_data) {
            Ok(p) => p,
            Err(e) => return Err(RefGenError::ParamLoadError(e)),
        };

        Ok(())
    }

    /// Perform cyclic processing of reference generation.
    ///
    /// Processing involves:
    ///  1. Advancing the profile along the current segment.
    ///  2. Emitting the reference state at the new advance coordinate.
    ///  3. Moving on to the next segment if the current one is complete.
    fn proc(&mut self, input_data: &Self::InputData) -> Result<(RefState, StatusReport), RefGenError> {
        self.report = StatusReport::default();

        let path = match self.path {
            Some(ref p) => p,
            None => return Err(RefGenError::NoPath),
        };

        // If the path has already been walked to completion hold the end
        // state of the final segment with no demanded motion
        if self.seg_index >= path.segs.len() {
            // Safe to index here as set_path rejects empty paths
            let end = path.segs[path.segs.len() - 1].end_state();

            self.report.seg_index = self.seg_index;
            self.report.path_complete = true;

            return Ok((Self::hold_state(&end), self.report));
        }

        let seg = path.segs[self.seg_index];

        // ---- PROFILE ADVANCE ----

        match seg {
            PathSegment::SpinInPlace { rate_rads, .. } => {
                self.speed_ms = 0.0;
                self.seg_advance += rate_rads * input_data.dt_s;
            }
            PathSegment::Line {
                v_des_ms,
                accel_mss,
                ..
            }
            | PathSegment::Arc {
                v_des_ms,
                accel_mss,
                ..
            } => {
                let target_ms = v_des_ms.max(self.params.min_speed_ms);
                let accel_mss = accel_mss.min(self.params.max_accel_mss);

                // Approach the target speed without exceeding the
                // acceleration limit in either direction
                let dv_ms = (target_ms - self.speed_ms)
                    .clamp(-accel_mss * input_data.dt_s, accel_mss * input_data.dt_s);
                self.speed_ms += dv_ms;

                self.seg_advance += self.speed_ms * input_data.dt_s;
            }
        }

        // ---- REFERENCE EMISSION ----

        // Clamp the emitted state to the segment end so an overshooting
        // advance never extrapolates beyond the segment
        let state = seg.state_at(self.seg_advance.min(seg.param_length()));

        let ref_state = RefState {
            x_des_m: state.position_m[0],
            y_des_m: state.position_m[1],
            psi_des_rad: state.psi_rad,
            rho_des_m: state.rho_m,
            v_des_ms: match seg {
                PathSegment::SpinInPlace { .. } => 0.0,
                _ => self.speed_ms,
            },
        };

        self.report.seg_index = self.seg_index;
        self.report.seg_advance = self.seg_advance;
        self.report.speed_ms = self.speed_ms;

        // ---- SEGMENT MANAGEMENT ----

        if self.seg_advance >= seg.param_length() {
            self.seg_index += 1;
            self.seg_advance = 0.0;

            if self.seg_index >= path.segs.len() {
                debug!("RefGen: final segment complete");
                self.report.path_complete = true;
            } else {
                debug!("RefGen: advancing to segment {}", self.seg_index);

                // Entering a spin resets the translational profile
                if let PathSegment::SpinInPlace { .. } = path.segs[self.seg_index] {
                    self.speed_ms = 0.0;
                }
            }
        }

        Ok((ref_state, self.report))
    }
}

impl RefGen {
    /// Set the path to be walked.
    ///
    /// The path is validated before being accepted. Walking begins on the
    /// next call to `proc`. Setting a new path before the current one has
    /// completed results in an error, the current path must first be cleared
    /// with `clear_path`.
    pub fn set_path(&mut self, path: Path) -> Result<(), RefGenError> {
        if self.path.is_some() {
            return Err(RefGenError::PathAlreadySet);
        }

        path.validate().map_err(RefGenError::InvalidPath)?;

        self.path = Some(path);
        self.seg_index = 0;
        self.seg_advance = 0.0;
        self.speed_ms = 0.0;

        Ok(())
    }

    /// Clear the current path, stopping reference generation.
    pub fn clear_path(&mut self) {
        self.path = None;
        self.seg_index = 0;
        self.seg_advance = 0.0;
        self.speed_ms = 0.0;
    }

    /// Build the hold reference used once the path is complete.
    fn hold_state(end: &SegmentState) -> RefState {
        RefState {
            x_des_m: end.position_m[0],
            y_des_m: end.position_m[1],
            psi_des_rad: end.psi_rad,
            rho_des_m: f64::INFINITY,
            v_des_ms: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    const DT_S: f64 = 0.1;

    fn test_ref_gen() -> RefGen {
        RefGen {
            params: Params {
                min_speed_ms: 0.05,
                max_accel_mss: 1.0,
            },
            ..Default::default()
        }
    }

    fn line_path(length_m: f64, v_des_ms: f64, accel_mss: f64) -> Path {
        Path {
            segs: vec![PathSegment::Line {
                x_ref_m: 0.0,
                y_ref_m: 0.0,
                tangent_rad: 0.0,
                length_m,
                v_des_ms,
                accel_mss,
            }],
        }
    }

    #[test]
    fn test_line_profile_ramps_to_cruise() {
        let mut gen = test_ref_gen();
        gen.set_path(line_path(10.0, 0.5, 0.1)).unwrap();

        let input = InputData { dt_s: DT_S };

        // First cycle: speed has ramped by one acceleration step
        let (ref_state, report) = gen.proc(&input).unwrap();
        assert!((report.speed_ms - 0.01).abs() < 1e-12);
        assert!(ref_state.v_des_ms > 0.0);
        assert_eq!(ref_state.psi_des_rad, 0.0);
        assert!(ref_state.rho_des_m.is_infinite());
        assert_eq!(ref_state.y_des_m, 0.0);

        // Speed never exceeds the cruise value and eventually reaches it
        let mut prev_speed = report.speed_ms;
        for _ in 0..100 {
            let (_, report) = gen.proc(&input).unwrap();
            assert!(report.speed_ms <= 0.5 + 1e-12);
            assert!(report.speed_ms >= prev_speed);
            prev_speed = report.speed_ms;
        }
        assert!((prev_speed - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_min_speed_floor() {
        let mut gen = test_ref_gen();

        // Cruise speed below the floor, the profile settles on the floor
        gen.set_path(line_path(10.0, 0.001, 0.5)).unwrap();

        let input = InputData { dt_s: DT_S };
        let mut speed = 0.0;
        for _ in 0..20 {
            let (_, report) = gen.proc(&input).unwrap();
            speed = report.speed_ms;
        }
        assert!((speed - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_spin_sweeps_heading() {
        let mut gen = test_ref_gen();
        gen.set_path(Path {
            segs: vec![PathSegment::SpinInPlace {
                x_ref_m: 1.0,
                y_ref_m: 2.0,
                tangent_rad: 0.0,
                sweep_rad: -FRAC_PI_2,
                rate_rads: 0.5,
            }],
        })
        .unwrap();

        let input = InputData { dt_s: DT_S };

        let (ref_state, _) = gen.proc(&input).unwrap();
        assert_eq!(ref_state.x_des_m, 1.0);
        assert_eq!(ref_state.y_des_m, 2.0);
        assert_eq!(ref_state.v_des_ms, 0.0);
        assert_eq!(ref_state.rho_des_m, 0.0);
        // Heading sweeps towards the negative sweep
        assert!((ref_state.psi_des_rad + 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_segment_advance_and_completion() {
        let mut gen = test_ref_gen();
        gen.set_path(Path {
            segs: vec![
                PathSegment::Line {
                    x_ref_m: 0.0,
                    y_ref_m: 0.0,
                    tangent_rad: 0.0,
                    length_m: 0.1,
                    v_des_ms: 0.5,
                    accel_mss: 10.0,
                },
                PathSegment::Line {
                    x_ref_m: 0.1,
                    y_ref_m: 0.0,
                    tangent_rad: 0.0,
                    length_m: 0.1,
                    v_des_ms: 0.5,
                    accel_mss: 10.0,
                },
            ],
        })
        .unwrap();

        let input = InputData { dt_s: DT_S };

        let mut cycles = 0;
        let complete = loop {
            let (_, report) = gen.proc(&input).unwrap();
            cycles += 1;
            if report.path_complete {
                break true;
            }
            if cycles > 100 {
                break false;
            }
        };
        assert!(complete, "path did not complete within 100 cycles");

        // Once complete the generator holds the end of the final segment
        let (ref_state, report) = gen.proc(&input).unwrap();
        assert!(report.path_complete);
        assert_eq!(ref_state.v_des_ms, 0.0);
        assert!((ref_state.x_des_m - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_no_path_errors() {
        let mut gen = test_ref_gen();
        assert!(matches!(
            gen.proc(&InputData { dt_s: DT_S }),
            Err(RefGenError::NoPath)
        ));
    }

    #[test]
    fn test_path_already_set() {
        let mut gen = test_ref_gen();
        gen.set_path(line_path(1.0, 0.5, 0.1)).unwrap();
        assert!(matches!(
            gen.set_path(line_path(1.0, 0.5, 0.1)),
            Err(RefGenError::PathAlreadySet)
        ));

        gen.clear_path();
        assert!(gen.set_path(line_path(1.0, 0.5, 0.1)).is_ok());
    }
}
