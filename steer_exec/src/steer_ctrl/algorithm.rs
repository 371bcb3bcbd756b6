//! # Phase space steering algorithm
//!
//! This module provides the steering law itself, including the heading
//! correction function and the error calculations it is built from.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;
use std::f64::consts::FRAC_PI_2;

// Internal
use super::Params;
use crate::loc::Pose;
use crate::ref_gen::RefState;
use util::maths::get_ang_dist;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Bound on the magnitude of the heading correction produced by the phase
/// space law's correction function, independent of the configured slope.
pub const PSI_OF_D_BOUND_RAD: f64 = FRAC_PI_2;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The velocity commands produced by one steering law evaluation.
#[derive(Debug, Copy, Clone, Default, Serialize)]
pub struct SteeringCmd {
    /// Linear velocity command in meters/second
    pub v_ms: f64,

    /// Angular velocity command in radians/second. Follows the right hand
    /// rule about the robot's Z+ (upwards) axis, positive rates turn the
    /// robot to the left.
    pub omega_rads: f64,
}

/// The error quantities behind a steering law evaluation, kept for monitoring.
#[derive(Debug, Copy, Clone, Default, Serialize)]
pub struct SteeringErrors {
    /// Signed lateral deviation of the reference path from the robot in
    /// meters, positive when the path is to the robot's left
    pub lat_dev_m: f64,

    /// Heading error between the commanded and current headings, wrapped to
    /// (-pi, pi]
    pub head_error_rad: f64,

    /// True if the angular velocity command was clamped to the saturation
    /// bound this evaluation
    pub omega_saturated: bool,
}

/// The phase space steering law.
///
/// Holds the gain set fixed at initialisation. Evaluation is a pure function
/// of the current pose and desired state, no internal state persists between
/// cycles.
#[derive(Debug, Clone, Default)]
pub struct PhaseSpaceSteering {
    params: Params,
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// The contract implemented by steering laws.
///
/// The executive depends on this capability rather than on a concrete type,
/// any future steering variant implements the same contract as an independent
/// type.
pub trait SteeringLaw {
    /// Compute the velocity commands driving the robot from its current pose
    /// towards the desired state.
    fn compute_velocities(&self, pose: &Pose, ref_state: &RefState)
        -> (SteeringCmd, SteeringErrors);
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PhaseSpaceSteering {
    /// Create a new instance of the law from the given gain set.
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    /// Map a lateral deviation into a corrective heading angle.
    ///
    /// Odd in `d`, zero at zero, strictly increasing, and bounded by
    /// `PSI_OF_D_BOUND_RAD` regardless of the slope parameter. The slope
    /// parameter is the gradient of the correction at zero deviation, so it
    /// controls the sensitivity to small deviations without altering the
    /// asymptotic bound.
    fn psi_of_d(&self, d: f64) -> f64 {
        PSI_OF_D_BOUND_RAD * (self.params.phase_space_slope * d / PSI_OF_D_BOUND_RAD).tanh()
    }
}

impl SteeringLaw for PhaseSpaceSteering {
    fn compute_velocities(
        &self,
        pose: &Pose,
        ref_state: &RefState,
    ) -> (SteeringCmd, SteeringErrors) {
        // Positional error of the reference relative to the robot
        let err_x_m = ref_state.x_des_m - pose.position_m[0];
        let err_y_m = ref_state.y_des_m - pose.position_m[1];

        // Project the error onto the path-left normal to get the signed
        // lateral deviation. This is the phase coordinate of the law, the
        // controller works in the (deviation, heading error) plane from here
        // on
        let (sin_psi, cos_psi) = ref_state.psi_des_rad.sin_cos();
        let lat_dev_m = -err_x_m * sin_psi + err_y_m * cos_psi;

        // The commanded heading is the path heading plus the correction
        // steering back towards the path
        let psi_cmd_rad = ref_state.psi_des_rad + self.psi_of_d(lat_dev_m);

        // Shortest signed arc from the robot's heading to the commanded
        // heading
        let head_error_rad = get_ang_dist(pose.heading_rad, psi_cmd_rad);

        // Heading feedback plus curvature feed-forward. A zero or non-finite
        // curvature radius marks a spin or straight reference respectively,
        // neither contributes feed-forward
        let mut omega_rads = self.params.k_psi * head_error_rad;
        if ref_state.rho_des_m.is_finite() && ref_state.rho_des_m != 0.0 {
            omega_rads += ref_state.v_des_ms / ref_state.rho_des_m;
        }

        // Saturate the angular velocity command
        let omega_saturated = omega_rads.abs() > self.params.omega_cmd_sat_rads;
        omega_rads = omega_rads.clamp(
            -self.params.omega_cmd_sat_rads,
            self.params.omega_cmd_sat_rads,
        );

        // Shed speed as the heading error grows, never commanding more than
        // the desired speed or a reverse speed
        let v_ms = (ref_state.v_des_ms
            * (1.0 - self.params.k_v * (1.0 - head_error_rad.cos())))
        .clamp(0.0, ref_state.v_des_ms.max(0.0));

        (
            SteeringCmd { v_ms, omega_rads },
            SteeringErrors {
                lat_dev_m,
                head_error_rad,
                omega_saturated,
            },
        )
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    /// Gain set used by most of the tests.
    fn test_law() -> PhaseSpaceSteering {
        PhaseSpaceSteering::new(Params {
            k_psi: 1.0,
            k_v: 0.5,
            omega_cmd_sat_rads: 1.0,
            phase_space_slope: 2.0,
        })
    }

    fn straight_ref(x_des_m: f64, y_des_m: f64, psi_des_rad: f64, v_des_ms: f64) -> RefState {
        RefState {
            x_des_m,
            y_des_m,
            psi_des_rad,
            rho_des_m: f64::INFINITY,
            v_des_ms,
        }
    }

    #[test]
    fn test_zero_error_fixed_point() {
        let law = test_law();

        // Robot exactly on a straight reference: no turn command, full speed
        let pose = Pose::new(1.0, -2.0, 0.5);
        let (cmd, errors) = law.compute_velocities(&pose, &straight_ref(1.0, -2.0, 0.5, 1.0));

        assert_eq!(cmd.omega_rads, 0.0);
        assert_eq!(cmd.v_ms, 1.0);
        assert_eq!(errors.lat_dev_m, 0.0);
        assert_eq!(errors.head_error_rad, 0.0);
        assert!(!errors.omega_saturated);

        // Same at the origin with zero heading
        let pose = Pose::new(0.0, 0.0, 0.0);
        let (cmd, _) = law.compute_velocities(&pose, &straight_ref(0.0, 0.0, 0.0, 0.3));

        assert_eq!(cmd.omega_rads, 0.0);
        assert_eq!(cmd.v_ms, 0.3);
    }

    #[test]
    fn test_psi_of_d_odd_symmetry() {
        let law = test_law();

        assert_eq!(law.psi_of_d(0.0), 0.0);

        for d in [0.01, 0.1, 0.5, 1.0, 5.0, 100.0].iter() {
            assert_eq!(law.psi_of_d(-d), -law.psi_of_d(*d));
        }
    }

    #[test]
    fn test_psi_of_d_monotonic() {
        let law = test_law();

        let mut prev = law.psi_of_d(0.0);
        for i in 1..200 {
            let curr = law.psi_of_d(i as f64 * 0.01);
            assert!(
                curr > prev,
                "psi_of_d not strictly increasing at d = {}",
                i as f64 * 0.01
            );
            prev = curr;
        }
    }

    #[test]
    fn test_psi_of_d_bound_independent_of_slope() {
        for slope in [0.1, 2.0, 1000.0].iter() {
            let law = PhaseSpaceSteering::new(Params {
                k_psi: 1.0,
                k_v: 0.5,
                omega_cmd_sat_rads: 1.0,
                phase_space_slope: *slope,
            });

            for d in [1.0, 1e3, 1e6].iter() {
                assert!(law.psi_of_d(*d) <= PSI_OF_D_BOUND_RAD);
                assert!(law.psi_of_d(-d) >= -PSI_OF_D_BOUND_RAD);
            }
        }
    }

    #[test]
    fn test_psi_of_d_slope_sets_small_deviation_sensitivity() {
        let law = test_law();

        // Near zero the correction is approximately slope * d
        let d = 1e-6;
        assert!((law.psi_of_d(d) - 2.0 * d).abs() < 1e-9);
    }

    #[test]
    fn test_saturation_bound() {
        // Aggressive gains guarantee the raw command exceeds the bound
        let law = PhaseSpaceSteering::new(Params {
            k_psi: 100.0,
            k_v: 0.5,
            omega_cmd_sat_rads: 1.5,
            phase_space_slope: 10.0,
        });

        for heading in [-3.0, -1.0, 0.0, 0.7, 2.9].iter() {
            for y in [-50.0, -1.0, 0.0, 0.3, 10.0].iter() {
                let pose = Pose::new(0.0, *y, *heading);
                let (cmd, _) =
                    law.compute_velocities(&pose, &straight_ref(0.0, 0.0, 0.0, 1.0));

                assert!(
                    cmd.omega_rads.abs() <= 1.5,
                    "omega {} exceeds the saturation bound",
                    cmd.omega_rads
                );
            }
        }
    }

    #[test]
    fn test_curvature_degeneracy_is_safe() {
        let law = test_law();
        let pose = Pose::new(0.0, 0.0, 0.0);

        // A zero curvature radius is geometrically invalid, the feed-forward
        // term must be skipped rather than divided through
        let ref_state = RefState {
            x_des_m: 0.0,
            y_des_m: 0.0,
            psi_des_rad: 0.0,
            rho_des_m: 0.0,
            v_des_ms: 1.0,
        };
        let (cmd, _) = law.compute_velocities(&pose, &ref_state);
        assert!(cmd.omega_rads.is_finite());
        assert_eq!(cmd.omega_rads, 0.0);

        // NaN radius likewise
        let ref_state = RefState {
            rho_des_m: f64::NAN,
            ..ref_state
        };
        let (cmd, _) = law.compute_velocities(&pose, &ref_state);
        assert!(cmd.omega_rads.is_finite());
        assert_eq!(cmd.omega_rads, 0.0);
    }

    #[test]
    fn test_curvature_feed_forward() {
        let law = test_law();

        // Robot exactly on an arc reference of radius 2 m at 1 m/s: the whole
        // command is feed-forward
        let pose = Pose::new(0.0, 0.0, 0.0);
        let ref_state = RefState {
            x_des_m: 0.0,
            y_des_m: 0.0,
            psi_des_rad: 0.0,
            rho_des_m: 2.0,
            v_des_ms: 1.0,
        };
        let (cmd, errors) = law.compute_velocities(&pose, &ref_state);

        assert_eq!(errors.head_error_rad, 0.0);
        assert!((cmd.omega_rads - 0.5).abs() < 1e-12);
        assert_eq!(cmd.v_ms, 1.0);
    }

    #[test]
    fn test_heading_error_wraps() {
        let law = test_law();

        // Robot heading 3.0 rad, reference heading -3.0 rad directly on the
        // robot: the error is the short hop over the branch cut, not -6.0
        let pose = Pose::new(0.0, 0.0, 3.0);
        let (cmd, errors) = law.compute_velocities(&pose, &straight_ref(0.0, 0.0, -3.0, 0.5));

        let expected = std::f64::consts::TAU - 6.0;
        assert!((errors.head_error_rad - expected).abs() < 1e-12);
        assert!((cmd.omega_rads - expected).abs() < 1e-12);
    }

    #[test]
    fn test_lateral_offset_scenario() {
        let law = test_law();

        // Robot at the origin facing along a straight reference offset 1 m to
        // its left: it must turn left, saturating the turn command, and hold
        // a reduced forward speed
        let pose = Pose::new(0.0, 0.0, 0.0);
        let (cmd, errors) = law.compute_velocities(&pose, &straight_ref(0.0, 1.0, 0.0, 1.0));

        assert!(errors.lat_dev_m > 0.0);
        assert!(cmd.omega_rads > 0.0);
        assert_eq!(cmd.omega_rads, 1.0);
        assert!(errors.omega_saturated);
        assert!(cmd.v_ms <= 1.0);
        assert!(cmd.v_ms > 0.0);

        // Mirrored offset gives the mirrored turn
        let (cmd, errors) = law.compute_velocities(&pose, &straight_ref(0.0, -1.0, 0.0, 1.0));
        assert!(errors.lat_dev_m < 0.0);
        assert_eq!(cmd.omega_rads, -1.0);
    }

    #[test]
    fn test_speed_shed_with_heading_error() {
        let law = test_law();
        let pose = Pose::new(0.0, 0.0, 0.0);

        // Speed never rises as the heading error grows
        let mut prev_v = f64::INFINITY;
        for psi_des in [0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0].iter() {
            let (cmd, _) = law.compute_velocities(&pose, &straight_ref(0.0, 0.0, *psi_des, 1.0));
            assert!(cmd.v_ms <= prev_v);
            assert!(cmd.v_ms >= 0.0);
            prev_v = cmd.v_ms;
        }
    }
}
