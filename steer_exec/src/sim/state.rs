//! Motion simulation module state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use super::Params;
use crate::loc::Pose;
use crate::steer_ctrl::SteeringCmd;
use util::{module::State, params, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Motion simulation module state
#[derive(Default)]
pub struct MotionSim {
    params: Params,

    /// The simulated pose of the robot
    pose: Pose,

    report: StatusReport,
}

/// Input data to motion simulation.
#[derive(Debug, Copy, Clone, Default)]
pub struct InputData {
    /// The steering command to integrate over this cycle
    pub cmd: SteeringCmd,

    /// Time since the previous cycle in seconds
    pub dt_s: f64,
}

/// Status report for motion simulation processing.
#[derive(Debug, Copy, Clone, Default, Serialize)]
pub struct StatusReport {
    /// True if the linear speed command exceeded the actuator limit
    pub speed_limited: bool,

    /// True if the turn rate command exceeded the actuator limit
    pub turn_rate_limited: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Potential errors that can occur during processing of the module.
#[derive(Debug, thiserror::Error)]
pub enum MotionSimError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(params::LoadError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for MotionSim {
    type InitData = &'static str;
    type InitError = MotionSimError;

    type InputData = InputData;
    type OutputData = Pose;
    type StatusReport = StatusReport;
    type ProcError = MotionSimError;

    /// Initialise the MotionSim module.
    ///
    /// Expected init data is the path to the parameter file. The simulated
    /// pose is reset to the configured initial pose.
    fn init(&mut self, init_data: Self::InitData, _session: &Session) -> Result<(), MotionSimError> {
        self.params = match params::load(init_data) {
            Ok(p) => p,
            Err(e) => return Err(MotionSimError::ParamLoadError(e)),
        };

        self.pose = Pose::new(
            self.params.init_x_m,
            self.params.init_y_m,
            self.params.init_heading_rad,
        );

        Ok(())
    }

    /// Perform cyclic processing of motion simulation.
    ///
    /// Integrates the unicycle model over one cycle, following the exact arc
    /// traced by constant linear and angular velocities.
    fn proc(&mut self, input_data: &Self::InputData) -> Result<(Pose, StatusReport), MotionSimError> {
        self.report = StatusReport::default();

        // Apply actuator limits
        let mut v_ms = input_data.cmd.v_ms;
        if v_ms.abs() > self.params.max_speed_ms {
            v_ms = v_ms.signum() * self.params.max_speed_ms;
            self.report.speed_limited = true;
        }

        let mut omega_rads = input_data.cmd.omega_rads;
        if omega_rads.abs() > self.params.max_turn_rate_rads {
            omega_rads = omega_rads.signum() * self.params.max_turn_rate_rads;
            self.report.turn_rate_limited = true;
        }

        let theta = self.pose.heading_rad;
        let dt_s = input_data.dt_s;

        // Very small turn rates integrate as straight line motion, otherwise
        // follow the exact arc
        if omega_rads.abs() < 1e-6 {
            self.pose.position_m[0] += v_ms * theta.cos() * dt_s;
            self.pose.position_m[1] += v_ms * theta.sin() * dt_s;
        } else {
            let radius_m = v_ms / omega_rads;
            let new_theta = theta + omega_rads * dt_s;

            self.pose.position_m[0] += radius_m * (new_theta.sin() - theta.sin());
            self.pose.position_m[1] += radius_m * (theta.cos() - new_theta.cos());
            self.pose.heading_rad = new_theta;
        }

        Ok((self.pose, self.report))
    }
}

impl MotionSim {
    /// Get the current simulated pose.
    pub fn pose(&self) -> Pose {
        self.pose
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn test_sim() -> MotionSim {
        MotionSim {
            params: Params {
                init_x_m: 0.0,
                init_y_m: 0.0,
                init_heading_rad: 0.0,
                max_speed_ms: 1.0,
                max_turn_rate_rads: 2.0,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_straight_line_motion() {
        let mut sim = test_sim();

        let input = InputData {
            cmd: SteeringCmd {
                v_ms: 0.5,
                omega_rads: 0.0,
            },
            dt_s: 0.1,
        };

        for _ in 0..10 {
            sim.proc(&input).unwrap();
        }

        let pose = sim.pose();
        assert!((pose.position_m[0] - 0.5).abs() < 1e-12);
        assert!(pose.position_m[1].abs() < 1e-12);
        assert_eq!(pose.heading_rad, 0.0);
    }

    #[test]
    fn test_arc_motion() {
        let mut sim = test_sim();

        // Quarter turn to the left on a unit radius arc: v = omega = 0.5, for
        // a total time of pi seconds split into 32 even cycles
        let input = InputData {
            cmd: SteeringCmd {
                v_ms: 0.5,
                omega_rads: 0.5,
            },
            dt_s: PI / 32.0,
        };

        for _ in 0..32 {
            sim.proc(&input).unwrap();
        }

        let pose = sim.pose();
        assert!((pose.heading_rad - FRAC_PI_2).abs() < 1e-9);
        assert!((pose.position_m[0] - 1.0).abs() < 1e-9);
        assert!((pose.position_m[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_actuator_limits() {
        let mut sim = test_sim();

        let input = InputData {
            cmd: SteeringCmd {
                v_ms: 5.0,
                omega_rads: -10.0,
            },
            dt_s: 0.1,
        };

        let (pose, report) = sim.proc(&input).unwrap();
        assert!(report.speed_limited);
        assert!(report.turn_rate_limited);

        // The heading change reflects the limited rate, not the command
        assert!((pose.heading_rad + 0.2).abs() < 1e-12);
    }
}
