//! Steering control module state

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;

// Internal
use super::{Params, PhaseSpaceSteering, SteerCtrlError, SteeringCmd, SteeringErrors, SteeringLaw};
use crate::loc::Pose;
use crate::ref_gen::RefState;
use util::{module::State, params, session::Session};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Steering control module state
#[derive(Default)]
pub struct SteerCtrl {
    /// The steering law evaluated each cycle. The gain set lives inside the
    /// law and is replaced wholesale on (re)initialisation, it is never
    /// mutated between cycles.
    law: PhaseSpaceSteering,

    report: SteeringErrors,
}

/// Input data to steering control.
#[derive(Debug, Copy, Clone, Default)]
pub struct InputData {
    /// The robot's current pose
    pub pose: Pose,

    /// The desired state to track
    pub ref_state: RefState,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for SteerCtrl {
    type InitData = &'static str;
    type InitError = SteerCtrlError;

    type InputData = InputData;
    type OutputData = SteeringCmd;
    type StatusReport = SteeringErrors;
    type ProcError = SteerCtrlError;

    /// Initialise the SteerCtrl module.
    ///
    /// Expected init data is the path to the parameter file. The loaded gain
    /// set is validated, the controller refuses to run with non-finite gains
    /// or a negative saturation bound.
    fn init(&mut self, init_data: Self::InitData, _session: &Session) -> Result<(), SteerCtrlError> {
        let params: Params = match params::load(init_data) {
            Ok(p) => p,
            Err(e) => return Err(SteerCtrlError::ParamLoadError(e)),
        };

        params.validate().map_err(SteerCtrlError::InvalidParams)?;

        self.law = PhaseSpaceSteering::new(params);

        Ok(())
    }

    /// Perform cyclic processing of steering control.
    ///
    /// A single evaluation of the steering law, no state is carried between
    /// cycles.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(SteeringCmd, SteeringErrors), SteerCtrlError> {
        let (cmd, errors) = self
            .law
            .compute_velocities(&input_data.pose, &input_data.ref_state);

        self.report = errors;

        trace!(
            "SteerCtrl output: v = {:.3} m/s, omega = {:.3} rad/s",
            cmd.v_ms,
            cmd.omega_rads
        );

        Ok((cmd, self.report))
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
