//! # Data Store

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Serialize;

// Internal
use crate::{loc::Pose, ref_gen, sim, steer_ctrl};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Global data store for the executable.
#[derive(Default)]
pub struct DataStore {
    // Cycle management
    /// Number of cycles already executed
    pub num_cycles: u128,

    /// True if this cycle falls on a 1Hz boundary
    pub is_1_hz_cycle: bool,

    /// Session elapsed time at the start of the cycle
    pub cycle_start_time_s: f64,

    // Localisation
    /// The robot's pose at the start of the cycle
    pub pose: Pose,

    // RefGen
    pub ref_gen: ref_gen::RefGen,
    pub ref_gen_output: ref_gen::RefState,
    pub ref_gen_status_rpt: ref_gen::StatusReport,

    // SteerCtrl
    pub steer_ctrl: steer_ctrl::SteerCtrl,
    pub steer_ctrl_input: steer_ctrl::InputData,
    pub steer_ctrl_output: steer_ctrl::SteeringCmd,
    pub steer_ctrl_status_rpt: steer_ctrl::SteeringErrors,

    // MotionSim
    pub sim: sim::MotionSim,
    pub sim_status_rpt: sim::StatusReport,

    // Telemetry
    /// Trace of the follow, one row per cycle, saved to the session on exit
    pub trace: Vec<TraceRow>,

    // Monitoring Counters
    /// Number of consecutive cycle overruns
    pub num_consec_cycle_overruns: u64,
}

/// One cycle's worth of telemetry.
#[derive(Debug, Copy, Clone, Serialize)]
pub struct TraceRow {
    /// Session elapsed time at the start of the cycle
    pub time_s: f64,

    /// The robot's pose at the start of the cycle
    pub pose: Pose,

    /// The reference state tracked this cycle
    pub ref_state: ref_gen::RefState,

    /// The steering command produced this cycle
    pub cmd: steer_ctrl::SteeringCmd,

    /// The steering error quantities behind the command
    pub errors: steer_ctrl::SteeringErrors,
}

// ---------------------------------------------------------------------------
// IMPLS
// ---------------------------------------------------------------------------

impl DataStore {
    /// Perform actions required at the start of a cycle.
    ///
    /// Clears those items that need clearing at the start of a cycle, and
    /// sets the 1Hz cycle flag.
    pub fn cycle_start(&mut self, cycle_frequency_hz: f64) {
        self.is_1_hz_cycle = self.num_cycles % (cycle_frequency_hz as u128) == 0;

        self.ref_gen_output = ref_gen::RefState::default();
        self.ref_gen_status_rpt = ref_gen::StatusReport::default();
        self.steer_ctrl_input = steer_ctrl::InputData::default();
        self.steer_ctrl_output = steer_ctrl::SteeringCmd::default();
        self.steer_ctrl_status_rpt = steer_ctrl::SteeringErrors::default();
        self.sim_status_rpt = sim::StatusReport::default();

        self.cycle_start_time_s = util::session::get_elapsed_seconds();
    }

    /// Record this cycle's telemetry in the trace.
    pub fn record_trace(&mut self) {
        self.trace.push(TraceRow {
            time_s: self.cycle_start_time_s,
            pose: self.pose,
            ref_state: self.ref_gen_output,
            cmd: self.steer_ctrl_output,
            errors: self.steer_ctrl_status_rpt,
        });
    }
}
