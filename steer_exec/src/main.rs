//! Main steering executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules
//!     - Main loop:
//!         - Pose acquisition (from the motion simulation)
//!         - Reference generation processing
//!         - Steering control processing
//!         - Motion simulation processing
//!         - Telemetry recording
//!
//! # Modules
//!
//! All modules (e.g. `steer_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.
//!

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use steer_lib::{data_store::DataStore, path::Path, ref_gen, sim, steer_ctrl};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{info, warn};
use serde::Serialize;
use std::env;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use steer_lib::loc::Pose;
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Target period of one cycle.
const CYCLE_PERIOD_S: f64 = 0.10;

/// Number of cycles per second
const CYCLE_FREQUENCY_HZ: f64 = 1.0 / CYCLE_PERIOD_S;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Summary of a completed path follow, saved to the session on exit.
#[derive(Debug, Clone, Serialize)]
struct FollowSummary {
    /// Number of cycles executed
    num_cycles: u128,

    /// Session elapsed time at the end of the follow
    duration_s: f64,

    /// The robot's pose when the path completed
    final_pose: Pose,

    /// Largest lateral deviation magnitude seen over the follow
    max_abs_lat_dev_m: f64,

    /// Largest heading error magnitude seen over the follow
    max_abs_head_error_rad: f64,

    /// Number of cycles on which the angular velocity command saturated
    num_saturated_cycles: u128,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("steer_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Otter Steering Executable\n");
    info!(
        "Running on: {} ({})",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PATH ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    // A single argument giving the path file to follow is expected
    if args.len() != 2 {
        return Err(eyre!(
            "Expected exactly one argument (the path file to follow), found {}",
            args.len() - 1
        ));
    }

    info!("Loading path from \"{}\"", &args[1]);

    let path = Path::load(&args[1]).wrap_err("Failed to load the path")?;

    info!(
        "Loaded path contains {} segments and is {:.02} m long\n",
        path.segs.len(),
        path.total_length_m()
    );

    // ---- INITIALISE DATASTORE ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    // ---- INITIALISE MODULES ----

    ds.ref_gen
        .init("ref_gen.toml", &session)
        .wrap_err("Failed to initialise RefGen")?;
    info!("RefGen init complete");

    ds.steer_ctrl
        .init("steer_ctrl.toml", &session)
        .wrap_err("Failed to initialise SteerCtrl")?;
    info!("SteerCtrl init complete");

    ds.sim
        .init("sim.toml", &session)
        .wrap_err("Failed to initialise MotionSim")?;
    info!("MotionSim init complete");

    info!("Module initialisation complete\n");

    // Hand the path over to the reference generator
    ds.ref_gen
        .set_path(path)
        .wrap_err("Failed to set the path to follow")?;

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start(CYCLE_FREQUENCY_HZ);

        // ---- POSE ACQUISITION ----

        ds.pose = ds.sim.pose();

        // ---- REFERENCE GENERATION ----

        let (ref_state, ref_gen_report) = ds
            .ref_gen
            .proc(&ref_gen::InputData { dt_s: CYCLE_PERIOD_S })
            .wrap_err("Error during RefGen processing")?;

        ds.ref_gen_output = ref_state;
        ds.ref_gen_status_rpt = ref_gen_report;

        if ref_gen_report.path_complete {
            info!("Path complete after {} cycles", ds.num_cycles);
            break;
        }

        // ---- STEERING PROCESSING ----

        ds.steer_ctrl_input = steer_ctrl::InputData {
            pose: ds.pose,
            ref_state: ds.ref_gen_output,
        };

        let (cmd, steer_report) = ds
            .steer_ctrl
            .proc(&ds.steer_ctrl_input)
            .wrap_err("Error during SteerCtrl processing")?;

        ds.steer_ctrl_output = cmd;
        ds.steer_ctrl_status_rpt = steer_report;

        // ---- MOTION SIMULATION ----

        let (_, sim_report) = ds
            .sim
            .proc(&sim::InputData {
                cmd: ds.steer_ctrl_output,
                dt_s: CYCLE_PERIOD_S,
            })
            .wrap_err("Error during MotionSim processing")?;

        ds.sim_status_rpt = sim_report;

        // ---- TELEMETRY ----

        ds.record_trace();

        if ds.is_1_hz_cycle {
            info!(
                "seg {:02}: lat dev {:+.3} m, head err {:+.3} rad, cmd (v {:.3} m/s, omega {:+.3} rad/s)",
                ds.ref_gen_status_rpt.seg_index,
                ds.steer_ctrl_status_rpt.lat_dev_m,
                ds.steer_ctrl_status_rpt.head_error_rad,
                ds.steer_ctrl_output.v_ms,
                ds.steer_ctrl_output.omega_rads
            );
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(CYCLE_PERIOD_S).checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            }
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - CYCLE_PERIOD_S
                );
                ds.num_consec_cycle_overruns += 1;
            }
        }

        // Increment cycle counter
        ds.num_cycles += 1;
    }

    // ---- SHUTDOWN ----

    let summary = FollowSummary {
        num_cycles: ds.num_cycles,
        duration_s: util::session::get_elapsed_seconds(),
        final_pose: ds.pose,
        max_abs_lat_dev_m: ds
            .trace
            .iter()
            .map(|r| r.errors.lat_dev_m.abs())
            .fold(0.0, f64::max),
        max_abs_head_error_rad: ds
            .trace
            .iter()
            .map(|r| r.errors.head_error_rad.abs())
            .fold(0.0, f64::max),
        num_saturated_cycles: ds
            .trace
            .iter()
            .filter(|r| r.errors.omega_saturated)
            .count() as u128,
    };

    info!(
        "Follow summary: max |lat dev| {:.3} m, max |head err| {:.3} rad, {} saturated cycles",
        summary.max_abs_lat_dev_m, summary.max_abs_head_error_rad, summary.num_saturated_cycles
    );

    session.save("trace.json", std::mem::take(&mut ds.trace));
    session.save("follow_summary.json", summary);

    info!("End of execution");

    session.exit();

    Ok(())
}
