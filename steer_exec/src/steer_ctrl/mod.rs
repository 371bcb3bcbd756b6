//! # Steering control module
//!
//! Steering control is responsible for keeping the robot on the reference
//! trajectory. It does this with a phase space steering law: rather than
//! acting on the raw Cartesian error, the controller reasons in the plane of
//! (lateral deviation, heading error). The lateral deviation of the reference
//! path from the robot is mapped through a bounded heading correction
//! function, the correction is combined with the reference heading to form a
//! commanded heading, and the angular velocity command is proportional to the
//! shortest signed arc between the commanded heading and the robot's current
//! heading.
//!
//! A curvature feed-forward term is added for references following an arc,
//! and the angular velocity command is saturated to the configured bound as
//! the controller's primary protection against actuator overdrive. The
//! linear velocity command is the desired speed, shed progressively as the
//! heading error grows so the robot does not drive hard away from the path
//! while it is still turning to rejoin it.
//!
//! The law itself is stateless: each cycle's commands are a pure function of
//! the current pose, the desired state and the gains fixed at initialisation.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod algorithm;
pub mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use algorithm::*;
pub use params::Params;
pub use state::*;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors that can occur during steering control operation.
#[derive(Debug, thiserror::Error)]
pub enum SteerCtrlError {
    #[error("Could not load parameters: {0}")]
    ParamLoadError(util::params::LoadError),

    /// The loaded parameters failed validation. The controller must not run
    /// with a malformed gain set.
    #[error("Invalid steering parameters: {0}")]
    InvalidParams(String),
}
