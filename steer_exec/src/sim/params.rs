//! Motion simulation parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for motion simulation
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Params {
    /// Initial X position of the robot in the world frame
    pub init_x_m: f64,

    /// Initial Y position of the robot in the world frame
    pub init_y_m: f64,

    /// Initial heading of the robot in radians
    pub init_heading_rad: f64,

    /// Maximum linear speed the simulated actuators can achieve
    pub max_speed_ms: f64,

    /// Maximum turn rate the simulated actuators can achieve
    pub max_turn_rate_rads: f64,
}
