//! Reference generation parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for reference generation
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Params {
    /// Floor applied to the speed profile on line and arc segments, so that
    /// the reference always makes progress towards the segment end even when
    /// a segment demands a very low cruise speed.
    pub min_speed_ms: f64,

    /// Cap on the acceleration used by the speed profile, applied over any
    /// per-segment acceleration value.
    pub max_accel_mss: f64,
}
