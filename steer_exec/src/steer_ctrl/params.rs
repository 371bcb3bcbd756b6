//! Steering control parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for steering control.
///
/// These form the gain set of the steering law. They are loaded once at
/// initialisation and never mutated afterwards.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct Params {
    /// Heading error feedback gain
    pub k_psi: f64,

    /// Speed shedding gain, sets how aggressively the linear velocity command
    /// is reduced as the heading error grows
    pub k_v: f64,

    /// Maximum magnitude of the angular velocity command in radians/second.
    /// Must be non-negative.
    pub omega_cmd_sat_rads: f64,

    /// Sensitivity of the heading correction function to lateral deviation.
    /// Sets the slope of the correction at zero deviation, the asymptotic
    /// bound of the correction is independent of this value.
    pub phase_space_slope: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Params {
    /// Check the parameters form a usable gain set.
    ///
    /// All gains must be finite and the angular velocity saturation bound
    /// must be non-negative.
    pub fn validate(&self) -> Result<(), String> {
        if !self.k_psi.is_finite() {
            return Err(format!("k_psi is not finite ({})", self.k_psi));
        }
        if !self.k_v.is_finite() {
            return Err(format!("k_v is not finite ({})", self.k_v));
        }
        if !self.omega_cmd_sat_rads.is_finite() {
            return Err(format!(
                "omega_cmd_sat_rads is not finite ({})",
                self.omega_cmd_sat_rads
            ));
        }
        if self.omega_cmd_sat_rads < 0.0 {
            return Err(format!(
                "omega_cmd_sat_rads is negative ({})",
                self.omega_cmd_sat_rads
            ));
        }
        if !self.phase_space_slope.is_finite() {
            return Err(format!(
                "phase_space_slope is not finite ({})",
                self.phase_space_slope
            ));
        }

        Ok(())
    }
}
