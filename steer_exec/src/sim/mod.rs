//! # Motion simulation module
//!
//! This module stands in for the localisation and actuation collaborators
//! when running the steering software without a robot. Each cycle it
//! integrates the unicycle model from the latest steering command, applying
//! the configured actuator limits, and publishes the resulting pose for the
//! next control cycle.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod params;
mod state;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use params::Params;
pub use state::*;
