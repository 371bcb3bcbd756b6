//! # Reference generation module
//!
//! Reference generation is responsible for producing the desired state that
//! the steering control module tracks. Each cycle the generator advances a
//! coordinate along the current path segment, following the segment's speed
//! profile with an acceleration limit, and emits the reference pose, speed
//! and curvature radius at that point.
//!
//! Line and arc segments advance by traverse distance, with the cruise speed
//! of the segment approached at its acceleration limit. Spin segments hold
//! position and sweep the reference heading at their configured rate, with
//! zero desired speed. When the final segment completes the generator holds
//! the end state with zero desired speed and raises the `path_complete` flag
//! in its status report.

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
