//! # Localisation types
//!
//! This module provides the planar pose type used throughout the steering
//! software. Pose estimation itself is performed by an external collaborator
//! (the motion simulation module in this workspace), the steering control
//! module only ever reads poses.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The current pose (planar position and heading) of the robot in the world
/// frame.
#[derive(Debug, Copy, Clone, Serialize, Deserialize, Default)]
pub struct Pose {
    /// The position in the world frame
    pub position_m: Vector2<f64>,

    /// The heading of the robot in radians, measured anticlockwise from the
    /// world X+ axis. May lie outside [-pi, pi], consumers are expected to
    /// wrap angle differences themselves.
    pub heading_rad: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Pose {
    /// Create a new pose from raw coordinates.
    pub fn new(x_m: f64, y_m: f64, heading_rad: f64) -> Self {
        Self {
            position_m: Vector2::new(x_m, y_m),
            heading_rad,
        }
    }

    /// Get the unit vector pointing in the direction the robot is facing.
    pub fn forward(&self) -> Vector2<f64> {
        Vector2::new(self.heading_rad.cos(), self.heading_rad.sin())
    }
}
