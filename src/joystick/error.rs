//! Joystick error types

use thiserror::Error;

/// Errors raised synchronously by the joystick controller.
///
/// Neither kind is retried and neither mutates controller state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JoystickError {
    /// Center is not finite, or the activity radius is not a finite value > 0
    #[error("invalid geometry: center=({center_x}, {center_y}), activity_radius={activity_radius}")]
    InvalidGeometry {
        center_x: f32,
        center_y: f32,
        activity_radius: f32,
    },

    /// Pointer coordinate is NaN or infinite
    #[error("invalid pointer sample: ({x}, {y})")]
    InvalidSample { x: f32, y: f32 },
}
