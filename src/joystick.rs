//! Virtual joystick core
//!
//! Maps pointer coordinates onto a circular activity region and reports the
//! knob displacement as a normalized offset in [-1.0, 1.0] per axis.

mod controller;
mod error;
mod geometry;


pub use controller::{JoystickController, JoystickListener, JoystickState};
pub use error::JoystickError;
pub use geometry::{Geometry, Offset, Point2D, SurfaceLayout, DEFAULT_INSET};
