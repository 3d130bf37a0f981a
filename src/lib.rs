//! Virtual joystick
//!
//! Converts raw pointer coordinates into a bounded 2D offset: the pointer is
//! clamped to a circular activity region, the knob displacement is
//! normalized to [-1.0, 1.0] per axis, and a listener is told about every
//! change, including the return to center on release.

pub mod cli;
pub mod config;
pub mod console;
pub mod direction;
pub mod input;
pub mod joystick;

pub use joystick::{
    Geometry, JoystickController, JoystickError, JoystickListener, JoystickState, Offset, Point2D,
};
