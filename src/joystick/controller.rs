//! Joystick controller - pointer samples in, normalized offsets out
//!
//! Owns the geometry and the knob. Every accepted pointer sample clamps the
//! knob into the activity circle and notifies the listener; release, cancel
//! and geometry changes put the knob back at the center and notify `(0, 0)`.

use std::fmt;
use tracing::{debug, trace, warn};

use super::error::JoystickError;
use super::geometry::{Geometry, Offset, Point2D, SurfaceLayout};
use crate::input::pointer::{PointerPhase, PointerSample};

/// Observer for joystick movement
pub trait JoystickListener: Send {
    fn on_joystick_moved(&mut self, offset: Offset);
}

impl<F> JoystickListener for F
where
    F: FnMut(Offset) + Send,
{
    fn on_joystick_moved(&mut self, offset: Offset) {
        self(offset)
    }
}

/// Logical interaction state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoystickState {
    /// Knob at center, offset (0, 0)
    Idle,
    /// Knob follows the pointer
    Dragging,
}

/// Virtual joystick controller.
///
/// Not synchronized: callers feed events serially.
pub struct JoystickController {
    geometry: Geometry,
    knob: Point2D,
    offset: Offset,
    state: JoystickState,
    listener: Option<Box<dyn JoystickListener>>,
}

impl JoystickController {
    /// Create an idle controller with the knob at the geometry's center
    pub fn new(geometry: Geometry) -> Self {
        Self {
            knob: geometry.center(),
            geometry,
            offset: Offset::ZERO,
            state: JoystickState::Idle,
            listener: None,
        }
    }

    /// Register the movement listener, replacing any previous one
    pub fn set_listener(&mut self, listener: impl JoystickListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    /// Replace the geometry and re-center the knob.
    ///
    /// A geometry change voids any gesture in progress, so this behaves like
    /// a release against the new center. On error nothing changes.
    pub fn set_geometry(&mut self, center: Point2D, activity_radius: f32) -> Result<(), JoystickError> {
        let geometry = Geometry::new(center, activity_radius)?;
        self.apply_geometry(geometry);
        Ok(())
    }

    /// Apply an already validated geometry (see [`JoystickController::set_geometry`])
    pub fn apply_geometry(&mut self, geometry: Geometry) {
        debug!(
            "Joystick geometry: center=({}, {}), activity_radius={}",
            geometry.center().x,
            geometry.center().y,
            geometry.activity_radius()
        );
        self.geometry = geometry;
        self.release();
    }

    /// Hosting surface was (re)sized
    pub fn on_size_changed(
        &mut self,
        width: f32,
        height: f32,
        layout: &SurfaceLayout,
    ) -> Result<(), JoystickError> {
        let geometry = layout.geometry_for(width, height)?;
        self.apply_geometry(geometry);
        Ok(())
    }

    pub fn on_pointer_down(&mut self, p: Point2D) -> Result<Offset, JoystickError> {
        self.sample(p)
    }

    pub fn on_pointer_move(&mut self, p: Point2D) -> Result<Offset, JoystickError> {
        self.sample(p)
    }

    /// Release: back to center. The release position is only validated.
    pub fn on_pointer_up(&mut self, p: Point2D) -> Result<Offset, JoystickError> {
        Self::check_sample(p)?;
        Ok(self.release())
    }

    pub fn on_pointer_cancel(&mut self) -> Offset {
        self.release()
    }

    /// Dispatch one phase-tagged sample
    pub fn handle(&mut self, sample: PointerSample) -> Result<Offset, JoystickError> {
        match (sample.phase, sample.position) {
            (PointerPhase::Down, Some(p)) => self.on_pointer_down(p),
            (PointerPhase::Move, Some(p)) => self.on_pointer_move(p),
            (PointerPhase::Down | PointerPhase::Move, None) => {
                warn!("Dropping {} sample without a position", sample.phase);
                Err(JoystickError::InvalidSample {
                    x: f32::NAN,
                    y: f32::NAN,
                })
            }
            (PointerPhase::Up, Some(p)) => self.on_pointer_up(p),
            (PointerPhase::Up, None) | (PointerPhase::Cancel, _) => Ok(self.on_pointer_cancel()),
        }
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub fn x_offset(&self) -> f32 {
        self.offset.x
    }

    pub fn y_offset(&self) -> f32 {
        self.offset.y
    }

    pub fn knob_position(&self) -> Point2D {
        self.knob
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn state(&self) -> JoystickState {
        self.state
    }

    fn check_sample(p: Point2D) -> Result<(), JoystickError> {
        if p.is_finite() {
            Ok(())
        } else {
            warn!("Dropping non-finite pointer sample ({}, {})", p.x, p.y);
            Err(JoystickError::InvalidSample { x: p.x, y: p.y })
        }
    }

    fn sample(&mut self, p: Point2D) -> Result<Offset, JoystickError> {
        Self::check_sample(p)?;

        let (knob, offset) = self.geometry.project(p);
        if self.state == JoystickState::Idle {
            debug!("Joystick grabbed at ({}, {})", p.x, p.y);
        }
        self.knob = knob;
        self.offset = offset;
        self.state = JoystickState::Dragging;

        trace!(
            "Joystick sample ({}, {}) -> knob=({}, {}), offset=({:.3}, {:.3})",
            p.x, p.y, knob.x, knob.y, offset.x, offset.y
        );
        self.notify();
        Ok(offset)
    }

    fn release(&mut self) -> Offset {
        if self.state == JoystickState::Dragging {
            debug!("Joystick released");
        }
        self.knob = self.geometry.center();
        self.offset = Offset::ZERO;
        self.state = JoystickState::Idle;
        self.notify();
        Offset::ZERO
    }

    fn notify(&mut self) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_joystick_moved(self.offset);
        }
    }
}

impl fmt::Debug for JoystickController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoystickController")
            .field("geometry", &self.geometry)
            .field("knob", &self.knob)
            .field("offset", &self.offset)
            .field("state", &self.state)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}
