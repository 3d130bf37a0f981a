//! Joystick geometry: points, offsets, and the circular activity region.
//!
//! All clamping math runs in `f64` so that coordinate differences of
//! extreme-but-finite `f32` inputs cannot overflow, then rounds back to
//! `f32` at the boundary.

use serde::{Deserialize, Serialize};

use super::error::JoystickError;

/// A point in the hosting surface's coordinate space (device-independent units)
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct Point2D {
    pub x: f32,
    pub y: f32,
}

impl Point2D {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance to `other`
    pub fn distance(&self, other: Point2D) -> f32 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        dx.hypot(dy) as f32
    }
}

/// Normalized knob displacement, each axis in [-1.0, 1.0]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Length of the offset vector (0.0 at rest, 1.0 on the boundary)
    pub fn magnitude(&self) -> f32 {
        self.x.hypot(self.y)
    }

    fn from_unit(x: f64, y: f64) -> Self {
        Self {
            x: x.clamp(-1.0, 1.0) as f32,
            y: y.clamp(-1.0, 1.0) as f32,
        }
    }
}

/// Center and activity radius of a joystick.
///
/// Only constructible through validation: the center is finite and the
/// radius is finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    center: Point2D,
    activity_radius: f32,
}

impl Geometry {
    /// Validate and build a geometry
    ///
    /// # Errors
    /// `InvalidGeometry` if the center is not finite or the radius is not a
    /// finite value greater than zero.
    pub fn new(center: Point2D, activity_radius: f32) -> Result<Self, JoystickError> {
        if !center.is_finite() || !activity_radius.is_finite() || activity_radius <= 0.0 {
            return Err(JoystickError::InvalidGeometry {
                center_x: center.x,
                center_y: center.y,
                activity_radius,
            });
        }

        Ok(Self {
            center,
            activity_radius,
        })
    }

    pub fn center(&self) -> Point2D {
        self.center
    }

    pub fn activity_radius(&self) -> f32 {
        self.activity_radius
    }

    /// Place the knob for pointer `p` and derive its offset.
    ///
    /// Inside the activity radius the knob lands on `p` exactly. Outside,
    /// `p` is projected radially onto the boundary circle, keeping its angle.
    /// `p` must be finite.
    pub fn project(&self, p: Point2D) -> (Point2D, Offset) {
        let cx = f64::from(self.center.x);
        let cy = f64::from(self.center.y);
        let radius = f64::from(self.activity_radius);

        let dx = f64::from(p.x) - cx;
        let dy = f64::from(p.y) - cy;
        let distance = dx.hypot(dy);

        if distance <= radius {
            return (p, Offset::from_unit(dx / radius, dy / radius));
        }

        // distance > radius > 0, so the division is well-defined
        let ratio = radius / distance;
        let knob = Point2D::new((cx + dx * ratio) as f32, (cy + dy * ratio) as f32);
        (knob, Offset::from_unit(dx / distance, dy / distance))
    }

    /// Knob location for a given offset (`center + offset * activity_radius`)
    pub fn knob_at(&self, offset: Offset) -> Point2D {
        Point2D::new(
            self.center.x + offset.x * self.activity_radius,
            self.center.y + offset.y * self.activity_radius,
        )
    }
}

/// How a hosting surface of a given size maps to a joystick geometry.
///
/// The center is always the middle of the surface. The activity radius is
/// either fixed, or half the shorter side minus `inset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceLayout {
    pub inset: f32,
    pub activity_radius: Option<f32>,
}

impl Default for SurfaceLayout {
    fn default() -> Self {
        Self {
            inset: DEFAULT_INSET,
            activity_radius: None,
        }
    }
}

/// Default gap between the surface edge and the activity circle
pub const DEFAULT_INSET: f32 = 20.0;

impl SurfaceLayout {
    /// Derive the geometry for a `width` x `height` surface
    ///
    /// # Errors
    /// `InvalidGeometry` if either side is not a finite value greater than
    /// zero, or if no positive activity radius fits.
    pub fn geometry_for(&self, width: f32, height: f32) -> Result<Geometry, JoystickError> {
        let center = Point2D::new(width / 2.0, height / 2.0);
        let radius = match self.activity_radius {
            Some(fixed) => fixed,
            None => width.min(height) / 2.0 - self.inset,
        };

        let valid_side = |side: f32| side.is_finite() && side > 0.0;
        if !valid_side(width) || !valid_side(height) {
            return Err(JoystickError::InvalidGeometry {
                center_x: center.x,
                center_y: center.y,
                activity_radius: radius,
            });
        }

        Geometry::new(center, radius)
    }
}
