//! Phase-tagged pointer samples delivered by the hosting surface

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::joystick::Point2D;

/// Pointer phase, mirroring a touch event's action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

impl fmt::Display for PointerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PointerPhase::Down => "down",
            PointerPhase::Move => "move",
            PointerPhase::Up => "up",
            PointerPhase::Cancel => "cancel",
        };
        f.write_str(name)
    }
}

impl FromStr for PointerPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "down" => Ok(PointerPhase::Down),
            "move" => Ok(PointerPhase::Move),
            "up" => Ok(PointerPhase::Up),
            "cancel" => Ok(PointerPhase::Cancel),
            other => Err(format!("unknown pointer phase '{}'", other)),
        }
    }
}

/// One pointer event: a phase plus its coordinate.
///
/// `cancel` carries no meaningful position; `up` may or may not.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub phase: PointerPhase,
    pub position: Option<Point2D>,
}

impl PointerSample {
    pub fn down(x: f32, y: f32) -> Self {
        Self {
            phase: PointerPhase::Down,
            position: Some(Point2D::new(x, y)),
        }
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self {
            phase: PointerPhase::Move,
            position: Some(Point2D::new(x, y)),
        }
    }

    pub fn up(position: Option<Point2D>) -> Self {
        Self {
            phase: PointerPhase::Up,
            position,
        }
    }

    pub fn cancel() -> Self {
        Self {
            phase: PointerPhase::Cancel,
            position: None,
        }
    }
}
