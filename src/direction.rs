//! Direction classification of joystick offsets
//!
//! Turns a continuous offset into one of the discrete directional commands a
//! remote device understands. Offsets use screen coordinates, so a negative
//! `y` points up.

use serde::Serialize;
use std::f32::consts::{FRAC_PI_4, PI};
use std::fmt;

use crate::config::DirectionConfig;
use crate::joystick::Offset;

/// Discrete stick direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Center,
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

impl Direction {
    /// Counter-clockwise from `Right`, one entry per 45 degree sector
    const SECTORS: [Direction; 8] = [
        Direction::Right,
        Direction::UpRight,
        Direction::Up,
        Direction::UpLeft,
        Direction::Left,
        Direction::DownLeft,
        Direction::Down,
        Direction::DownRight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Center => "center",
            Direction::Up => "up",
            Direction::UpRight => "up-right",
            Direction::Right => "right",
            Direction::DownRight => "down-right",
            Direction::Down => "down",
            Direction::DownLeft => "down-left",
            Direction::Left => "left",
            Direction::UpLeft => "up-left",
        }
    }

    /// Arrow glyph for console output
    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Center => "·",
            Direction::Up => "↑",
            Direction::UpRight => "↗",
            Direction::Right => "→",
            Direction::DownRight => "↘",
            Direction::Down => "↓",
            Direction::DownLeft => "↙",
            Direction::Left => "←",
            Direction::UpLeft => "↖",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Offset to direction classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionMapper {
    deadzone: f32,
    diagonals: bool,
}

impl DirectionMapper {
    /// # Arguments
    /// * `deadzone` - Radial magnitude below which the stick reads as centered
    /// * `diagonals` - Use 8 sectors instead of 4
    pub fn new(deadzone: f32, diagonals: bool) -> Self {
        Self {
            deadzone,
            diagonals,
        }
    }

    pub fn from_config(config: &DirectionConfig) -> Self {
        Self::new(config.deadzone, config.diagonals)
    }

    /// Classify an offset
    pub fn classify(&self, offset: Offset) -> Direction {
        if offset.magnitude() < self.deadzone || offset == Offset::ZERO {
            return Direction::Center;
        }

        // Flip y so that angles grow counter-clockwise on screen
        let angle = (-offset.y).atan2(offset.x);
        let turn = if angle < 0.0 { angle + 2.0 * PI } else { angle };

        if self.diagonals {
            let sector = ((turn + FRAC_PI_4 / 2.0) / FRAC_PI_4) as usize % 8;
            Direction::SECTORS[sector]
        } else {
            let sector = ((turn + FRAC_PI_4) / (2.0 * FRAC_PI_4)) as usize % 4;
            Direction::SECTORS[sector * 2]
        }
    }
}

impl Default for DirectionMapper {
    fn default() -> Self {
        Self::from_config(&DirectionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadzone_reads_center() {
        let mapper = DirectionMapper::new(0.2, true);
        assert_eq!(mapper.classify(Offset::ZERO), Direction::Center);
        assert_eq!(mapper.classify(Offset::new(0.1, -0.1)), Direction::Center);
    }

    #[test]
    fn test_cardinals_in_screen_coordinates() {
        let mapper = DirectionMapper::new(0.2, true);
        assert_eq!(mapper.classify(Offset::new(1.0, 0.0)), Direction::Right);
        assert_eq!(mapper.classify(Offset::new(0.0, -1.0)), Direction::Up);
        assert_eq!(mapper.classify(Offset::new(-1.0, 0.0)), Direction::Left);
        assert_eq!(mapper.classify(Offset::new(0.0, 1.0)), Direction::Down);
    }

    #[test]
    fn test_diagonals() {
        let mapper = DirectionMapper::new(0.2, true);
        assert_eq!(mapper.classify(Offset::new(0.7, -0.7)), Direction::UpRight);
        assert_eq!(mapper.classify(Offset::new(-0.7, -0.7)), Direction::UpLeft);
        assert_eq!(mapper.classify(Offset::new(-0.7, 0.7)), Direction::DownLeft);
        assert_eq!(mapper.classify(Offset::new(0.7, 0.7)), Direction::DownRight);
    }

    #[test]
    fn test_four_way_snaps_diagonals() {
        let mapper = DirectionMapper::new(0.2, false);
        assert_eq!(mapper.classify(Offset::new(0.9, -0.3)), Direction::Right);
        assert_eq!(mapper.classify(Offset::new(0.3, -0.9)), Direction::Up);
        assert_eq!(mapper.classify(Offset::new(-0.9, 0.1)), Direction::Left);
        assert_eq!(mapper.classify(Offset::new(0.1, 0.9)), Direction::Down);
        // Just below the x axis still wraps to Right
        assert_eq!(mapper.classify(Offset::new(1.0, 0.01)), Direction::Right);
    }

    #[test]
    fn test_zero_deadzone_still_centers_rest() {
        let mapper = DirectionMapper::new(0.0, true);
        assert_eq!(mapper.classify(Offset::ZERO), Direction::Center);
        assert_eq!(mapper.classify(Offset::new(0.01, 0.0)), Direction::Right);
    }
}
