//! Console listener - prints every joystick notification
//!
//! Stands in for the rendering / device layer when running from a terminal:
//! shows the offset, its magnitude, and the classified direction. The knob
//! position is available from the REPL `offset` command.

use colored::*;
use serde::Serialize;
use tracing::debug;

use crate::direction::{Direction, DirectionMapper};
use crate::joystick::{JoystickListener, Offset};

/// One notification as emitted in JSON mode
#[derive(Debug, Serialize)]
struct OffsetRecord {
    seq: u64,
    x: f32,
    y: f32,
    direction: Direction,
}

/// Prints offsets as colored text or JSON lines
pub struct ConsoleListener {
    mapper: DirectionMapper,
    json: bool,
    /// Notification counter
    count: u64,
}

impl ConsoleListener {
    pub fn new(mapper: DirectionMapper, json: bool) -> Self {
        Self {
            mapper,
            json,
            count: 0,
        }
    }

    /// Render one notification
    pub fn format_line(&mut self, offset: Offset) -> String {
        self.count += 1;
        let direction = self.mapper.classify(offset);

        if self.json {
            let record = OffsetRecord {
                seq: self.count,
                x: offset.x,
                y: offset.y,
                direction,
            };
            return serde_json::to_string(&record)
                .unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e));
        }

        let arrow = if direction == Direction::Center {
            direction.arrow().dimmed()
        } else {
            direction.arrow().bright_green().bold()
        };

        format!(
            "#{:<4} {} x={:>6.3} y={:>6.3} |{:.3}| {}",
            self.count,
            arrow,
            offset.x,
            offset.y,
            offset.magnitude(),
            direction.as_str().cyan()
        )
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

impl JoystickListener for ConsoleListener {
    fn on_joystick_moved(&mut self, offset: Offset) {
        let line = self.format_line(offset);
        debug!("Offset #{} delivered", self.count);
        println!("{}", line);
    }
}
