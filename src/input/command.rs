//! Interactive command parsing for the joystick REPL

use anyhow::{anyhow, bail, Context, Result};
use std::str::FromStr;

use super::pointer::PointerSample;
use crate::joystick::Point2D;

/// One line of REPL input
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    /// Feed a pointer sample
    Pointer(PointerSample),
    /// Resize the hosting surface
    Resize { width: f32, height: f32 },
    /// Set geometry directly
    Geometry { center: Point2D, activity_radius: f32 },
    /// Print current offset and knob position
    Offset,
    Help,
    Exit,
}

pub const HELP_TEXT: &str = "\
Commands:
  down X Y              press at (X, Y)
  move X Y              drag to (X, Y)
  up [X Y]              release
  cancel                cancel the gesture
  resize W H            resize the hosting surface
  geometry CX CY R      set center and activity radius
  offset                show the current offset
  help                  show this help
  exit | quit           leave";

fn parse_f32(token: Option<&str>, what: &str) -> Result<f32> {
    let token = token.ok_or_else(|| anyhow!("missing {}", what))?;
    token
        .parse::<f32>()
        .with_context(|| format!("invalid {} '{}'", what, token))
}

impl FromStr for ReplCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let mut tokens = line.split_whitespace();
        let keyword = tokens
            .next()
            .ok_or_else(|| anyhow!("empty command"))?
            .to_ascii_lowercase();

        let command = match keyword.as_str() {
            "down" | "move" => {
                let x = parse_f32(tokens.next(), "x")?;
                let y = parse_f32(tokens.next(), "y")?;
                if keyword == "down" {
                    ReplCommand::Pointer(PointerSample::down(x, y))
                } else {
                    ReplCommand::Pointer(PointerSample::moved(x, y))
                }
            }
            "up" => match tokens.next() {
                None => ReplCommand::Pointer(PointerSample::up(None)),
                Some(first) => {
                    let x = parse_f32(Some(first), "x")?;
                    let y = parse_f32(tokens.next(), "y")?;
                    ReplCommand::Pointer(PointerSample::up(Some(Point2D::new(x, y))))
                }
            },
            "cancel" => ReplCommand::Pointer(PointerSample::cancel()),
            "resize" => ReplCommand::Resize {
                width: parse_f32(tokens.next(), "width")?,
                height: parse_f32(tokens.next(), "height")?,
            },
            "geometry" => {
                let cx = parse_f32(tokens.next(), "center x")?;
                let cy = parse_f32(tokens.next(), "center y")?;
                let activity_radius = parse_f32(tokens.next(), "radius")?;
                ReplCommand::Geometry {
                    center: Point2D::new(cx, cy),
                    activity_radius,
                }
            }
            "offset" => ReplCommand::Offset,
            "help" | "?" => ReplCommand::Help,
            "exit" | "quit" => ReplCommand::Exit,
            other => bail!("unknown command '{}' (try 'help')", other),
        };

        if let Some(extra) = tokens.next() {
            bail!("unexpected argument '{}'", extra);
        }

        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pointer_commands() {
        assert_eq!(
            "down 130 100".parse::<ReplCommand>().unwrap(),
            ReplCommand::Pointer(PointerSample::down(130.0, 100.0))
        );
        assert_eq!(
            "MOVE -1.5 2e2".parse::<ReplCommand>().unwrap(),
            ReplCommand::Pointer(PointerSample::moved(-1.5, 200.0))
        );
        assert_eq!(
            "up".parse::<ReplCommand>().unwrap(),
            ReplCommand::Pointer(PointerSample::up(None))
        );
        assert_eq!(
            "up 1 2".parse::<ReplCommand>().unwrap(),
            ReplCommand::Pointer(PointerSample::up(Some(Point2D::new(1.0, 2.0))))
        );
        assert_eq!(
            "cancel".parse::<ReplCommand>().unwrap(),
            ReplCommand::Pointer(PointerSample::cancel())
        );
    }

    #[test]
    fn test_parse_geometry_commands() {
        assert_eq!(
            "resize 640 480".parse::<ReplCommand>().unwrap(),
            ReplCommand::Resize {
                width: 640.0,
                height: 480.0
            }
        );
        assert_eq!(
            "geometry 0 0 -5".parse::<ReplCommand>().unwrap(),
            ReplCommand::Geometry {
                center: Point2D::new(0.0, 0.0),
                activity_radius: -5.0
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<ReplCommand>().is_err());
        assert!("down 1".parse::<ReplCommand>().is_err());
        assert!("move x 2".parse::<ReplCommand>().is_err());
        assert!("up 1".parse::<ReplCommand>().is_err());
        assert!("offset now".parse::<ReplCommand>().is_err());
        assert!("jump".parse::<ReplCommand>().is_err());
    }

    #[test]
    fn test_parse_control_commands() {
        assert_eq!("quit".parse::<ReplCommand>().unwrap(), ReplCommand::Exit);
        assert_eq!("exit".parse::<ReplCommand>().unwrap(), ReplCommand::Exit);
        assert_eq!("help".parse::<ReplCommand>().unwrap(), ReplCommand::Help);
        assert_eq!("offset".parse::<ReplCommand>().unwrap(), ReplCommand::Offset);
    }
}
