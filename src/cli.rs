//! Command-line interface and REPL

use anyhow::Result;
use colored::*;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::ops::ControlFlow;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, JoystickSettings};
use crate::input::command::{ReplCommand, HELP_TEXT};
use crate::joystick::{JoystickController, JoystickListener, SurfaceLayout};

/// Start the line editor on its own thread.
///
/// Lines arrive on the returned channel; it closes on EOF, Ctrl-C inside the
/// editor, or an editor failure.
pub fn spawn_repl() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                warn!("Failed to start line editor: {}", e);
                return;
            }
        };

        loop {
            match rl.readline("joystick> ") {
                Ok(line) => {
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line.as_str());
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(e) => {
                    warn!("Line editor error: {}", e);
                    break;
                }
            }
        }
        debug!("REPL thread stopped");
    });

    rx
}

/// Apply one REPL command to the controller
///
/// Controller errors are returned to the caller; the joystick state is
/// untouched in that case.
pub fn execute(
    controller: &mut JoystickController,
    layout: &SurfaceLayout,
    command: ReplCommand,
) -> Result<ControlFlow<()>> {
    match command {
        ReplCommand::Pointer(sample) => {
            controller.handle(sample)?;
        }
        ReplCommand::Resize { width, height } => {
            controller.on_size_changed(width, height, layout)?;
            print_geometry(controller);
        }
        ReplCommand::Geometry {
            center,
            activity_radius,
        } => {
            controller.set_geometry(center, activity_radius)?;
            print_geometry(controller);
        }
        ReplCommand::Offset => {
            let offset = controller.offset();
            let knob = controller.knob_position();
            println!(
                "offset=({:.3}, {:.3}) knob=({:.1}, {:.1}) state={:?}",
                offset.x, offset.y, knob.x, knob.y, controller.state()
            );
        }
        ReplCommand::Help => println!("{}", HELP_TEXT),
        ReplCommand::Exit => return Ok(ControlFlow::Break(())),
    }

    Ok(ControlFlow::Continue(()))
}

/// Switch the controller to freshly loaded settings.
///
/// The listener is replaced first so that the release caused by the new
/// geometry (a `(0, 0)` notification) reaches the listener built for it.
pub fn apply_settings(
    controller: &mut JoystickController,
    settings: &JoystickSettings,
    listener: impl JoystickListener + 'static,
) {
    controller.set_listener(listener);
    controller.apply_geometry(settings.geometry);
    info!(
        "Applied surface {}x{} (activity radius {:.1})",
        settings.config.surface.width,
        settings.config.surface.height,
        settings.geometry.activity_radius()
    );
}

/// Validate `config` and apply it; on error the controller is left as it was
pub fn apply_config<L, F>(
    controller: &mut JoystickController,
    config: &AppConfig,
    make_listener: F,
) -> Result<JoystickSettings>
where
    L: JoystickListener + 'static,
    F: FnOnce(&JoystickSettings) -> L,
{
    let settings = JoystickSettings::from_config(config.clone())?;
    apply_settings(controller, &settings, make_listener(&settings));
    Ok(settings)
}

fn print_geometry(controller: &JoystickController) {
    let geometry = controller.geometry();
    println!(
        "{} center=({:.1}, {:.1}) activity_radius={:.1}",
        "geometry".yellow(),
        geometry.center().x,
        geometry.center().y,
        geometry.activity_radius()
    );
}
