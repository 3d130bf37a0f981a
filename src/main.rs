//! Virtual Joystick - terminal front end
//!
//! Feeds pointer samples from a REPL or a recorded trace into the joystick
//! controller and prints the resulting offsets.

use anyhow::{Context, Result};
use clap::Parser;
use std::ops::ControlFlow;
use std::path::Path;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use virtual_joystick::cli;
use virtual_joystick::config::{AppConfig, ConfigUpdate, ConfigWatcher, JoystickSettings};
use virtual_joystick::console::ConsoleListener;
use virtual_joystick::input::{load_trace, replay_trace, ReplCommand};
use virtual_joystick::JoystickController;

/// Virtual Joystick - clamp pointer input to a circle and report normalized offsets
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "joystick.yaml")]
    config: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Replay a CSV pointer trace (phase,x,y) instead of starting the REPL
    #[arg(long)]
    replay: Option<String>,

    /// Print offsets as JSON lines
    #[arg(long)]
    json: bool,

    /// Print the configuration JSON schema and exit
    #[arg(long)]
    print_schema: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_logging(&args.log_level)?;

    if args.print_schema {
        println!("{}", AppConfig::json_schema()?);
        return Ok(());
    }

    info!("Starting virtual joystick...");
    info!("Configuration file: {}", args.config);

    if let Some(trace_path) = &args.replay {
        let settings = load_settings_or_default(&args.config).await?;
        return run_replay(&settings, trace_path, args.json);
    }

    // Hot reload only when there is a file to watch
    let (watcher, settings) = if Path::new(&args.config).exists() {
        let (watcher, settings) = ConfigWatcher::new(args.config.clone()).await?;
        info!("Configuration loaded with hot-reload enabled");
        (Some(watcher), settings)
    } else {
        info!("No configuration file, using defaults");
        (None, JoystickSettings::from_config(AppConfig::default())?)
    };

    run_interactive(settings, watcher, args.json, shutdown_signal()).await?;

    info!("Virtual joystick shutdown complete");
    Ok(())
}

async fn load_settings_or_default(path: &str) -> Result<JoystickSettings> {
    if Path::new(path).exists() {
        JoystickSettings::load(path).await
    } else {
        info!("No configuration file, using defaults");
        JoystickSettings::from_config(AppConfig::default())
    }
}

fn make_controller(settings: &JoystickSettings, json: bool) -> JoystickController {
    let mut controller = JoystickController::new(settings.geometry);
    controller.set_listener(ConsoleListener::new(settings.mapper, json));
    controller
}

fn run_replay(settings: &JoystickSettings, trace_path: &str, json: bool) -> Result<()> {
    let samples = load_trace(trace_path)?;
    info!("Replaying {} samples from {}", samples.len(), trace_path);

    let mut controller = make_controller(settings, json);
    let summary = replay_trace(&mut controller, &samples);

    if summary.rejected > 0 {
        warn!("{} samples were rejected", summary.rejected);
    }
    Ok(())
}

async fn run_interactive(
    mut settings: JoystickSettings,
    mut watcher: Option<ConfigWatcher>,
    json: bool,
    shutdown: impl std::future::Future<Output = ()>,
) -> Result<()> {
    let mut controller = make_controller(&settings, json);
    let mut lines = cli::spawn_repl();

    println!("Type 'help' for commands.");

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else {
                    debug!("REPL input closed");
                    break;
                };

                let outcome = line
                    .parse::<ReplCommand>()
                    .and_then(|command| cli::execute(&mut controller, &settings.config.surface.layout(), command));

                match outcome {
                    Ok(ControlFlow::Break(())) => break,
                    Ok(ControlFlow::Continue(())) => {}
                    Err(e) => println!("error: {:#}", e),
                }
            }

            Some(update) = next_update(&mut watcher) => match update {
                ConfigUpdate::Applied(new_settings) => {
                    // Resize voids any gesture in progress
                    let listener = ConsoleListener::new(new_settings.mapper, json);
                    cli::apply_settings(&mut controller, &new_settings, listener);
                    settings = new_settings;
                }
                ConfigUpdate::Rejected(e) => {
                    println!("config reload rejected: {:#}", e);
                }
            },

            _ = &mut shutdown => {
                info!("Shutdown signal received, stopping event loop");
                break;
            }
        }
    }

    Ok(())
}

async fn next_update(watcher: &mut Option<ConfigWatcher>) -> Option<ConfigUpdate> {
    match watcher {
        Some(watcher) => watcher.next_update().await,
        None => std::future::pending().await,
    }
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
}
