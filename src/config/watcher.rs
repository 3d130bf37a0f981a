//! Configuration file watcher for hot-reload support
//!
//! A single save often shows up as several modify events (truncate, write,
//! metadata). Events are collapsed into one reload once the file has been
//! quiet for [`SETTLE_DELAY`], and each reload is re-derived into
//! [`JoystickSettings`] before it is handed to the event loop.

use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::JoystickSettings;

/// Quiet period after the last file event before the config is re-read
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Outcome of one reload
#[derive(Debug)]
pub enum ConfigUpdate {
    /// New settings, ready to apply to the controller
    Applied(JoystickSettings),
    /// The file changed but could not be used; the previous settings stay
    Rejected(anyhow::Error),
}

/// Watches the config file and delivers re-derived joystick settings
pub struct ConfigWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<ConfigUpdate>,
}

impl ConfigWatcher {
    /// Load `config_path` and start watching it.
    ///
    /// Returns the watcher together with the initial settings. Fails if the
    /// initial file is missing or invalid.
    pub async fn new(config_path: String) -> Result<(Self, JoystickSettings)> {
        let initial = JoystickSettings::load(&config_path)
            .await
            .context("Failed to load initial config")?;

        let (event_tx, event_rx) = mpsc::unbounded_channel::<()>();
        let (tx, rx) = mpsc::channel(10);

        // Runs on the notify thread; it only flags that the file changed
        let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            match res {
                Ok(event) => {
                    if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                        debug!("Config file event: {:?}", event.kind);
                        let _ = event_tx.send(());
                    }
                }
                Err(e) => {
                    error!("Watch error: {}", e);
                }
            }
        })?;

        watcher
            .watch(Path::new(&config_path), RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch config file: {}", config_path))?;

        tokio::spawn(reload_loop(config_path.clone(), event_rx, tx));

        info!("Config file watcher started for: {}", config_path);

        Ok((
            Self {
                _watcher: watcher,
                rx,
            },
            initial,
        ))
    }

    /// Wait for the next reload outcome
    /// Returns None if the watcher has been closed
    pub async fn next_update(&mut self) -> Option<ConfigUpdate> {
        self.rx.recv().await
    }
}

async fn reload_loop(
    config_path: String,
    mut events: mpsc::UnboundedReceiver<()>,
    tx: mpsc::Sender<ConfigUpdate>,
) {
    while events.recv().await.is_some() {
        // Swallow the rest of the burst
        let mut merged = 0u32;
        loop {
            match tokio::time::timeout(SETTLE_DELAY, events.recv()).await {
                Ok(Some(())) => merged += 1,
                Ok(None) => return,
                Err(_) => break,
            }
        }
        if merged > 0 {
            debug!("Merged {} extra config file events", merged);
        }

        let update = match JoystickSettings::load(&config_path).await {
            Ok(settings) => {
                info!("Configuration reloaded successfully");
                ConfigUpdate::Applied(settings)
            }
            Err(e) => {
                warn!("Failed to reload config (keeping old config): {:#}", e);
                ConfigUpdate::Rejected(e)
            }
        };

        if tx.send(update).await.is_err() {
            debug!("Config update receiver dropped, stopping reload loop");
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const WAIT: Duration = Duration::from_secs(2);

    async fn start(config_path: &Path, contents: &str) -> Result<(ConfigWatcher, JoystickSettings)> {
        fs::write(config_path, contents)?;
        let started = ConfigWatcher::new(config_path.to_string_lossy().to_string()).await?;
        tokio::time::sleep(SETTLE_DELAY).await;
        Ok(started)
    }

    #[tokio::test]
    async fn test_config_watcher_reloads_surface() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("joystick.yaml");

        let (mut watcher, initial) =
            start(&config_path, "surface:\n  width: 300\n  height: 300\n").await?;

        assert_eq!(initial.config.surface.width, 300.0);
        assert_eq!(initial.geometry.activity_radius(), 130.0);

        let modified_config = r#"
surface:
  width: 500
  height: 300
  activity_radius: 100
direction:
  diagonals: false
"#;
        fs::write(&config_path, modified_config)?;

        let update = tokio::time::timeout(WAIT, watcher.next_update()).await?;
        match update {
            Some(ConfigUpdate::Applied(settings)) => {
                assert_eq!(settings.config.surface.width, 500.0);
                assert_eq!(settings.geometry.center().x, 250.0);
                assert_eq!(settings.geometry.activity_radius(), 100.0);
                assert!(!settings.config.direction.diagonals);
            }
            other => panic!("expected applied settings, got {:?}", other),
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_config_watcher_reports_rejected_then_recovers() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("joystick.yaml");

        let (mut watcher, _) = start(&config_path, "surface:\n  width: 300\n").await?;

        // No room for the activity circle
        fs::write(&config_path, "surface:\n  width: 10\n  height: 300\n")?;
        let update = tokio::time::timeout(WAIT, watcher.next_update()).await?;
        assert!(
            matches!(update, Some(ConfigUpdate::Rejected(_))),
            "expected a rejected reload, got {:?}",
            update
        );

        fs::write(&config_path, "surface:\n  width: 500\n  height: 300\n")?;
        let update = tokio::time::timeout(WAIT, watcher.next_update()).await?;
        match update {
            Some(ConfigUpdate::Applied(settings)) => {
                assert_eq!(settings.config.surface.width, 500.0);
            }
            other => panic!("expected applied settings, got {:?}", other),
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_config_watcher_merges_burst_of_writes() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("joystick.yaml");

        let (mut watcher, _) = start(&config_path, "surface:\n  width: 300\n").await?;

        for width in [400, 450, 500] {
            fs::write(&config_path, format!("surface:\n  width: {}\n", width))?;
        }

        let update = tokio::time::timeout(WAIT, watcher.next_update()).await?;
        match update {
            Some(ConfigUpdate::Applied(settings)) => {
                assert_eq!(settings.config.surface.width, 500.0);
            }
            other => panic!("expected applied settings, got {:?}", other),
        }

        // The burst produced a single reload
        let extra = tokio::time::timeout(SETTLE_DELAY * 4, watcher.next_update()).await;
        assert!(extra.is_err(), "unexpected second update: {:?}", extra);

        Ok(())
    }

    #[tokio::test]
    async fn test_config_watcher_rejects_invalid_initial_config() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("joystick.yaml");
        fs::write(&config_path, "surface:\n  width: 10\n  height: 10\n")?;

        let result = ConfigWatcher::new(config_path.to_string_lossy().to_string()).await;
        assert!(result.is_err());
        Ok(())
    }
}
