//! Configuration management for the virtual joystick
//!
//! Handles loading, parsing, and hot-reloading of YAML configuration files.

pub mod watcher;

use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::direction::DirectionMapper;
use crate::joystick::{Geometry, SurfaceLayout, DEFAULT_INSET};

pub use watcher::{ConfigUpdate, ConfigWatcher};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct AppConfig {
    #[serde(default)]
    pub surface: SurfaceConfig,
    #[serde(default)]
    pub direction: DirectionConfig,
}

/// Hosting surface size and joystick layout
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct SurfaceConfig {
    #[serde(default = "default_surface_size")]
    pub width: f32,
    #[serde(default = "default_surface_size")]
    pub height: f32,
    /// Gap between the shorter surface edge and the activity circle
    #[serde(default = "default_inset")]
    pub inset: f32,
    /// Fixed activity radius; overrides the inset rule when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_radius: Option<f32>,
    /// Drawn knob radius (rendering only)
    #[serde(default = "default_knob_radius")]
    pub knob_radius: f32,
}

/// Direction classification settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
pub struct DirectionConfig {
    /// Offset magnitude below which the stick reads as centered
    #[serde(default = "default_deadzone")]
    pub deadzone: f32,
    /// Report diagonals (8-way) instead of 4-way directions
    #[serde(default = "default_true")]
    pub diagonals: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: default_surface_size(),
            height: default_surface_size(),
            inset: default_inset(),
            activity_radius: None,
            knob_radius: default_knob_radius(),
        }
    }
}

impl Default for DirectionConfig {
    fn default() -> Self {
        Self {
            deadzone: default_deadzone(),
            diagonals: default_true(),
        }
    }
}

impl SurfaceConfig {
    pub fn layout(&self) -> SurfaceLayout {
        SurfaceLayout {
            inset: self.inset,
            activity_radius: self.activity_radius,
        }
    }

    /// Joystick geometry for the configured surface
    pub fn geometry(&self) -> Result<Geometry> {
        self.layout()
            .geometry_for(self.width, self.height)
            .with_context(|| {
                format!(
                    "Surface {}x{} leaves no usable activity radius",
                    self.width, self.height
                )
            })
    }
}

impl AppConfig {
    /// Load configuration from file with validation
    pub async fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config = Self::from_yaml(&contents)
            .with_context(|| format!("Invalid config file: {}", path))?;

        Ok(config)
    }

    /// Parse and validate configuration from a YAML string
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: AppConfig =
            serde_yaml::from_str(contents).context("Failed to parse YAML config")?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self, path: &str) -> Result<()> {
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .await
            .with_context(|| format!("Failed to write config file: {}", path))?;

        Ok(())
    }

    /// JSON schema of the configuration file
    pub fn json_schema() -> Result<String> {
        let schema = schemars::schema_for!(AppConfig);
        serde_json::to_string_pretty(&schema).context("Failed to serialize config schema")
    }

    /// Validate configuration for correctness and consistency
    pub fn validate(&self) -> Result<()> {
        let surface = &self.surface;

        if !(surface.width.is_finite() && surface.width > 0.0)
            || !(surface.height.is_finite() && surface.height > 0.0)
        {
            anyhow::bail!(
                "Surface size must be positive (got {}x{})",
                surface.width,
                surface.height
            );
        }

        if !surface.inset.is_finite() || surface.inset < 0.0 {
            anyhow::bail!("Surface inset {} must be >= 0", surface.inset);
        }

        let geometry = surface.geometry()?;

        if !surface.knob_radius.is_finite() || surface.knob_radius <= 0.0 {
            anyhow::bail!("Knob radius {} must be > 0", surface.knob_radius);
        }
        if surface.knob_radius > geometry.activity_radius() {
            anyhow::bail!(
                "Knob radius {} exceeds the activity radius {}",
                surface.knob_radius,
                geometry.activity_radius()
            );
        }

        let deadzone = self.direction.deadzone;
        if !(0.0..1.0).contains(&deadzone) {
            anyhow::bail!("Direction deadzone {} must be in [0, 1)", deadzone);
        }

        Ok(())
    }
}

/// A validated config and what the joystick derives from it
#[derive(Debug, Clone, PartialEq)]
pub struct JoystickSettings {
    pub config: AppConfig,
    pub geometry: Geometry,
    pub mapper: DirectionMapper,
}

impl JoystickSettings {
    /// Validate `config` and derive the geometry and direction mapper
    pub fn from_config(config: AppConfig) -> Result<Self> {
        config.validate()?;

        let geometry = config.surface.geometry()?;
        let mapper = DirectionMapper::from_config(&config.direction);

        Ok(Self {
            config,
            geometry,
            mapper,
        })
    }

    pub async fn load(path: &str) -> Result<Self> {
        Self::from_config(AppConfig::load(path).await?)
    }
}

// Default value functions
fn default_surface_size() -> f32 { 300.0 }
fn default_inset() -> f32 { DEFAULT_INSET }
fn default_knob_radius() -> f32 { 15.0 }
fn default_deadzone() -> f32 { 0.2 }
fn default_true() -> bool { true }

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_yaml("{}").unwrap();
        assert_eq!(config, AppConfig::default());

        let geometry = config.surface.geometry().unwrap();
        assert_eq!(geometry.activity_radius(), 130.0);
    }

    #[test]
    fn test_fixed_activity_radius() {
        let config = AppConfig::from_yaml(
            r#"
surface:
  width: 400
  height: 400
  activity_radius: 100
  knob_radius: 50
"#,
        )
        .unwrap();

        let geometry = config.surface.geometry().unwrap();
        assert_eq!(geometry.center().x, 200.0);
        assert_eq!(geometry.activity_radius(), 100.0);
    }

    #[test]
    fn test_rejects_surface_without_room() {
        let err = AppConfig::from_yaml(
            r#"
surface:
  width: 40
  height: 400
"#,
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("activity radius"));
    }

    #[test]
    fn test_rejects_oversized_knob() {
        let result = AppConfig::from_yaml(
            r#"
surface:
  activity_radius: 10
  knob_radius: 20
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_bad_deadzone() {
        assert!(AppConfig::from_yaml("direction:\n  deadzone: 1.0\n").is_err());
        assert!(AppConfig::from_yaml("direction:\n  deadzone: -0.1\n").is_err());
    }

    #[test]
    fn test_rejects_negative_size() {
        assert!(AppConfig::from_yaml("surface:\n  width: -300\n").is_err());
    }

    #[test]
    fn test_schema_mentions_sections() {
        let schema = AppConfig::json_schema().unwrap();
        assert!(schema.contains("surface"));
        assert!(schema.contains("deadzone"));
    }

    #[tokio::test]
    async fn test_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("joystick.yaml");
        let path = path.to_string_lossy().to_string();

        let mut config = AppConfig::default();
        config.surface.width = 640.0;
        config.direction.diagonals = false;
        config.save(&path).await?;

        let loaded = AppConfig::load(&path).await?;
        assert_eq!(loaded, config);
        Ok(())
    }

    #[test]
    fn test_settings_derive_geometry_and_mapper() {
        let mut config = AppConfig::default();
        config.surface.width = 200.0;
        config.surface.height = 100.0;
        config.surface.knob_radius = 10.0;
        config.direction.diagonals = false;

        let settings = JoystickSettings::from_config(config).unwrap();
        assert_eq!(settings.geometry.activity_radius(), 30.0);
        assert_eq!(settings.mapper, DirectionMapper::new(0.2, false));
    }

    #[test]
    fn test_settings_reject_invalid_config() {
        let mut config = AppConfig::default();
        config.surface.width = 10.0;
        assert!(JoystickSettings::from_config(config).is_err());
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        assert!(AppConfig::load("/nonexistent/joystick.yaml").await.is_err());
    }
}
