use std::sync::OnceLock;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::{error, info};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
const ENV_PREFIX: &str = "GRIDWALK";

/// Screen the grid is laid out on (px). The window is opened at this size.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScreenSettings {
    pub width: f32,
    pub height: f32,
}

impl Default for ScreenSettings {
    fn default() -> Self {
        ScreenSettings { width: 640.0, height: 480.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub rows: i32,
    pub columns: i32,
    pub wrap: bool,
    /// Slide speed (px/s)
    pub velocity: f32,
    /// Grid line color as RGBA
    pub color: [u8; 4],
}

impl Default for GridSettings {
    fn default() -> Self {
        GridSettings {
            rows: 3,
            columns: 4,
            wrap: true,
            velocity: 150.0,
            color: [90, 90, 90, 255],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Physics and grid update rate
    pub tick_hz: u32,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        SimulationSettings { tick_hz: 60 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub screen: ScreenSettings,
    pub grid: GridSettings,
    pub simulation: SimulationSettings,
}

/// Loads settings from `config/default.toml` (optional) with `GRIDWALK_*`
/// environment overrides, e.g. `GRIDWALK_GRID__ROWS=5`.
pub fn load_settings() -> Result<Settings, ConfigError> {
    info!("Attempting to load configuration from {}", DEFAULT_CONFIG_PATH);

    let builder = Config::builder()
        .add_source(File::new(DEFAULT_CONFIG_PATH, FileFormat::Toml).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    match builder.build().and_then(|c| c.try_deserialize::<Settings>()) {
        Ok(settings) => {
            info!(?settings, "Successfully loaded configuration");
            Ok(settings)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Process-wide settings, loaded on first use. The window configuration and
/// the simulation read the same copy. A load failure falls back to defaults.
pub fn settings() -> &'static Settings {
    SETTINGS.get_or_init(|| {
        load_settings().unwrap_or_else(|e| {
            error!("Falling back to default settings: {}", e);
            Settings::default()
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(text: &str) -> Result<Settings, ConfigError> {
        Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    #[test]
    fn test_defaults_when_empty() {
        let settings = from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.grid.rows, 3);
        assert_eq!(settings.grid.columns, 4);
        assert_eq!(settings.simulation.tick_hz, 60);
    }

    #[test]
    fn test_partial_override() {
        let settings = from_toml(
            r#"
            [grid]
            rows = 6
            wrap = false

            [screen]
            width = 800.0
            "#,
        )
        .unwrap();
        assert_eq!(settings.grid.rows, 6);
        assert!(!settings.grid.wrap);
        assert_eq!(settings.grid.columns, 4);
        assert_eq!(settings.screen.width, 800.0);
        assert_eq!(settings.screen.height, 480.0);
    }

    #[test]
    fn test_color_array() {
        let settings = from_toml("[grid]\ncolor = [1, 2, 3, 4]\n").unwrap();
        assert_eq!(settings.grid.color, [1, 2, 3, 4]);
    }

    #[test]
    fn test_invalid_type_is_an_error() {
        assert!(from_toml("[grid]\nrows = \"many\"\n").is_err());
    }

    #[test]
    fn test_settings_loaded_once() {
        let first = settings();
        let second = settings();
        assert!(std::ptr::eq(first, second));
        assert!(first.grid.rows > 0);
    }
}
