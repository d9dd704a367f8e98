//! Configuration structs with sensible defaults and RON persistence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Window settings.
    pub window: WindowConfig,
    /// Flight model settings.
    pub flight: FlightConfig,
    /// Chase camera and projection settings.
    pub camera: CameraConfig,
    /// Scene content: aircraft and home marker.
    pub scene: SceneConfig,
    /// Input settings.
    pub input: InputConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    /// Window title prefix. The HUD is appended to it each frame.
    pub title: String,
}

/// Flight model configuration.
///
/// Angles are in degrees, distances in meters, rates per second.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FlightConfig {
    /// Starting longitude.
    pub start_lon_deg: f64,
    /// Starting latitude.
    pub start_lat_deg: f64,
    /// Starting altitude.
    pub start_alt_m: f64,
    /// Starting heading, clockwise from north.
    pub start_heading_deg: f64,
    /// Heading change while a turn key is held.
    pub turn_rate_deg_s: f64,
    /// Ground speed while forward/backward is held; also the climb rate.
    pub move_speed_m_s: f64,
    /// Altitude floor.
    pub min_altitude_m: f64,
    /// Flat-earth conversion used to turn meters into degrees.
    pub meters_per_degree: f64,
    /// Longest frame interval fed to the integrator.
    pub max_frame_dt_s: f64,
}

/// Chase camera configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// How far behind the aircraft the camera sits, in degrees along the heading.
    pub chase_back_deg: f64,
    /// Camera height above the aircraft.
    pub chase_height_m: f64,
    /// Camera pitch (negative looks down).
    pub chase_pitch_deg: f64,
    /// Vertical field of view.
    pub fov_y_deg: f32,
    /// Near clip plane distance.
    pub near_m: f32,
    /// Far clip plane distance.
    pub far_m: f32,
}

/// Scene content configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Label attached to the aircraft.
    pub aircraft_label: String,
    /// Aircraft model scale factor.
    pub aircraft_model_scale: f32,
    /// Aircraft point marker size in pixels.
    pub aircraft_point_px: f32,
    /// Whether to show the home airport marker.
    pub show_home_marker: bool,
    /// Home airport longitude. Independent of the flight start.
    pub home_lon_deg: f64,
    /// Home airport latitude.
    pub home_lat_deg: f64,
    /// Label of the home marker.
    pub home_label: String,
    /// Home marker point size in pixels.
    pub home_point_px: f32,
    /// Globe icosphere subdivision level.
    pub globe_subdivisions: u32,
}

/// Input configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Keybinding overrides (control name -> key name), e.g. `"climb": "PageUp"`.
    pub keybindings: HashMap<String, String>,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Write a JSON log file next to the config in debug builds.
    pub log_to_file: bool,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            vsync: true,
            title: "Skylark".to_string(),
        }
    }
}

impl Default for FlightConfig {
    fn default() -> Self {
        // Singapore Changi, pointing east.
        Self {
            start_lon_deg: 103.9915,
            start_lat_deg: 1.3644,
            start_alt_m: 500.0,
            start_heading_deg: 90.0,
            turn_rate_deg_s: 30.0,
            move_speed_m_s: 50.0,
            min_altitude_m: 50.0,
            meters_per_degree: 111_320.0,
            max_frame_dt_s: 0.25,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            chase_back_deg: 0.02,
            chase_height_m: 300.0,
            chase_pitch_deg: -20.0,
            fov_y_deg: 60.0,
            near_m: 1.0,
            far_m: 1.0e8,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            aircraft_label: "F-16".to_string(),
            aircraft_model_scale: 50.0,
            aircraft_point_px: 15.0,
            show_home_marker: true,
            home_lon_deg: 103.9915,
            home_lat_deg: 1.3644,
            home_label: "Singapore".to_string(),
            home_point_px: 12.0,
            globe_subdivisions: 5,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_to_file: true,
        }
    }
}

/// Returns the platform config directory for Skylark, if the OS exposes one.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("skylark"))
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        new_config.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Reject values the flight model or renderer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.flight;
        if !(f.start_lon_deg.is_finite()
            && f.start_alt_m.is_finite()
            && f.start_heading_deg.is_finite())
        {
            return Err(ConfigError::Invalid {
                field: "flight.start_*",
                reason: "start position and heading must be finite",
            });
        }
        if !(-90.0..=90.0).contains(&f.start_lat_deg) {
            return Err(ConfigError::Invalid {
                field: "flight.start_lat_deg",
                reason: "must be within [-90, 90]",
            });
        }
        if !(f.meters_per_degree > 0.0) {
            return Err(ConfigError::Invalid {
                field: "flight.meters_per_degree",
                reason: "must be positive",
            });
        }
        if !(f.max_frame_dt_s > 0.0) {
            return Err(ConfigError::Invalid {
                field: "flight.max_frame_dt_s",
                reason: "must be positive",
            });
        }
        if f.turn_rate_deg_s < 0.0 || f.move_speed_m_s < 0.0 {
            return Err(ConfigError::Invalid {
                field: "flight",
                reason: "rates must not be negative",
            });
        }
        let scene = &self.scene;
        if !(scene.home_lon_deg.is_finite() && (-90.0..=90.0).contains(&scene.home_lat_deg)) {
            return Err(ConfigError::Invalid {
                field: "scene.home_lon_deg/home_lat_deg",
                reason: "need a finite longitude and a latitude within [-90, 90]",
            });
        }
        let c = &self.camera;
        if c.near_m <= 0.0 || c.far_m <= c.near_m {
            return Err(ConfigError::Invalid {
                field: "camera.near_m/far_m",
                reason: "need 0 < near < far",
            });
        }
        Ok(())
    }
}
