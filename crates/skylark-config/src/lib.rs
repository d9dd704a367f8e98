//! Configuration system for Skylark.
//!
//! Settings persist to disk as `config.ron`, every section falls back to its
//! defaults when missing, and command-line flags override whatever was loaded.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CameraConfig, Config, DebugConfig, FlightConfig, InputConfig, SceneConfig, WindowConfig,
    default_config_dir,
};
pub use error::ConfigError;
