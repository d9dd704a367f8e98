//! Command-line argument parsing for Skylark.

use std::path::PathBuf;

use clap::Args;

use crate::{Config, ConfigError};

/// Configuration overrides accepted on the command line.
///
/// CLI values override settings loaded from `config.ron`. The binary flattens
/// this into its own argument struct.
#[derive(Args, Debug, Default, Clone)]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Starting longitude in degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub lon: Option<f64>,

    /// Starting latitude in degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,

    /// Starting altitude in meters.
    #[arg(long)]
    pub alt: Option<f64>,

    /// Starting heading in degrees, clockwise from north.
    #[arg(long, allow_hyphen_values = true)]
    pub heading: Option<f64>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// A copy of this config with `args` applied, validated again since the
    /// overrides bypass the checks done at load time.
    pub fn with_cli_overrides(&self, args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = self.clone();
        config.apply_cli_overrides(args);
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(lon) = args.lon {
            self.flight.start_lon_deg = lon;
        }
        if let Some(lat) = args.lat {
            self.flight.start_lat_deg = lat;
        }
        if let Some(alt) = args.alt {
            self.flight.start_alt_m = alt;
        }
        if let Some(heading) = args.heading {
            self.flight.start_heading_deg = heading;
        }
    }
}
