//! Skylark: fly a simple aircraft over a WGS84 globe with a chase camera.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p skylark-app` to open the window, or with
//! `cargo run -p skylark-app -- --headless --hold forward,climb` to fly without one.

use std::process::ExitCode;

use clap::Parser;
use skylark_app::headless::{HeadlessRun, run_headless};
use skylark_app::platform::PlatformDirs;
use skylark_config::{CliArgs, Config};
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "skylark", about = "Keyboard-driven flight over a WGS84 globe")]
struct AppArgs {
    #[command(flatten)]
    cli: CliArgs,

    /// Run without a window and exit after `--frames` frames.
    #[arg(long)]
    headless: bool,

    /// Frames to simulate in headless mode.
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Seconds per headless frame.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,

    /// Controls held for the whole headless run, e.g. `forward,turn_left`.
    #[arg(long, value_delimiter = ',')]
    hold: Vec<String>,
}

fn main() -> ExitCode {
    let args = AppArgs::parse();

    let dirs = match PlatformDirs::from_override(args.cli.config.as_deref()) {
        Ok(dirs) => dirs,
        Err(e) => {
            eprintln!("Failed to resolve config directory: {e}");
            return ExitCode::FAILURE;
        }
    };

    let file_config = Config::load_or_create(&dirs.config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    let config = match file_config.with_cli_overrides(&args.cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid command-line override: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(path) =
        skylark_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config))
    {
        info!("Logging to {}", path.display());
    }

    if args.headless {
        let run = match HeadlessRun::new(args.frames, args.dt, &args.hold) {
            Ok(run) => run,
            Err(e) => {
                error!("{e}");
                return ExitCode::FAILURE;
            }
        };
        return match run_headless(&config, &run) {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                error!("Headless run failed: {e}");
                ExitCode::FAILURE
            }
        };
    }

    match skylark_app::app::run(file_config, args.cli, dirs.config_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
