//! Windowed mode: winit event handling around a [`FlightSession`] drawn by
//! the [`GlobeRenderer`].

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use skylark_config::{CliArgs, Config, ConfigError};
use skylark_input::KeyboardState;
use skylark_render::{GlobeRenderer, GlobeSettings, SurfaceError};
use thiserror::Error;
use tracing::{error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::error::EventLoopError;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{WindowAttributes, WindowId};

use crate::frame::FlightSession;

/// Key that re-reads `config.ron` while flying.
pub const RELOAD_KEY: KeyCode = KeyCode::F5;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] EventLoopError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Window attributes from the `window` config section.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
}

/// Renderer settings from the window, camera and scene config sections.
pub fn globe_settings_from_config(config: &Config) -> GlobeSettings {
    GlobeSettings {
        title: config.window.title.clone(),
        vsync: config.window.vsync,
        fov_y_deg: config.camera.fov_y_deg,
        near_m: config.camera.near_m,
        far_m: config.camera.far_m,
        globe_subdivisions: config.scene.globe_subdivisions,
    }
}

pub struct SkylarkApp {
    /// As read from `config.ron`, before command-line overrides.
    file_config: Config,
    cli: CliArgs,
    /// What the session runs with.
    config: Config,
    config_dir: PathBuf,
    keyboard: KeyboardState,
    session: Option<FlightSession<GlobeRenderer>>,
}

impl SkylarkApp {
    /// Command-line overrides stay in force across reloads.
    pub fn new(
        file_config: Config,
        cli: CliArgs,
        config_dir: PathBuf,
    ) -> Result<Self, ConfigError> {
        let config = file_config.with_cli_overrides(&cli)?;
        Ok(Self {
            file_config,
            cli,
            config,
            config_dir,
            keyboard: KeyboardState::new(),
            session: None,
        })
    }

    fn reload_config(&mut self) {
        let reloaded = self
            .file_config
            .reload(&self.config_dir)
            .and_then(|file| match file {
                Some(file) => Ok(Some((file.with_cli_overrides(&self.cli)?, file))),
                None => Ok(None),
            });
        match reloaded {
            Ok(Some((config, file))) => {
                if let Some(session) = self.session.as_mut() {
                    session.apply_config(&config);
                }
                self.file_config = file;
                self.config = config;
            }
            Ok(None) => info!("Config unchanged"),
            Err(e) => warn!("Config reload failed, keeping current settings: {e}"),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if self.keyboard.just_pressed(PhysicalKey::Code(RELOAD_KEY)) {
            self.reload_config();
        }

        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.run_frame(Instant::now(), &self.keyboard);

        let renderer = session.viewer_mut();
        match renderer.render() {
            Ok(()) => {}
            Err(SurfaceError::Lost) => renderer.reconfigure(),
            Err(SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                event_loop.exit();
                return;
            }
            Err(SurfaceError::Timeout) => warn!("Surface texture acquisition timed out"),
        }

        self.keyboard.clear_transients();
        renderer.request_redraw();
    }
}

impl ApplicationHandler for SkylarkApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() {
            return;
        }

        let window = match event_loop.create_window(window_attributes_from_config(&self.config)) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Window creation failed: {e}");
                event_loop.exit();
                return;
            }
        };

        match GlobeRenderer::new(window, &globe_settings_from_config(&self.config)) {
            Ok(renderer) => {
                renderer.request_redraw();
                self.session = Some(FlightSession::start(renderer, &self.config, Instant::now()));
            }
            Err(e) => {
                error!("GPU initialization failed: {e}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Focused(false) => {
                self.keyboard.release_all();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.keyboard.process_event(&event);
            }
            WindowEvent::Resized(size) => {
                if let Some(session) = self.session.as_mut() {
                    session.viewer_mut().resize(size.width, size.height);
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(session) = self.session.as_mut() {
                    session.viewer_mut().rescale(scale_factor);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

/// Open the window and fly until it is closed.
#[instrument(skip_all)]
pub fn run(file_config: Config, cli: CliArgs, config_dir: PathBuf) -> Result<(), AppError> {
    let mut app = SkylarkApp::new(file_config, cli, config_dir)?;
    let event_loop = EventLoop::new()?;
    event_loop.run_app(&mut app)?;
    Ok(())
}
