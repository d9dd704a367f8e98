//! Windowless runs: fly a fixed number of frames at a fixed step with a set
//! of controls held, logging the HUD as it goes.

use std::time::{Duration, Instant};

use skylark_config::Config;
use skylark_input::{ControlBindings, FlightControl, KeyboardState, RawKeyEvent};
use skylark_view::HeadlessViewer;
use thiserror::Error;
use tracing::info;
use winit::keyboard::PhysicalKey;

use crate::frame::FlightSession;

#[derive(Debug, Error, PartialEq)]
pub enum HeadlessError {
    #[error("unknown flight control '{0}'")]
    UnknownControl(String),
    #[error("no key bound to '{0}'")]
    Unbound(FlightControl),
    #[error("frame step must be a finite, non-negative number of seconds, got {0}")]
    InvalidDt(f64),
}

/// A scripted headless run.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessRun {
    pub frames: u64,
    /// Seconds between frames.
    pub dt: f64,
    pub hold: Vec<FlightControl>,
}

impl HeadlessRun {
    /// Build a run from control names such as `forward` or `turn_left`.
    pub fn new(frames: u64, dt: f64, hold: &[String]) -> Result<Self, HeadlessError> {
        if !(dt.is_finite() && dt >= 0.0) {
            return Err(HeadlessError::InvalidDt(dt));
        }
        let hold = hold
            .iter()
            .map(|name| {
                FlightControl::from_name(name.trim())
                    .ok_or_else(|| HeadlessError::UnknownControl(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { frames, dt, hold })
    }
}

/// Fly `run` against a [`HeadlessViewer`] and return the finished session.
///
/// Held controls are pressed on a real [`KeyboardState`] through the
/// configured bindings, so overrides in `config.ron` apply here too.
pub fn run_headless(
    config: &Config,
    run: &HeadlessRun,
) -> Result<FlightSession<HeadlessViewer>, HeadlessError> {
    let bindings = ControlBindings::from_overrides(&config.input.keybindings);
    let mut keyboard = KeyboardState::new();
    for &control in &run.hold {
        let key = bindings
            .key_for(control)
            .ok_or(HeadlessError::Unbound(control))?;
        keyboard.process_raw(RawKeyEvent::pressed(PhysicalKey::Code(key)));
    }

    let start = Instant::now();
    let mut session = FlightSession::start(HeadlessViewer::new(), config, start);
    let mut last_fps = session.fps();

    for frame in 1..=run.frames {
        let now = Duration::try_from_secs_f64(run.dt * frame as f64)
            .ok()
            .and_then(|offset| start.checked_add(offset))
            .ok_or(HeadlessError::InvalidDt(run.dt))?;
        session.run_frame(now, &keyboard);
        keyboard.clear_transients();

        if session.fps() != last_fps || frame == run.frames {
            last_fps = session.fps();
            if let Some(hud) = session.viewer().hud() {
                info!("[frame {frame}] {}", hud.line());
            }
        }
    }

    info!(
        "Headless run finished: {} frames, {:.2}s simulated, now at {}",
        session.frames(),
        run.dt * run.frames as f64,
        session.state().position()
    );
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_hold() {
        let run = HeadlessRun::new(10, 0.1, &names(&["forward", " climb"])).unwrap();
        assert_eq!(run.hold, vec![FlightControl::Forward, FlightControl::Climb]);
    }

    #[test]
    fn test_unknown_control_rejected() {
        let err = HeadlessRun::new(10, 0.1, &names(&["barrel_roll"])).unwrap_err();
        assert_eq!(err, HeadlessError::UnknownControl("barrel_roll".to_string()));
    }

    #[test]
    fn test_invalid_dt_rejected() {
        for dt in [-0.1, f64::INFINITY] {
            let err = HeadlessRun::new(2, dt, &[]).unwrap_err();
            assert_eq!(err, HeadlessError::InvalidDt(dt));
        }
        let err = HeadlessRun::new(2, f64::NAN, &[]).unwrap_err();
        assert!(matches!(err, HeadlessError::InvalidDt(dt) if dt.is_nan()));
        assert!(HeadlessRun::new(2, 0.0, &[]).is_ok());
    }

    #[test]
    fn test_hand_built_run_with_bad_dt_fails_cleanly() {
        let config = Config::default();
        for dt in [-0.1, 1e300] {
            let run = HeadlessRun {
                frames: 2,
                dt,
                hold: Vec::new(),
            };
            assert_eq!(
                run_headless(&config, &run).err(),
                Some(HeadlessError::InvalidDt(dt))
            );
        }
    }

    #[test]
    fn test_idle_run_stays_put() {
        let config = Config::default();
        let run = HeadlessRun::new(30, 1.0 / 30.0, &[]).unwrap();
        let session = run_headless(&config, &run).unwrap();
        assert_eq!(session.frames(), 30);
        assert_eq!(
            session.state().position(),
            skylark_sim::FlightState::from_config(&config.flight).position()
        );
    }

    #[test]
    fn test_climb_for_two_seconds() {
        let run = HeadlessRun::new(20, 0.1, &names(&["climb"])).unwrap();
        let session = run_headless(&Config::default(), &run).unwrap();
        assert!((session.state().alt - 600.0).abs() < 1e-6);
        assert_eq!(session.fps(), 10);
        assert_eq!(session.viewer().pose_updates(), 20);
    }

    #[test]
    fn test_rebound_control_is_pressed() {
        let mut config = Config::default();
        config
            .input
            .keybindings
            .insert("turn_right".to_string(), "KeyL".to_string());
        let run = HeadlessRun::new(10, 0.1, &names(&["turn_right"])).unwrap();
        let session = run_headless(&config, &run).unwrap();
        assert!((session.state().heading - 120.0).abs() < 1e-9);
    }
}
