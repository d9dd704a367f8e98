//! The per-frame flight loop.
//!
//! [`FlightSession`] owns the flight state and drives any [`Viewer`]. Each
//! call to [`run_frame`](FlightSession::run_frame) measures elapsed time,
//! integrates, refreshes the HUD and FPS counter, then moves the aircraft and
//! the chase camera, in that order.

use std::collections::HashSet;
use std::time::Instant;

use skylark_config::Config;
use skylark_geo::{Ellipsoid, Geodetic, HeadingPitchRoll, heading_pitch_roll_quaternion};
use skylark_input::{ControlBindings, ControlState, KeyboardState};
use skylark_sim::{
    ChaseParams, FlightParams, FlightState, FpsCounter, build_hud, chase_view, integrate,
};
use skylark_view::{
    Color, EntityId, EntitySpec, HudText, LabelSpec, ModelSpec, PointSpec, Viewer, ViewerError,
};
use tracing::{debug, info, warn};

/// Wall-clock frame timer with an upper bound on the step it reports.
#[derive(Debug, Clone)]
pub struct FrameClock {
    previous: Instant,
    max_dt: f64,
}

impl FrameClock {
    pub fn new(start: Instant, max_dt: f64) -> Self {
        Self {
            previous: start,
            max_dt,
        }
    }

    /// Seconds since the previous tick, clamped to `max_dt`. Time that runs
    /// backwards reads as zero.
    pub fn tick(&mut self, now: Instant) -> f64 {
        let dt = now.saturating_duration_since(self.previous).as_secs_f64();
        self.previous = now;
        if dt > self.max_dt {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                dt * 1000.0,
                self.max_dt * 1000.0
            );
            self.max_dt
        } else {
            dt
        }
    }

    pub fn set_max_dt(&mut self, max_dt: f64) {
        self.max_dt = max_dt;
    }
}

/// The aircraft, its optional home marker, and the loop that moves them.
pub struct FlightSession<V: Viewer> {
    viewer: V,
    ellipsoid: Ellipsoid,
    state: FlightState,
    params: FlightParams,
    chase: ChaseParams,
    bindings: ControlBindings,
    clock: FrameClock,
    fps: FpsCounter,
    aircraft: EntityId,
    home: Option<Geodetic>,
    frames: u64,
    reported: HashSet<&'static str>,
}

impl<V: Viewer> FlightSession<V> {
    /// Populate `viewer` with the aircraft and home marker and mark it ready.
    pub fn start(mut viewer: V, config: &Config, now: Instant) -> Self {
        let state = FlightState::from_config(&config.flight);
        let ellipsoid = Ellipsoid::WGS84;
        let scene = &config.scene;

        let aircraft = viewer.add_entity(
            EntitySpec::new("aircraft", state.position())
                .with_model(ModelSpec {
                    scale: scene.aircraft_model_scale,
                })
                .with_label(LabelSpec {
                    text: scene.aircraft_label.clone(),
                    color: Color::YELLOW,
                    pixel_offset: [0.0, -60.0],
                })
                .with_point(PointSpec {
                    pixel_size: scene.aircraft_point_px,
                    color: Color::RED,
                }),
        );

        let home = scene.show_home_marker.then(|| {
            let position = Geodetic::new(scene.home_lon_deg, scene.home_lat_deg, 0.0);
            viewer.add_entity(
                EntitySpec::new("home", position)
                    .with_label(LabelSpec {
                        text: scene.home_label.clone(),
                        color: Color::WHITE,
                        pixel_offset: [0.0, 0.0],
                    })
                    .with_point(PointSpec {
                        pixel_size: scene.home_point_px,
                        color: Color::CYAN,
                    }),
            );
            position
        });

        let bindings = ControlBindings::from_overrides(&config.input.keybindings);
        let chase = ChaseParams::from(&config.camera);
        viewer.set_camera_view(&chase_view(&state, &chase));
        viewer.show_ready();
        info!("Flight simulator initialized at {}", state.position());

        Self {
            viewer,
            ellipsoid,
            state,
            params: FlightParams::from(&config.flight),
            chase,
            bindings,
            clock: FrameClock::new(now, config.flight.max_frame_dt_s),
            fps: FpsCounter::new(now),
            aircraft,
            home,
            frames: 0,
            reported: HashSet::new(),
        }
    }

    /// One frame driven by the live keyboard.
    pub fn run_frame(&mut self, now: Instant, keyboard: &KeyboardState) {
        let controls = self.bindings.sample(keyboard);
        self.run_frame_with(now, &controls);
    }

    /// One frame with already-sampled controls.
    pub fn run_frame_with(&mut self, now: Instant, controls: &ControlState) {
        let dt = self.clock.tick(now);

        integrate(&mut self.state, controls, dt, &self.params);

        let hud = build_hud(&self.state, self.fps.fps(), self.home);
        if let Err(e) = self.viewer.set_hud(&hud) {
            self.report("HUD update", e);
        }

        if let Some(fps) = self.fps.tick(now) {
            // The new count shows on the frame it is published.
            let hud = HudText {
                fps: fps.to_string(),
                ..hud
            };
            debug!("{}", hud.line());
            if let Err(e) = self.viewer.set_hud(&hud) {
                self.report("HUD update", e);
            }
        }

        let position = self.state.position();
        let orientation = heading_pitch_roll_quaternion(
            &self.ellipsoid,
            position,
            HeadingPitchRoll::new(self.state.heading_rad(), 0.0, 0.0),
        );
        if let Err(e) = self
            .viewer
            .set_entity_pose(self.aircraft, position, Some(orientation))
        {
            self.report("Aircraft pose update", e);
        }

        self.viewer
            .set_camera_view(&chase_view(&self.state, &self.chase));

        self.frames += 1;
    }

    /// Take rates, limits, camera offsets and bindings from a reloaded config.
    /// The current position is kept.
    pub fn apply_config(&mut self, config: &Config) {
        self.params = FlightParams::from(&config.flight);
        self.chase = ChaseParams::from(&config.camera);
        self.bindings = ControlBindings::from_overrides(&config.input.keybindings);
        self.clock.set_max_dt(config.flight.max_frame_dt_s);
        info!("Applied reloaded flight, camera and input settings");
    }

    /// Warn the first time each kind of update fails, then only at debug.
    fn report(&mut self, what: &'static str, error: ViewerError) {
        if self.reported.insert(what) {
            warn!("{what} skipped: {error}");
        } else {
            debug!("{what} skipped: {error}");
        }
    }

    pub fn state(&self) -> &FlightState {
        &self.state
    }

    pub fn viewer(&self) -> &V {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut V {
        &mut self.viewer
    }

    pub fn aircraft(&self) -> EntityId {
        self.aircraft
    }

    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use skylark_geo::forward_of;
    use skylark_input::{FlightControl, RawKeyEvent};
    use skylark_view::HeadlessViewer;
    use std::time::Duration;
    use winit::keyboard::{KeyCode, PhysicalKey};

    fn session(viewer: HeadlessViewer) -> (FlightSession<HeadlessViewer>, Instant) {
        let t0 = Instant::now();
        (FlightSession::start(viewer, &Config::default(), t0), t0)
    }

    fn at(t0: Instant, secs: f64) -> Instant {
        t0 + Duration::from_secs_f64(secs)
    }

    #[test]
    fn test_clock_measures_and_clamps() {
        let t0 = Instant::now();
        let mut clock = FrameClock::new(t0, 0.25);
        assert!((clock.tick(at(t0, 0.016)) - 0.016).abs() < 1e-9);
        assert_eq!(clock.tick(at(t0, 2.0)), 0.25);
        // Going backwards reads as zero.
        assert_eq!(clock.tick(at(t0, 1.0)), 0.0);
    }

    #[test]
    fn test_start_populates_viewer() {
        let (session, _) = session(HeadlessViewer::new());
        let viewer = session.viewer();
        assert!(viewer.is_ready());
        assert_eq!(viewer.entities().len(), 2);

        let aircraft = viewer.entity(session.aircraft()).unwrap();
        assert_eq!(aircraft.spec.model, Some(ModelSpec { scale: 50.0 }));
        let label = aircraft.spec.label.as_ref().unwrap();
        assert_eq!(label.text, "F-16");
        assert_eq!(label.color, Color::YELLOW);
        assert_eq!(label.pixel_offset, [0.0, -60.0]);
        let point = aircraft.spec.point.unwrap();
        assert_eq!(point.pixel_size, 15.0);
        assert_eq!(point.color, Color::RED);

        let home = viewer
            .entities()
            .iter()
            .find(|e| e.spec.name == "home")
            .unwrap();
        assert_eq!(home.position().alt_m, 0.0);
        assert_eq!(home.position().lon_deg, 103.9915);
        assert_eq!(home.spec.point.unwrap().color, Color::CYAN);
        assert_eq!(home.spec.label.as_ref().unwrap().text, "Singapore");
    }

    #[test]
    fn test_home_marker_stays_at_airport_when_start_moves() {
        let mut config = Config::default();
        config.flight.start_lon_deg = -0.4543;
        config.flight.start_lat_deg = 51.47;
        let session = FlightSession::start(HeadlessViewer::new(), &config, Instant::now());

        let home = session
            .viewer()
            .entities()
            .iter()
            .find(|e| e.spec.name == "home")
            .unwrap();
        assert_eq!(home.position(), Geodetic::new(103.9915, 1.3644, 0.0));
        let label = home.spec.label.as_ref().unwrap();
        assert_eq!(label.color, Color::WHITE);
        assert_eq!(label.pixel_offset, [0.0, 0.0]);

        let aircraft = session.viewer().entity(session.aircraft()).unwrap();
        assert_eq!(aircraft.position().lon_deg, -0.4543);
    }

    #[test]
    fn test_home_marker_optional() {
        let mut config = Config::default();
        config.scene.show_home_marker = false;
        let session = FlightSession::start(HeadlessViewer::new(), &config, Instant::now());
        assert_eq!(session.viewer().entities().len(), 1);
    }

    #[test]
    fn test_forward_key_moves_aircraft_east() {
        let (mut session, t0) = session(HeadlessViewer::new());
        let mut keyboard = KeyboardState::new();
        keyboard.process_raw(RawKeyEvent::pressed(PhysicalKey::Code(KeyCode::KeyW)));

        session.run_frame(at(t0, 0.1), &keyboard);

        let state = session.state();
        assert!((state.lon - (103.9915 + 5.0 / 111_320.0)).abs() < 1e-12);
        assert_eq!(state.speed, 50.0);

        let aircraft = session.viewer().entity(session.aircraft()).unwrap();
        assert_eq!(aircraft.position(), state.position());
        assert_eq!(session.viewer().pose_updates(), 1);
    }

    #[test]
    fn test_aircraft_orientation_follows_heading() {
        let (mut session, t0) = session(HeadlessViewer::new());
        session.run_frame_with(at(t0, 0.016), &ControlState::default());

        let state = *session.state();
        let q = session
            .viewer()
            .entity(session.aircraft())
            .unwrap()
            .orientation()
            .unwrap();
        let frame = Ellipsoid::WGS84.enu_frame(state.position());
        // Heading 90° faces east, level.
        assert!((forward_of(q) - frame.east).length() < 1e-9);
        assert!((q * DVec3::Y - frame.up).length() < 1e-9);
    }

    #[test]
    fn test_camera_trails_aircraft() {
        let (mut session, t0) = session(HeadlessViewer::new());
        session.run_frame_with(at(t0, 0.016), &ControlState::default());

        let camera = session.viewer().camera().unwrap();
        let state = session.state();
        assert!((camera.destination.lon_deg - (state.lon - 0.02)).abs() < 1e-9);
        assert!((camera.destination.alt_m - (state.alt + 300.0)).abs() < 1e-9);
        assert!((camera.orientation.pitch - (-20f64).to_radians()).abs() < 1e-12);
    }

    #[test]
    fn test_hud_published_each_frame() {
        let (mut session, t0) = session(HeadlessViewer::new());
        session.run_frame_with(
            at(t0, 0.5),
            &ControlState::holding(&[FlightControl::TurnLeft]),
        );
        let hud = session.viewer().hud().unwrap();
        assert_eq!(hud.heading, "75");
        assert_eq!(hud.fps, "0");
        assert!(hud.position.starts_with("103.9915, 1.3644, "));
    }

    #[test]
    fn test_fps_published_after_one_second() {
        let (mut session, t0) = session(HeadlessViewer::new());
        for i in 1..=60 {
            session.run_frame_with(at(t0, i as f64 / 60.0), &ControlState::default());
        }
        assert_eq!(session.fps(), 60);
        assert_eq!(session.frames(), 60);
        assert_eq!(session.viewer().hud().unwrap().fps, "60");
    }

    #[test]
    fn test_missing_hud_does_not_stop_frame() {
        let (mut session, t0) = session(HeadlessViewer::without_hud());
        session.run_frame_with(
            at(t0, 0.1),
            &ControlState::holding(&[FlightControl::Climb]),
        );
        assert!(session.viewer().hud().is_none());
        assert_eq!(session.viewer().pose_updates(), 1);
        assert!(session.viewer().camera_updates() >= 2);
        assert!((session.state().alt - 505.0).abs() < 1e-9);
    }

    #[test]
    fn test_long_stall_is_clamped() {
        let (mut session, t0) = session(HeadlessViewer::new());
        session.run_frame_with(at(t0, 10.0), &ControlState::holding(&[FlightControl::Climb]));
        // 0.25 s at 50 m/s
        assert!((session.state().alt - 512.5).abs() < 1e-9);
    }

    #[test]
    fn test_altitude_floor_through_session() {
        let mut config = Config::default();
        config.flight.start_alt_m = 60.0;
        let t0 = Instant::now();
        let mut session = FlightSession::start(HeadlessViewer::new(), &config, t0);
        for i in 1..=100 {
            session.run_frame_with(
                at(t0, i as f64 * 0.05),
                &ControlState::holding(&[FlightControl::Descend]),
            );
            assert!(session.state().alt >= 50.0);
        }
        assert_eq!(session.state().alt, 50.0);
    }

    #[test]
    fn test_apply_config_changes_rates_not_position() {
        let (mut session, t0) = session(HeadlessViewer::new());
        let before = *session.state();

        let mut config = Config::default();
        config.flight.turn_rate_deg_s = 90.0;
        config
            .input
            .keybindings
            .insert("turn_right".to_string(), "KeyD".to_string());
        session.apply_config(&config);
        assert_eq!(session.state().position(), before.position());

        let mut keyboard = KeyboardState::new();
        keyboard.process_raw(RawKeyEvent::pressed(PhysicalKey::Code(KeyCode::KeyD)));
        session.run_frame(at(t0, 1.0 / 18.0), &keyboard);
        assert!((session.state().heading - 95.0).abs() < 1e-6);
    }
}
