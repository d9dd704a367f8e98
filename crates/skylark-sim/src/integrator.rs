//! Per-frame heading and position integration.
//!
//! Each step runs in a fixed order: turn, translate along the post-turn
//! heading, climb or descend, then clamp altitude to the floor.

use skylark_config::FlightConfig;
use skylark_input::ControlState;

use crate::state::FlightState;

/// Rates and limits for [`integrate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlightParams {
    /// Degrees per second while a turn control is held.
    pub turn_rate_deg_s: f64,
    /// Meters per second for forward/backward and climb/descend.
    pub move_speed_m_s: f64,
    /// Altitude floor in meters.
    pub min_altitude_m: f64,
    /// Flat-earth meters-per-degree used to convert along-track meters.
    pub meters_per_degree: f64,
}

impl Default for FlightParams {
    fn default() -> Self {
        Self::from(&FlightConfig::default())
    }
}

impl From<&FlightConfig> for FlightParams {
    fn from(config: &FlightConfig) -> Self {
        Self {
            turn_rate_deg_s: config.turn_rate_deg_s,
            move_speed_m_s: config.move_speed_m_s,
            min_altitude_m: config.min_altitude_m,
            meters_per_degree: config.meters_per_degree,
        }
    }
}

/// Advance `state` by `dt` seconds under `controls`.
///
/// Opposing controls held together cancel. Longitude is not scaled by
/// latitude, so east-west motion is exaggerated away from the equator.
pub fn integrate(state: &mut FlightState, controls: &ControlState, dt: f64, params: &FlightParams) {
    let turn = params.turn_rate_deg_s * dt;
    if controls.turn_left {
        state.heading -= turn;
    }
    if controls.turn_right {
        state.heading += turn;
    }

    let step = params.move_speed_m_s * dt;
    let (sin_h, cos_h) = state.heading_rad().sin_cos();
    let dlon = sin_h * step / params.meters_per_degree;
    let dlat = cos_h * step / params.meters_per_degree;

    let mut direction = 0.0;
    if controls.forward {
        state.lon += dlon;
        state.lat += dlat;
        direction += 1.0;
    }
    if controls.backward {
        state.lon -= dlon;
        state.lat -= dlat;
        direction -= 1.0;
    }
    state.speed = direction * params.move_speed_m_s;

    if controls.climb {
        state.alt += step;
    }
    if controls.descend {
        state.alt -= step;
    }
    state.alt = state.alt.max(params.min_altitude_m);
}

#[cfg(test)]
mod tests {
    use super::*;
    use skylark_input::FlightControl;

    const TOL: f64 = 1e-12;

    fn start() -> FlightState {
        FlightState::new(103.9915, 1.3644, 500.0, 90.0)
    }

    fn step(state: &mut FlightState, held: &[FlightControl], dt: f64) {
        integrate(state, &ControlState::holding(held), dt, &FlightParams::default());
    }

    #[test]
    fn test_idle_changes_nothing() {
        let mut s = start();
        step(&mut s, &[], 0.5);
        assert_eq!(s, start());
    }

    #[test]
    fn test_turn_rate() {
        let mut s = start();
        step(&mut s, &[FlightControl::TurnRight], 1.0);
        assert!((s.heading - 120.0).abs() < TOL);
        step(&mut s, &[FlightControl::TurnLeft], 2.0);
        assert!((s.heading - 60.0).abs() < TOL);
    }

    #[test]
    fn test_opposing_turns_cancel() {
        let mut s = start();
        step(&mut s, &[FlightControl::TurnLeft, FlightControl::TurnRight], 1.0);
        assert!((s.heading - 90.0).abs() < TOL);
    }

    #[test]
    fn test_forward_east_moves_longitude() {
        let mut s = start();
        step(&mut s, &[FlightControl::Forward], 1.0);
        assert!((s.lon - (103.9915 + 50.0 / 111_320.0)).abs() < TOL);
        assert!((s.lat - 1.3644).abs() < 1e-15);
        assert_eq!(s.speed, 50.0);
    }

    #[test]
    fn test_backward_reverses_and_sets_negative_speed() {
        let mut s = FlightState::new(0.0, 0.0, 500.0, 0.0);
        step(&mut s, &[FlightControl::Backward], 2.0);
        assert!((s.lat + 100.0 / 111_320.0).abs() < TOL);
        assert!(s.lon.abs() < TOL);
        assert_eq!(s.speed, -50.0);
    }

    #[test]
    fn test_translation_uses_post_turn_heading() {
        let mut s = FlightState::new(0.0, 0.0, 500.0, 0.0);
        // 3 s of right turn at 30°/s ends at 90°, so all motion is eastward.
        step(&mut s, &[FlightControl::TurnRight, FlightControl::Forward], 3.0);
        assert!((s.heading - 90.0).abs() < TOL);
        assert!(s.lat.abs() < 1e-12);
        assert!((s.lon - 150.0 / 111_320.0).abs() < TOL);
    }

    #[test]
    fn test_displacement_linear_in_dt() {
        let mut a = start();
        let mut b = start();
        step(&mut a, &[FlightControl::Forward, FlightControl::Climb], 0.1);
        step(&mut b, &[FlightControl::Forward, FlightControl::Climb], 0.2);
        let da = (a.lon - 103.9915, a.alt - 500.0);
        let db = (b.lon - 103.9915, b.alt - 500.0);
        assert!((db.0 - 2.0 * da.0).abs() < 1e-12);
        assert!((db.1 - 2.0 * da.1).abs() < 1e-9);
    }

    #[test]
    fn test_climb_is_meters() {
        let mut s = start();
        step(&mut s, &[FlightControl::Climb], 1.0);
        assert!((s.alt - 550.0).abs() < TOL);
    }

    #[test]
    fn test_altitude_floor() {
        let mut s = FlightState::new(0.0, 0.0, 60.0, 0.0);
        step(&mut s, &[FlightControl::Descend], 10.0);
        assert_eq!(s.alt, 50.0);
        step(&mut s, &[FlightControl::Descend], 0.016);
        assert_eq!(s.alt, 50.0);
    }

    #[test]
    fn test_altitude_never_below_floor_over_many_frames() {
        let mut s = start();
        for i in 0..2_000 {
            let dt = 0.001 + (i % 7) as f64 * 0.01;
            step(&mut s, &[FlightControl::Descend, FlightControl::TurnLeft], dt);
            assert!(s.alt >= 50.0);
            let h = s.display_heading();
            assert!((0.0..360.0).contains(&h));
        }
        assert!(s.heading < 0.0, "stored heading stays unwrapped");
    }

    #[test]
    fn test_floor_applies_even_without_descend() {
        let mut s = FlightState::new(0.0, 0.0, 10.0, 0.0);
        step(&mut s, &[], 0.016);
        assert_eq!(s.alt, 50.0);
    }

    #[test]
    fn test_custom_params() {
        let params = FlightParams {
            turn_rate_deg_s: 10.0,
            move_speed_m_s: 100.0,
            min_altitude_m: 0.0,
            meters_per_degree: 100.0,
        };
        let mut s = FlightState::new(0.0, 0.0, 5.0, 0.0);
        integrate(
            &mut s,
            &ControlState::holding(&[FlightControl::Forward, FlightControl::Descend]),
            1.0,
            &params,
        );
        assert!((s.lat - 1.0).abs() < TOL);
        assert_eq!(s.alt, 0.0);
    }
}
