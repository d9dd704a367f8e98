//! HUD text built from the flight state.
//!
//! Example line: `POS: 103.9915, 1.3644, 500 | HDG: 90° | FPS: 60 | GS: 50 m/s | HOME: 1,234 m`

use skylark_geo::{Geodetic, haversine_distance_m};
use skylark_view::HudText;

use crate::state::FlightState;

/// Format the HUD for `state`.
///
/// `home` adds a surface distance readout when the home marker is shown.
pub fn build_hud(state: &FlightState, fps: u32, home: Option<Geodetic>) -> HudText {
    let mut extra = format!("GS: {:.0} m/s", state.speed);
    if let Some(home) = home {
        let distance = haversine_distance_m(state.position(), home);
        extra.push_str(&format!(" | HOME: {} m", format_with_commas(distance.round() as u64)));
    }

    HudText {
        position: format!("{:.4}, {:.4}, {:.0}", state.lon, state.lat, state.alt),
        heading: whole_degrees(state.display_heading()).to_string(),
        fps: fps.to_string(),
        extra,
    }
}

/// Round a heading to whole degrees, wrapping 360 back to 0.
fn whole_degrees(heading: f64) -> i64 {
    (heading.round() as i64).rem_euclid(360)
}

/// Format an integer with comma thousands separators.
fn format_with_commas(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
