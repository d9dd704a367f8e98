//! Chase camera placed behind and above the aircraft.

use skylark_config::CameraConfig;
use skylark_geo::{Geodetic, HeadingPitchRoll};
use skylark_view::CameraView;

use crate::state::FlightState;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChaseParams {
    /// Offset behind the aircraft along its heading, in degrees of arc.
    pub back_deg: f64,
    /// Height above the aircraft in meters.
    pub height_m: f64,
    /// Camera pitch in degrees (negative looks down).
    pub pitch_deg: f64,
}

impl Default for ChaseParams {
    fn default() -> Self {
        Self::from(&CameraConfig::default())
    }
}

impl From<&CameraConfig> for ChaseParams {
    fn from(config: &CameraConfig) -> Self {
        Self {
            back_deg: config.chase_back_deg,
            height_m: config.chase_height_m,
            pitch_deg: config.chase_pitch_deg,
        }
    }
}

/// Camera view trailing `state` along its heading.
pub fn chase_view(state: &FlightState, params: &ChaseParams) -> CameraView {
    let (sin_h, cos_h) = state.heading_rad().sin_cos();
    CameraView {
        destination: Geodetic::new(
            state.lon - sin_h * params.back_deg,
            state.lat - cos_h * params.back_deg,
            state.alt + params.height_m,
        ),
        orientation: HeadingPitchRoll::new(state.heading_rad(), params.pitch_deg.to_radians(), 0.0),
    }
}
