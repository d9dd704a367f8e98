//! The aircraft's mutable flight record.

use skylark_config::FlightConfig;
use skylark_geo::Geodetic;

/// Position, heading and ground speed of the aircraft.
///
/// `heading` is stored unwrapped so repeated turns accumulate past 360° or
/// below 0°. Use [`display_heading`](Self::display_heading) for anything
/// shown to the pilot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlightState {
    /// Longitude in degrees.
    pub lon: f64,
    /// Latitude in degrees.
    pub lat: f64,
    /// Height above the ellipsoid in meters.
    pub alt: f64,
    /// Heading in degrees clockwise from north.
    pub heading: f64,
    /// Signed along-track speed of the last step in m/s.
    pub speed: f64,
}

impl Default for FlightState {
    fn default() -> Self {
        Self::from_config(&FlightConfig::default())
    }
}

impl FlightState {
    pub fn new(lon: f64, lat: f64, alt: f64, heading: f64) -> Self {
        Self {
            lon,
            lat,
            alt,
            heading,
            speed: 0.0,
        }
    }

    /// Start state from the configured start position.
    pub fn from_config(config: &FlightConfig) -> Self {
        Self::new(
            config.start_lon_deg,
            config.start_lat_deg,
            config.start_alt_m,
            config.start_heading_deg,
        )
    }

    /// Heading wrapped into `[0, 360)`.
    pub fn display_heading(&self) -> f64 {
        let wrapped = self.heading.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
        if wrapped >= 360.0 { 0.0 } else { wrapped }
    }

    /// Heading in radians, unwrapped.
    pub fn heading_rad(&self) -> f64 {
        self.heading.to_radians()
    }

    pub fn position(&self) -> Geodetic {
        Geodetic::new(self.lon, self.lat, self.alt)
    }
}
