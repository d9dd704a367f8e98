//! Geodetic coordinates and their Earth-centered, Earth-fixed (ECEF) form.
//!
//! ECEF axes: +X through (0°N, 0°E), +Y through (0°N, 90°E), +Z through the
//! north pole. Units are meters.

use std::fmt;

use glam::DVec3;

/// Mean Earth radius in meters (IUGG).
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_008.8;

/// A position given as longitude/latitude in degrees and height above the
/// ellipsoid in meters.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Geodetic {
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub alt_m: f64,
}

impl Geodetic {
    pub fn new(lon_deg: f64, lat_deg: f64, alt_m: f64) -> Self {
        Self {
            lon_deg,
            lat_deg,
            alt_m,
        }
    }

    /// Same horizontal position at a different height.
    pub fn with_alt(self, alt_m: f64) -> Self {
        Self { alt_m, ..self }
    }
}

impl fmt::Display for Geodetic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lat_dir = if self.lat_deg >= 0.0 { "N" } else { "S" };
        let lon_dir = if self.lon_deg >= 0.0 { "E" } else { "W" };
        write!(
            f,
            "{:.4}\u{00B0}{}, {:.4}\u{00B0}{}, {:.0}m",
            self.lat_deg.abs(),
            lat_dir,
            self.lon_deg.abs(),
            lon_dir,
            self.alt_m,
        )
    }
}

/// An oblate ellipsoid of revolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    /// Equatorial radius in meters.
    pub semi_major_m: f64,
    /// Flattening `(a - b) / a`.
    pub flattening: f64,
}

impl Ellipsoid {
    pub const WGS84: Ellipsoid = Ellipsoid {
        semi_major_m: 6_378_137.0,
        flattening: 1.0 / 298.257_223_563,
    };

    /// Polar radius in meters.
    pub fn semi_minor_m(&self) -> f64 {
        self.semi_major_m * (1.0 - self.flattening)
    }

    /// First eccentricity squared.
    pub fn eccentricity_sq(&self) -> f64 {
        self.flattening * (2.0 - self.flattening)
    }

    /// Convert a geodetic position to ECEF meters.
    pub fn to_ecef(&self, p: Geodetic) -> DVec3 {
        let lat = p.lat_deg.to_radians();
        let lon = p.lon_deg.to_radians();
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();

        let e2 = self.eccentricity_sq();
        // Prime vertical radius of curvature.
        let n = self.semi_major_m / (1.0 - e2 * sin_lat * sin_lat).sqrt();

        DVec3::new(
            (n + p.alt_m) * cos_lat * cos_lon,
            (n + p.alt_m) * cos_lat * sin_lon,
            (n * (1.0 - e2) + p.alt_m) * sin_lat,
        )
    }

    /// Local east-north-up frame at the given position.
    ///
    /// `up` is the ellipsoid normal, not the direction from the Earth's center.
    pub fn enu_frame(&self, p: Geodetic) -> EnuFrame {
        let lat = p.lat_deg.to_radians();
        let lon = p.lon_deg.to_radians();
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();

        EnuFrame {
            origin: self.to_ecef(p),
            east: DVec3::new(-sin_lon, cos_lon, 0.0),
            north: DVec3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat),
            up: DVec3::new(cos_lat * cos_lon, cos_lat * sin_lon, sin_lat),
        }
    }
}

/// An orthonormal east-north-up basis anchored at an ECEF point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnuFrame {
    pub origin: DVec3,
    pub east: DVec3,
    pub north: DVec3,
    pub up: DVec3,
}

impl EnuFrame {
    /// Horizontal unit vector for a heading measured clockwise from north.
    pub fn heading_direction(&self, heading_rad: f64) -> DVec3 {
        let (s, c) = heading_rad.sin_cos();
        self.east * s + self.north * c
    }
}

/// Great-circle surface distance between two positions, ignoring altitude.
pub fn haversine_distance_m(a: Geodetic, b: Geodetic) -> f64 {
    let lat1 = a.lat_deg.to_radians();
    let lat2 = b.lat_deg.to_radians();
    let dlat = (b.lat_deg - a.lat_deg).to_radians();
    let dlon = (b.lon_deg - a.lon_deg).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_MEAN_RADIUS_M * h.sqrt().asin()
}
