//! Geodesy for the globe: geodetic positions on the WGS84 ellipsoid, their
//! Earth-centered Cartesian form, local east-north-up frames, and
//! heading/pitch/roll orientations.

mod geodetic;
mod orientation;

pub use geodetic::{EARTH_MEAN_RADIUS_M, EnuFrame, Ellipsoid, Geodetic, haversine_distance_m};
pub use orientation::{HeadingPitchRoll, forward_of, heading_pitch_roll_quaternion};
