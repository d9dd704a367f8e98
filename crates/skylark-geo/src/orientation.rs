//! Heading/pitch/roll orientations in a local east-north-up frame.
//!
//! Models and cameras share one body convention: +X right, +Y up, −Z forward.

use glam::{DMat3, DQuat, DVec3};

use crate::geodetic::{Ellipsoid, Geodetic};

/// Aircraft-style attitude, all angles in radians.
///
/// Heading is clockwise from north, pitch is positive nose-up, roll is
/// positive right-wing-down.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HeadingPitchRoll {
    pub heading: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl HeadingPitchRoll {
    pub fn new(heading: f64, pitch: f64, roll: f64) -> Self {
        Self {
            heading,
            pitch,
            roll,
        }
    }

    /// Build from degrees.
    pub fn from_degrees(heading: f64, pitch: f64, roll: f64) -> Self {
        Self::new(heading.to_radians(), pitch.to_radians(), roll.to_radians())
    }
}

/// Orientation (body → ECEF) of a body at `origin` with the given attitude.
pub fn heading_pitch_roll_quaternion(
    ellipsoid: &Ellipsoid,
    origin: Geodetic,
    hpr: HeadingPitchRoll,
) -> DQuat {
    let frame = ellipsoid.enu_frame(origin);

    let level_forward = frame.heading_direction(hpr.heading);
    let level_right = frame.heading_direction(hpr.heading + std::f64::consts::FRAC_PI_2);

    let (sp, cp) = hpr.pitch.sin_cos();
    let forward = level_forward * cp + frame.up * sp;
    // right x forward = up for a right-handed body with −Z forward.
    let pitched_up = level_right.cross(forward);

    let (sr, cr) = hpr.roll.sin_cos();
    let right = level_right * cr - pitched_up * sr;
    let up = pitched_up * cr + level_right * sr;

    let basis = DMat3::from_cols(right, up, -forward);
    DQuat::from_mat3(&basis).normalize()
}

/// Forward direction (body −Z) of an orientation.
pub fn forward_of(q: DQuat) -> DVec3 {
    q * DVec3::NEG_Z
}
