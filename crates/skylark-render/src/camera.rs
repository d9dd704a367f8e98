//! Camera-relative view and reverse-Z projection.
//!
//! The camera lives in ECEF meters as `f64`. Every model transform is made
//! relative to the camera position in `f64` before being cast to `f32`, so
//! GPU-side coordinates stay small no matter where on Earth the camera is.

use glam::{DMat4, DQuat, DVec3, Mat4};
use skylark_geo::{Ellipsoid, heading_pitch_roll_quaternion};
use skylark_view::CameraView;

#[derive(Debug, Clone)]
pub struct GlobeCamera {
    /// ECEF position in meters.
    pub position: DVec3,
    /// Camera body (+X right, +Y up, −Z forward) to ECEF.
    pub rotation: DQuat,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for GlobeCamera {
    fn default() -> Self {
        Self {
            position: DVec3::new(Ellipsoid::WGS84.semi_major_m * 3.0, 0.0, 0.0),
            // Looking back at the Earth's center along −X with north up.
            rotation: DQuat::from_mat3(&glam::DMat3::from_cols(DVec3::Y, DVec3::Z, DVec3::X)),
            fov_y: 60f32.to_radians(),
            aspect_ratio: 16.0 / 9.0,
            near: 1.0,
            far: 1.0e8,
        }
    }
}

impl GlobeCamera {
    /// Place the camera at `view.destination` with `view.orientation` taken in
    /// the local east-north-up frame there.
    pub fn set_view(&mut self, ellipsoid: &Ellipsoid, view: &CameraView) {
        self.position = ellipsoid.to_ecef(view.destination);
        self.rotation = heading_pitch_roll_quaternion(ellipsoid, view.destination, view.orientation);
    }

    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        self.aspect_ratio = width / height.max(1.0);
    }

    /// Reverse-Z perspective: near and far are swapped.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near)
    }

    /// Rotation-only view matrix; translation is folded into each model.
    pub fn view_rotation(&self) -> DMat4 {
        DMat4::from_quat(self.rotation.conjugate())
    }

    /// MVP for an object at `position_ecef` with the given rotation and scale.
    pub fn model_view_projection(&self, position_ecef: DVec3, rotation: DQuat, scale: DVec3) -> Mat4 {
        let relative = position_ecef - self.position;
        let model = DMat4::from_scale_rotation_translation(scale, rotation, relative);
        self.projection_matrix() * (self.view_rotation() * model).as_mat4()
    }

    /// World size of one pixel at `distance` meters for a viewport of
    /// `viewport_height` pixels.
    pub fn meters_per_pixel(&self, distance: f64, viewport_height: u32) -> f64 {
        2.0 * distance * (self.fov_y as f64 / 2.0).tan() / viewport_height.max(1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;
    use skylark_geo::{Geodetic, HeadingPitchRoll};

    fn ndc(mvp: Mat4) -> glam::Vec3 {
        let clip = mvp * Vec4::new(0.0, 0.0, 0.0, 1.0);
        clip.truncate() / clip.w
    }

    fn camera_at_changi(heading_deg: f64) -> (GlobeCamera, Geodetic) {
        let origin = Geodetic::new(103.9915, 1.3644, 800.0);
        let mut camera = GlobeCamera::default();
        camera.set_view(
            &Ellipsoid::WGS84,
            &CameraView {
                destination: origin,
                orientation: HeadingPitchRoll::from_degrees(heading_deg, 0.0, 0.0),
            },
        );
        (camera, origin)
    }

    #[test]
    fn test_point_ahead_projects_to_center() {
        let (camera, origin) = camera_at_changi(90.0);
        let frame = Ellipsoid::WGS84.enu_frame(origin);
        let target = frame.origin + frame.east * 500.0;

        let p = ndc(camera.model_view_projection(target, DQuat::IDENTITY, DVec3::ONE));
        assert!(p.x.abs() < 1e-3, "x = {}", p.x);
        assert!(p.y.abs() < 1e-3, "y = {}", p.y);
        assert!(p.z > 0.0 && p.z <= 1.0, "z = {}", p.z);
    }

    #[test]
    fn test_point_to_the_right_has_positive_x() {
        let (camera, origin) = camera_at_changi(0.0);
        let frame = Ellipsoid::WGS84.enu_frame(origin);
        let target = frame.origin + frame.north * 500.0 + frame.east * 50.0;
        let p = ndc(camera.model_view_projection(target, DQuat::IDENTITY, DVec3::ONE));
        assert!(p.x > 0.0);
    }

    #[test]
    fn test_reverse_z_near_is_deeper_than_far() {
        let (camera, origin) = camera_at_changi(90.0);
        let frame = Ellipsoid::WGS84.enu_frame(origin);
        let near = ndc(camera.model_view_projection(
            frame.origin + frame.east * 10.0,
            DQuat::IDENTITY,
            DVec3::ONE,
        ));
        let far = ndc(camera.model_view_projection(
            frame.origin + frame.east * 10_000.0,
            DQuat::IDENTITY,
            DVec3::ONE,
        ));
        assert!(near.z > far.z);
    }

    #[test]
    fn test_default_camera_sees_earth_center() {
        let camera = GlobeCamera::default();
        let p = ndc(camera.model_view_projection(DVec3::ZERO, DQuat::IDENTITY, DVec3::ONE));
        assert!(p.x.abs() < 1e-4 && p.y.abs() < 1e-4);
    }

    #[test]
    fn test_meters_per_pixel() {
        let camera = GlobeCamera {
            fov_y: 90f32.to_radians(),
            ..GlobeCamera::default()
        };
        // tan(45°) = 1: 1000 px span 2000 m at 1000 m.
        let mpp = camera.meters_per_pixel(1000.0, 1000);
        assert!((mpp - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_set_aspect_ratio() {
        let mut camera = GlobeCamera::default();
        camera.set_aspect_ratio(1920.0, 1080.0);
        assert!((camera.aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
    }
}
