//! Orbit camera
//!
//! Circles a target at a fixed radius. Dragging changes the azimuth and
//! elevation; the target is the tracked body, or the origin.

use crate::config::CameraConfig;
use orrery_core::{Mat4, Vec2, Vec3};
use serde::Serialize;
use std::f32::consts::FRAC_PI_2;

/// Free-orbiting camera angles
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitCamera {
    /// Elevation (radians, clamped to ±π/2)
    pub angle_x: f32,
    /// Azimuth (radians)
    pub angle_y: f32,
    /// Distance from the target
    pub radius: f32,
    /// Radians per dragged pixel
    pub sensitivity: f32,
    /// Vertical field of view (radians)
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl OrbitCamera {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            angle_x: 0.0,
            angle_y: 0.0,
            radius: config.radius,
            sensitivity: config.sensitivity,
            fov_y: config.fov_degrees.to_radians(),
            near: config.near,
            far: config.far,
        }
    }

    /// Apply a pointer drag in pixels
    pub fn drag(&mut self, delta: Vec2) {
        if !delta.x.is_finite() || !delta.y.is_finite() {
            return;
        }
        self.angle_y += delta.x * self.sensitivity;
        self.angle_x = (self.angle_x + delta.y * self.sensitivity).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Eye position relative to the target
    pub fn offset(&self) -> Vec3 {
        let (sin_x, cos_x) = self.angle_x.sin_cos();
        let (sin_y, cos_y) = self.angle_y.sin_cos();
        Vec3::new(
            self.radius * cos_x * sin_y,
            self.radius * sin_x,
            self.radius * cos_x * cos_y,
        )
    }

    /// View looking at `target` from `target + offset`
    pub fn view(&self, target: Vec3, aspect: f32) -> CameraView {
        let eye = target + self.offset();
        let view = Mat4::look_at_rh(eye, target, Vec3::UP);
        let projection = Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far);
        CameraView {
            eye,
            target,
            view,
            projection,
            view_projection: projection.mul(&view),
        }
    }
}

/// Camera matrices for one frame
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CameraView {
    pub eye: Vec3,
    pub target: Vec3,
    #[serde(skip)]
    pub view: Mat4,
    #[serde(skip)]
    pub projection: Mat4,
    #[serde(skip)]
    pub view_projection: Mat4,
}

impl Default for CameraView {
    fn default() -> Self {
        OrbitCamera::default().view(Vec3::ZERO, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_offset_is_on_positive_z() {
        let camera = OrbitCamera::default();
        assert!(camera.offset().approx_eq(Vec3::new(0.0, 0.0, 200.0), 1e-4));
    }

    #[test]
    fn test_drag_turns_and_clamps_elevation() {
        let mut camera = OrbitCamera::default();
        camera.drag(Vec2::new(100.0, 0.0));
        assert!((camera.angle_y - 0.5).abs() < 1e-6);

        camera.drag(Vec2::new(0.0, 10_000.0));
        assert_eq!(camera.angle_x, FRAC_PI_2);
        camera.drag(Vec2::new(0.0, -100_000.0));
        camera.drag(Vec2::new(f32::NAN, 1.0));
        assert_eq!(camera.angle_x, -FRAC_PI_2);
    }

    #[test]
    fn test_offset_follows_angles() {
        let mut camera = OrbitCamera::default();
        camera.angle_y = FRAC_PI_2;
        assert!(camera.offset().approx_eq(Vec3::new(200.0, 0.0, 0.0), 1e-3));

        camera.angle_y = 0.0;
        camera.angle_x = FRAC_PI_2;
        assert!(camera.offset().approx_eq(Vec3::new(0.0, 200.0, 0.0), 1e-3));
    }

    #[test]
    fn test_view_tracks_target() {
        let camera = OrbitCamera::default();
        let target = Vec3::new(10.0, -3.0, 7.0);
        let view = camera.view(target, 16.0 / 9.0);

        assert_eq!(view.target, target);
        assert!(view.eye.approx_eq(target + camera.offset(), 1e-4));
        assert!(view.view.transform_point(view.eye).approx_eq(Vec3::ZERO, 1e-3));
    }
}
