//! Drifting perspective camera.

use glam::{Mat4, Vec2, Vec3};

use crate::config::NetworkConfig;

const NEAR: f32 = 1.0;
const FAR: f32 = 3000.0;

/// Camera that eases toward a pointer-derived target and always looks at
/// the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DriftCamera {
    /// World position.
    pub position: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width over height of the drawing surface.
    pub aspect: f32,
    pointer_scale: f32,
    smoothing: f32,
}

impl DriftCamera {
    /// Camera on +Z at the configured distance.
    pub fn new(config: &NetworkConfig, aspect: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, config.camera_distance),
            fov_y: config.fov_degrees.to_radians(),
            aspect,
            pointer_scale: config.pointer_scale,
            smoothing: config.camera_smoothing,
        }
    }

    /// Where the camera wants to be for a given pointer offset.
    ///
    /// Window Y grows downward, world Y grows upward.
    #[inline]
    pub fn target_for(&self, pointer_offset: Vec2) -> Vec2 {
        Vec2::new(
            pointer_offset.x * self.pointer_scale,
            -pointer_offset.y * self.pointer_scale,
        )
    }

    /// One smoothing step of x/y toward the pointer target. Z is untouched.
    pub fn drift(&mut self, pointer_offset: Vec2) {
        let target = self.target_for(pointer_offset);
        self.position.x += (target.x - self.position.x) * self.smoothing;
        self.position.y += (target.y - self.position.y) * self.smoothing;
    }

    /// Update the aspect ratio after a resize.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// View matrix aimed at the origin.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, Vec3::ZERO, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, NEAR, FAR)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_on_z_axis() {
        let cam = DriftCamera::new(&NetworkConfig::default(), 1.0);
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 1000.0));
    }

    #[test]
    fn test_drift_is_exponential_smoothing() {
        let mut cam = DriftCamera::new(&NetworkConfig::default(), 1.0);
        // Target = (200 * 0.05, -(-100) * 0.05) = (10, 5)
        cam.drift(Vec2::new(200.0, -100.0));
        assert!((cam.position.x - 0.5).abs() < 1e-5);
        assert!((cam.position.y - 0.25).abs() < 1e-5);
        assert_eq!(cam.position.z, 1000.0);
    }

    #[test]
    fn test_drift_converges_on_target() {
        let mut cam = DriftCamera::new(&NetworkConfig::default(), 1.0);
        for _ in 0..1000 {
            cam.drift(Vec2::new(200.0, -100.0));
        }
        assert!((cam.position.x - 10.0).abs() < 1e-3);
        assert!((cam.position.y - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_origin_projects_to_screen_center() {
        let cam = DriftCamera::new(&NetworkConfig::default(), 16.0 / 9.0);
        let clip = cam.view_proj() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((clip.x / clip.w).abs() < 1e-5);
        assert!((clip.y / clip.w).abs() < 1e-5);
    }
}
