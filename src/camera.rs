//! Perspective camera with viewport-driven aspect ratio.

use glam::{Mat4, Vec3};

use crate::params::CameraConfig;
use crate::viewport::Viewport;

/// Perspective camera looking at a fixed target
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    eye: Vec3,
    target: Vec3,
    fov_degrees: f32,
    near: f32,
    far: f32,
    aspect: f32,
}

impl PerspectiveCamera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            eye: Vec3::from_array(config.position),
            target: Vec3::from_array(config.target),
            fov_degrees: config.fov_degrees,
            near: config.near_plane,
            far: config.far_plane,
            aspect,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Match the aspect ratio to a new viewport (zero-sized viewports are ignored)
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if let Some(aspect) = viewport.aspect_ratio() {
            self.aspect = aspect;
        }
    }

    pub fn view(&self) -> Mat4 {
        // Always keep Y as up vector (camera never rolls)
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// Create view-projection matrix for rendering
    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }
}
