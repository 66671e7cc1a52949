//! Viewport size changes and the targets that follow them.

use crate::camera::PerspectiveCamera;

/// Drawable size in physical pixels
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width over height, or `None` for an empty viewport
    pub fn aspect_ratio(&self) -> Option<f32> {
        (!self.is_empty()).then(|| self.width as f32 / self.height as f32)
    }
}

/// Something holding size-dependent buffers (surface, offscreen targets)
pub trait Resize {
    fn resize(&mut self, viewport: Viewport);
}

/// Propagate a new viewport to the camera and every render target
///
/// Empty viewports (minimized window) leave everything untouched.
/// Returns whether the resize was applied.
pub fn apply_resize(
    viewport: Viewport,
    camera: &mut PerspectiveCamera,
    targets: &mut [&mut dyn Resize],
) -> bool {
    if viewport.is_empty() {
        return false;
    }

    camera.set_viewport(viewport);
    for target in targets.iter_mut() {
        target.resize(viewport);
    }

    log::debug!("resized to {}x{}", viewport.width, viewport.height);
    true
}
