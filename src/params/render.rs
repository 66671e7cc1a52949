//! Rendering, camera, post-processing and asset configuration.

use std::path::PathBuf;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Torus spin around the Y axis (radians per frame)
    pub spin_per_frame: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            spin_per_frame: 0.005,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height as f32
    }
}

/// Perspective camera configuration
#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// Vertical field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane
    pub near_plane: f32,

    /// Far clipping plane
    pub far_plane: f32,

    /// Eye position
    pub position: [f32; 3],

    /// Look-at target
    pub target: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near_plane: 0.1,
            far_plane: 1000.0,
            // Far enough to keep a fully inflated torus (radius + 8 + 7 * 4) in view
            position: [0.0, 0.0, 80.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

/// Composite pass configuration
#[derive(Debug, Clone)]
pub struct PostConfig {
    /// Horizontal RGB channel split (fraction of screen width)
    pub rgb_shift: f32,

    /// Vignette darkening at the corners, in [0, 1]
    pub vignette: f32,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            rgb_shift: 0.0015,
            vignette: 0.35,
        }
    }
}

/// Asset locations, relative to the working directory
#[derive(Debug, Clone)]
pub struct AssetPaths {
    pub audio: PathBuf,
    pub background: PathBuf,
    pub texture: PathBuf,
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self {
            audio: PathBuf::from("assets/music.wav"),
            background: PathBuf::from("assets/background.jpg"),
            texture: PathBuf::from("assets/profile.jpg"),
        }
    }
}
