//! Parameter definitions with physical units and documented semantics.
//!
//! All tunable numbers are extracted here with:
//! - Units (world units, milliseconds, Hz, decibels)
//! - Documented ranges and meanings
//! - Defaults matching the original demo

mod audio;
mod render;
mod torus;

// Re-export all types
pub use audio::{AnalyserConfig, PlaybackConfig};
pub use render::{AssetPaths, CameraConfig, PostConfig, RenderConfig};
pub use torus::{AudioReactiveMapping, DisplacementParams, TorusParams};

/// Everything needed to build a visualizer, grouped by concern
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub torus: TorusParams,
    pub displacement: DisplacementParams,
    pub mapping: AudioReactiveMapping,
    pub analyser: AnalyserConfig,
    pub playback: PlaybackConfig,
    pub render: RenderConfig,
    pub camera: CameraConfig,
    pub post: PostConfig,
    pub assets: AssetPaths,
}
