//! sonitorus library - Audio-reactive torus visualizer

pub mod audio;
pub mod camera;
pub mod cli;
pub mod frame_loop;
pub mod host;
pub mod logging;
pub mod params;
pub mod remap;
pub mod rendering;
pub mod scene;
pub mod torus;
pub mod viewport;
pub mod visualizer;
