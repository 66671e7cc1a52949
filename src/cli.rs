//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

use crate::params::{AssetPaths, Settings};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "sonitorus")]
#[command(about = "Audio-reactive torus visualizer", long_about = None)]
pub struct Args {
    /// WAV file played in a loop and analysed each frame
    #[arg(long, value_name = "PATH", default_value = "assets/music.wav")]
    pub audio: PathBuf,

    /// Image drawn behind the scene
    #[arg(long, value_name = "PATH", default_value = "assets/background.jpg")]
    pub background: PathBuf,

    /// Image mapped onto the torus
    #[arg(long, value_name = "PATH", default_value = "assets/profile.jpg")]
    pub texture: PathBuf,

    /// Initial window width (pixels)
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Initial window height (pixels)
    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// Analyser FFT size (power of two)
    #[arg(long, value_name = "FRAMES", default_value_t = 512)]
    pub fft_size: usize,

    /// Noise seed for the displacement field
    #[arg(long, default_value_t = 0)]
    pub seed: u32,

    /// Stop after this many seconds
    #[arg(long, value_name = "SECONDS")]
    pub duration: Option<f32>,

    /// Log filter (env_logger syntax), overrides RUST_LOG
    #[arg(long, value_name = "FILTER")]
    pub log: Option<String>,
}

impl Args {
    /// Build visualizer settings from defaults plus command-line overrides
    pub fn settings(&self) -> Settings {
        let mut settings = Settings {
            assets: AssetPaths {
                audio: self.audio.clone(),
                background: self.background.clone(),
                texture: self.texture.clone(),
            },
            ..Default::default()
        };

        settings.render.window_width = self.width.max(1);
        settings.render.window_height = self.height.max(1);
        settings.analyser.fft_size = self.fft_size;
        settings.displacement.noise_seed = self.seed;

        settings
    }
}
