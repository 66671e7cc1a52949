//! Audio clip playback and per-frame spectrum analysis.
//!
//! The output stream runs on cpal's thread and only publishes its position;
//! the render thread polls that position once per frame and analyses the
//! clip window that was just played.

mod analyser;
mod loader;
mod playback;
mod spectrum;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

// Re-export public types
pub use analyser::Analyser;
pub use loader::load_clip;
pub use playback::AudioPlayer;
pub use spectrum::FrequencySummary;

use crate::params::{AnalyserConfig, PlaybackConfig};

/// Decoded interleaved audio
#[derive(Debug, Clone)]
pub struct AudioClip {
    samples: Vec<f32>,
    channels: u16,
    sample_rate: u32,
}

impl AudioClip {
    pub fn new(samples: Vec<f32>, channels: u16, sample_rate: u32) -> Self {
        Self {
            samples,
            channels: channels.max(1),
            sample_rate,
        }
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of complete frames
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    /// All channel samples of one frame
    pub fn frame(&self, index: usize) -> &[f32] {
        let ch = self.channels as usize;
        &self.samples[index * ch..(index + 1) * ch]
    }

    /// Channel average of one frame
    pub fn mono(&self, index: usize) -> f32 {
        let frame = self.frame(index);
        frame.iter().sum::<f32>() / frame.len() as f32
    }
}

/// Audio file, its player and the analyser polled by the render loop
pub struct AudioSource {
    clip: Arc<AudioClip>,
    player: Option<AudioPlayer>,
    analyser: Analyser,
}

impl AudioSource {
    /// Load `path` and start looping playback
    ///
    /// A missing output device is logged and leaves the source silent; decode
    /// and configuration errors are returned.
    pub fn open(
        path: &Path,
        analyser_config: AnalyserConfig,
        playback: &PlaybackConfig,
    ) -> Result<Self> {
        let analyser = Analyser::new(analyser_config).map_err(anyhow::Error::msg)?;

        let mut last_logged = 0.0;
        let clip = Arc::new(load_clip(path, |fraction| {
            if fraction - last_logged >= 0.1 || fraction >= 1.0 {
                log::info!("audio {:.0}% loaded", fraction * 100.0);
                last_logged = fraction;
            }
        })?);

        let player = match AudioPlayer::start(Arc::clone(&clip), playback) {
            Ok(player) => Some(player),
            Err(e) => {
                log::error!("audio playback unavailable: {e:#}");
                None
            }
        };

        Ok(Self {
            clip,
            player,
            analyser,
        })
    }

    pub fn is_playing(&self) -> bool {
        self.player.as_ref().is_some_and(AudioPlayer::is_playing)
    }

    /// Byte spectrum of the most recently played window, or `None` when silent
    pub fn frequency_data(&mut self) -> Option<&[u8]> {
        let player = self.player.as_ref().filter(|p| p.is_playing())?;
        let position = player.position();
        Some(self.analyser.analyse(&self.clip, position))
    }
}
