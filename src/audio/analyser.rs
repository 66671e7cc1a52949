//! Byte spectrum analysis of the playing clip.
//!
//! Follows WebAudio analyser semantics: Hann-windowed FFT, per-bin
//! exponential smoothing, then decibels mapped onto `0..=255`.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::f32::consts::PI;
use std::sync::Arc;

use super::AudioClip;
use crate::params::AnalyserConfig;

/// Spectrum analyser with reusable FFT buffers
pub struct Analyser {
    config: AnalyserConfig,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    bytes: Vec<u8>,
}

impl Analyser {
    /// Create analyser, validating configuration
    pub fn new(config: AnalyserConfig) -> Result<Self, String> {
        config.validate()?;

        let size = config.fft_size;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);

        Ok(Self {
            window: (0..size).map(|i| hann_window(i, size)).collect(),
            buffer: vec![Complex::new(0.0, 0.0); size],
            smoothed: vec![0.0; config.bin_count()],
            bytes: vec![0; config.bin_count()],
            fft,
            config,
        })
    }

    pub fn bin_count(&self) -> usize {
        self.config.bin_count()
    }

    /// Analyse the `fft_size` frames ending just before `end_frame`
    ///
    /// Frame indices wrap around the clip, matching looping playback.
    /// Returns the byte spectrum (`fft_size / 2` bins).
    pub fn analyse(&mut self, clip: &AudioClip, end_frame: usize) -> &[u8] {
        let size = self.config.fft_size;
        let frames = clip.frames();

        if frames == 0 {
            self.buffer.fill(Complex::new(0.0, 0.0));
        } else {
            // First sample of the window, wrapped into the clip
            let start = (end_frame % frames + frames * (size / frames + 1) - size) % frames;
            for (i, slot) in self.buffer.iter_mut().enumerate() {
                let sample = clip.mono((start + i) % frames);
                *slot = Complex::new(sample * self.window[i], 0.0);
            }
        }

        self.fft.process(&mut self.buffer);

        let tau = self.config.smoothing;
        let range_db = self.config.max_db - self.config.min_db;
        for k in 0..self.bin_count() {
            let magnitude = self.buffer[k].norm() / size as f32;
            self.smoothed[k] = tau * self.smoothed[k] + (1.0 - tau) * magnitude;

            let db = 20.0 * self.smoothed[k].log10();
            let scaled = 255.0 * (db - self.config.min_db) / range_db;
            // -inf (silence) and NaN both land on 0
            self.bytes[k] = if scaled.is_nan() {
                0
            } else {
                scaled.clamp(0.0, 255.0) as u8
            };
        }

        &self.bytes
    }
}

/// Hann window function for FFT analysis
pub fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}
