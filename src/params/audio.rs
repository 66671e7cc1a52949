//! Audio analysis and playback configuration.

/// Spectrum analyser configuration (mirrors a WebAudio analyser node)
#[derive(Debug, Clone)]
pub struct AnalyserConfig {
    /// FFT window size in frames (must be power of 2)
    /// The byte spectrum has fft_size / 2 bins.
    pub fft_size: usize,

    /// Exponential smoothing between frames, in [0, 1)
    /// 0 = no smoothing, 0.8 = WebAudio default
    pub smoothing: f32,

    /// Magnitude (dB) mapped to byte 0
    pub min_db: f32,

    /// Magnitude (dB) mapped to byte 255
    pub max_db: f32,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            fft_size: 512,
            smoothing: 0.8,
            min_db: -100.0,
            max_db: -30.0,
        }
    }
}

impl AnalyserConfig {
    /// Number of bins in the byte spectrum
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), String> {
        if !self.fft_size.is_power_of_two() || self.fft_size < 32 {
            return Err(format!(
                "FFT size must be a power of 2 and at least 32, got {}",
                self.fft_size
            ));
        }
        if !(0.0..1.0).contains(&self.smoothing) {
            return Err(format!("Smoothing must be in [0, 1), got {}", self.smoothing));
        }
        if self.min_db >= self.max_db {
            return Err(format!(
                "min_db ({}) must be below max_db ({})",
                self.min_db, self.max_db
            ));
        }
        Ok(())
    }
}

/// Audio playback configuration
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Output gain (1.0 = full volume)
    pub volume: f32,

    /// Restart from the beginning when the clip ends
    pub looping: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: 1.0,
            looping: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_analyser_config_is_valid() {
        let config = AnalyserConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bin_count(), 256);
    }

    #[test]
    fn test_analyser_config_rejects_bad_values() {
        let mut config = AnalyserConfig {
            fft_size: 500,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        config.fft_size = 1024;
        config.smoothing = 1.0;
        assert!(config.validate().is_err());

        config.smoothing = 0.5;
        config.min_db = -30.0;
        assert!(config.validate().is_err());
    }
}
