//! Looping clip playback on the default output device.

use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use super::AudioClip;
use crate::params::PlaybackConfig;

/// State shared between the output callback and the render thread
#[derive(Debug, Default)]
struct PlaybackState {
    /// Current clip frame (wrapped when looping)
    position: AtomicUsize,
    /// Set once the stream is running, cleared when a one-shot clip ends
    playing: AtomicBool,
}

/// Clip player bound to a cpal output stream
pub struct AudioPlayer {
    state: Arc<PlaybackState>,

    /// Audio output stream (kept alive)
    _stream: cpal::Stream,
}

impl AudioPlayer {
    /// Open the default output device and start playing `clip`
    pub fn start(clip: Arc<AudioClip>, config: &PlaybackConfig) -> Result<Self> {
        if clip.frames() == 0 {
            return Err(anyhow!("audio clip is empty"));
        }

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .context("no audio output device found")?;

        let supported = device
            .default_output_config()
            .context("failed to query audio output config")?;

        log::info!(
            "Audio: {} @ {}Hz, {} ch",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            supported.sample_rate().0,
            supported.channels()
        );

        let out_channels = supported.channels() as usize;
        let mut cursor = ClipCursor::new(
            clip.sample_rate(),
            supported.sample_rate().0,
            config.looping,
        );
        let volume = config.volume;

        let state = Arc::new(PlaybackState::default());
        let state_cb = Arc::clone(&state);

        let stream = device
            .build_output_stream(
                &supported.into(),
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    for frame in data.chunks_mut(out_channels) {
                        match cursor.next_frame(clip.frames()) {
                            Some(index) => {
                                let source = clip.frame(index);
                                for (c, out) in frame.iter_mut().enumerate() {
                                    // Duplicate the last channel when the device has more
                                    *out = source[c.min(source.len() - 1)] * volume;
                                }
                            }
                            None => {
                                frame.fill(0.0);
                                state_cb.playing.store(false, Ordering::Relaxed);
                            }
                        }
                    }
                    state_cb.position.store(cursor.frame(), Ordering::Relaxed);
                },
                |err| log::error!("Audio stream error: {}", err),
                None,
            )
            .context("failed to build audio output stream")?;

        stream.play().context("failed to start audio stream")?;
        state.playing.store(true, Ordering::Relaxed);

        Ok(Self {
            state,
            _stream: stream,
        })
    }

    /// Whether audio is currently audible
    pub fn is_playing(&self) -> bool {
        self.state.playing.load(Ordering::Relaxed)
    }

    /// Current clip frame index
    pub fn position(&self) -> usize {
        self.state.position.load(Ordering::Relaxed)
    }
}

/// Nearest-sample playback cursor converting clip rate to device rate
#[derive(Debug, Clone)]
pub(crate) struct ClipCursor {
    position: f64,
    step: f64,
    looping: bool,
}

impl ClipCursor {
    pub(crate) fn new(clip_rate: u32, device_rate: u32, looping: bool) -> Self {
        Self {
            position: 0.0,
            step: clip_rate as f64 / device_rate.max(1) as f64,
            looping,
        }
    }

    /// Clip frame to output next, or `None` once a one-shot clip is done
    pub(crate) fn next_frame(&mut self, clip_frames: usize) -> Option<usize> {
        if clip_frames == 0 {
            return None;
        }

        let mut index = self.position as usize;
        if index >= clip_frames {
            if !self.looping {
                return None;
            }
            self.position %= clip_frames as f64;
            index = (self.position as usize).min(clip_frames - 1);
        }

        self.position += self.step;
        Some(index)
    }

    /// Frame the cursor currently points at
    pub(crate) fn frame(&self) -> usize {
        self.position as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_same_rate() {
        let mut cursor = ClipCursor::new(44100, 44100, true);
        let frames: Vec<_> = (0..5).filter_map(|_| cursor.next_frame(3)).collect();
        assert_eq!(frames, vec![0, 1, 2, 0, 1]);
    }

    #[test]
    fn test_cursor_upsampling_repeats_frames() {
        let mut cursor = ClipCursor::new(22050, 44100, true);
        let frames: Vec<_> = (0..6).filter_map(|_| cursor.next_frame(100)).collect();
        assert_eq!(frames, vec![0, 0, 1, 1, 2, 2]);
    }

    #[test]
    fn test_cursor_one_shot_stops() {
        let mut cursor = ClipCursor::new(48000, 48000, false);
        let frames: Vec<_> = (0..5).map(|_| cursor.next_frame(2)).collect();
        assert_eq!(frames, vec![Some(0), Some(1), None, None, None]);
    }
}
