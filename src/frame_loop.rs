//! Explicit per-frame loop with a cooperative stop flag.
//!
//! Each iteration checks the stop flag, waits for the host to signal the next
//! frame (the only suspension point) and runs the frame to completion.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::viewport::Viewport;

/// Signal that the host is ready for a new frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTick {
    /// Zero-based frame counter
    pub index: u64,
    /// Time since the frame source started
    pub elapsed: Duration,
    /// New viewport if the drawable was resized since the previous frame
    pub resized: Option<Viewport>,
}

/// Host environment producing frame signals
pub trait FrameSource {
    /// Block until the next frame is due, or return `None` once the host is gone
    fn next_frame(&mut self) -> Option<FrameTick>;
}

/// Shared cancellation flag, cheap to clone
#[derive(Clone, Debug, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Drive `on_frame` until the stop flag is set or the source closes
///
/// Returns the number of frames run.
pub fn run<S, F>(source: &mut S, stop: &StopFlag, mut on_frame: F) -> u64
where
    S: FrameSource,
    F: FnMut(&FrameTick),
{
    let mut frames = 0;

    while !stop.is_stopped() {
        let Some(tick) = source.next_frame() else {
            log::debug!("frame source closed");
            break;
        };

        on_frame(&tick);
        frames += 1;
    }

    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic 60 Hz source that closes after `limit` frames
    struct FixedStep {
        index: u64,
        limit: u64,
        resize_at: Option<(u64, Viewport)>,
    }

    impl FixedStep {
        fn new(limit: u64) -> Self {
            Self {
                index: 0,
                limit,
                resize_at: None,
            }
        }
    }

    impl FrameSource for FixedStep {
        fn next_frame(&mut self) -> Option<FrameTick> {
            if self.index >= self.limit {
                return None;
            }
            let tick = FrameTick {
                index: self.index,
                elapsed: Duration::from_micros(16_667 * self.index),
                resized: self
                    .resize_at
                    .filter(|(at, _)| *at == self.index)
                    .map(|(_, viewport)| viewport),
            };
            self.index += 1;
            Some(tick)
        }
    }

    #[test]
    fn test_runs_until_source_closes() {
        let mut source = FixedStep::new(5);
        let mut seen = Vec::new();

        let frames = run(&mut source, &StopFlag::new(), |tick| seen.push(tick.index));

        assert_eq!(frames, 5);
        assert_eq!(seen, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_stop_flag_checked_each_iteration() {
        let mut source = FixedStep::new(100);
        let stop = StopFlag::new();
        let handle = stop.clone();

        let frames = run(&mut source, &stop, |tick| {
            if tick.index == 2 {
                handle.stop();
            }
        });

        // The frame that requested the stop completes, no further frame starts
        assert_eq!(frames, 3);
        assert_eq!(source.index, 3);
    }

    #[test]
    fn test_stopped_before_start_runs_nothing() {
        let mut source = FixedStep::new(10);
        let stop = StopFlag::new();
        stop.stop();

        assert_eq!(run(&mut source, &stop, |_| panic!("frame ran")), 0);
        assert_eq!(source.index, 0);
    }

    #[test]
    fn test_resize_delivered_with_tick() {
        let mut source = FixedStep::new(3);
        source.resize_at = Some((1, Viewport::new(1600, 900)));
        let mut resizes = Vec::new();

        run(&mut source, &StopFlag::new(), |tick| resizes.push(tick.resized));

        assert_eq!(resizes, vec![None, Some(Viewport::new(1600, 900)), None]);
    }
}
