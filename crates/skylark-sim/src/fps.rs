//! Once-per-second frame counter.

use std::time::{Duration, Instant};

/// Window after which the frame count is published.
pub const FPS_WINDOW: Duration = Duration::from_millis(1000);

/// Counts frames and publishes the count when a full window has elapsed.
///
/// Time is passed in rather than read from the clock.
#[derive(Debug, Clone)]
pub struct FpsCounter {
    window_start: Instant,
    frames: u32,
    fps: u32,
}

impl FpsCounter {
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
            fps: 0,
        }
    }

    /// Count one frame at `now`. Returns the new value when it is published.
    pub fn tick(&mut self, now: Instant) -> Option<u32> {
        self.frames += 1;
        if now.saturating_duration_since(self.window_start) >= FPS_WINDOW {
            self.fps = self.frames;
            self.frames = 0;
            self.window_start = now;
            Some(self.fps)
        } else {
            None
        }
    }

    /// Last published value, 0 until the first window closes.
    pub fn fps(&self) -> u32 {
        self.fps
    }
}
