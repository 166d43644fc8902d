//! Frame clock.
//!
//! Feeds the millisecond timeline used by deferred ticks and keeps a
//! periodically refreshed FPS estimate for debug logging.
//!
//! # Example
//!
//! ```ignore
//! use plexus::time::Time;
//!
//! let mut time = Time::new();
//!
//! // Once per redraw:
//! time.update();
//! let now = time.now_ms();
//! ```

use std::time::{Duration, Instant};

use crate::timer::Millis;

/// Time tracking for the redraw loop.
#[derive(Debug)]
pub struct Time {
    /// When the timer was created.
    start: Instant,
    /// When the last frame occurred.
    last_frame: Instant,
    /// Milliseconds since start, sampled at the last update.
    now_ms: Millis,
    /// Time since last frame in seconds.
    delta_secs: f32,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to update FPS calculation.
    fps_update_interval: Duration,
}

impl Time {
    /// Create a new time tracker starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            now_ms: 0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Sample the clock. Call once per frame.
    ///
    /// Returns `true` when the FPS estimate was refreshed this frame.
    pub fn update(&mut self) -> bool {
        let now = Instant::now();

        self.delta_secs = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.now_ms = now.duration_since(self.start).as_millis() as Millis;
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
            return true;
        }
        false
    }

    /// Milliseconds since start, as of the last [`update`](Self::update).
    #[inline]
    pub fn now_ms(&self) -> Millis {
        self.now_ms
    }

    /// Time since last frame in seconds.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Calculated frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_time_new() {
        let time = Time::new();
        assert_eq!(time.frame(), 0);
        assert_eq!(time.now_ms(), 0);
    }

    #[test]
    fn test_time_update_advances() {
        let mut time = Time::new();
        thread::sleep(Duration::from_millis(10));
        time.update();

        assert!(time.now_ms() >= 10);
        assert!(time.delta() > 0.0);
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn test_fps_refreshes_after_interval() {
        let mut time = Time::new();
        assert!(!time.update());
        thread::sleep(Duration::from_millis(510));
        assert!(time.update());
        assert!(time.fps() > 0.0);
    }
}
