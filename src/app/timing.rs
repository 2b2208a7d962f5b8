//! Frame pacing and the FPS counter

use macroquad::prelude::get_time;

/// Frames counted over the last whole second
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    frames: u32,
    elapsed: f32,
    fps: u32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one frame. Returns true when a second has elapsed and the
    /// displayed value was refreshed.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.frames += 1;
        self.elapsed += dt;
        if self.elapsed < 1.0 {
            return false;
        }
        self.fps = self.frames;
        self.frames = 0;
        self.elapsed -= self.elapsed.floor();
        true
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

/// Sleeps out the rest of each frame. Overruns are not caught up.
#[derive(Debug, Clone, Copy)]
pub struct FrameLimiter {
    frame_time: Option<f64>,
}

impl FrameLimiter {
    /// `target_fps` of 0 means unlocked
    pub fn new(target_fps: u32) -> Self {
        Self {
            frame_time: (target_fps > 0).then(|| 1.0 / target_fps as f64),
        }
    }

    /// Target frame time in seconds (None = unlocked)
    pub fn frame_time(&self) -> Option<f64> {
        self.frame_time
    }

    /// Time left in a frame that has run for `elapsed` seconds
    pub fn remaining(&self, elapsed: f64) -> Option<f64> {
        let target = self.frame_time?;
        let left = target - elapsed;
        (left > 0.0).then_some(left)
    }

    /// Block until `frame_start + frame_time`
    pub fn wait(&self, frame_start: f64) {
        let Some(target) = self.frame_time else {
            return;
        };
        if self.remaining(get_time() - frame_start).is_none() {
            return;
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            // sleep for the bulk, then spin for precision
            let spin_margin = 0.002;
            while get_time() - frame_start + spin_margin < target {
                std::thread::sleep(std::time::Duration::from_millis(1));
            }
            while get_time() - frame_start < target {
                std::hint::spin_loop();
            }
        }
        #[cfg(target_arch = "wasm32")]
        {
            while get_time() - frame_start < target {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_rolls_over_each_second() {
        let mut fps = FpsCounter::new();
        for _ in 0..3 {
            assert!(!fps.tick(0.25));
        }
        assert_eq!(fps.fps(), 0);
        assert!(fps.tick(0.25));
        assert_eq!(fps.fps(), 4);

        assert!(!fps.tick(0.5));
        assert!(fps.tick(0.5));
        assert_eq!(fps.fps(), 2);
    }

    #[test]
    fn test_long_frame_keeps_fraction() {
        let mut fps = FpsCounter::new();
        assert!(fps.tick(1.5));
        assert_eq!(fps.fps(), 1);
        assert!(fps.tick(0.5));
    }

    #[test]
    fn test_limiter_budget() {
        let limiter = FrameLimiter::new(50);
        assert_eq!(limiter.frame_time(), Some(0.02));
        let left = limiter.remaining(0.005).unwrap();
        assert!((left - 0.015).abs() < 1e-9);
        assert_eq!(limiter.remaining(0.03), None);
    }

    #[test]
    fn test_unlocked_never_waits() {
        let limiter = FrameLimiter::new(0);
        assert_eq!(limiter.frame_time(), None);
        assert_eq!(limiter.remaining(0.0), None);
        limiter.wait(0.0);
    }
}
