//! Fixed-timestep frame pacing

use std::time::{Duration, Instant};

use crate::consts::MAX_SUBSTEPS;

/// Accumulates wall-clock time and hands out whole simulation steps
#[derive(Debug, Clone)]
pub struct FrameClock {
    step: Duration,
    frame: Duration,
    accumulator: Duration,
    last: Instant,
}

impl FrameClock {
    pub fn new(step_seconds: f32, frame_rate: u32) -> Self {
        Self {
            step: Duration::from_secs_f32(step_seconds),
            frame: Duration::from_secs_f64(1.0 / f64::from(frame_rate.max(1))),
            accumulator: Duration::ZERO,
            last: Instant::now(),
        }
    }

    /// Steps to run for `elapsed` wall time, capped at [`MAX_SUBSTEPS`]
    ///
    /// Time beyond the cap is dropped so a stall doesn't snowball.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        // Clamp huge gaps (debugger, suspended terminal)
        self.accumulator += elapsed.min(Duration::from_millis(100));

        let mut steps = 0;
        while self.accumulator >= self.step && steps < MAX_SUBSTEPS {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS && self.accumulator >= self.step {
            self.accumulator = Duration::ZERO;
        }
        steps
    }

    /// Measure time since the last call and advance by it
    pub fn tick(&mut self) -> u32 {
        let now = Instant::now();
        let elapsed = now - self.last;
        self.last = now;
        self.advance(elapsed)
    }

    /// Sleep until the next frame is due
    pub fn wait_for_next_frame(&self) {
        let spent = self.last.elapsed();
        if spent < self.frame {
            std::thread::sleep(self.frame - spent);
        }
    }

    /// Forget accumulated time (after a menu or pause)
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
        self.last = Instant::now();
    }
}
