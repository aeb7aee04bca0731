//! Frame timing: a fixed-rate update accumulator plus the per-frame paint clock.
//!
//! Tests are updated at a fixed rate (`update_rate_ms`, 25 ms by default) and
//! painted once per rendered frame. The paint clock carries the real elapsed
//! time since the previous frame so animations stay wall-clock accurate.

use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

pub const DEFAULT_UPDATE_RATE_MS: u32 = 25;

/// Snapshot handed to `paint` callbacks once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clock {
    /// Milliseconds since the previous frame.
    pub dt_ms: f32,
}

pub struct TimeState {
    pub fixed_dt: f64,
    pub max_accumulator: f64,
    accumulator: f64,
    pub real_time: f64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt: f64,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TimeState {
    pub fn new() -> Self {
        Self::with_update_rate(DEFAULT_UPDATE_RATE_MS)
    }

    pub fn with_update_rate(update_rate_ms: u32) -> Self {
        Self {
            fixed_dt: f64::from(update_rate_ms.max(1)) / 1000.0,
            max_accumulator: 0.25,
            accumulator: 0.0,
            real_time: 0.0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt: 0.0,
            last_instant: Instant::now(),
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(dt);
    }

    /// Feeds `dt` seconds of real time into the accumulator.
    pub fn advance(&mut self, dt: f64) {
        self.real_dt = dt;

        if self.real_dt > self.max_accumulator {
            log::warn!(
                "Frame took {:.1}ms, capping to {}ms",
                self.real_dt * 1000.0,
                self.max_accumulator * 1000.0
            );
            self.real_dt = self.max_accumulator;
        }

        self.accumulator += self.real_dt;
        self.real_time += self.real_dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

    pub fn paint_clock(&self) -> Clock {
        Clock {
            dt_ms: (self.real_dt * 1000.0) as f32,
        }
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}
