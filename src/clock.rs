//! Per-frame driver: advances the scene clock and publishes elapsed time.

use std::time::Instant;

use crate::params::WaterParams;

/// Source of seconds elapsed since the scene started
pub trait Clock {
    fn elapsed_s(&self) -> f32;
}

/// Wall clock started at construction
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn elapsed_s(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

/// Hand-advanced clock for deterministic playback
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_s: f32,
}

impl ManualClock {
    pub fn new(now_s: f32) -> Self {
        Self { now_s }
    }

    pub fn advance(&mut self, dt_s: f32) {
        self.now_s += dt_s.max(0.0);
    }
}

impl Clock for ManualClock {
    fn elapsed_s(&self) -> f32 {
        self.now_s
    }
}

/// Writes the clock into `WaterParams::elapsed_time_s` once per rendered frame
pub struct FrameDriver<C: Clock> {
    clock: C,
    frames: u64,
}

impl<C: Clock> FrameDriver<C> {
    pub fn new(clock: C) -> Self {
        Self { clock, frames: 0 }
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Frames ticked so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Publish the current time; returns the value written
    ///
    /// Elapsed time never moves backwards, whatever the clock reports.
    pub fn tick(&mut self, params: &mut WaterParams) -> f32 {
        let now = self.clock.elapsed_s().max(params.elapsed_time_s);
        params.elapsed_time_s = now;
        self.frames += 1;
        now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_publishes_clock() {
        let mut params = WaterParams::default();
        let mut driver = FrameDriver::new(ManualClock::new(0.0));

        driver.clock_mut().advance(0.016);
        assert_eq!(driver.tick(&mut params), 0.016);
        assert_eq!(params.elapsed_time_s(), 0.016);
        assert_eq!(driver.frames(), 1);
    }

    #[test]
    fn test_frozen_clock_is_idempotent() {
        let mut params = WaterParams::default();
        let mut driver = FrameDriver::new(ManualClock::new(2.5));

        driver.tick(&mut params);
        let first = params.clone();
        driver.tick(&mut params);
        assert_eq!(params, first);
    }

    #[test]
    fn test_time_never_goes_backwards() {
        let mut params = WaterParams {
            elapsed_time_s: 10.0,
            ..WaterParams::default()
        };
        let mut driver = FrameDriver::new(ManualClock::new(3.0));
        assert_eq!(driver.tick(&mut params), 10.0);
    }

    #[test]
    fn test_driver_only_touches_time() {
        let mut params = WaterParams::default();
        params.color_offset = 0.6;
        let mut driver = FrameDriver::new(ManualClock::new(1.0));
        driver.tick(&mut params);

        let expected = WaterParams {
            elapsed_time_s: 1.0,
            color_offset: 0.6,
            ..WaterParams::default()
        };
        assert_eq!(params, expected);
    }

    #[test]
    fn test_monotonic_clock_advances() {
        let clock = MonotonicClock::start();
        let a = clock.elapsed_s();
        let b = clock.elapsed_s();
        assert!(a >= 0.0);
        assert!(b >= a);
    }
}
