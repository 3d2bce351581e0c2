// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-value interpolation.

use super::easing::Easing;
use crate::time::{Duration, HostTime};

/// Interpolates one value from `start` to `target` over `duration`,
/// beginning at `start_time`.
///
/// Samples never cross the target, whatever the easing curve returns, and
/// equal the target exactly from the end of the duration on.
#[derive(Clone, Copy, Debug)]
pub struct Tween {
    /// Value at `start_time`.
    pub start: f64,
    /// Final value.
    pub target: f64,
    /// When interpolation begins.
    pub start_time: HostTime,
    /// Length of the interpolation.
    pub duration: Duration,
    /// Progress curve.
    pub easing: Easing,
}

impl Tween {
    /// Creates a tween.
    #[must_use]
    pub const fn new(
        start: f64,
        target: f64,
        start_time: HostTime,
        duration: Duration,
        easing: Easing,
    ) -> Self {
        Self {
            start,
            target,
            start_time,
            duration,
            easing,
        }
    }

    /// When the tween reaches its target.
    #[must_use]
    pub fn end_time(&self) -> HostTime {
        self.start_time + self.duration
    }

    /// Returns whether `now` is at or past the end.
    #[must_use]
    pub fn is_finished(&self, now: HostTime) -> bool {
        now >= self.end_time()
    }

    /// Samples the value at `now`. Before `start_time` this is `start`.
    #[must_use]
    pub fn sample(&self, now: HostTime) -> f64 {
        if self.is_finished(now) {
            return self.target;
        }
        let elapsed = now.saturating_duration_since(self.start_time);
        let t = elapsed.micros() as f64 / self.duration.micros() as f64;
        let value = self.start + (self.target - self.start) * self.easing.apply(t);
        if self.target >= self.start {
            value.clamp(self.start, self.target)
        } else {
            value.clamp(self.target, self.start)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> HostTime {
        HostTime::from_millis(v)
    }

    #[test]
    fn linear_midpoint() {
        let tween = Tween::new(0.0, 10.0, ms(100), Duration::from_millis(100), Easing::Linear);
        assert_eq!(tween.sample(ms(50)), 0.0, "before start");
        assert_eq!(tween.sample(ms(150)), 5.0);
        assert_eq!(tween.sample(ms(200)), 10.0);
        assert_eq!(tween.sample(ms(900)), 10.0);
    }

    #[test]
    fn decreasing_values_reach_target_exactly() {
        let tween = Tween::new(1.0, 0.0, ms(0), Duration::from_millis(500), Easing::CubicIn);
        let mut prev = 1.0;
        for frame in 0..=40 {
            let v = tween.sample(HostTime(frame * 16_667));
            assert!(v <= prev && v >= 0.0, "frame {frame}: {v}");
            prev = v;
        }
        assert_eq!(prev, 0.0);
    }

    #[test]
    fn overshooting_curves_are_clamped() {
        let tween = Tween::new(0.0, 1.0, ms(0), Duration::from_millis(100), Easing::Custom(|t| t * 3.0));
        assert_eq!(tween.sample(ms(50)), 1.0);
        let under = Tween::new(0.0, 1.0, ms(0), Duration::from_millis(100), Easing::Custom(|t| -t));
        assert_eq!(under.sample(ms(50)), 0.0);
    }

    #[test]
    fn zero_duration_jumps() {
        let tween = Tween::new(3.0, 7.0, ms(10), Duration::ZERO, Easing::Linear);
        assert_eq!(tween.sample(ms(10)), 7.0);
    }
}
