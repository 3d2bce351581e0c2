// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

use vitrine_core::trace::FrameSummary;

/// Letter grade for frame pacing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacingGrade {
    /// Steady intervals and almost no late frames.
    A,
    /// Minor jitter.
    B,
    /// Visible stutter.
    C,
    /// Poor pacing.
    D,
}

impl PacingGrade {
    /// Returns a short label for HUD rendering.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

/// Aggregated report returned by [`PacingTracker::observe`].
#[derive(Clone, Copy, Debug)]
pub struct PacingReport {
    /// Current grade.
    pub grade: PacingGrade,
    /// Late frames per 1000 observed frames.
    pub late_per_1000: f64,
    /// Mean absolute deviation from the nominal interval over the window,
    /// in ms.
    pub jitter_ms: f64,
    /// Total frames observed.
    pub total_frames: u64,
    /// Total late frames observed.
    pub late_frames: u64,
}

/// Rolling pacing tracker with a fixed-size frame-interval history.
///
/// A frame is late when its interval exceeds one and a half nominal
/// intervals, which is what a dropped frame looks like from the tick side.
#[derive(Debug)]
pub struct PacingTracker<const N: usize> {
    intervals_ms: [f64; N],
    cursor: usize,
    nominal_ms: f64,
    total_frames: u64,
    late_frames: u64,
}

impl<const N: usize> Default for PacingTracker<N> {
    fn default() -> Self {
        Self::new(16.667)
    }
}

impl<const N: usize> PacingTracker<N> {
    /// Creates a tracker whose history is prefilled with `nominal_ms`.
    #[must_use]
    pub const fn new(nominal_ms: f64) -> Self {
        Self {
            intervals_ms: [nominal_ms; N],
            cursor: 0,
            nominal_ms,
            total_frames: 0,
            late_frames: 0,
        }
    }

    /// Observes one frame and returns an updated report.
    #[must_use]
    pub fn observe(&mut self, summary: &FrameSummary) -> PacingReport {
        let interval = summary.interval.as_millis_f64();
        self.total_frames = self.total_frames.saturating_add(1);
        self.intervals_ms[self.cursor % N] = interval;
        self.cursor = (self.cursor + 1) % N;

        if interval > self.nominal_ms * 1.5 {
            self.late_frames = self.late_frames.saturating_add(1);
        }

        let late_rate = self.late_frames as f64 * 1000.0 / self.total_frames as f64;
        let jitter = self.jitter_ms();

        PacingReport {
            grade: grade_for(jitter, late_rate),
            late_per_1000: late_rate,
            jitter_ms: jitter,
            total_frames: self.total_frames,
            late_frames: self.late_frames,
        }
    }

    /// Mean absolute deviation of the window from the nominal interval.
    #[must_use]
    pub fn jitter_ms(&self) -> f64 {
        if N == 0 {
            return 0.0;
        }
        let sum: f64 = self
            .intervals_ms
            .iter()
            .map(|v| (v - self.nominal_ms).abs())
            .sum();
        sum / N as f64
    }

    /// Returns ring-buffer frame intervals oldest→newest.
    #[must_use]
    pub fn frame_intervals(&self) -> [f64; N] {
        let mut out = [0.0; N];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.intervals_ms[(self.cursor + i) % N];
        }
        out
    }

    /// Returns an ASCII sparkline over `frame_intervals()`.
    #[must_use]
    pub fn sparkline_ascii(&self, min_ms: f64, max_ms: f64) -> String {
        const LEVELS: &[u8] = b" .:-=+*#%@";
        let span = (max_ms - min_ms).max(f64::EPSILON);
        let mut out = String::with_capacity(N);
        for v in self.frame_intervals() {
            let t = (v.clamp(min_ms, max_ms) - min_ms) / span;
            #[expect(
                clippy::cast_possible_truncation,
                reason = "index is clamped to ASCII level count"
            )]
            let level = (t * (LEVELS.len() as f64 - 1.0) + 0.5) as usize;
            out.push(LEVELS[level.min(LEVELS.len() - 1)] as char);
        }
        out
    }
}

fn grade_for(jitter_ms: f64, late_per_1000: f64) -> PacingGrade {
    if jitter_ms < 1.0 && late_per_1000 < 5.0 {
        PacingGrade::A
    } else if jitter_ms < 3.0 && late_per_1000 < 20.0 {
        PacingGrade::B
    } else if jitter_ms < 8.0 && late_per_1000 < 60.0 {
        PacingGrade::C
    } else {
        PacingGrade::D
    }
}
