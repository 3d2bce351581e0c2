// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame ticks.
//!
//! A [`FrameTick`] is one display-frame opportunity. Hosts create them from
//! whatever drives their render loop (`requestAnimationFrame`, a display
//! link, or a test driver) through a [`FrameTicker`], which numbers frames
//! and measures the interval since the previous one.

use crate::time::{Duration, HostTime};

/// Nominal frame interval assumed before two ticks have been observed
/// (60 Hz).
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration(16_667);

/// A frame opportunity delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameTick {
    /// Host time at which the frame callback ran.
    pub now: HostTime,
    /// Monotonically increasing frame counter.
    pub frame_index: u64,
    /// Time since the previous tick, or [`DEFAULT_FRAME_INTERVAL`] for the
    /// first one.
    pub interval: Duration,
}

impl FrameTick {
    /// Creates a tick.
    #[inline]
    #[must_use]
    pub const fn new(now: HostTime, frame_index: u64, interval: Duration) -> Self {
        Self {
            now,
            frame_index,
            interval,
        }
    }
}

/// Turns raw callback timestamps into numbered [`FrameTick`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameTicker {
    last: Option<HostTime>,
    next_index: u64,
}

impl FrameTicker {
    /// Creates a ticker whose first tick has index 0.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: None,
            next_index: 0,
        }
    }

    /// Produces the tick for a frame callback at `now`.
    ///
    /// Timestamps that go backwards are treated as a zero interval.
    pub fn tick(&mut self, now: HostTime) -> FrameTick {
        let interval = match self.last {
            Some(last) => now.saturating_duration_since(last),
            None => DEFAULT_FRAME_INTERVAL,
        };
        let now = self.last.map_or(now, |last| now.max(last));
        let tick = FrameTick::new(now, self.next_index, interval);
        self.last = Some(now);
        self.next_index += 1;
        tick
    }
}
