// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Injected time sources.
//!
//! Nothing in this crate reads a global clock. Components receive the current
//! [`HostTime`] through a [`FrameTick`](crate::timing::FrameTick) or an
//! explicit argument, and hosts produce those values from a [`Clock`].
//! [`ManualClock`] gives tests full control over time; [`SystemClock`] reads
//! the process's monotonic clock.

use core::cell::Cell;

use crate::time::{Duration, HostTime};

/// A monotonic time source.
pub trait Clock {
    /// Returns the current time.
    fn now(&self) -> HostTime;
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<HostTime>,
}

impl ManualClock {
    /// Creates a clock reading `start`.
    #[must_use]
    pub fn new(start: HostTime) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Sets the clock to `t`. Times earlier than the current reading are
    /// ignored so the clock stays monotonic.
    pub fn set(&self, t: HostTime) {
        if t > self.now.get() {
            self.now.set(t);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> HostTime {
        self.now.get()
    }
}

/// The process's monotonic clock, measured from when the value was created.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: std::time::Instant,
}

impl SystemClock {
    /// Creates a clock whose origin is "now".
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "u64 microseconds cover more than half a million years"
    )]
    fn now(&self) -> HostTime {
        HostTime(self.origin.elapsed().as_micros() as u64)
    }
}
