// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Momentum scrolling along one axis.
//!
//! Velocity decays exponentially with time constant `τ`:
//! `v(t) = v₀·e^(−t/τ)`. Each step integrates that curve exactly, so the
//! distance travelled does not depend on the frame rate. A wheel delta `d`
//! is turned into a velocity impulse of `d·sensitivity/τ`, which makes the
//! total momentum travel of one unclamped notch equal to `d·sensitivity`.

use alloc::vec::Vec;

use super::region::ScrollExtents;
use crate::time::{Duration, HostTime};
use crate::trace::{Diagnostic, DiagnosticKind, Subject};

/// Weight of the newest sample in the drag velocity estimate.
const DRAG_VELOCITY_WEIGHT: f64 = 0.8;

/// Physics parameters for one [`Fling`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlingConfig {
    /// Multiplier applied to wheel and drag deltas.
    pub sensitivity: f64,
    /// Friction time constant: velocity falls to `1/e` after this long.
    pub time_constant: Duration,
    /// Speed (units per second) below which momentum stops.
    pub stop_velocity: f64,
    /// Speed cap (units per second).
    pub max_velocity: f64,
    /// A drag released longer than this after its last move carries no
    /// momentum.
    pub release_window: Duration,
}

impl FlingConfig {
    /// Mouse-wheel scrolling: light friction and a generous speed cap.
    #[must_use]
    pub const fn wheel() -> Self {
        Self {
            sensitivity: 1.0,
            time_constant: Duration::from_millis(325),
            stop_velocity: 5.0,
            max_velocity: 8_000.0,
            release_window: Duration::from_millis(100),
        }
    }

    /// Touch and pen dragging: content follows the finger one-to-one, and
    /// momentum decays a little faster than for wheels.
    #[must_use]
    pub const fn touch() -> Self {
        Self {
            sensitivity: 1.0,
            time_constant: Duration::from_millis(250),
            stop_velocity: 10.0,
            max_velocity: 6_000.0,
            release_window: Duration::from_millis(100),
        }
    }

    /// Returns a copy with unusable values replaced by the
    /// [`wheel`](Self::wheel) defaults, pushing one diagnostic per fix.
    #[must_use]
    pub fn sanitized(mut self, subject: Subject, diagnostics: &mut Vec<Diagnostic>) -> Self {
        let defaults = Self::wheel();
        for (field, value, fallback) in [
            ("sensitivity", &mut self.sensitivity, defaults.sensitivity),
            ("stop-velocity", &mut self.stop_velocity, defaults.stop_velocity),
            ("max-velocity", &mut self.max_velocity, defaults.max_velocity),
        ] {
            if !(value.is_finite() && *value >= 0.0) {
                diagnostics.push(
                    Diagnostic::new(DiagnosticKind::InvalidConfig, subject, field)
                        .with_value(*value),
                );
                *value = fallback;
            }
        }
        if self.time_constant.is_zero() {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::InvalidConfig,
                subject,
                "time-constant",
            ));
            self.time_constant = defaults.time_constant;
        }
        self
    }
}

impl Default for FlingConfig {
    fn default() -> Self {
        Self::wheel()
    }
}

#[derive(Clone, Copy, Debug)]
struct DragState {
    last_position: f64,
    last_time: HostTime,
    velocity: f64,
}

/// One momentum simulation: an offset, a velocity, and the bounds it is
/// clamped to.
#[derive(Clone, Debug)]
pub struct Fling {
    config: FlingConfig,
    extents: ScrollExtents,
    offset: f64,
    velocity: f64,
    drag: Option<DragState>,
}

impl Fling {
    /// Creates a resting simulation at `offset` (clamped).
    #[must_use]
    pub fn new(config: FlingConfig, extents: ScrollExtents, offset: f64) -> Self {
        Self {
            config,
            extents,
            offset: extents.clamp(offset),
            velocity: 0.0,
            drag: None,
        }
    }

    /// Current offset.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Current velocity in units per second.
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Whether a pointer drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Whether the simulation is still moving or being dragged.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.velocity != 0.0 || self.drag.is_some()
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> FlingConfig {
        self.config
    }

    /// Replaces the bounds and re-clamps the offset. Returns whether the
    /// offset moved.
    pub fn set_extents(&mut self, extents: ScrollExtents) -> bool {
        self.extents = extents;
        let clamped = extents.clamp(self.offset);
        if clamped == self.offset {
            return false;
        }
        self.offset = clamped;
        self.velocity = 0.0;
        true
    }

    /// Jumps to `offset` (clamped) and drops any momentum.
    pub fn set_offset(&mut self, offset: f64) {
        self.offset = self.extents.clamp(offset);
        self.velocity = 0.0;
        if let Some(drag) = &mut self.drag {
            drag.velocity = 0.0;
        }
    }

    /// Adds the velocity impulse for one wheel delta.
    pub fn impulse(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        let tau = self.config.time_constant.as_secs_f64();
        self.velocity = self.limit(self.velocity + delta * self.config.sensitivity / tau);
    }

    /// Begins a pointer drag at `position`, stopping any momentum.
    pub fn drag_start(&mut self, position: f64, now: HostTime) {
        self.velocity = 0.0;
        self.drag = Some(DragState {
            last_position: position,
            last_time: now,
            velocity: 0.0,
        });
    }

    /// Follows the pointer. Moving the pointer toward the start of the axis
    /// scrolls forward. Returns whether the offset moved.
    pub fn drag_move(&mut self, position: f64, now: HostTime) -> bool {
        let Some(mut drag) = self.drag else {
            return false;
        };
        let delta = (drag.last_position - position) * self.config.sensitivity;
        let before = self.offset;
        self.offset = self.extents.clamp(self.offset + delta);

        let dt = now.saturating_duration_since(drag.last_time).as_secs_f64();
        if dt > 0.0 {
            let sample = delta / dt;
            drag.velocity =
                DRAG_VELOCITY_WEIGHT * sample + (1.0 - DRAG_VELOCITY_WEIGHT) * drag.velocity;
        }
        drag.last_position = position;
        drag.last_time = now;
        self.drag = Some(drag);
        self.offset != before
    }

    /// Ends the drag, handing the measured velocity to the simulation if the
    /// pointer was still moving recently.
    pub fn drag_end(&mut self, now: HostTime) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        let idle = now.saturating_duration_since(drag.last_time);
        self.velocity = if idle <= self.config.release_window {
            self.limit(drag.velocity)
        } else {
            0.0
        };
    }

    /// Advances momentum by `dt`. Returns whether the offset moved.
    ///
    /// Hitting a bound or dropping below the stop velocity zeroes the
    /// velocity.
    pub fn step(&mut self, dt: Duration) -> bool {
        if self.drag.is_some() || self.velocity == 0.0 || dt.is_zero() {
            return false;
        }
        let tau = self.config.time_constant.as_secs_f64();
        let decay = (-dt.as_secs_f64() / tau).exp();
        let target = self.offset + self.velocity * tau * (1.0 - decay);
        self.velocity *= decay;

        let clamped = self.extents.clamp(target);
        if clamped != target || self.velocity.abs() < self.config.stop_velocity {
            self.velocity = 0.0;
        }
        let moved = clamped != self.offset;
        self.offset = clamped;
        moved
    }

    fn limit(&self, velocity: f64) -> f64 {
        let max = self.config.max_velocity;
        velocity.clamp(-max, max)
    }
}
