// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-frame pointer-follow effects.
//!
//! [`TiltResponse`] tilts a single card under the pointer; [`PointerFollow`]
//! turns the whole page content and drags the scene light after the
//! pointer. Both are built on [`Follower`] and meant to be stepped once per
//! frame.

use kurbo::{Point, Size};

use crate::time::Duration;

/// The frame length that [`Follower`] factors are expressed against.
pub const REFERENCE_FRAME: Duration = Duration::from_micros(16_667);

/// Below this distance a follower snaps onto its target.
const SNAP: f64 = 1e-6;

/// Exponential approach toward a moving target.
///
/// Each reference frame closes `factor` of the remaining distance. Steps of
/// other lengths are rescaled so the motion looks the same at any frame
/// rate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Follower {
    value: f64,
    target: f64,
    factor: f64,
}

impl Follower {
    /// Creates a follower resting at `value`. `factor` is clamped to
    /// `[0, 1]`.
    #[must_use]
    pub fn new(value: f64, factor: f64) -> Self {
        let factor = if factor.is_nan() { 0.0 } else { factor.clamp(0.0, 1.0) };
        Self {
            value,
            target: value,
            factor,
        }
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Current target.
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Moves the target.
    pub fn set_target(&mut self, target: f64) {
        if target.is_finite() {
            self.target = target;
        }
    }

    /// Whether the value has reached the target.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.value == self.target
    }

    /// Advances by `dt` and returns the new value.
    pub fn step(&mut self, dt: Duration) -> f64 {
        let frames = dt.as_secs_f64() / REFERENCE_FRAME.as_secs_f64();
        let k = 1.0 - (1.0 - self.factor).powf(frames);
        self.value += (self.target - self.value) * k;
        if (self.target - self.value).abs() < SNAP {
            self.value = self.target;
        }
        self.value
    }
}

/// Parameters of [`TiltResponse`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TiltConfig {
    /// Full rotation range in degrees; the tilt is clamped to half of this
    /// either way.
    pub amount: f64,
    /// Depth offset while hovered.
    pub hover_lift: f64,
    /// [`Follower`] factor for rotation and lift.
    pub factor: f64,
    /// The card's size, against which pointer positions are normalized.
    pub size: Size,
}

impl TiltConfig {
    /// The showcase card.
    #[must_use]
    pub const fn card() -> Self {
        Self {
            amount: 12.0,
            hover_lift: 40.0,
            factor: 0.2,
            size: Size::new(300.0, 300.0),
        }
    }
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self::card()
    }
}

/// Rotation and lift of a card, as produced by [`TiltResponse::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Tilt {
    /// Rotation about the horizontal axis, in degrees.
    pub rotation_x: f64,
    /// Rotation about the vertical axis, in degrees.
    pub rotation_y: f64,
    /// Depth offset.
    pub lift: f64,
}

/// Tilts a card toward the pointer and lifts it while hovered.
#[derive(Clone, Copy, Debug)]
pub struct TiltResponse {
    config: TiltConfig,
    pointer: Point,
    hovered: bool,
    rotation_x: Follower,
    rotation_y: Follower,
    lift: Follower,
}

impl TiltResponse {
    /// Creates a flat, unhovered card.
    #[must_use]
    pub fn new(config: TiltConfig) -> Self {
        Self {
            config,
            pointer: center(config.size),
            hovered: false,
            rotation_x: Follower::new(0.0, config.factor),
            rotation_y: Follower::new(0.0, config.factor),
            lift: Follower::new(0.0, config.factor),
        }
    }

    /// The pointer entered the card.
    pub fn pointer_enter(&mut self) {
        self.hovered = true;
    }

    /// The pointer moved to `local`, in card coordinates.
    pub fn pointer_move(&mut self, local: Point) {
        if local.x.is_finite() && local.y.is_finite() {
            self.pointer = local;
        }
    }

    /// The pointer left; the card returns to flat.
    pub fn pointer_leave(&mut self) {
        self.hovered = false;
        self.pointer = center(self.config.size);
    }

    /// The tilt the card is heading toward.
    #[must_use]
    pub fn target(&self) -> Tilt {
        let half = self.config.amount / 2.0;
        let (rotation_x, rotation_y) =
            lean_toward(self.pointer, self.config.size, self.config.amount);
        Tilt {
            rotation_x: rotation_x.clamp(-half, half),
            rotation_y: rotation_y.clamp(-half, half),
            lift: if self.hovered {
                self.config.hover_lift
            } else {
                0.0
            },
        }
    }

    /// Advances the followers by `dt`.
    pub fn step(&mut self, dt: Duration) -> Tilt {
        let target = self.target();
        self.rotation_x.set_target(target.rotation_x);
        self.rotation_y.set_target(target.rotation_y);
        self.lift.set_target(target.lift);
        Tilt {
            rotation_x: self.rotation_x.step(dt),
            rotation_y: self.rotation_y.step(dt),
            lift: self.lift.step(dt),
        }
    }
}

// ---------------------------------------------------------------------------
// Page follow
// ---------------------------------------------------------------------------

/// Parameters of [`PointerFollow`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerFollowConfig {
    /// Full rotation range of the page content in degrees.
    pub rotation_amount: f64,
    /// [`Follower`] factor for rotation and light.
    pub factor: f64,
    /// Where the light rests before the pointer first moves.
    pub light_origin: Point,
}

impl PointerFollowConfig {
    /// The showcase page: a gentle lean and a slow light.
    #[must_use]
    pub const fn page() -> Self {
        Self {
            rotation_amount: 5.0,
            factor: 0.05,
            light_origin: Point::new(400.0, 0.0),
        }
    }
}

impl Default for PointerFollowConfig {
    fn default() -> Self {
        Self::page()
    }
}

/// Page content rotation and light position, as produced by
/// [`PointerFollow::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PagePose {
    /// Rotation of the page content about the horizontal axis, in degrees.
    pub rotation_x: f64,
    /// Rotation of the page content about the vertical axis, in degrees.
    pub rotation_y: f64,
    /// Light position in viewport coordinates.
    pub light: Point,
}

/// Leans the page content toward the pointer and moves the light after it.
///
/// The pointer starts at the viewport center, so the page rests flat until
/// the first move.
#[derive(Clone, Copy, Debug)]
pub struct PointerFollow {
    config: PointerFollowConfig,
    viewport: Size,
    pointer: Point,
    rotation_x: Follower,
    rotation_y: Follower,
    light_x: Follower,
    light_y: Follower,
}

impl PointerFollow {
    /// Creates a flat page with the light at its origin.
    #[must_use]
    pub fn new(config: PointerFollowConfig, viewport: Size) -> Self {
        Self {
            config,
            viewport,
            pointer: center(viewport),
            rotation_x: Follower::new(0.0, config.factor),
            rotation_y: Follower::new(0.0, config.factor),
            light_x: Follower::new(config.light_origin.x, config.factor),
            light_y: Follower::new(config.light_origin.y, config.factor),
        }
    }

    /// The viewport pointer positions are normalized against.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// The pointer moved to `position`, in viewport coordinates.
    pub fn pointer_move(&mut self, position: Point) {
        if position.x.is_finite() && position.y.is_finite() {
            self.pointer = position;
        }
    }

    /// The last pointer position.
    #[must_use]
    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// The pose the page is heading toward.
    #[must_use]
    pub fn target(&self) -> PagePose {
        let (rotation_x, rotation_y) =
            lean_toward(self.pointer, self.viewport, self.config.rotation_amount);
        PagePose {
            rotation_x,
            rotation_y,
            light: self.pointer,
        }
    }

    /// The current pose.
    #[must_use]
    pub fn pose(&self) -> PagePose {
        PagePose {
            rotation_x: self.rotation_x.value(),
            rotation_y: self.rotation_y.value(),
            light: Point::new(self.light_x.value(), self.light_y.value()),
        }
    }

    /// Advances the followers by `dt`.
    pub fn step(&mut self, dt: Duration) -> PagePose {
        let target = self.target();
        self.rotation_x.set_target(target.rotation_x);
        self.rotation_y.set_target(target.rotation_y);
        self.light_x.set_target(target.light.x);
        self.light_y.set_target(target.light.y);
        self.rotation_x.step(dt);
        self.rotation_y.step(dt);
        self.light_x.step(dt);
        self.light_y.step(dt);
        self.pose()
    }
}

/// Rotation about x and y that leans a surface of `size` toward `pointer`.
///
/// The center maps to no rotation and the edges to `±amount / 2`.
fn lean_toward(pointer: Point, size: Size, amount: f64) -> (f64, f64) {
    let half = amount / 2.0;
    let nx = pointer.x / size.width.max(1.0);
    let ny = pointer.y / size.height.max(1.0);
    (-(ny * amount - half), nx * amount - half)
}

fn center(size: Size) -> Point {
    Point::new(size.width / 2.0, size.height / 2.0)
}
