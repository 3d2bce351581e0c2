// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time-based property animation.
//!
//! [`TransitionAnimator`] fades batches of items in or out with a stagger,
//! tracking per-item and per-batch completion. It never owns the animated
//! elements: it reads start values and writes samples through a
//! [`PropertyAccess`] implementation supplied by the host.
//!
//! Waiting is expressed with timers in a
//! [`TimerQueue`](crate::scheduler::TimerQueue); the animator advances only
//! when [`TransitionAnimator::tick`] is called with a frame tick.
//!
//! [`Follower`] is the frame-driven approach behind the pointer effects:
//! [`TiltResponse`] on cards and [`PointerFollow`] on the whole page.

mod animator;
mod easing;
mod follow;
mod tween;

pub use animator::{
    BatchId, BatchStatus, FadeConfig, Property, PropertyAccess, Stagger, TargetId,
    TransitionAnimator, TransitionChanges, TransitionRecord,
};
pub use easing::Easing;
pub use follow::{
    Follower, PagePose, PointerFollow, PointerFollowConfig, REFERENCE_FRAME, Tilt, TiltConfig,
    TiltResponse,
};
pub use tween::Tween;
