// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic frame driver, scene double, and pacing metrics for
//! exercising `vitrine_core` without a renderer.
//!
//! - [`FrameDriver`] owns a [`ManualClock`](vitrine_core::clock::ManualClock)
//!   and produces evenly spaced (or deliberately uneven) frame ticks.
//! - [`FakeScene`] stands in for a renderer: it stores positions, opacity,
//!   depth, and tilt per element and implements the capability traits.
//! - [`PacingTracker`] grades frame-interval regularity over a rolling
//!   window.

#![no_std]

extern crate alloc;

mod driver;
mod pacing;
mod scene;

pub use driver::FrameDriver;
pub use pacing::{PacingGrade, PacingReport, PacingTracker};
pub use scene::{FakeElement, FakeScene};
