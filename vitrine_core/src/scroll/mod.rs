// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clamped, momentum-driven scrolling.
//!
//! - [`ScrollExtents`] holds the pure math: scrollable amount, clamping,
//!   and scrollbar [`Thumb`] geometry. Zero denominators are replaced by
//!   [`EPSILON`], so no input produces NaN.
//! - [`Fling`] is one exponential-decay momentum simulation, configured by a
//!   [`FlingConfig`] preset.
//! - [`ScrollController`] owns regions, routes wheel and pointer input to
//!   their simulations, and merges them into one authoritative offset per
//!   frame.

mod controller;
mod fling;
mod region;

pub use controller::{
    RegionId, ScrollChanges, ScrollConfig, ScrollController, ScrollHandle, ScrollUpdate,
};
pub use fling::{Fling, FlingConfig};
pub use region::{DEFAULT_MIN_THUMB, EPSILON, ScrollExtents, Thumb, content_translation};
