// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll extents, clamping, and scrollbar geometry.

/// Substituted for a zero denominator in ratio math.
pub const EPSILON: f64 = 1e-21;

/// Default minimum scrollbar thumb length.
pub const DEFAULT_MIN_THUMB: f64 = 10.0;

/// The extents of one scrollable region along its scroll axis.
///
/// All derived values are pure functions of the two extents and never
/// produce NaN or infinity for finite, non-negative inputs.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollExtents {
    /// Visible length.
    pub viewport: f64,
    /// Total content length.
    pub content: f64,
}

impl ScrollExtents {
    /// Creates extents, clamping negative or non-finite values to `0`.
    #[must_use]
    pub fn new(viewport: f64, content: f64) -> Self {
        Self {
            viewport: non_negative(viewport),
            content: non_negative(content),
        }
    }

    /// `max(0, content − viewport)`.
    #[must_use]
    pub fn scrollable_amount(self) -> f64 {
        (self.content - self.viewport).max(0.0)
    }

    /// Clamps `offset` into `[0, scrollable_amount]`. NaN clamps to `0`.
    #[must_use]
    pub fn clamp(self, offset: f64) -> f64 {
        if offset.is_nan() {
            return 0.0;
        }
        offset.clamp(0.0, self.scrollable_amount())
    }

    /// `viewport / content`, with an epsilon standing in for empty content.
    #[must_use]
    pub fn visible_ratio(self) -> f64 {
        self.viewport / self.content.max(EPSILON)
    }

    /// Scrollbar thumb length.
    ///
    /// `max(min_thumb, visible_ratio × viewport)` while content overflows,
    /// otherwise `0`. Nothing to scroll means no thumb, whatever the ratio.
    #[must_use]
    pub fn thumb_extent(self, min_thumb: f64) -> f64 {
        if self.scrollable_amount() <= 0.0 {
            return 0.0;
        }
        (self.visible_ratio() * self.viewport).max(min_thumb)
    }

    /// How far through the scrollable range `offset` is, in `[0, 1]`.
    #[must_use]
    pub fn scroll_ratio(self, offset: f64) -> f64 {
        (self.clamp(offset) / self.scrollable_amount().max(EPSILON)).clamp(0.0, 1.0)
    }

    /// Full thumb geometry for `offset`.
    #[must_use]
    pub fn thumb(self, offset: f64, min_thumb: f64) -> Thumb {
        let extent = self.thumb_extent(min_thumb);
        if extent == 0.0 {
            return Thumb::HIDDEN;
        }
        let track = (self.viewport - extent).max(0.0);
        Thumb {
            extent,
            offset: self.scroll_ratio(offset) * track,
        }
    }
}

/// Scrollbar thumb geometry along the scroll axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Thumb {
    /// Thumb length; `0` when the content fits.
    pub extent: f64,
    /// Distance from the start of the track.
    pub offset: f64,
}

impl Thumb {
    /// A zero-length thumb at the start of the track.
    pub const HIDDEN: Self = Self {
        extent: 0.0,
        offset: 0.0,
    };

    /// Returns whether the thumb should be drawn.
    #[must_use]
    pub fn is_visible(self) -> bool {
        self.extent > 0.0
    }
}

/// Translation to apply to scrolled content for `offset`.
#[must_use]
pub fn content_translation(offset: f64) -> f64 {
    -offset
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}
