// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easing curves.

/// Maps normalized time `t ∈ [0, 1]` to normalized progress.
///
/// Every built-in curve maps `0 → 0` and `1 → 1`.
#[derive(Clone, Copy, Debug, Default)]
pub enum Easing {
    /// Constant speed.
    #[default]
    Linear,
    /// `t²`.
    QuadIn,
    /// `1 − (1 − t)²`.
    QuadOut,
    /// Quadratic ease in, then out.
    QuadInOut,
    /// `t³`.
    CubicIn,
    /// `1 − (1 − t)³`.
    CubicOut,
    /// Cubic ease in, then out.
    CubicInOut,
    /// A caller-supplied curve.
    Custom(fn(f64) -> f64),
}

impl Easing {
    /// Evaluates the curve. `t` is clamped to `[0, 1]` first.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::QuadIn => t * t,
            Self::QuadOut => {
                let u = 1.0 - t;
                1.0 - u * u
            }
            Self::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u / 2.0
                }
            }
            Self::CubicIn => t * t * t,
            Self::CubicOut => {
                let u = 1.0 - t;
                1.0 - u * u * u
            }
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
            Self::Custom(f) => f(t),
        }
    }
}
