// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flex layout, fling scrolling, and staggered transitions for a scrollable
//! showcase scene.
//!
//! `vitrine_core` computes where scene elements go, how far the page is
//! scrolled, and how opacity and depth move between states. It never draws:
//! a renderer supplies element sizes, receives positions, and exposes the
//! animated properties through small capability traits.
//!
//! # Architecture
//!
//! Work happens in two clocks. Mutations (sizes, skip flags, selection)
//! only mark dirty state; the frame tick drives everything else in a fixed
//! order:
//!
//! ```text
//!   FrameTicker ──► FrameTick
//!                      │
//!                      ▼
//!   TransitionAnimator::tick ──► PropertyAccess::set
//!                      │
//!                      ▼
//!   ViewState::flush ──► LayoutTree setters
//!                      │
//!                      ▼
//!   LayoutTree::evaluate ──► LayoutChanges ──► Presenter::apply
//!                      │
//!                      ▼
//!   ScrollController::tick ──► ScrollChanges
//! ```
//!
//! **[`layout`]** — Struct-of-arrays node tree with generational handles,
//! mirrored into a flexbox backend. Plain nodes carry an intrinsic size;
//! containers carry a [`FlexStyle`](layout::FlexStyle) and place their
//! children.
//!
//! **[`scroll`]** — Scroll regions with clamped offsets, exponential-decay
//! momentum, and scrollbar thumb math.
//!
//! **[`transition`]** — Staggered batch tweens of opacity and depth with
//! completion tracking, plus frame-rate independent followers for tilt.
//!
//! **[`view`]** — The showcase page: cards, project detail, and the
//! choreography between them.
//!
//! **[`reactive`]** — Explicit dirty flags between view inputs and the
//! values derived from them.
//!
//! **[`scene`]** — The [`SceneElement`](scene::SceneElement) and
//! [`Presenter`](scene::Presenter) traits a renderer implements.
//!
//! **[`timing`]**, **[`time`]**, **[`clock`]**, **[`scheduler`]** — Frame
//! ticks, host timestamps, injectable clocks, and the timer queue that
//! replaces global timeouts.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! frame-loop instrumentation, with zero-overhead [`Tracer`](trace::Tracer)
//! wrapper and buffered [`Diagnostic`](trace::Diagnostic) records.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one
//!   branch per call site).

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod clock;
pub mod dirty;
pub mod error;
pub mod layout;
pub mod reactive;
pub mod scene;
pub mod scheduler;
pub mod scroll;
pub mod time;
pub mod timing;
pub mod trace;
pub mod transition;
pub mod view;
