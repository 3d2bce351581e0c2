// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the frame loop.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that
//! frame-loop instrumentation calls at each stage. All method bodies default to
//! no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! [`Diagnostic`] records are produced by the layout tree, scroll controller,
//! and animator whenever they clamp bad input or skip work because something
//! is not ready yet. Components buffer them; the frame loop drains the buffers
//! and forwards them through [`Tracer::diagnostic`]. They are never errors:
//! the frame always continues.
//!
//! [`FrameSummaryBuilder`] is a convenience helper that collects phase
//! timestamps during a frame and produces a [`FrameSummary`] at the end.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).

use crate::time::{Duration, HostTime};
use crate::timing::FrameTick;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which phase of the frame loop is being measured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Transition timers and tween sampling.
    Animate,
    /// Reactive flush of derived view state.
    Flush,
    /// Layout tree evaluation.
    Layout,
    /// Scroll extents, input merge, and fling integration.
    Scroll,
}

/// What moved a scroll offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrollSource {
    /// Wheel input or wheel momentum.
    Wheel,
    /// Pointer drag or drag momentum.
    Drag,
    /// `scroll_to` or `set_offset`.
    Programmatic,
    /// Re-clamping after an extent change.
    Clamp,
}

/// Lifecycle step of one item's transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionPhase {
    /// The stagger delay timer was scheduled.
    Scheduled,
    /// The delay elapsed and sampling began.
    Started,
    /// Both values reached their targets.
    Finished,
    /// The grace period after finishing elapsed.
    Settled,
    /// A newer transition replaced this one before it settled.
    Cancelled,
}

/// Category of a [`Diagnostic`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A numeric setting was negative or not finite and was clamped.
    InvalidConfig,
    /// An attribute name is not recognized; it was ignored.
    UnknownAttribute,
    /// An attribute value is not recognized; the setting was left unchanged.
    UnknownValue,
    /// A required collaborator is not available yet; the work was skipped
    /// and will be retried.
    NotReady,
    /// An element handle no longer resolves; its work was dropped.
    StaleHandle,
    /// The flexbox backend reported an error; the pass was skipped.
    LayoutBackend,
    /// A project slug does not match any card.
    UnknownProject,
}

/// What a [`Diagnostic`] is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Subject {
    /// A layout node, by slot index.
    Node(u32),
    /// A scroll region, by slot index.
    Region(u32),
    /// An animation target.
    Target(u32),
    /// The view composition layer.
    View,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// A non-fatal problem that was handled by degrading to a safe default.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// Which object it concerns.
    pub subject: Subject,
    /// The setting or operation involved.
    pub field: &'static str,
    /// The rejected numeric value, or NaN when not applicable.
    pub value: f64,
}

impl Diagnostic {
    /// Creates a diagnostic with no associated value.
    #[must_use]
    pub const fn new(kind: DiagnosticKind, subject: Subject, field: &'static str) -> Self {
        Self {
            kind,
            subject,
            field,
            value: f64::NAN,
        }
    }

    /// Attaches the rejected value.
    #[must_use]
    pub const fn with_value(mut self, value: f64) -> Self {
        self.value = value;
        self
    }
}

/// Emitted when the host delivers a frame tick.
#[derive(Clone, Copy, Debug)]
pub struct FrameTickEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Host time when the tick was generated.
    pub now: HostTime,
    /// Time since the previous tick.
    pub interval: Duration,
}

impl From<&FrameTick> for FrameTickEvent {
    fn from(tick: &FrameTick) -> Self {
        Self {
            frame_index: tick.frame_index,
            now: tick.now,
            interval: tick.interval,
        }
    }
}

/// Marks the beginning of a frame-loop phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseBeginEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is starting.
    pub phase: PhaseKind,
    /// Host time at the start of the phase.
    pub timestamp: HostTime,
}

/// Marks the end of a frame-loop phase.
#[derive(Clone, Copy, Debug)]
pub struct PhaseEndEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Which phase is ending.
    pub phase: PhaseKind,
    /// Host time at the end of the phase.
    pub timestamp: HostTime,
}

/// Emitted once per layout root that was re-laid out.
#[derive(Clone, Copy, Debug)]
pub struct LayoutPassEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Slot index of the layout root.
    pub root: u32,
    /// Number of nodes that received a position in this pass.
    pub placed: u32,
    /// Resolved container width.
    pub width: f64,
    /// Resolved container height.
    pub height: f64,
}

/// Emitted when a scroll region's authoritative offset changes.
#[derive(Clone, Copy, Debug)]
pub struct ScrollEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Slot index of the scroll region.
    pub region: u32,
    /// New offset.
    pub offset: f64,
    /// Velocity after the update, in units per second.
    pub velocity: f64,
    /// What produced the change.
    pub source: ScrollSource,
}

/// Emitted at each step of an item's transition.
#[derive(Clone, Copy, Debug)]
pub struct TransitionEvent {
    /// Frame counter.
    pub frame_index: u64,
    /// Animation target.
    pub target: u32,
    /// Lifecycle step.
    pub phase: TransitionPhase,
    /// When the step happened (for `Started`, the scheduled start time).
    pub at: HostTime,
}

/// Per-frame timing summary produced by [`FrameSummaryBuilder`].
#[derive(Clone, Copy, Debug)]
pub struct FrameSummary {
    /// Frame counter.
    pub frame_index: u64,
    /// Host time when the tick was generated.
    pub now: HostTime,
    /// Time since the previous tick.
    pub interval: Duration,
    /// Animate phase duration (zero if not measured).
    pub animate: Duration,
    /// Flush phase duration (zero if not measured).
    pub flush: Duration,
    /// Layout phase duration (zero if not measured).
    pub layout: Duration,
    /// Scroll phase duration (zero if not measured).
    pub scroll: Duration,
    /// Number of layout roots re-laid out this frame.
    pub layout_passes: u32,
    /// Number of items still animating at the end of the frame.
    pub active_transitions: u32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the frame loop.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a frame tick is received.
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        _ = e;
    }

    /// Called at the beginning of a frame-loop phase.
    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        _ = e;
    }

    /// Called at the end of a frame-loop phase.
    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        _ = e;
    }

    /// Called for each layout root that was re-laid out.
    fn on_layout_pass(&mut self, e: &LayoutPassEvent) {
        _ = e;
    }

    /// Called when a scroll offset changes.
    fn on_scroll(&mut self, e: &ScrollEvent) {
        _ = e;
    }

    /// Called at each transition lifecycle step.
    fn on_transition(&mut self, e: &TransitionEvent) {
        _ = e;
    }

    /// Called for each buffered diagnostic.
    fn on_diagnostic(&mut self, frame_index: u64, d: &Diagnostic) {
        _ = (frame_index, d);
    }

    /// Called with a per-frame timing summary.
    fn on_frame_summary(&mut self, s: &FrameSummary) {
        _ = s;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`FrameTickEvent`].
    #[inline]
    pub fn frame_tick(&mut self, e: &FrameTickEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_tick(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseBeginEvent`].
    #[inline]
    pub fn phase_begin(&mut self, e: &PhaseBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseEndEvent`].
    #[inline]
    pub fn phase_end(&mut self, e: &PhaseEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LayoutPassEvent`].
    #[inline]
    pub fn layout_pass(&mut self, e: &LayoutPassEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_layout_pass(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ScrollEvent`].
    #[inline]
    pub fn scroll(&mut self, e: &ScrollEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_scroll(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TransitionEvent`].
    #[inline]
    pub fn transition(&mut self, e: &TransitionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_transition(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`Diagnostic`].
    #[inline]
    pub fn diagnostic(&mut self, frame_index: u64, d: &Diagnostic) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_diagnostic(frame_index, d);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = (frame_index, d);
        }
    }

    /// Emits a [`FrameSummary`].
    #[inline]
    pub fn frame_summary(&mut self, s: &FrameSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_frame_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }
}

// ---------------------------------------------------------------------------
// FrameSummaryBuilder
// ---------------------------------------------------------------------------

/// Collects phase timestamps during a frame and produces a [`FrameSummary`].
#[derive(Debug)]
pub struct FrameSummaryBuilder {
    tick: FrameTickEvent,
    phase_starts: [Option<HostTime>; 4],
    phase_ends: [Option<HostTime>; 4],
    layout_passes: u32,
    active_transitions: u32,
}

impl FrameSummaryBuilder {
    /// Starts building a summary for the given tick.
    #[must_use]
    pub fn new(tick: &FrameTickEvent) -> Self {
        Self {
            tick: *tick,
            phase_starts: [None; 4],
            phase_ends: [None; 4],
            layout_passes: 0,
            active_transitions: 0,
        }
    }

    /// Records the start of a phase.
    pub fn phase_begin(&mut self, phase: PhaseKind, t: HostTime) {
        self.phase_starts[phase_index(phase)] = Some(t);
    }

    /// Records the end of a phase.
    pub fn phase_end(&mut self, phase: PhaseKind, t: HostTime) {
        self.phase_ends[phase_index(phase)] = Some(t);
    }

    /// Records how many layout roots were re-laid out.
    pub fn set_layout_passes(&mut self, n: u32) {
        self.layout_passes = n;
    }

    /// Records how many items are still animating.
    pub fn set_active_transitions(&mut self, n: u32) {
        self.active_transitions = n;
    }

    /// Consumes the builder and produces the final [`FrameSummary`].
    #[must_use]
    pub fn finish(self) -> FrameSummary {
        FrameSummary {
            frame_index: self.tick.frame_index,
            now: self.tick.now,
            interval: self.tick.interval,
            animate: self.phase_duration(PhaseKind::Animate),
            flush: self.phase_duration(PhaseKind::Flush),
            layout: self.phase_duration(PhaseKind::Layout),
            scroll: self.phase_duration(PhaseKind::Scroll),
            layout_passes: self.layout_passes,
            active_transitions: self.active_transitions,
        }
    }

    fn phase_duration(&self, phase: PhaseKind) -> Duration {
        let idx = phase_index(phase);
        match (self.phase_starts[idx], self.phase_ends[idx]) {
            (Some(start), Some(end)) => end.saturating_duration_since(start),
            _ => Duration::ZERO,
        }
    }
}

/// Maps a [`PhaseKind`] to an array index.
const fn phase_index(phase: PhaseKind) -> usize {
    match phase {
        PhaseKind::Animate => 0,
        PhaseKind::Flush => 1,
        PhaseKind::Layout => 2,
        PhaseKind::Scroll => 3,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
