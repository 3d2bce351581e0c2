// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Host times
//! are printed in milliseconds.

use std::io::Write;

use vitrine_core::time::HostTime;
use vitrine_core::trace::{
    Diagnostic, FrameSummary, FrameTickEvent, LayoutPassEvent, PhaseBeginEvent, PhaseEndEvent,
    PhaseKind, ScrollEvent, TraceSink, TransitionEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    quiet_phases: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("quiet_phases", &self.quiet_phases)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            quiet_phases: false,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            quiet_phases: false,
        }
    }

    /// Omits phase begin/end lines; the frame summary still carries the
    /// phase durations.
    #[must_use]
    pub fn quiet_phases(mut self, quiet: bool) -> Self {
        self.quiet_phases = quiet;
        self
    }

    /// Consumes the sink and returns the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn ms(t: HostTime) -> f64 {
    t.as_millis_f64()
}

fn phase_name(phase: PhaseKind) -> &'static str {
    match phase {
        PhaseKind::Animate => "animate",
        PhaseKind::Flush => "flush",
        PhaseKind::Layout => "layout",
        PhaseKind::Scroll => "scroll",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        let _ = writeln!(
            self.writer,
            "[tick] frame={} now={:.3}ms interval={:.3}ms",
            e.frame_index,
            ms(e.now),
            e.interval.as_millis_f64(),
        );
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        if self.quiet_phases {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[phase:begin] frame={} {} at {:.3}ms",
            e.frame_index,
            phase_name(e.phase),
            ms(e.timestamp),
        );
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        if self.quiet_phases {
            return;
        }
        let _ = writeln!(
            self.writer,
            "[phase:end] frame={} {} at {:.3}ms",
            e.frame_index,
            phase_name(e.phase),
            ms(e.timestamp),
        );
    }

    fn on_layout_pass(&mut self, e: &LayoutPassEvent) {
        let _ = writeln!(
            self.writer,
            "[layout] frame={} root={} placed={} size={}x{}",
            e.frame_index, e.root, e.placed, e.width, e.height,
        );
    }

    fn on_scroll(&mut self, e: &ScrollEvent) {
        let _ = writeln!(
            self.writer,
            "[scroll] frame={} region={} offset={:.2} velocity={:.2} source={:?}",
            e.frame_index, e.region, e.offset, e.velocity, e.source,
        );
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        let _ = writeln!(
            self.writer,
            "[transition] frame={} target={} {:?} at {:.3}ms",
            e.frame_index,
            e.target,
            e.phase,
            ms(e.at),
        );
    }

    fn on_diagnostic(&mut self, frame_index: u64, d: &Diagnostic) {
        if d.value.is_nan() {
            let _ = writeln!(
                self.writer,
                "[diagnostic] frame={frame_index} {:?} {:?} {}",
                d.kind, d.subject, d.field,
            );
        } else {
            let _ = writeln!(
                self.writer,
                "[diagnostic] frame={frame_index} {:?} {:?} {}={}",
                d.kind, d.subject, d.field, d.value,
            );
        }
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        let _ = writeln!(
            self.writer,
            "[summary] frame={} animate={:.3}ms flush={:.3}ms layout={:.3}ms \
             scroll={:.3}ms passes={} active={}",
            s.frame_index,
            s.animate.as_millis_f64(),
            s.flush.as_millis_f64(),
            s.layout.as_millis_f64(),
            s.scroll.as_millis_f64(),
            s.layout_passes,
            s.active_transitions,
        );
    }
}
