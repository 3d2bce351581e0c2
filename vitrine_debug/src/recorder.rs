// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as little-endian records. [`decode`] reads them back as an
//! iterator of [`RecordedEvent`].
//!
//! Diagnostic field names are stored inline, truncated to 255 bytes.

use vitrine_core::time::{Duration, HostTime};
use vitrine_core::trace::{
    Diagnostic, DiagnosticKind, FrameSummary, FrameTickEvent, LayoutPassEvent, PhaseBeginEvent,
    PhaseEndEvent, PhaseKind, ScrollEvent, ScrollSource, Subject, TraceSink, TransitionEvent,
    TransitionPhase,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_FRAME_TICK: u8 = 1;
const TAG_PHASE_BEGIN: u8 = 2;
const TAG_PHASE_END: u8 = 3;
const TAG_LAYOUT_PASS: u8 = 4;
const TAG_SCROLL: u8 = 5;
const TAG_TRANSITION: u8 = 6;
const TAG_DIAGNOSTIC: u8 = 7;
const TAG_FRAME_SUMMARY: u8 = 8;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_str(&mut self, s: &str) {
        let bytes = s.as_bytes();
        let len = bytes.len().min(usize::from(u8::MAX));
        self.write_u8(u8::try_from(len).unwrap_or(u8::MAX));
        self.buf.extend_from_slice(&bytes[..len]);
    }

    fn write_phase(&mut self, p: PhaseKind) {
        self.write_u8(match p {
            PhaseKind::Animate => 0,
            PhaseKind::Flush => 1,
            PhaseKind::Layout => 2,
            PhaseKind::Scroll => 3,
        });
    }

    fn write_source(&mut self, s: ScrollSource) {
        self.write_u8(match s {
            ScrollSource::Wheel => 0,
            ScrollSource::Drag => 1,
            ScrollSource::Programmatic => 2,
            ScrollSource::Clamp => 3,
        });
    }

    fn write_transition_phase(&mut self, p: TransitionPhase) {
        self.write_u8(match p {
            TransitionPhase::Scheduled => 0,
            TransitionPhase::Started => 1,
            TransitionPhase::Finished => 2,
            TransitionPhase::Settled => 3,
            TransitionPhase::Cancelled => 4,
        });
    }

    fn write_kind(&mut self, k: DiagnosticKind) {
        self.write_u8(match k {
            DiagnosticKind::InvalidConfig => 0,
            DiagnosticKind::UnknownAttribute => 1,
            DiagnosticKind::UnknownValue => 2,
            DiagnosticKind::NotReady => 3,
            DiagnosticKind::StaleHandle => 4,
            DiagnosticKind::LayoutBackend => 5,
            DiagnosticKind::UnknownProject => 6,
        });
    }

    fn write_subject(&mut self, s: Subject) {
        let (tag, idx) = match s {
            Subject::Node(i) => (0, i),
            Subject::Region(i) => (1, i),
            Subject::Target(i) => (2, i),
            Subject::View => (3, 0),
        };
        self.write_u8(tag);
        self.write_u32(idx);
    }
}

impl TraceSink for RecorderSink {
    fn on_frame_tick(&mut self, e: &FrameTickEvent) {
        self.write_u8(TAG_FRAME_TICK);
        self.write_u64(e.frame_index);
        self.write_u64(e.now.micros());
        self.write_u64(e.interval.micros());
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.write_u8(TAG_PHASE_BEGIN);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
        self.write_u64(e.timestamp.micros());
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.write_u8(TAG_PHASE_END);
        self.write_u64(e.frame_index);
        self.write_phase(e.phase);
        self.write_u64(e.timestamp.micros());
    }

    fn on_layout_pass(&mut self, e: &LayoutPassEvent) {
        self.write_u8(TAG_LAYOUT_PASS);
        self.write_u64(e.frame_index);
        self.write_u32(e.root);
        self.write_u32(e.placed);
        self.write_f64(e.width);
        self.write_f64(e.height);
    }

    fn on_scroll(&mut self, e: &ScrollEvent) {
        self.write_u8(TAG_SCROLL);
        self.write_u64(e.frame_index);
        self.write_u32(e.region);
        self.write_f64(e.offset);
        self.write_f64(e.velocity);
        self.write_source(e.source);
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        self.write_u8(TAG_TRANSITION);
        self.write_u64(e.frame_index);
        self.write_u32(e.target);
        self.write_transition_phase(e.phase);
        self.write_u64(e.at.micros());
    }

    fn on_diagnostic(&mut self, frame_index: u64, d: &Diagnostic) {
        self.write_u8(TAG_DIAGNOSTIC);
        self.write_u64(frame_index);
        self.write_kind(d.kind);
        self.write_subject(d.subject);
        self.write_str(d.field);
        self.write_f64(d.value);
    }

    fn on_frame_summary(&mut self, s: &FrameSummary) {
        self.write_u8(TAG_FRAME_SUMMARY);
        self.write_u64(s.frame_index);
        self.write_u64(s.now.micros());
        self.write_u64(s.interval.micros());
        self.write_u64(s.animate.micros());
        self.write_u64(s.flush.micros());
        self.write_u64(s.layout.micros());
        self.write_u64(s.scroll.micros());
        self.write_u32(s.layout_passes);
        self.write_u32(s.active_transitions);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded diagnostic. The field name is owned since it was read back
/// from bytes.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedDiagnostic {
    /// Frame counter.
    pub frame_index: u64,
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// Which object it concerns.
    pub subject: Subject,
    /// The setting or operation involved.
    pub field: String,
    /// The rejected value, or NaN.
    pub value: f64,
}

/// A decoded event from a binary recording.
#[derive(Clone, Debug)]
pub enum RecordedEvent {
    /// A [`FrameTickEvent`].
    FrameTick(FrameTickEvent),
    /// A [`PhaseBeginEvent`].
    PhaseBegin(PhaseBeginEvent),
    /// A [`PhaseEndEvent`].
    PhaseEnd(PhaseEndEvent),
    /// A [`LayoutPassEvent`].
    LayoutPass(LayoutPassEvent),
    /// A [`ScrollEvent`].
    Scroll(ScrollEvent),
    /// A [`TransitionEvent`].
    Transition(TransitionEvent),
    /// A [`Diagnostic`].
    Diagnostic(RecordedDiagnostic),
    /// A [`FrameSummary`].
    FrameSummary(FrameSummary),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take(&mut self, n: usize) -> Option<&[u8]> {
        let end = self.pos.checked_add(n)?;
        let bytes = self.data.get(self.pos..end)?;
        self.pos = end;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take(1).map(|b| b[0])
    }

    fn read_u32(&mut self) -> Option<u32> {
        Some(u32::from_le_bytes(self.take(4)?.try_into().ok()?))
    }

    fn read_u64(&mut self) -> Option<u64> {
        Some(u64::from_le_bytes(self.take(8)?.try_into().ok()?))
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_str(&mut self) -> Option<String> {
        let len = usize::from(self.read_u8()?);
        Some(String::from_utf8_lossy(self.take(len)?).into_owned())
    }

    fn read_phase(&mut self) -> Option<PhaseKind> {
        Some(match self.read_u8()? {
            0 => PhaseKind::Animate,
            1 => PhaseKind::Flush,
            2 => PhaseKind::Layout,
            _ => PhaseKind::Scroll,
        })
    }

    fn read_source(&mut self) -> Option<ScrollSource> {
        Some(match self.read_u8()? {
            0 => ScrollSource::Wheel,
            1 => ScrollSource::Drag,
            2 => ScrollSource::Programmatic,
            _ => ScrollSource::Clamp,
        })
    }

    fn read_transition_phase(&mut self) -> Option<TransitionPhase> {
        Some(match self.read_u8()? {
            0 => TransitionPhase::Scheduled,
            1 => TransitionPhase::Started,
            2 => TransitionPhase::Finished,
            3 => TransitionPhase::Settled,
            _ => TransitionPhase::Cancelled,
        })
    }

    fn read_kind(&mut self) -> Option<DiagnosticKind> {
        Some(match self.read_u8()? {
            0 => DiagnosticKind::InvalidConfig,
            1 => DiagnosticKind::UnknownAttribute,
            2 => DiagnosticKind::UnknownValue,
            3 => DiagnosticKind::NotReady,
            4 => DiagnosticKind::StaleHandle,
            5 => DiagnosticKind::LayoutBackend,
            _ => DiagnosticKind::UnknownProject,
        })
    }

    fn read_subject(&mut self) -> Option<Subject> {
        let tag = self.read_u8()?;
        let idx = self.read_u32()?;
        Some(match tag {
            0 => Subject::Node(idx),
            1 => Subject::Region(idx),
            2 => Subject::Target(idx),
            _ => Subject::View,
        })
    }

    fn decode_frame_tick(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameTick(FrameTickEvent {
            frame_index: self.read_u64()?,
            now: HostTime(self.read_u64()?),
            interval: Duration(self.read_u64()?),
        }))
    }

    fn decode_phase_begin(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseBegin(PhaseBeginEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
            timestamp: HostTime(self.read_u64()?),
        }))
    }

    fn decode_phase_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PhaseEnd(PhaseEndEvent {
            frame_index: self.read_u64()?,
            phase: self.read_phase()?,
            timestamp: HostTime(self.read_u64()?),
        }))
    }

    fn decode_layout_pass(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::LayoutPass(LayoutPassEvent {
            frame_index: self.read_u64()?,
            root: self.read_u32()?,
            placed: self.read_u32()?,
            width: self.read_f64()?,
            height: self.read_f64()?,
        }))
    }

    fn decode_scroll(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Scroll(ScrollEvent {
            frame_index: self.read_u64()?,
            region: self.read_u32()?,
            offset: self.read_f64()?,
            velocity: self.read_f64()?,
            source: self.read_source()?,
        }))
    }

    fn decode_transition(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Transition(TransitionEvent {
            frame_index: self.read_u64()?,
            target: self.read_u32()?,
            phase: self.read_transition_phase()?,
            at: HostTime(self.read_u64()?),
        }))
    }

    fn decode_diagnostic(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Diagnostic(RecordedDiagnostic {
            frame_index: self.read_u64()?,
            kind: self.read_kind()?,
            subject: self.read_subject()?,
            field: self.read_str()?,
            value: self.read_f64()?,
        }))
    }

    fn decode_frame_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameSummary(FrameSummary {
            frame_index: self.read_u64()?,
            now: HostTime(self.read_u64()?),
            interval: Duration(self.read_u64()?),
            animate: Duration(self.read_u64()?),
            flush: Duration(self.read_u64()?),
            layout: Duration(self.read_u64()?),
            scroll: Duration(self.read_u64()?),
            layout_passes: self.read_u32()?,
            active_transitions: self.read_u32()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_FRAME_TICK => self.decode_frame_tick(),
            TAG_PHASE_BEGIN => self.decode_phase_begin(),
            TAG_PHASE_END => self.decode_phase_end(),
            TAG_LAYOUT_PASS => self.decode_layout_pass(),
            TAG_SCROLL => self.decode_scroll(),
            TAG_TRANSITION => self.decode_transition(),
            TAG_DIAGNOSTIC => self.decode_diagnostic(),
            TAG_FRAME_SUMMARY => self.decode_frame_summary(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_summary() -> FrameSummary {
        FrameSummary {
            frame_index: 7,
            now: HostTime(1_000_000),
            interval: Duration(16_667),
            animate: Duration(120),
            flush: Duration(15),
            layout: Duration(480),
            scroll: Duration(30),
            layout_passes: 2,
            active_transitions: 16,
        }
    }

    #[test]
    fn phase_events_keep_order_and_fields() {
        let mut rec = RecorderSink::new();
        rec.on_phase_begin(&PhaseBeginEvent {
            frame_index: 5,
            phase: PhaseKind::Layout,
            timestamp: HostTime(2000),
        });
        rec.on_phase_end(&PhaseEndEvent {
            frame_index: 5,
            phase: PhaseKind::Layout,
            timestamp: HostTime(3000),
        });

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 2);
        match &events[0] {
            RecordedEvent::PhaseBegin(e) => {
                assert_eq!(e.frame_index, 5);
                assert_eq!(e.phase, PhaseKind::Layout);
                assert_eq!(e.timestamp, HostTime(2000));
            }
            other => panic!("expected PhaseBegin, got {other:?}"),
        }
        match &events[1] {
            RecordedEvent::PhaseEnd(e) => {
                assert_eq!(e.phase, PhaseKind::Layout);
                assert_eq!(e.timestamp, HostTime(3000));
            }
            other => panic!("expected PhaseEnd, got {other:?}"),
        }
    }

    #[test]
    fn diagnostic_keeps_field_and_nan_value() {
        let mut rec = RecorderSink::new();
        rec.on_diagnostic(
            3,
            &Diagnostic::new(DiagnosticKind::NotReady, Subject::Node(4), "available-width"),
        );
        rec.on_diagnostic(
            3,
            &Diagnostic::new(DiagnosticKind::InvalidConfig, Subject::Region(0), "min-thumb")
                .with_value(-2.0),
        );

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 2);
        match &events[0] {
            RecordedEvent::Diagnostic(d) => {
                assert_eq!(d.frame_index, 3);
                assert_eq!(d.kind, DiagnosticKind::NotReady);
                assert_eq!(d.subject, Subject::Node(4));
                assert_eq!(d.field, "available-width");
                assert!(d.value.is_nan());
            }
            other => panic!("expected Diagnostic, got {other:?}"),
        }
        match &events[1] {
            RecordedEvent::Diagnostic(d) => {
                assert_eq!(d.subject, Subject::Region(0));
                assert_eq!(d.value, -2.0);
            }
            other => panic!("expected Diagnostic, got {other:?}"),
        }
    }

    #[test]
    fn mixed_stream_decodes_in_order() {
        let mut rec = RecorderSink::new();
        rec.on_frame_tick(&FrameTickEvent {
            frame_index: 7,
            now: HostTime(1_000_000),
            interval: Duration(16_667),
        });
        rec.on_layout_pass(&LayoutPassEvent {
            frame_index: 7,
            root: 0,
            placed: 18,
            width: 1024.0,
            height: 3020.0,
        });
        rec.on_scroll(&ScrollEvent {
            frame_index: 7,
            region: 0,
            offset: 120.5,
            velocity: -40.0,
            source: ScrollSource::Drag,
        });
        rec.on_transition(&TransitionEvent {
            frame_index: 7,
            target: 3,
            phase: TransitionPhase::Settled,
            at: HostTime(990_000),
        });
        rec.on_frame_summary(&sample_summary());

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 5);
        assert!(matches!(events[0], RecordedEvent::FrameTick(_)));
        match &events[1] {
            RecordedEvent::LayoutPass(e) => {
                assert_eq!(e.placed, 18);
                assert_eq!(e.height, 3020.0);
            }
            other => panic!("expected LayoutPass, got {other:?}"),
        }
        match &events[2] {
            RecordedEvent::Scroll(e) => {
                assert_eq!(e.offset, 120.5);
                assert_eq!(e.source, ScrollSource::Drag);
            }
            other => panic!("expected Scroll, got {other:?}"),
        }
        match &events[3] {
            RecordedEvent::Transition(e) => {
                assert_eq!(e.target, 3);
                assert_eq!(e.phase, TransitionPhase::Settled);
            }
            other => panic!("expected Transition, got {other:?}"),
        }
        match &events[4] {
            RecordedEvent::FrameSummary(s) => {
                assert_eq!(s.layout, Duration(480));
                assert_eq!(s.active_transitions, 16);
            }
            other => panic!("expected FrameSummary, got {other:?}"),
        }
    }

    #[test]
    fn truncated_record_stops_iteration() {
        let mut rec = RecorderSink::new();
        rec.on_frame_summary(&sample_summary());
        let bytes = rec.into_bytes();
        let events: Vec<_> = decode(&bytes[..bytes.len() - 1]).collect();
        assert!(events.is_empty());
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty());
    }
}
