// Copyright 2026 the Vitrine Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Phases become duration slices on thread 0. Transitions go to thread 1,
//! scroll offsets are emitted as a counter track, and everything else is an
//! instant event.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Events without their own timestamp (layout passes, scroll changes,
/// diagnostics) take the time of the most recent frame tick.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut frame_ts = 0_u64;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::FrameTick(e) => {
                frame_ts = e.now.micros();
                events.push(json!({
                    "ph": "i",
                    "name": "FrameTick",
                    "cat": "Frame",
                    "ts": frame_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": e.frame_index,
                        "interval_us": e.interval.micros(),
                    }
                }));
            }
            RecordedEvent::PhaseBegin(e) => {
                events.push(json!({
                    "ph": "B",
                    "name": format!("{:?}", e.phase),
                    "cat": "Frame",
                    "ts": e.timestamp.micros(),
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::PhaseEnd(e) => {
                events.push(json!({
                    "ph": "E",
                    "name": format!("{:?}", e.phase),
                    "cat": "Frame",
                    "ts": e.timestamp.micros(),
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "frame_index": e.frame_index,
                    }
                }));
            }
            RecordedEvent::LayoutPass(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "LayoutPass",
                    "cat": "Layout",
                    "ts": frame_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "root": e.root,
                        "placed": e.placed,
                        "width": e.width,
                        "height": e.height,
                    }
                }));
            }
            RecordedEvent::Scroll(e) => {
                events.push(json!({
                    "ph": "C",
                    "name": format!("scroll[{}]", e.region),
                    "cat": "Scroll",
                    "ts": frame_ts,
                    "pid": 0,
                    "args": {
                        "offset": e.offset,
                    }
                }));
            }
            RecordedEvent::Transition(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("{:?}", e.phase),
                    "cat": "Transition",
                    "ts": e.at.micros(),
                    "pid": 0,
                    "tid": 1,
                    "s": "t",
                    "args": {
                        "frame_index": e.frame_index,
                        "target": e.target,
                    }
                }));
            }
            RecordedEvent::Diagnostic(d) => {
                events.push(json!({
                    "ph": "i",
                    "name": format!("{:?}", d.kind),
                    "cat": "Diagnostic",
                    "ts": frame_ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "p",
                    "args": {
                        "frame_index": d.frame_index,
                        "subject": format!("{:?}", d.subject),
                        "field": d.field,
                        // JSON has no NaN.
                        "value": if d.value.is_nan() { Value::Null } else { json!(d.value) },
                    }
                }));
            }
            RecordedEvent::FrameSummary(s) => {
                events.push(json!({
                    "ph": "i",
                    "name": "FrameSummary",
                    "cat": "Summary",
                    "ts": s.now.micros(),
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "frame_index": s.frame_index,
                        "animate_us": s.animate.micros(),
                        "flush_us": s.flush.micros(),
                        "layout_us": s.layout.micros(),
                        "scroll_us": s.scroll.micros(),
                        "layout_passes": s.layout_passes,
                        "active_transitions": s.active_transitions,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}
