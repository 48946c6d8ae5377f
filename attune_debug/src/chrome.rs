// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Each phase becomes a duration slice, accepted samples become counter
//! tracks (one per reading), and everything else is an instant event.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use attune_core::phase::Phase;
use attune_core::time::{HostTime, Timebase};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
///
/// Timestamps are converted to microseconds using the provided [`Timebase`].
pub fn export(bytes: &[u8], timebase: Timebase, writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut open: Option<Phase> = None;

    for recorded in decode(bytes) {
        let ts = us(recorded.at(), timebase);
        if open.is_none() {
            let first = match &recorded {
                RecordedEvent::Transition(e) => e.from,
                RecordedEvent::Sample(e) => e.phase,
                RecordedEvent::Rejected(e) => e.phase,
                RecordedEvent::Freeze(e) => e.phase,
                RecordedEvent::Blocked(e) => e.phase,
                RecordedEvent::TickSummary(s) => s.phase_before,
            };
            events.push(phase_slice("B", first, ts));
            open = Some(first);
        }

        match recorded {
            RecordedEvent::Sample(e) => {
                events.push(json!({
                    "ph": "C",
                    "name": e.field.as_str(),
                    "cat": "Sample",
                    "ts": ts,
                    "pid": 0,
                    "tid": 1,
                    "args": {
                        e.field.as_str(): e.value,
                    }
                }));
            }
            RecordedEvent::Rejected(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Rejected",
                    "cat": "Sample",
                    "ts": ts,
                    "pid": 0,
                    "tid": 1,
                    "s": "t",
                    "args": {
                        "phase": e.phase.as_str(),
                        "error": e.error.to_string(),
                    }
                }));
            }
            RecordedEvent::Transition(e) => {
                events.push(phase_slice("E", e.from, ts));
                events.push(phase_slice("B", e.to, ts));
                open = Some(e.to);
            }
            RecordedEvent::Freeze(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Freeze",
                    "cat": "Session",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "phase": e.phase.as_str(),
                        "value": e.value,
                    }
                }));
            }
            RecordedEvent::Blocked(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": if e.raised { "Blocked" } else { "Unblocked" },
                    "cat": "Sensor",
                    "ts": ts,
                    "pid": 0,
                    "tid": 0,
                    "s": "g",
                    "args": {
                        "phase": e.phase.as_str(),
                        "sensor": e.unavailable.sensor.as_str(),
                        "cause": e.unavailable.cause.as_str(),
                    }
                }));
            }
            RecordedEvent::TickSummary(s) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Tick",
                    "cat": "Driver",
                    "ts": ts,
                    "pid": 0,
                    "tid": 2,
                    "s": "t",
                    "args": {
                        "tick_index": s.tick_index,
                        "phase": s.phase_after.as_str(),
                        "applied": s.applied,
                        "rejected": s.rejected,
                        "dropped_total": s.dropped_total,
                        "blocked": s.blocked,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn phase_slice(ph: &str, phase: Phase, ts: f64) -> Value {
    json!({
        "ph": ph,
        "name": phase.as_str(),
        "cat": "Phase",
        "ts": ts,
        "pid": 0,
        "tid": 0,
    })
}

fn us(t: HostTime, timebase: Timebase) -> f64 {
    timebase.ticks_to_nanos(t.ticks()) as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use attune_core::error::{SampleError, SampleField};
    use attune_core::trace::{RejectedEvent, SampleEvent, TraceSink, TransitionEvent};

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_sample(&SampleEvent {
            at: HostTime(1_000),
            phase: Phase::Light,
            field: SampleField::Brightness,
            value: 52.0,
        });
        rec.on_transition(&TransitionEvent {
            at: HostTime(1_000),
            from: Phase::Light,
            to: Phase::Rotation,
        });
        rec.on_rejected(&RejectedEvent {
            at: HostTime(2_000),
            phase: Phase::Rotation,
            error: SampleError::NonFinite(SampleField::Heading),
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), Timebase::NANOS, &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        let shape: Vec<(&str, &str)> = parsed
            .iter()
            .map(|e| (e["ph"].as_str().unwrap(), e["name"].as_str().unwrap()))
            .collect();
        assert_eq!(
            shape,
            [
                ("B", "light"),
                ("C", "brightness"),
                ("E", "light"),
                ("B", "rotation"),
                ("i", "Rejected"),
            ]
        );
        assert_eq!(parsed[1]["args"]["brightness"], 52.0);
        assert_eq!(parsed[1]["ts"], 1.0);
        assert_eq!(parsed[4]["args"]["error"], "heading is not finite");
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], Timebase::NANOS, &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
