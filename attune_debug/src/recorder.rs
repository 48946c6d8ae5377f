// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Floating-point values are stored as their IEEE-754 bit patterns, so they
//! decode bit-for-bit.

use attune_core::error::{SampleError, SampleField, Sensor, SensorUnavailable, UnavailableCause};
use attune_core::phase::Phase;
use attune_core::time::HostTime;
use attune_core::trace::{
    BlockedEvent, FreezeEvent, RejectedEvent, SampleEvent, TickSummary, TraceSink,
    TransitionEvent,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_SAMPLE: u8 = 1;
const TAG_REJECTED: u8 = 2;
const TAG_TRANSITION: u8 = 3;
const TAG_FREEZE: u8 = 4;
const TAG_BLOCKED: u8 = 5;
const TAG_TICK_SUMMARY: u8 = 6;

const ERR_NON_FINITE: u8 = 0;
const ERR_HEADING_RANGE: u8 = 1;
const ERR_BRIGHTNESS_RANGE: u8 = 2;

fn field_code(f: SampleField) -> u8 {
    match f {
        SampleField::Brightness => 0,
        SampleField::Heading => 1,
        SampleField::Beta => 2,
    }
}

fn field_from_code(v: u8) -> Option<SampleField> {
    Some(match v {
        0 => SampleField::Brightness,
        1 => SampleField::Heading,
        2 => SampleField::Beta,
        _ => return None,
    })
}

fn sensor_code(s: Sensor) -> u8 {
    match s {
        Sensor::Camera => 0,
        Sensor::Orientation => 1,
    }
}

fn sensor_from_code(v: u8) -> Option<Sensor> {
    Some(match v {
        0 => Sensor::Camera,
        1 => Sensor::Orientation,
        _ => return None,
    })
}

fn cause_code(c: UnavailableCause) -> u8 {
    match c {
        UnavailableCause::NoDevice => 0,
        UnavailableCause::PermissionDenied => 1,
        UnavailableCause::Unsupported => 2,
        UnavailableCause::Silent => 3,
    }
}

fn cause_from_code(v: u8) -> Option<UnavailableCause> {
    Some(match v {
        0 => UnavailableCause::NoDevice,
        1 => UnavailableCause::PermissionDenied,
        2 => UnavailableCause::Unsupported,
        3 => UnavailableCause::Silent,
        _ => return None,
    })
}

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

    fn write_phase(&mut self, p: Phase) {
        self.write_u8(p.code());
    }
}

impl TraceSink for RecorderSink {
    fn on_sample(&mut self, e: &SampleEvent) {
        self.write_u8(TAG_SAMPLE);
        self.write_u64(e.at.ticks());
        self.write_phase(e.phase);
        self.write_u8(field_code(e.field));
        self.write_f64(e.value);
    }

    fn on_rejected(&mut self, e: &RejectedEvent) {
        self.write_u8(TAG_REJECTED);
        self.write_u64(e.at.ticks());
        self.write_phase(e.phase);
        let (kind, value) = match e.error {
            SampleError::NonFinite(_) => (ERR_NON_FINITE, 0.0),
            SampleError::HeadingOutOfRange(v) => (ERR_HEADING_RANGE, v),
            SampleError::BrightnessOutOfRange(v) => (ERR_BRIGHTNESS_RANGE, v),
        };
        self.write_u8(kind);
        self.write_u8(field_code(e.error.field()));
        self.write_f64(value);
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        self.write_u8(TAG_TRANSITION);
        self.write_u64(e.at.ticks());
        self.write_phase(e.from);
        self.write_phase(e.to);
    }

    fn on_freeze(&mut self, e: &FreezeEvent) {
        self.write_u8(TAG_FREEZE);
        self.write_u64(e.at.ticks());
        self.write_phase(e.phase);
        self.write_f64(e.value);
    }

    fn on_blocked(&mut self, e: &BlockedEvent) {
        self.write_u8(TAG_BLOCKED);
        self.write_u64(e.at.ticks());
        self.write_phase(e.phase);
        self.write_u8(sensor_code(e.unavailable.sensor));
        self.write_u8(cause_code(e.unavailable.cause));
        self.write_u8(u8::from(e.raised));
    }

    fn on_tick_summary(&mut self, s: &TickSummary) {
        self.write_u8(TAG_TICK_SUMMARY);
        self.write_u64(s.tick_index);
        self.write_u64(s.at.ticks());
        self.write_phase(s.phase_before);
        self.write_phase(s.phase_after);
        self.write_u32(s.applied);
        self.write_u32(s.rejected);
        self.write_u64(s.dropped_total);
        self.write_u8(u8::from(s.blocked));
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`SampleEvent`].
    Sample(SampleEvent),
    /// A [`RejectedEvent`].
    Rejected(RejectedEvent),
    /// A [`TransitionEvent`].
    Transition(TransitionEvent),
    /// A [`FreezeEvent`].
    Freeze(FreezeEvent),
    /// A [`BlockedEvent`].
    Blocked(BlockedEvent),
    /// A [`TickSummary`].
    TickSummary(TickSummary),
}

impl RecordedEvent {
    /// Host time of the event.
    #[must_use]
    pub fn at(&self) -> HostTime {
        match self {
            Self::Sample(e) => e.at,
            Self::Rejected(e) => e.at,
            Self::Transition(e) => e.at,
            Self::Freeze(e) => e.at,
            Self::Blocked(e) => e.at,
            Self::TickSummary(s) => s.at,
        }
    }
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
///
/// Iteration stops at the first unknown tag or truncated record.
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
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_time(&mut self) -> Option<HostTime> {
        self.read_u64().map(HostTime)
    }

    fn read_phase(&mut self) -> Option<Phase> {
        Phase::from_code(self.read_u8()?)
    }

    fn decode_sample(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Sample(SampleEvent {
            at: self.read_time()?,
            phase: self.read_phase()?,
            field: field_from_code(self.read_u8()?)?,
            value: self.read_f64()?,
        }))
    }

    fn decode_rejected(&mut self) -> Option<RecordedEvent> {
        let at = self.read_time()?;
        let phase = self.read_phase()?;
        let kind = self.read_u8()?;
        let field = field_from_code(self.read_u8()?)?;
        let value = self.read_f64()?;
        let error = match kind {
            ERR_NON_FINITE => SampleError::NonFinite(field),
            ERR_HEADING_RANGE => SampleError::HeadingOutOfRange(value),
            ERR_BRIGHTNESS_RANGE => SampleError::BrightnessOutOfRange(value),
            _ => return None,
        };
        Some(RecordedEvent::Rejected(RejectedEvent { at, phase, error }))
    }

    fn decode_transition(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Transition(TransitionEvent {
            at: self.read_time()?,
            from: self.read_phase()?,
            to: self.read_phase()?,
        }))
    }

    fn decode_freeze(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Freeze(FreezeEvent {
            at: self.read_time()?,
            phase: self.read_phase()?,
            value: self.read_f64()?,
        }))
    }

    fn decode_blocked(&mut self) -> Option<RecordedEvent> {
        let at = self.read_time()?;
        let phase = self.read_phase()?;
        let sensor = sensor_from_code(self.read_u8()?)?;
        let cause = cause_from_code(self.read_u8()?)?;
        Some(RecordedEvent::Blocked(BlockedEvent {
            at,
            phase,
            unavailable: SensorUnavailable::new(sensor, cause),
            raised: self.read_u8()? != 0,
        }))
    }

    fn decode_tick_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::TickSummary(TickSummary {
            tick_index: self.read_u64()?,
            at: self.read_time()?,
            phase_before: self.read_phase()?,
            phase_after: self.read_phase()?,
            applied: self.read_u32()?,
            rejected: self.read_u32()?,
            dropped_total: self.read_u64()?,
            blocked: self.read_u8()? != 0,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_SAMPLE => self.decode_sample(),
            TAG_REJECTED => self.decode_rejected(),
            TAG_TRANSITION => self.decode_transition(),
            TAG_FREEZE => self.decode_freeze(),
            TAG_BLOCKED => self.decode_blocked(),
            TAG_TICK_SUMMARY => self.decode_tick_summary(),
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
    use attune_core::sample::OrientationSample;
    use attune_core::session::SessionState;
    use attune_core::time::{ClockTime, Timestamp};
    use attune_core::trace::Tracer;

    fn at(ticks: u64) -> Timestamp {
        Timestamp::new(HostTime(ticks), ClockTime::MIDNIGHT)
    }

    #[test]
    fn records_a_session_in_order() {
        let mut rec = RecorderSink::new();
        {
            let mut tracer = Tracer::new(&mut rec);
            let mut s = SessionState::default();
            s.apply_light_level(60.0, at(1), &mut tracer).unwrap();
            let _ = s.apply_orientation(OrientationSample::heading(400.0), at(2), &mut tracer);
            s.apply_orientation(OrientationSample::heading(3.0), at(3), &mut tracer)
                .unwrap();
            s.report_unavailable(SensorUnavailable::orientation_denied(), at(4), &mut tracer);
        }

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(
            events,
            [
                RecordedEvent::Sample(SampleEvent {
                    at: HostTime(1),
                    phase: Phase::Light,
                    field: SampleField::Brightness,
                    value: 60.0,
                }),
                RecordedEvent::Transition(TransitionEvent {
                    at: HostTime(1),
                    from: Phase::Light,
                    to: Phase::Rotation,
                }),
                RecordedEvent::Rejected(RejectedEvent {
                    at: HostTime(2),
                    phase: Phase::Rotation,
                    error: SampleError::HeadingOutOfRange(400.0),
                }),
                RecordedEvent::Sample(SampleEvent {
                    at: HostTime(3),
                    phase: Phase::Rotation,
                    field: SampleField::Heading,
                    value: 3.0,
                }),
                RecordedEvent::Freeze(FreezeEvent {
                    at: HostTime(3),
                    phase: Phase::Rotation,
                    value: 3.0,
                }),
                RecordedEvent::Transition(TransitionEvent {
                    at: HostTime(3),
                    from: Phase::Rotation,
                    to: Phase::Tilt,
                }),
                RecordedEvent::Blocked(BlockedEvent {
                    at: HostTime(4),
                    phase: Phase::Tilt,
                    unavailable: SensorUnavailable::orientation_denied(),
                    raised: true,
                }),
            ]
        );
    }

    #[test]
    fn tick_summary_survives_recording() {
        let summary = TickSummary {
            tick_index: 9,
            at: HostTime(123_456),
            phase_before: Phase::Tilt,
            phase_after: Phase::Done,
            applied: 3,
            rejected: 1,
            dropped_total: 17,
            blocked: false,
        };
        let mut rec = RecorderSink::new();
        rec.on_tick_summary(&summary);
        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events, [RecordedEvent::TickSummary(summary)]);
        assert_eq!(events[0].at(), HostTime(123_456));
    }

    #[test]
    fn truncated_record_stops_decoding() {
        let mut rec = RecorderSink::new();
        rec.on_transition(&TransitionEvent {
            at: HostTime(1),
            from: Phase::Light,
            to: Phase::Rotation,
        });
        rec.on_transition(&TransitionEvent {
            at: HostTime(2),
            from: Phase::Rotation,
            to: Phase::Tilt,
        });
        let bytes = rec.into_bytes();
        let cut = &bytes[..bytes.len() - 1];
        assert_eq!(decode(cut).count(), 1);
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty());
    }

    #[test]
    fn unknown_tag_stops_decoding() {
        assert_eq!(decode(&[0xff, 1, 2, 3]).count(), 0);
    }
}
