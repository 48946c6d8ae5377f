// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the session.
//!
//! This module provides a [`TraceSink`] trait with one method per session
//! event. All method bodies default to no-ops, so implementing only the events
//! you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use crate::error::{SampleError, SampleField, SensorUnavailable};
use crate::phase::Phase;
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a sample is accepted by the state machine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleEvent {
    /// Host time of the sample.
    pub at: HostTime,
    /// Phase the sample was applied in.
    pub phase: Phase,
    /// Which reading.
    pub field: SampleField,
    /// The value as stored: normalized level, heading degrees, or clamped
    /// tilt degrees.
    pub value: f64,
}

/// Emitted when a malformed sample is discarded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RejectedEvent {
    /// Host time of the sample.
    pub at: HostTime,
    /// Phase at the time of rejection.
    pub phase: Phase,
    /// Why the sample was rejected.
    pub error: SampleError,
}

/// Emitted when the session advances to a new phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionEvent {
    /// Host time of the transition.
    pub at: HostTime,
    /// Phase left.
    pub from: Phase,
    /// Phase entered.
    pub to: Phase,
}

/// Emitted when a phase latches its measured value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FreezeEvent {
    /// Host time of the freeze.
    pub at: HostTime,
    /// [`Phase::Rotation`] or [`Phase::Tilt`].
    pub phase: Phase,
    /// The reading that froze the phase, in degrees: the heading for
    /// rotation (the display angle itself is then 0), the tilt for tilt.
    pub value: f64,
}

/// Emitted when a sensor block is raised or lifted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockedEvent {
    /// Host time of the change.
    pub at: HostTime,
    /// Phase at the time of the change.
    pub phase: Phase,
    /// The sensor and cause.
    pub unavailable: SensorUnavailable,
    /// `true` when raised, `false` when lifted.
    pub raised: bool,
}

/// Per-tick summary produced by the session driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickSummary {
    /// Monotonic tick counter.
    pub tick_index: u64,
    /// Host time of the tick.
    pub at: HostTime,
    /// Phase when the tick started.
    pub phase_before: Phase,
    /// Phase when the tick ended.
    pub phase_after: Phase,
    /// Samples applied this tick.
    pub applied: u32,
    /// Samples rejected as malformed this tick.
    pub rejected: u32,
    /// Total samples evicted from the orientation queue so far.
    pub dropped_total: u64,
    /// Whether the current phase is blocked at the end of the tick.
    pub blocked: bool,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the session.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a sample is applied.
    fn on_sample(&mut self, e: &SampleEvent) {
        _ = e;
    }

    /// Called when a malformed sample is discarded.
    fn on_rejected(&mut self, e: &RejectedEvent) {
        _ = e;
    }

    /// Called when the phase advances.
    fn on_transition(&mut self, e: &TransitionEvent) {
        _ = e;
    }

    /// Called when a phase value is frozen.
    fn on_freeze(&mut self, e: &FreezeEvent) {
        _ = e;
    }

    /// Called when a sensor block is raised or lifted.
    fn on_blocked(&mut self, e: &BlockedEvent) {
        _ = e;
    }

    /// Called once per driver tick.
    fn on_tick_summary(&mut self, s: &TickSummary) {
        _ = s;
    }
}

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

/// Dispatches one event to the sink when tracing is compiled in.
macro_rules! emit {
    ($self:ident, $method:ident, $e:ident) => {{
        #[cfg(feature = "trace")]
        if let Some(s) = &mut $self.sink {
            s.$method($e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = $e;
        }
    }};
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

    /// Emits a [`SampleEvent`].
    #[inline]
    pub fn sample(&mut self, e: &SampleEvent) {
        emit!(self, on_sample, e);
    }

    /// Emits a [`RejectedEvent`].
    #[inline]
    pub fn rejected(&mut self, e: &RejectedEvent) {
        emit!(self, on_rejected, e);
    }

    /// Emits a [`TransitionEvent`].
    #[inline]
    pub fn transition(&mut self, e: &TransitionEvent) {
        emit!(self, on_transition, e);
    }

    /// Emits a [`FreezeEvent`].
    #[inline]
    pub fn freeze(&mut self, e: &FreezeEvent) {
        emit!(self, on_freeze, e);
    }

    /// Emits a [`BlockedEvent`].
    #[inline]
    pub fn blocked(&mut self, e: &BlockedEvent) {
        emit!(self, on_blocked, e);
    }

    /// Emits a [`TickSummary`].
    #[inline]
    pub fn tick_summary(&mut self, s: &TickSummary) {
        emit!(self, on_tick_summary, s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transition() -> TransitionEvent {
        TransitionEvent {
            at: HostTime(10),
            from: Phase::Light,
            to: Phase::Rotation,
        }
    }

    #[test]
    fn noop_sink_compiles() {
        let mut sink = NoopSink;
        sink.on_transition(&transition());
        sink.on_tick_summary(&TickSummary {
            tick_index: 0,
            at: HostTime(0),
            phase_before: Phase::Light,
            phase_after: Phase::Light,
            applied: 0,
            rejected: 0,
            dropped_total: 0,
            blocked: false,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.transition(&transition());
        tracer.freeze(&FreezeEvent {
            at: HostTime(1),
            phase: Phase::Rotation,
            value: 0.0,
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            transitions: Vec<Phase>,
        }
        impl TraceSink for RecordingSink {
            fn on_transition(&mut self, e: &TransitionEvent) {
                self.transitions.push(e.to);
            }
        }

        let mut sink = RecordingSink {
            transitions: Vec::new(),
        };
        let mut tracer = Tracer::new(&mut sink);
        tracer.transition(&transition());
        drop(tracer);
        assert_eq!(sink.transitions, &[Phase::Rotation]);
    }
}
