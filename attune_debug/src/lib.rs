// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for attune
//! diagnostics.
//!
//! This crate provides [`TraceSink`](attune_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from
//!   recorded bytes.
//! - [`Fanout`]: forwards every event to two sinks.

pub mod chrome;
pub mod pretty;
pub mod recorder;

use attune_core::trace::{
    BlockedEvent, FreezeEvent, RejectedEvent, SampleEvent, TickSummary, TraceSink,
    TransitionEvent,
};

/// Forwards every event to both inner sinks, `a` first.
#[derive(Debug)]
pub struct Fanout<A, B> {
    /// First sink.
    pub a: A,
    /// Second sink.
    pub b: B,
}

impl<A: TraceSink, B: TraceSink> TraceSink for Fanout<A, B> {
    fn on_sample(&mut self, e: &SampleEvent) {
        self.a.on_sample(e);
        self.b.on_sample(e);
    }

    fn on_rejected(&mut self, e: &RejectedEvent) {
        self.a.on_rejected(e);
        self.b.on_rejected(e);
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        self.a.on_transition(e);
        self.b.on_transition(e);
    }

    fn on_freeze(&mut self, e: &FreezeEvent) {
        self.a.on_freeze(e);
        self.b.on_freeze(e);
    }

    fn on_blocked(&mut self, e: &BlockedEvent) {
        self.a.on_blocked(e);
        self.b.on_blocked(e);
    }

    fn on_tick_summary(&mut self, s: &TickSummary) {
        self.a.on_tick_summary(s);
        self.b.on_tick_summary(s);
    }
}
