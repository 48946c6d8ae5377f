// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Timestamps
//! are converted to milliseconds using a [`Timebase`].

use std::io::Write;

use attune_core::time::{HostTime, Timebase};
use attune_core::trace::{
    BlockedEvent, FreezeEvent, RejectedEvent, SampleEvent, TickSummary, TraceSink,
    TransitionEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    timebase: Timebase,
    /// Print tick summaries only when something happened during the tick.
    quiet_ticks: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("timebase", &self.timebase)
            .field("quiet_ticks", &self.quiet_ticks)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>, timebase: Timebase) -> Self {
        Self::with_writer(writer, timebase)
    }

    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr(timebase: Timebase) -> Self {
        Self::new(Box::new(std::io::stderr()), timebase)
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W, timebase: Timebase) -> Self {
        Self {
            writer,
            timebase,
            quiet_ticks: true,
        }
    }

    /// Prints every tick summary, including idle ones.
    #[must_use]
    pub fn verbose_ticks(mut self) -> Self {
        self.quiet_ticks = false;
        self
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn ms(&self, t: HostTime) -> f64 {
        self.timebase.ticks_to_nanos(t.ticks()) as f64 / 1_000_000.0
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_sample(&mut self, e: &SampleEvent) {
        let _ = writeln!(
            self.writer,
            "[sample] {:>8.1}ms {} {}={:.3}",
            self.ms(e.at),
            e.phase,
            e.field.as_str(),
            e.value,
        );
    }

    fn on_rejected(&mut self, e: &RejectedEvent) {
        let _ = writeln!(
            self.writer,
            "[reject] {:>8.1}ms {} {}",
            self.ms(e.at),
            e.phase,
            e.error,
        );
    }

    fn on_transition(&mut self, e: &TransitionEvent) {
        let _ = writeln!(
            self.writer,
            "[phase]  {:>8.1}ms {} -> {}",
            self.ms(e.at),
            e.from,
            e.to,
        );
    }

    fn on_freeze(&mut self, e: &FreezeEvent) {
        let _ = writeln!(
            self.writer,
            "[freeze] {:>8.1}ms {} at {:.3}",
            self.ms(e.at),
            e.phase,
            e.value,
        );
    }

    fn on_blocked(&mut self, e: &BlockedEvent) {
        let verb = if e.raised { "BLOCKED" } else { "unblocked" };
        let _ = writeln!(
            self.writer,
            "[sensor] {:>8.1}ms {verb} during {}: {}",
            self.ms(e.at),
            e.phase,
            e.unavailable,
        );
    }

    fn on_tick_summary(&mut self, s: &TickSummary) {
        let idle = s.applied == 0 && s.rejected == 0 && s.phase_before == s.phase_after;
        if self.quiet_ticks && idle {
            return;
        }
        let blocked = if s.blocked { " BLOCKED" } else { "" };
        let _ = writeln!(
            self.writer,
            "[tick]   {:>8.1}ms #{} {} applied={} rejected={} dropped={}{blocked}",
            self.ms(s.at),
            s.tick_index,
            s.phase_after,
            s.applied,
            s.rejected,
            s.dropped_total,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attune_core::error::SensorUnavailable;
    use attune_core::phase::Phase;

    fn summary(applied: u32) -> TickSummary {
        TickSummary {
            tick_index: 4,
            at: HostTime(2_000_000),
            phase_before: Phase::Light,
            phase_after: Phase::Light,
            applied,
            rejected: 0,
            dropped_total: 0,
            blocked: false,
        }
    }

    #[test]
    fn pretty_print_transition() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::NANOS);
        sink.on_transition(&TransitionEvent {
            at: HostTime(1_500_000),
            from: Phase::Rotation,
            to: Phase::Tilt,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("[phase]"), "got: {output}");
        assert!(output.contains("rotation -> tilt"), "got: {output}");
        assert!(output.contains("1.5ms"), "got: {output}");
    }

    #[test]
    fn pretty_print_blocked() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::MICROS);
        sink.on_blocked(&BlockedEvent {
            at: HostTime(0),
            phase: Phase::Light,
            unavailable: SensorUnavailable::no_camera(),
            raised: true,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(
            output.contains("BLOCKED during light: camera unavailable: no device"),
            "got: {output}"
        );
    }

    #[test]
    fn idle_ticks_are_quiet_unless_verbose() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::NANOS);
        sink.on_tick_summary(&summary(0));
        sink.on_tick_summary(&summary(1));
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(output.lines().count(), 1, "got: {output}");

        let mut sink =
            PrettyPrintSink::with_writer(Vec::<u8>::new(), Timebase::NANOS).verbose_ticks();
        sink.on_tick_summary(&summary(0));
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.contains("#4 light applied=0"), "got: {output}");
    }
}
