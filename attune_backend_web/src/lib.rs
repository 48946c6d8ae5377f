// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for attune.
//!
//! This crate connects [`attune_core`] and [`attune_render`] to browser APIs:
//!
//! - [`RafLoop`]: `requestAnimationFrame` render loop that stops when told to
//! - [`VideoCamera`]: `getUserMedia` stream read back through a small canvas
//! - [`OrientationListener`]: `deviceorientation` events pushed into a
//!   [`SampleQueue`](attune_core::queue::SampleQueue)
//! - [`CanvasSurface`]: a canvas 2D [`DisplaySurface`](attune_render::DisplaySurface)
//! - [`DomInstructions`]: shows and hides the instruction blocks by element id
//!
//! Host time comes from `performance.now()` in microsecond ticks; wall-clock
//! time of day comes from `Date`.

#![no_std]

extern crate alloc;

mod camera;
mod orientation;
mod presenter;
mod raf;
mod surface;

pub use camera::{CameraStatus, VideoCamera, cause_for_error_name};
pub use orientation::{OrientationListener, request_permission};
pub use presenter::{DomInstructions, STATUS_ID};
pub use raf::{RafLoop, RafTick};
pub use surface::{CanvasSurface, css_gray};

use attune_core::time::{ClockTime, HostTime, Timebase, Timestamp};

/// Returns the current host time from `performance.now()`.
///
/// The returned [`HostTime`] is in microsecond ticks. Use [`timebase`] to
/// convert to nanoseconds.
#[must_use]
pub fn now() -> HostTime {
    host_time_from_ms(raf::performance_now())
}

/// Returns the local time of day from `Date`.
#[must_use]
pub fn clock_now() -> ClockTime {
    let date = js_sys::Date::new_0();
    ClockTime::from_seconds_since_midnight(
        date.get_hours() * 3600 + date.get_minutes() * 60 + date.get_seconds(),
    )
}

/// Reads both clocks.
#[must_use]
pub fn timestamp() -> Timestamp {
    Timestamp::new(now(), clock_now())
}

/// Returns the web [`Timebase`]: 1 tick = 1 µs = 1000 ns.
#[must_use]
pub fn timebase() -> Timebase {
    Timebase::MICROS
}

/// Converts a `DOMHighResTimeStamp` (ms) to microsecond ticks.
pub(crate) fn host_time_from_ms(ms: f64) -> HostTime {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "performance.now() returns small positive f64; µs fits in u64"
    )]
    let us = (ms.max(0.0) * 1000.0) as u64;
    HostTime(us)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timebase_is_microsecond() {
        let tb = timebase();
        assert_eq!(tb.ticks_to_nanos(1), 1000, "1 tick = 1 µs");
        assert_eq!(tb.ticks_to_nanos(1_000_000), 1_000_000_000, "1 s");
    }

    #[test]
    fn dom_timestamps_become_microseconds() {
        assert_eq!(host_time_from_ms(16.5), HostTime(16_500));
        assert_eq!(host_time_from_ms(-1.0), HostTime(0));
    }
}
