// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Monotonic host time, wall-clock time of day, and the pair of them that
//! the session stamps on completion.
//!
//! [`HostTime`] is a point on the platform's monotonic clock in backend ticks
//! (microseconds on the web). [`Timebase`] carries the rational conversion
//! from those ticks to nanoseconds, and [`Duration`] is a span in the same
//! tick units.
//!
//! [`ClockTime`] is the local time of day shown to the user once the tilt
//! phase completes. The core never reads a clock itself: every entry point
//! receives a [`Timestamp`] from the caller.

use core::fmt;
use core::ops::{Add, Sub};

/// A point in time expressed as platform-native monotonic ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HostTime(pub u64);

impl HostTime {
    /// Returns the raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Returns the duration between `self` and an earlier time, or zero if
    /// `earlier` is after `self`.
    #[inline]
    #[must_use]
    pub const fn saturating_duration_since(self, earlier: Self) -> Duration {
        Duration(self.0.saturating_sub(earlier.0))
    }

    /// Checked addition of a duration.
    #[inline]
    #[must_use]
    pub const fn checked_add(self, duration: Duration) -> Option<Self> {
        match self.0.checked_add(duration.0) {
            Some(t) => Some(Self(t)),
            None => None,
        }
    }
}

impl Add<Duration> for HostTime {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Duration) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for HostTime {
    type Output = Duration;

    #[inline]
    fn sub(self, rhs: Self) -> Duration {
        Duration(self.0 - rhs.0)
    }
}

impl fmt::Debug for HostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostTime({})", self.0)
    }
}

/// Rational conversion factor from ticks to nanoseconds.
///
/// `nanoseconds = ticks * numer / denom`
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timebase {
    /// Numerator of the ticks-to-nanoseconds ratio.
    pub numer: u32,
    /// Denominator of the ticks-to-nanoseconds ratio.
    pub denom: u32,
}

impl Timebase {
    /// A timebase where ticks are already nanoseconds (1:1).
    pub const NANOS: Self = Self { numer: 1, denom: 1 };

    /// A timebase where one tick is one microsecond.
    pub const MICROS: Self = Self {
        numer: 1000,
        denom: 1,
    };

    /// Creates a new timebase with the given numerator and denominator.
    ///
    /// # Panics
    ///
    /// Panics if `denom` is zero.
    #[inline]
    #[must_use]
    pub const fn new(numer: u32, denom: u32) -> Self {
        assert!(denom != 0, "timebase denominator must not be zero");
        Self { numer, denom }
    }

    /// Converts a tick count to nanoseconds.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "u128 intermediate avoids overflow; truncation back to u64 is intentional"
    )]
    pub const fn ticks_to_nanos(self, ticks: u64) -> u64 {
        let wide = ticks as u128 * self.numer as u128 / self.denom as u128;
        wide as u64
    }

    /// Converts nanoseconds to a tick count.
    #[inline]
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "u128 intermediate avoids overflow; truncation back to u64 is intentional"
    )]
    pub const fn nanos_to_ticks(self, nanos: u64) -> u64 {
        let wide = nanos as u128 * self.denom as u128 / self.numer as u128;
        wide as u64
    }
}

impl fmt::Debug for Timebase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timebase({}/{})", self.numer, self.denom)
    }
}

/// A duration in platform-native ticks.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Duration(pub u64);

impl Duration {
    /// A zero-length duration.
    pub const ZERO: Self = Self(0);

    /// Returns the raw tick value.
    #[inline]
    #[must_use]
    pub const fn ticks(self) -> u64 {
        self.0
    }

    /// Creates a duration of `millis` milliseconds in the given timebase.
    #[inline]
    #[must_use]
    pub const fn from_millis(millis: u64, timebase: Timebase) -> Self {
        Self(timebase.nanos_to_ticks(millis.saturating_mul(1_000_000)))
    }
}

impl fmt::Debug for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Duration({})", self.0)
    }
}

const SECONDS_PER_DAY: u32 = 24 * 60 * 60;

/// Local wall-clock time of day with one-second resolution.
///
/// Formats as zero-padded `HH:MM:SS`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
    second: u8,
}

impl ClockTime {
    /// Midnight, `00:00:00`.
    pub const MIDNIGHT: Self = Self {
        hour: 0,
        minute: 0,
        second: 0,
    };

    /// Creates a time of day from its components.
    ///
    /// Returns `None` if any component is out of range.
    #[must_use]
    pub const fn new(hour: u8, minute: u8, second: u8) -> Option<Self> {
        if hour < 24 && minute < 60 && second < 60 {
            Some(Self {
                hour,
                minute,
                second,
            })
        } else {
            None
        }
    }

    /// Creates a time of day from seconds elapsed since local midnight.
    ///
    /// Values past one day wrap around.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "components are reduced modulo 24/60 before narrowing"
    )]
    pub const fn from_seconds_since_midnight(seconds: u32) -> Self {
        let s = seconds % SECONDS_PER_DAY;
        Self {
            hour: (s / 3600) as u8,
            minute: (s / 60 % 60) as u8,
            second: (s % 60) as u8,
        }
    }

    /// Hour of the day (0-23).
    #[must_use]
    pub const fn hour(self) -> u8 {
        self.hour
    }

    /// Minute of the hour (0-59).
    #[must_use]
    pub const fn minute(self) -> u8 {
        self.minute
    }

    /// Second of the minute (0-59).
    #[must_use]
    pub const fn second(self) -> u8 {
        self.second
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({self})")
    }
}

/// A monotonic instant paired with the wall-clock time it corresponds to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Timestamp {
    /// Monotonic host time, used for ordering and the stall watchdog.
    pub host: HostTime,
    /// Local time of day, used for display.
    pub clock: ClockTime,
}

impl Timestamp {
    /// Creates a timestamp from its parts.
    #[must_use]
    pub const fn new(host: HostTime, clock: ClockTime) -> Self {
        Self { host, clock }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString as _;

    #[test]
    fn clock_time_is_zero_padded() {
        let t = ClockTime::new(7, 5, 9).unwrap();
        assert_eq!(t.to_string(), "07:05:09");
        assert_eq!(ClockTime::MIDNIGHT.to_string(), "00:00:00");
    }

    #[test]
    fn clock_time_rejects_out_of_range_components() {
        assert!(ClockTime::new(24, 0, 0).is_none(), "hour 24");
        assert!(ClockTime::new(0, 60, 0).is_none(), "minute 60");
        assert!(ClockTime::new(0, 0, 60).is_none(), "second 60");
        assert!(ClockTime::new(23, 59, 59).is_some());
    }

    #[test]
    fn clock_time_from_seconds_wraps_at_midnight() {
        let t = ClockTime::from_seconds_since_midnight(13 * 3600 + 4 * 60 + 30);
        assert_eq!(t.to_string(), "13:04:30");

        let wrapped = ClockTime::from_seconds_since_midnight(SECONDS_PER_DAY + 61);
        assert_eq!(wrapped, ClockTime::new(0, 1, 1).unwrap());
    }

    #[test]
    fn micros_timebase_and_millis() {
        let d = Duration::from_millis(1500, Timebase::MICROS);
        assert_eq!(d.ticks(), 1_500_000);
        assert_eq!(Timebase::MICROS.ticks_to_nanos(1), 1000);
    }

    #[test]
    fn host_time_arithmetic() {
        let t = HostTime(1000);
        assert_eq!((t + Duration(200)).ticks(), 1200);
        assert_eq!(HostTime(1500) - t, Duration(500));
        assert_eq!(t.saturating_duration_since(HostTime(1500)), Duration::ZERO);
        assert_eq!(HostTime(u64::MAX).checked_add(Duration(1)), None);
    }
}
