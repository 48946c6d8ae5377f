// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session thresholds and tuning.

use crate::time::Duration;

/// Thresholds and limits for a [`SessionState`](crate::session::SessionState)
/// and its [`SessionDriver`](crate::driver::SessionDriver).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionConfig {
    /// Normalized light level (0-100) at which the light phase completes.
    pub light_threshold: f64,
    /// Half-width in degrees of the window around north that freezes the
    /// rotation phase: `[0, tol]` and `[360 - tol, 360)`.
    pub heading_tolerance_deg: f64,
    /// Tilt (degrees) at which the tilt phase freezes. Also the upper clamp.
    pub tilt_target_deg: f64,
    /// Consecutive qualifying samples required before a threshold crossing
    /// takes effect. `1` transitions on the first qualifying sample.
    pub confirm_samples: u32,
    /// Marks the active phase blocked when its sensor has been silent for
    /// longer than this. `None` disables the watchdog.
    pub stall_timeout: Option<Duration>,
    /// Maximum number of orientation samples held between ticks. Overflow
    /// drops the oldest.
    pub queue_capacity: usize,
    /// Width of the camera sampling grid in pixels.
    pub frame_width: u32,
    /// Height of the camera sampling grid in pixels.
    pub frame_height: u32,
}

impl SessionConfig {
    /// Single-sample thresholds, no watchdog, 64×48 camera grid.
    pub const DEFAULT: Self = Self {
        light_threshold: 50.0,
        heading_tolerance_deg: 10.0,
        tilt_target_deg: 90.0,
        confirm_samples: 1,
        stall_timeout: None,
        queue_capacity: 64,
        frame_width: 64,
        frame_height: 48,
    };

    /// Like [`DEFAULT`](Self::DEFAULT) but requiring `samples` consecutive
    /// qualifying readings for every threshold crossing.
    #[must_use]
    pub const fn debounced(samples: u32) -> Self {
        let mut cfg = Self::DEFAULT;
        cfg.confirm_samples = if samples == 0 { 1 } else { samples };
        cfg
    }

    /// Returns a copy with the stall watchdog set.
    #[must_use]
    pub const fn with_stall_timeout(mut self, timeout: Duration) -> Self {
        self.stall_timeout = Some(timeout);
        self
    }

    /// Whether `heading` (degrees, already validated to `[0, 360)`) lies in
    /// the north window.
    #[must_use]
    pub fn is_north(&self, heading: f64) -> bool {
        heading <= self.heading_tolerance_deg || heading >= 360.0 - self.heading_tolerance_deg
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn north_window_edges() {
        let cfg = SessionConfig::DEFAULT;
        assert!(cfg.is_north(0.0));
        assert!(cfg.is_north(10.0));
        assert!(!cfg.is_north(10.0001));
        assert!(cfg.is_north(350.0));
        assert!(!cfg.is_north(349.9999));
        assert!(cfg.is_north(359.999));
    }

    #[test]
    fn debounced_never_below_one() {
        assert_eq!(SessionConfig::debounced(0).confirm_samples, 1);
        assert_eq!(SessionConfig::debounced(3).confirm_samples, 3);
    }
}
