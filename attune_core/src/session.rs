// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The phase state machine.
//!
//! [`SessionState`] owns the current [`Phase`] and one state record per
//! phase. All mutation goes through its `apply_*` and `report_*` methods:
//!
//! - **Light**: each brightness sample is normalized to `0..100`. Reaching
//!   the light threshold advances to rotation.
//! - **Rotation**: each heading updates the display angle to `-heading` in
//!   radians. A heading inside the north window freezes rotation, snaps the
//!   display angle to `0`, and advances to tilt.
//! - **Tilt**: each beta is clamped to `[0, target]`. Reaching the target
//!   freezes tilt, records the completion time, and advances to done.
//!
//! Freezes are one-way and the phase never moves backwards. Malformed samples
//! are rejected before any field is touched.
//!
//! A sensor that cannot deliver data is recorded as a *blocked* condition
//! rather than an error that stops the session. The block is lifted by the
//! next accepted sample from that sensor or by
//! [`clear_unavailable`](SessionState::clear_unavailable).

use crate::config::SessionConfig;
use crate::error::{SampleError, SampleField, Sensor, SensorUnavailable, UnavailableCause};
use crate::phase::Phase;
use crate::sample::{OrientationSample, normalize_brightness, validate_brightness};
use crate::time::{HostTime, Timestamp};
use crate::trace::{
    BlockedEvent, FreezeEvent, RejectedEvent, SampleEvent, TransitionEvent, Tracer,
};

/// Light phase record.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LightState {
    /// Last raw channel-average brightness, if the level came from a camera
    /// sample.
    pub raw: Option<f64>,
    /// Last normalized light level, `0..=100`.
    pub level: f64,
}

/// Rotation phase record.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RotationState {
    /// Last accepted heading in degrees.
    pub heading: Option<f64>,
    /// Rotation applied to the ring grid, in radians.
    pub display_angle: f64,
    /// Set once the heading entered the north window.
    pub frozen: bool,
}

/// Tilt phase record.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TiltState {
    /// Last accepted tilt in degrees, clamped to `[0, target]`.
    pub beta: f64,
    /// Set once the tilt reached the target.
    pub frozen: bool,
    /// When the tilt froze.
    pub completed_at: Option<Timestamp>,
}

/// What a single sample did to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The sample was valid but the active phase had no use for it.
    Ignored,
    /// Live state changed; the phase did not.
    Updated,
    /// The phase advanced.
    Transitioned {
        /// Phase before the sample.
        from: Phase,
        /// Phase after the sample.
        to: Phase,
    },
}

impl Outcome {
    /// Whether the phase advanced.
    #[must_use]
    pub const fn transitioned(self) -> bool {
        matches!(self, Self::Transitioned { .. })
    }
}

/// Everything a renderer or presenter needs, by value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Snapshot {
    /// Current phase.
    pub phase: Phase,
    /// Last normalized light level.
    pub light_level: f64,
    /// Ring grid rotation in radians.
    pub display_angle: f64,
    /// Current tilt in degrees.
    pub tilt: f64,
    /// Completion time, once tilt has frozen.
    pub completed_at: Option<Timestamp>,
    /// Block affecting the current phase.
    pub blocked: Option<SensorUnavailable>,
}

impl Snapshot {
    /// Whether the session has completed.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }
}

const fn sensor_index(sensor: Sensor) -> usize {
    match sensor {
        Sensor::Camera => 0,
        Sensor::Orientation => 1,
    }
}

/// State of one guided session.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    config: SessionConfig,
    phase: Phase,
    light: LightState,
    rotation: RotationState,
    tilt: TiltState,
    blocked: [Option<SensorUnavailable>; 2],
    /// Consecutive qualifying samples seen in the current phase.
    streak: u32,
    /// Last accepted sample from the active phase's sensor, or phase entry.
    last_activity: Option<HostTime>,
}

impl SessionState {
    /// Starts a session in [`Phase::Light`].
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The thresholds this session runs with.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Light record.
    #[must_use]
    pub fn light(&self) -> &LightState {
        &self.light
    }

    /// Rotation record.
    #[must_use]
    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }

    /// Tilt record.
    #[must_use]
    pub fn tilt(&self) -> &TiltState {
        &self.tilt
    }

    /// Completion time, once the session is done.
    #[must_use]
    pub fn completed_at(&self) -> Option<Timestamp> {
        self.tilt.completed_at
    }

    /// Copies out the values the renderer and presenter read.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            light_level: self.light.level,
            display_angle: self.rotation.display_angle,
            tilt: self.tilt.beta,
            completed_at: self.tilt.completed_at,
            blocked: self.blocked(),
        }
    }

    // -- samples ------------------------------------------------------------

    /// Applies a raw camera brightness (`0..=255`).
    ///
    /// Outside [`Phase::Light`] a valid sample is [`Outcome::Ignored`].
    pub fn apply_brightness(
        &mut self,
        raw: f64,
        now: Timestamp,
        tracer: &mut Tracer<'_>,
    ) -> Result<Outcome, SampleError> {
        let raw = validate_brightness(raw).inspect_err(|&e| self.reject(e, now, tracer))?;
        Ok(self.apply_level(Some(raw), normalize_brightness(raw), now, tracer))
    }

    /// Applies an already normalized light level. Values outside `0..=100`
    /// are clamped.
    pub fn apply_light_level(
        &mut self,
        level: f64,
        now: Timestamp,
        tracer: &mut Tracer<'_>,
    ) -> Result<Outcome, SampleError> {
        if !level.is_finite() {
            let e = SampleError::NonFinite(SampleField::Brightness);
            self.reject(e, now, tracer);
            return Err(e);
        }
        Ok(self.apply_level(None, level.clamp(0.0, 100.0), now, tracer))
    }

    fn apply_level(
        &mut self,
        raw: Option<f64>,
        level: f64,
        now: Timestamp,
        tracer: &mut Tracer<'_>,
    ) -> Outcome {
        self.accept(Sensor::Camera, now, tracer);
        if self.phase != Phase::Light {
            return Outcome::Ignored;
        }
        let from = self.phase;
        self.light = LightState { raw, level };
        tracer.sample(&SampleEvent {
            at: now.host,
            phase: from,
            field: SampleField::Brightness,
            value: level,
        });
        if self.confirm(level >= self.config.light_threshold) {
            self.advance(now, tracer);
        }
        self.outcome(from, true)
    }

    /// Applies one orientation sample.
    ///
    /// The heading is applied first. If it freezes rotation, the beta from the
    /// same sample is then applied to tilt.
    ///
    /// A malformed field is traced and dropped while the other field still
    /// applies. The error is returned only when nothing usable remains.
    pub fn apply_orientation(
        &mut self,
        sample: OrientationSample,
        now: Timestamp,
        tracer: &mut Tracer<'_>,
    ) -> Result<Outcome, SampleError> {
        let (sample, errors) = sample.sanitize();
        let mut first_error = None;
        for error in errors.into_iter().flatten() {
            self.reject(error, now, tracer);
            first_error.get_or_insert(error);
        }
        if sample.heading.is_none() && sample.beta.is_none() {
            return first_error.map_or(Ok(Outcome::Ignored), Err);
        }
        self.accept(Sensor::Orientation, now, tracer);

        let from = self.phase;
        let mut updated = false;
        if let Some(heading) = sample.heading {
            updated |= self.apply_heading(heading, now, tracer);
        }
        if let Some(beta) = sample.beta {
            updated |= self.apply_beta(beta, now, tracer);
        }
        Ok(self.outcome(from, updated))
    }

    fn apply_heading(&mut self, heading: f64, now: Timestamp, tracer: &mut Tracer<'_>) -> bool {
        if self.phase != Phase::Rotation || self.rotation.frozen {
            return false;
        }
        self.rotation.heading = Some(heading);
        tracer.sample(&SampleEvent {
            at: now.host,
            phase: Phase::Rotation,
            field: SampleField::Heading,
            value: heading,
        });
        if self.confirm(self.config.is_north(heading)) {
            self.rotation.frozen = true;
            self.rotation.display_angle = 0.0;
            tracer.freeze(&FreezeEvent {
                at: now.host,
                phase: Phase::Rotation,
                value: heading,
            });
            self.advance(now, tracer);
        } else {
            self.rotation.display_angle = -heading.to_radians();
        }
        true
    }

    fn apply_beta(&mut self, beta: f64, now: Timestamp, tracer: &mut Tracer<'_>) -> bool {
        if self.phase != Phase::Tilt || self.tilt.frozen {
            return false;
        }
        let target = self.config.tilt_target_deg.max(0.0);
        let tilt = beta.clamp(0.0, target);
        self.tilt.beta = tilt;
        tracer.sample(&SampleEvent {
            at: now.host,
            phase: Phase::Tilt,
            field: SampleField::Beta,
            value: tilt,
        });
        if self.confirm(tilt >= target) {
            self.tilt.frozen = true;
            self.tilt.completed_at = Some(now);
            tracer.freeze(&FreezeEvent {
                at: now.host,
                phase: Phase::Tilt,
                value: tilt,
            });
            self.advance(now, tracer);
        }
        true
    }

    /// Counts a qualifying sample and reports whether enough have been seen.
    fn confirm(&mut self, qualifies: bool) -> bool {
        if qualifies {
            self.streak = self.streak.saturating_add(1);
            self.streak >= self.config.confirm_samples.max(1)
        } else {
            self.streak = 0;
            false
        }
    }

    fn advance(&mut self, now: Timestamp, tracer: &mut Tracer<'_>) {
        let from = self.phase;
        let Some(to) = from.next() else {
            return;
        };
        self.phase = to;
        self.streak = 0;
        self.last_activity = Some(now.host);
        tracer.transition(&TransitionEvent {
            at: now.host,
            from,
            to,
        });
    }

    fn outcome(&self, from: Phase, updated: bool) -> Outcome {
        if self.phase != from {
            Outcome::Transitioned {
                from,
                to: self.phase,
            }
        } else if updated {
            Outcome::Updated
        } else {
            Outcome::Ignored
        }
    }

    fn reject(&self, error: SampleError, now: Timestamp, tracer: &mut Tracer<'_>) {
        tracer.rejected(&RejectedEvent {
            at: now.host,
            phase: self.phase,
            error,
        });
    }

    /// Notes a well-formed sample from `sensor`: lifts its block and feeds the
    /// watchdog.
    fn accept(&mut self, sensor: Sensor, now: Timestamp, tracer: &mut Tracer<'_>) {
        self.clear_unavailable(sensor, now, tracer);
        if self.phase.sensor() == Some(sensor) {
            self.last_activity = Some(now.host);
        }
    }

    // -- blocked conditions -------------------------------------------------

    /// Records that a sensor cannot deliver data.
    ///
    /// Returns `true` if this changed the recorded block, so callers notify
    /// the presenter once per condition rather than once per failed read.
    pub fn report_unavailable(
        &mut self,
        unavailable: SensorUnavailable,
        now: Timestamp,
        tracer: &mut Tracer<'_>,
    ) -> bool {
        let slot = &mut self.blocked[sensor_index(unavailable.sensor)];
        if *slot == Some(unavailable) {
            return false;
        }
        *slot = Some(unavailable);
        tracer.blocked(&BlockedEvent {
            at: now.host,
            phase: self.phase,
            unavailable,
            raised: true,
        });
        true
    }

    /// Lifts the block on `sensor`. Returns `true` if one was recorded.
    pub fn clear_unavailable(
        &mut self,
        sensor: Sensor,
        now: Timestamp,
        tracer: &mut Tracer<'_>,
    ) -> bool {
        let Some(unavailable) = self.blocked[sensor_index(sensor)].take() else {
            return false;
        };
        tracer.blocked(&BlockedEvent {
            at: now.host,
            phase: self.phase,
            unavailable,
            raised: false,
        });
        true
    }

    /// Block recorded for `sensor`, whatever the phase.
    #[must_use]
    pub fn blocked_sensor(&self, sensor: Sensor) -> Option<SensorUnavailable> {
        self.blocked[sensor_index(sensor)]
    }

    /// Block affecting the current phase. Always `None` once done.
    #[must_use]
    pub fn blocked(&self) -> Option<SensorUnavailable> {
        self.phase.sensor().and_then(|s| self.blocked_sensor(s))
    }

    /// Runs the stall watchdog.
    ///
    /// When a stall timeout is configured and the active phase's sensor has
    /// delivered nothing for longer than that, raises a
    /// [`Silent`](UnavailableCause::Silent) block. The first call starts the
    /// clock. Returns `true` if a block was newly raised.
    pub fn check_stall(&mut self, now: Timestamp, tracer: &mut Tracer<'_>) -> bool {
        let Some(timeout) = self.config.stall_timeout else {
            return false;
        };
        let Some(sensor) = self.phase.sensor() else {
            return false;
        };
        let since = *self.last_activity.get_or_insert(now.host);
        if now.host.saturating_duration_since(since) <= timeout
            || self.blocked_sensor(sensor).is_some()
        {
            return false;
        }
        self.report_unavailable(
            SensorUnavailable::new(sensor, UnavailableCause::Silent),
            now,
            tracer,
        )
    }
}
