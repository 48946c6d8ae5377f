// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One processing step per render tick.
//!
//! [`SessionDriver::tick`] is what a platform render loop calls once per
//! frame, before drawing:
//!
//! 1. drain queued orientation samples in delivery order;
//! 2. during the light phase, pull one brightness sample from the camera;
//! 3. run the stall watchdog;
//! 4. notify the presenter if the visible instructions changed;
//! 5. emit a [`TickSummary`].

use crate::config::SessionConfig;
use crate::error::Error;
use crate::presenter::{InstructionPresenter, Instructions};
use crate::phase::Phase;
use crate::queue::SampleQueue;
use crate::sampler::{BrightnessSampler, CameraFeed};
use crate::session::{Outcome, SessionState, Snapshot};
use crate::time::Timestamp;
use crate::trace::{TickSummary, Tracer};

/// What one tick did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickReport {
    /// Tick counter, starting at 0.
    pub tick_index: u64,
    /// Phase before the tick.
    pub phase_before: Phase,
    /// Phase after the tick.
    pub phase_after: Phase,
    /// Samples the state machine accepted.
    pub applied: u32,
    /// Samples discarded because no field was well formed.
    pub rejected: u32,
    /// Samples evicted from the queue since the previous tick.
    pub dropped: u64,
    /// Whether the presenter was notified.
    pub presented: bool,
}

impl TickReport {
    /// Whether the phase advanced during this tick.
    #[must_use]
    pub fn advanced(&self) -> bool {
        self.phase_after > self.phase_before
    }
}

/// Drives a [`SessionState`] from a sample queue and a camera feed.
#[derive(Debug)]
pub struct SessionDriver {
    session: SessionState,
    sampler: BrightnessSampler,
    tick_index: u64,
    dropped_seen: u64,
    last_presented: Option<Instructions>,
}

impl SessionDriver {
    /// Creates a driver for a fresh session.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sampler: BrightnessSampler::new(config.frame_width, config.frame_height),
            session: SessionState::new(config),
            tick_index: 0,
            dropped_seen: 0,
            last_presented: None,
        }
    }

    /// A queue sized for this driver's config.
    #[must_use]
    pub fn make_queue(&self) -> SampleQueue {
        SampleQueue::with_capacity(self.session.config().queue_capacity)
    }

    /// The session being driven.
    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Mutable access, for reporting sensor conditions found outside a tick
    /// (for example a refused permission).
    pub fn session_mut(&mut self) -> &mut SessionState {
        &mut self.session
    }

    /// Shorthand for `self.session().snapshot()`.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.session.snapshot()
    }

    /// Reads one brightness sample from `camera` and applies it.
    ///
    /// Returns `Ok(None)` while the camera warms up. A missing feed is a
    /// [`Error::SensorUnavailable`] and is not recorded on the session; the
    /// caller decides whether to report it.
    pub fn sample_light(
        &mut self,
        camera: &mut dyn CameraFeed,
        now: Timestamp,
        tracer: &mut Tracer<'_>,
    ) -> Result<Option<Outcome>, Error> {
        let Some(raw) = self.sampler.sample_brightness(camera)? else {
            return Ok(None);
        };
        Ok(Some(self.session.apply_brightness(raw, now, tracer)?))
    }

    /// Runs one processing step.
    pub fn tick(
        &mut self,
        queue: &mut SampleQueue,
        camera: &mut dyn CameraFeed,
        presenter: &mut dyn InstructionPresenter,
        now: Timestamp,
        tracer: &mut Tracer<'_>,
    ) -> TickReport {
        let phase_before = self.session.phase();
        let mut applied = 0_u32;
        let mut rejected = 0_u32;

        while let Some(timed) = queue.pop() {
            match self.session.apply_orientation(timed.sample, timed.at, tracer) {
                Ok(_) => applied += 1,
                Err(_) => rejected += 1,
            }
        }

        if self.session.phase() == Phase::Light {
            match self.sample_light(camera, now, tracer) {
                Ok(Some(_)) => applied += 1,
                Ok(None) => {}
                Err(Error::MalformedSample(_)) => rejected += 1,
                Err(Error::SensorUnavailable(unavailable)) => {
                    self.session.report_unavailable(unavailable, now, tracer);
                }
            }
        }

        self.session.check_stall(now, tracer);

        let instructions = Instructions::for_snapshot(&self.session.snapshot());
        let presented = self.last_presented != Some(instructions);
        if presented {
            presenter.present(&instructions);
            self.last_presented = Some(instructions);
        }

        let dropped_total = queue.dropped_count();
        let dropped = dropped_total.saturating_sub(self.dropped_seen);
        self.dropped_seen = dropped_total;

        let report = TickReport {
            tick_index: self.tick_index,
            phase_before,
            phase_after: self.session.phase(),
            applied,
            rejected,
            dropped,
            presented,
        };
        tracer.tick_summary(&TickSummary {
            tick_index: self.tick_index,
            at: now.host,
            phase_before,
            phase_after: report.phase_after,
            applied,
            rejected,
            dropped_total,
            blocked: self.session.blocked().is_some(),
        });
        self.tick_index += 1;
        report
    }
}

impl Default for SessionDriver {
    fn default() -> Self {
        Self::new(SessionConfig::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{SensorUnavailable, UnavailableCause};
    use crate::sample::OrientationReading;
    use crate::sampler::{Frame, FrameError};
    use crate::time::{ClockTime, HostTime};
    use alloc::vec::Vec;

    fn at(secs: u32) -> Timestamp {
        Timestamp::new(
            HostTime(u64::from(secs) * 1_000_000_000),
            ClockTime::from_seconds_since_midnight(secs),
        )
    }

    /// A 1×1 grey camera whose value can be changed, or a dead one.
    struct TestCamera {
        pixel: Option<[u8; 4]>,
    }

    impl TestCamera {
        fn grey(v: u8) -> Self {
            Self {
                pixel: Some([v, v, v, 255]),
            }
        }
    }

    impl CameraFeed for TestCamera {
        fn current_frame(&mut self) -> Result<Frame<'_>, FrameError> {
            match &self.pixel {
                Some(p) => Frame::new(1, 1, p),
                None => Err(FrameError::Unavailable(UnavailableCause::NoDevice)),
            }
        }
    }

    #[derive(Default)]
    struct LogPresenter {
        shown: Vec<Instructions>,
    }

    impl InstructionPresenter for LogPresenter {
        fn present(&mut self, instructions: &Instructions) {
            self.shown.push(*instructions);
        }
    }

    fn compass(h: f64) -> OrientationReading {
        OrientationReading {
            compass_heading: Some(h),
            ..OrientationReading::default()
        }
    }

    fn tilt(b: f64) -> OrientationReading {
        OrientationReading {
            beta: Some(b),
            ..OrientationReading::default()
        }
    }

    #[test]
    fn first_tick_presents_then_only_on_change() {
        let mut driver = SessionDriver::default();
        let mut queue = driver.make_queue();
        let mut cam = TestCamera::grey(10);
        let mut presenter = LogPresenter::default();

        let r0 = driver.tick(&mut queue, &mut cam, &mut presenter, at(0), &mut Tracer::none());
        let r1 = driver.tick(&mut queue, &mut cam, &mut presenter, at(1), &mut Tracer::none());
        assert!(r0.presented);
        assert!(!r1.presented);
        assert_eq!(presenter.shown.len(), 1);
        assert!(presenter.shown[0].light);
    }

    #[test]
    fn scripted_session_through_driver() {
        let mut driver = SessionDriver::default();
        let mut queue = driver.make_queue();
        let mut cam = TestCamera::grey(0);
        let mut presenter = LogPresenter::default();
        let mut t = 0;
        let mut phases = Vec::new();

        // 40, 45, 52 percent of full scale.
        for v in [102_u8, 115, 133] {
            cam.pixel = Some([v, v, v, 255]);
            let r = driver.tick(&mut queue, &mut cam, &mut presenter, at(t), &mut Tracer::none());
            phases.push(r.phase_after);
            t += 1;
        }
        assert_eq!(phases, [Phase::Light, Phase::Light, Phase::Rotation]);

        // Camera is not read after the light phase.
        cam.pixel = None;

        phases.clear();
        for h in [180.0, 45.0, 5.0] {
            queue.on_orientation_sample(&compass(h), at(t));
            let r = driver.tick(&mut queue, &mut cam, &mut presenter, at(t), &mut Tracer::none());
            phases.push(r.phase_after);
            t += 1;
        }
        assert_eq!(phases, [Phase::Rotation, Phase::Rotation, Phase::Tilt]);
        assert_eq!(driver.snapshot().display_angle, 0.0);
        assert_eq!(driver.snapshot().blocked, None);

        phases.clear();
        for b in [30.0, 60.0, 90.0] {
            queue.on_orientation_sample(&tilt(b), at(t));
            let r = driver.tick(&mut queue, &mut cam, &mut presenter, at(t), &mut Tracer::none());
            phases.push(r.phase_after);
            t += 1;
        }
        assert_eq!(phases, [Phase::Tilt, Phase::Tilt, Phase::Done]);
        assert_eq!(driver.snapshot().completed_at, Some(at(8)));

        let last = presenter.shown.last().copied().unwrap();
        assert!(last.result && last.back_link && !last.angle);
        // light, direction, angle, result
        assert_eq!(presenter.shown.len(), 4);
    }

    #[test]
    fn queued_samples_apply_in_order_within_one_tick() {
        let mut driver = SessionDriver::default();
        let mut queue = driver.make_queue();
        let mut cam = TestCamera::grey(255);
        let mut presenter = LogPresenter::default();
        driver.tick(&mut queue, &mut cam, &mut presenter, at(0), &mut Tracer::none());
        assert_eq!(driver.session().phase(), Phase::Rotation);

        for r in [compass(180.0), compass(3.0), tilt(45.0), tilt(90.0)] {
            queue.on_orientation_sample(&r, at(1));
        }
        let report = driver.tick(&mut queue, &mut cam, &mut presenter, at(1), &mut Tracer::none());
        assert_eq!(report.applied, 4);
        assert_eq!(report.phase_before, Phase::Rotation);
        assert_eq!(report.phase_after, Phase::Done);
        assert!(report.advanced());
    }

    #[test]
    fn malformed_queued_samples_are_counted() {
        let mut driver = SessionDriver::default();
        let mut queue = driver.make_queue();
        let mut cam = TestCamera::grey(255);
        let mut presenter = LogPresenter::default();
        driver.tick(&mut queue, &mut cam, &mut presenter, at(0), &mut Tracer::none());

        queue.on_orientation_sample(&compass(f64::NAN), at(1));
        queue.on_orientation_sample(&compass(400.0), at(1));
        queue.on_orientation_sample(&compass(90.0), at(1));
        let report = driver.tick(&mut queue, &mut cam, &mut presenter, at(1), &mut Tracer::none());
        assert_eq!((report.applied, report.rejected), (1, 2));
        assert_eq!(driver.session().phase(), Phase::Rotation);
    }

    #[test]
    fn sample_light_separates_dead_feed_from_bad_reading() {
        let mut driver = SessionDriver::default();
        let mut dead = TestCamera { pixel: None };
        assert_eq!(
            driver.sample_light(&mut dead, at(0), &mut Tracer::none()),
            Err(Error::SensorUnavailable(SensorUnavailable::no_camera()))
        );
        assert_eq!(
            driver.session().blocked(),
            None,
            "sample_light leaves reporting to the caller"
        );

        let mut bright = TestCamera::grey(255);
        assert_eq!(
            driver.sample_light(&mut bright, at(1), &mut Tracer::none()),
            Ok(Some(Outcome::Transitioned {
                from: Phase::Light,
                to: Phase::Rotation
            }))
        );
    }

    #[test]
    fn dead_camera_blocks_light_phase_once() {
        let mut driver = SessionDriver::default();
        let mut queue = driver.make_queue();
        let mut cam = TestCamera { pixel: None };
        let mut presenter = LogPresenter::default();

        for i in 0..3 {
            driver.tick(&mut queue, &mut cam, &mut presenter, at(i), &mut Tracer::none());
        }
        assert_eq!(driver.session().phase(), Phase::Light);
        assert_eq!(presenter.shown.len(), 1);
        assert_eq!(presenter.shown[0].blocked, Some(SensorUnavailable::no_camera()));

        // Camera comes back.
        cam.pixel = Some([20, 20, 20, 255]);
        let r = driver.tick(&mut queue, &mut cam, &mut presenter, at(3), &mut Tracer::none());
        assert!(r.presented);
        assert_eq!(presenter.shown.last().and_then(|i| i.blocked), None);
    }

    #[test]
    fn dropped_samples_reported_per_tick() {
        let mut driver = SessionDriver::new(SessionConfig {
            queue_capacity: 2,
            ..SessionConfig::DEFAULT
        });
        let mut queue = driver.make_queue();
        let mut cam = TestCamera::grey(0);
        let mut presenter = LogPresenter::default();

        for h in [100.0, 110.0, 120.0, 130.0, 140.0] {
            queue.on_orientation_sample(&compass(h), at(0));
        }
        let r = driver.tick(&mut queue, &mut cam, &mut presenter, at(0), &mut Tracer::none());
        assert_eq!(r.dropped, 3);
        let r = driver.tick(&mut queue, &mut cam, &mut presenter, at(1), &mut Tracer::none());
        assert_eq!(r.dropped, 0);
        assert_eq!(r.tick_index, 1);
    }

    #[test]
    fn refused_permission_surfaces_in_rotation() {
        let mut driver = SessionDriver::default();
        let mut queue = driver.make_queue();
        let mut cam = TestCamera::grey(255);
        let mut presenter = LogPresenter::default();

        driver.session_mut().report_unavailable(
            SensorUnavailable::orientation_denied(),
            at(0),
            &mut Tracer::none(),
        );
        driver.tick(&mut queue, &mut cam, &mut presenter, at(0), &mut Tracer::none());
        let shown = presenter.shown.last().copied().unwrap();
        assert!(shown.direction);
        assert_eq!(shown.blocked, Some(SensorUnavailable::orientation_denied()));
    }
}
