// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sensor readings as they enter the session.
//!
//! Orientation platforms report several overlapping fields. An
//! [`OrientationReading`] carries them raw; [`OrientationReading::resolve`]
//! picks the heading source and yields the [`OrientationSample`] the state
//! machine consumes. Validation happens once, per field, in
//! [`OrientationSample::sanitize`] and [`validate_brightness`].

use crate::error::{SampleError, SampleField};

/// Upper bound of a raw channel-average brightness.
pub const MAX_BRIGHTNESS: f64 = 255.0;

/// A raw orientation event, as delivered by the platform.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrientationReading {
    /// Platform compass heading in degrees clockwise from north
    /// (e.g. `webkitCompassHeading`).
    pub compass_heading: Option<f64>,
    /// Generic rotation about the vertical axis in degrees.
    pub alpha: Option<f64>,
    /// Whether `alpha` is relative to the earth frame.
    pub absolute: bool,
    /// Forward-backward tilt in degrees, 0 flat, 90 upright.
    pub beta: Option<f64>,
}

impl OrientationReading {
    /// Picks the heading for this reading.
    ///
    /// A compass heading wins. Otherwise `alpha` is used only when the
    /// reading is absolute. Otherwise there is no heading.
    #[must_use]
    pub fn heading(&self) -> Option<f64> {
        match (self.compass_heading, self.alpha) {
            (Some(h), _) => Some(h),
            (None, Some(a)) if self.absolute => Some(a),
            _ => None,
        }
    }

    /// Reduces the reading to the fields the session uses.
    #[must_use]
    pub fn resolve(&self) -> OrientationSample {
        OrientationSample {
            heading: self.heading(),
            beta: self.beta,
        }
    }
}

/// A heading and tilt pair, either of which may be absent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrientationSample {
    /// Heading in degrees, `[0, 360)`.
    pub heading: Option<f64>,
    /// Tilt in degrees.
    pub beta: Option<f64>,
}

impl OrientationSample {
    /// A sample carrying only a heading.
    #[must_use]
    pub const fn heading(heading: f64) -> Self {
        Self {
            heading: Some(heading),
            beta: None,
        }
    }

    /// A sample carrying only a tilt.
    #[must_use]
    pub const fn beta(beta: f64) -> Self {
        Self {
            heading: None,
            beta: Some(beta),
        }
    }

    /// Clears each malformed field and keeps the rest.
    ///
    /// A heading must be finite and in `[0, 360)`. A beta must be finite;
    /// out-of-range tilt is clamped later, not rejected. Heading and beta are independent readings, so a bad heading never
    /// costs a good beta. The second value holds the error for each cleared
    /// field, heading first.
    #[must_use]
    pub fn sanitize(self) -> (Self, [Option<SampleError>; 2]) {
        let (heading, heading_err) = keep_valid(self.heading, validate_heading);
        let (beta, beta_err) = keep_valid(self.beta, validate_beta);
        (Self { heading, beta }, [heading_err, beta_err])
    }
}

fn validate_heading(h: f64) -> Result<f64, SampleError> {
    if !h.is_finite() {
        return Err(SampleError::NonFinite(SampleField::Heading));
    }
    if !(0.0..360.0).contains(&h) {
        return Err(SampleError::HeadingOutOfRange(h));
    }
    Ok(h)
}

fn validate_beta(b: f64) -> Result<f64, SampleError> {
    if b.is_finite() {
        Ok(b)
    } else {
        Err(SampleError::NonFinite(SampleField::Beta))
    }
}

fn keep_valid(
    field: Option<f64>,
    check: fn(f64) -> Result<f64, SampleError>,
) -> (Option<f64>, Option<SampleError>) {
    match field.map(check) {
        None => (None, None),
        Some(Ok(v)) => (Some(v), None),
        Some(Err(e)) => (None, Some(e)),
    }
}

/// Checks a raw brightness value (`[0, 255]`, finite).
pub fn validate_brightness(raw: f64) -> Result<f64, SampleError> {
    if !raw.is_finite() {
        return Err(SampleError::NonFinite(SampleField::Brightness));
    }
    if !(0.0..=MAX_BRIGHTNESS).contains(&raw) {
        return Err(SampleError::BrightnessOutOfRange(raw));
    }
    Ok(raw)
}

/// Maps a raw brightness `0..255` onto the `0..100` light scale, clamped.
#[must_use]
pub fn normalize_brightness(raw: f64) -> f64 {
    (raw / MAX_BRIGHTNESS * 100.0).clamp(0.0, 100.0)
}
