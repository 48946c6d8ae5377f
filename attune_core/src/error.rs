// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sensor and sample errors.
//!
//! Two kinds of failure reach the state machine:
//!
//! - [`SensorUnavailable`]: a sensor cannot deliver data at all (no camera,
//!   orientation permission denied, or a silent stream caught by the
//!   watchdog). The session records it as a *blocked* condition for the
//!   phases that depend on that sensor. Rendering continues.
//! - [`SampleError`]: one reading was malformed. The reading is dropped
//!   without touching any state.

use core::fmt;

/// A sensor feeding the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sensor {
    /// The rear camera, used for ambient brightness.
    Camera,
    /// The orientation source, used for heading and tilt.
    Orientation,
}

impl Sensor {
    /// Short lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Camera => "camera",
            Self::Orientation => "orientation",
        }
    }
}

/// Why a sensor is unavailable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnavailableCause {
    /// The device or feed does not exist or stopped producing frames.
    NoDevice,
    /// The user declined the permission prompt.
    PermissionDenied,
    /// The platform does not expose this sensor.
    Unsupported,
    /// The sensor is nominally available but nothing arrived within the
    /// configured stall timeout.
    Silent,
}

impl UnavailableCause {
    /// Short lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoDevice => "no device",
            Self::PermissionDenied => "permission denied",
            Self::Unsupported => "unsupported",
            Self::Silent => "silent",
        }
    }
}

/// A sensor that cannot currently deliver data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SensorUnavailable {
    /// Which sensor.
    pub sensor: Sensor,
    /// Why it is unavailable.
    pub cause: UnavailableCause,
}

impl SensorUnavailable {
    /// Creates a new record.
    #[must_use]
    pub const fn new(sensor: Sensor, cause: UnavailableCause) -> Self {
        Self { sensor, cause }
    }

    /// The camera feed is missing.
    #[must_use]
    pub const fn no_camera() -> Self {
        Self::new(Sensor::Camera, UnavailableCause::NoDevice)
    }

    /// Orientation permission was refused.
    #[must_use]
    pub const fn orientation_denied() -> Self {
        Self::new(Sensor::Orientation, UnavailableCause::PermissionDenied)
    }
}

impl fmt::Display for SensorUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} unavailable: {}",
            self.sensor.as_str(),
            self.cause.as_str()
        )
    }
}

impl core::error::Error for SensorUnavailable {}

/// Which field of a reading was malformed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SampleField {
    /// Camera brightness.
    Brightness,
    /// Compass heading or absolute alpha.
    Heading,
    /// Forward-backward tilt.
    Beta,
}

impl SampleField {
    /// Short lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Brightness => "brightness",
            Self::Heading => "heading",
            Self::Beta => "beta",
        }
    }
}

/// A reading that was discarded without touching session state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SampleError {
    /// A field was NaN or infinite.
    NonFinite(SampleField),
    /// A heading outside `[0, 360)`.
    HeadingOutOfRange(f64),
    /// A raw brightness outside `[0, 255]`.
    BrightnessOutOfRange(f64),
}

impl SampleError {
    /// The field that was rejected.
    #[must_use]
    pub const fn field(&self) -> SampleField {
        match self {
            Self::NonFinite(field) => *field,
            Self::HeadingOutOfRange(_) => SampleField::Heading,
            Self::BrightnessOutOfRange(_) => SampleField::Brightness,
        }
    }
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite(field) => write!(f, "{} is not finite", field.as_str()),
            Self::HeadingOutOfRange(v) => write!(f, "heading {v} outside [0, 360)"),
            Self::BrightnessOutOfRange(v) => write!(f, "brightness {v} outside [0, 255]"),
        }
    }
}

impl core::error::Error for SampleError {}

/// Top-level error for the session core.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Error {
    /// A sensor cannot deliver data.
    SensorUnavailable(SensorUnavailable),
    /// A reading was malformed and discarded.
    MalformedSample(SampleError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SensorUnavailable(e) => e.fmt(f),
            Self::MalformedSample(e) => write!(f, "malformed sample: {e}"),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::SensorUnavailable(e) => Some(e),
            Self::MalformedSample(e) => Some(e),
        }
    }
}

impl From<SensorUnavailable> for Error {
    fn from(e: SensorUnavailable) -> Self {
        Self::SensorUnavailable(e)
    }
}

impl From<SampleError> for Error {
    fn from(e: SampleError) -> Self {
        Self::MalformedSample(e)
    }
}
