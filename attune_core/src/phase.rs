// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The stages of a guided session.

use core::fmt;

use crate::error::Sensor;

/// Stage of the three-step guided sequence.
///
/// Phases are ordered and a session only ever moves forward:
/// `Light < Rotation < Tilt < Done`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// Waiting for enough ambient light on the camera.
    #[default]
    Light,
    /// Waiting for the device to face north.
    Rotation,
    /// Waiting for the device to stand upright.
    Tilt,
    /// Tilt is frozen and the completion time is recorded.
    Done,
}

impl Phase {
    /// Returns the phase that follows this one, or `None` for [`Done`](Self::Done).
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Light => Some(Self::Rotation),
            Self::Rotation => Some(Self::Tilt),
            Self::Tilt => Some(Self::Done),
            Self::Done => None,
        }
    }

    /// The sensor whose samples drive this phase.
    #[must_use]
    pub const fn sensor(self) -> Option<Sensor> {
        match self {
            Self::Light => Some(Sensor::Camera),
            Self::Rotation | Self::Tilt => Some(Sensor::Orientation),
            Self::Done => None,
        }
    }

    /// Short lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Rotation => "rotation",
            Self::Tilt => "tilt",
            Self::Done => "done",
        }
    }

    /// Compact encoding used by trace recorders.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Light => 0,
            Self::Rotation => 1,
            Self::Tilt => 2,
            Self::Done => 3,
        }
    }

    /// Inverse of [`code`](Self::code).
    #[must_use]
    pub const fn from_code(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Light),
            1 => Some(Self::Rotation),
            2 => Some(Self::Tilt),
            3 => Some(Self::Done),
            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_are_strictly_ordered() {
        assert!(Phase::Light < Phase::Rotation);
        assert!(Phase::Rotation < Phase::Tilt);
        assert!(Phase::Tilt < Phase::Done);
    }

    #[test]
    fn next_walks_forward_and_stops() {
        let mut p = Phase::default();
        let mut seen = 1;
        while let Some(n) = p.next() {
            assert!(n > p, "next must advance");
            p = n;
            seen += 1;
        }
        assert_eq!(p, Phase::Done);
        assert_eq!(seen, 4);
    }

    #[test]
    fn code_round_trips() {
        for p in [Phase::Light, Phase::Rotation, Phase::Tilt, Phase::Done] {
            assert_eq!(Phase::from_code(p.code()), Some(p));
        }
        assert_eq!(Phase::from_code(9), None);
    }
}
