// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Orientation permission outcome.

use crate::error::SensorUnavailable;

/// Result of asking the platform for orientation access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Permission {
    /// The user allowed access.
    Granted,
    /// The user refused access.
    Denied,
    /// The platform delivers orientation without asking.
    NotRequired,
}

impl Permission {
    /// Parses the string a browser permission prompt resolves to.
    ///
    /// Anything other than `"granted"` is treated as a refusal.
    #[must_use]
    pub fn from_response(response: &str) -> Self {
        if response == "granted" {
            Self::Granted
        } else {
            Self::Denied
        }
    }

    /// Converts the outcome into the block it raises, if any.
    pub const fn check(self) -> Result<(), SensorUnavailable> {
        match self {
            Self::Granted | Self::NotRequired => Ok(()),
            Self::Denied => Err(SensorUnavailable::orientation_denied()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Sensor, UnavailableCause};

    #[test]
    fn only_granted_response_is_granted() {
        assert_eq!(Permission::from_response("granted"), Permission::Granted);
        assert_eq!(Permission::from_response("denied"), Permission::Denied);
        assert_eq!(Permission::from_response("prompt"), Permission::Denied);
    }

    #[test]
    fn denied_blocks_orientation() {
        assert_eq!(Permission::Granted.check(), Ok(()));
        assert_eq!(Permission::NotRequired.check(), Ok(()));
        let err = Permission::Denied.check().unwrap_err();
        assert_eq!(err.sensor, Sensor::Orientation);
        assert_eq!(err.cause, UnavailableCause::PermissionDenied);
    }
}
