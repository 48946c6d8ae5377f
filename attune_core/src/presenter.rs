// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Instruction visibility.
//!
//! The surrounding UI shows one block of instructional text per phase plus a
//! result block and a back link once the session completes. [`Instructions`]
//! derives which of those are visible from a [`Snapshot`]; an
//! [`InstructionPresenter`] applies it.

use crate::error::SensorUnavailable;
use crate::phase::Phase;
use crate::session::Snapshot;

/// One instructional UI block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InstructionBlock {
    /// "Find some light."
    Light,
    /// "Face north."
    Direction,
    /// "Stand the device upright."
    Angle,
    /// Completion time.
    Result,
    /// Link back to the start page.
    BackLink,
}

impl InstructionBlock {
    /// All blocks in page order.
    pub const ALL: [Self; 5] = [
        Self::Light,
        Self::Direction,
        Self::Angle,
        Self::Result,
        Self::BackLink,
    ];

    /// Element id used by the page.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Direction => "direction",
            Self::Angle => "angle",
            Self::Result => "result",
            Self::BackLink => "back-link",
        }
    }
}

/// Which instruction blocks are visible, and why the session is stuck if it is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Instructions {
    /// Light instructions (light phase).
    pub light: bool,
    /// Direction instructions (rotation phase).
    pub direction: bool,
    /// Angle instructions (tilt phase, not yet complete).
    pub angle: bool,
    /// Completion result.
    pub result: bool,
    /// Back link (complete).
    pub back_link: bool,
    /// Sensor block affecting the current phase.
    pub blocked: Option<SensorUnavailable>,
}

impl Instructions {
    /// Derives visibility from the session snapshot.
    #[must_use]
    pub fn for_snapshot(snapshot: &Snapshot) -> Self {
        let complete = snapshot.is_complete();
        Self {
            light: snapshot.phase == Phase::Light,
            direction: snapshot.phase == Phase::Rotation,
            angle: snapshot.phase == Phase::Tilt && !complete,
            result: complete,
            back_link: complete,
            blocked: snapshot.blocked,
        }
    }

    /// Whether `block` is visible.
    #[must_use]
    pub const fn is_visible(&self, block: InstructionBlock) -> bool {
        match block {
            InstructionBlock::Light => self.light,
            InstructionBlock::Direction => self.direction,
            InstructionBlock::Angle => self.angle,
            InstructionBlock::Result => self.result,
            InstructionBlock::BackLink => self.back_link,
        }
    }
}

/// Receives instruction changes.
///
/// The session driver calls [`present`](Self::present) when the phase,
/// completion, or blocked status changes, and once on the first tick.
pub trait InstructionPresenter {
    /// Shows the given instructions.
    fn present(&mut self, instructions: &Instructions);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Timestamp;

    fn snapshot(phase: Phase, complete: bool) -> Snapshot {
        Snapshot {
            phase,
            completed_at: complete.then(Timestamp::default),
            ..Snapshot::default()
        }
    }

    fn visible(i: &Instructions) -> alloc::vec::Vec<&'static str> {
        InstructionBlock::ALL
            .into_iter()
            .filter(|b| i.is_visible(*b))
            .map(InstructionBlock::id)
            .collect()
    }

    #[test]
    fn exactly_one_phase_block_before_completion() {
        for (phase, id) in [
            (Phase::Light, "light"),
            (Phase::Rotation, "direction"),
            (Phase::Tilt, "angle"),
        ] {
            let i = Instructions::for_snapshot(&snapshot(phase, false));
            assert_eq!(visible(&i), [id], "{phase}");
        }
    }

    #[test]
    fn completion_shows_result_and_back_link() {
        let i = Instructions::for_snapshot(&snapshot(Phase::Done, true));
        assert_eq!(visible(&i), ["result", "back-link"]);
    }

    #[test]
    fn blocked_is_carried() {
        let mut s = snapshot(Phase::Light, false);
        s.blocked = Some(SensorUnavailable::no_camera());
        let i = Instructions::for_snapshot(&s);
        assert_eq!(i.blocked, Some(SensorUnavailable::no_camera()));
        assert!(i.light, "instructions stay visible while blocked");
    }
}
