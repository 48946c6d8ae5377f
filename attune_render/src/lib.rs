// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ring render plans for attune sessions.
//!
//! This crate sits between [`attune_core`]'s session snapshot and a
//! platform's drawing API. It defines:
//!
//! - [`RingRenderer`]: a pure mapping from a snapshot to draw commands
//! - [`RenderItem`]: a single ellipse or text command
//! - [`RenderPlan`]: an ordered list of draw commands for one frame
//! - [`DisplaySurface`]: what a backend implements to receive a plan
//!
//! Rendering never touches session state, so a plan can be rebuilt at any
//! frequency.

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod plan;
mod rings;

pub use plan::{DisplaySurface, Gray, RenderItem, RenderPlan};
pub use rings::RingRenderer;
