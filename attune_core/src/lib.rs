// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Phase state machine for a guided light, heading and tilt session.
//!
//! `attune_core` fuses three asynchronous sensor streams (camera brightness,
//! compass heading, device tilt) into one forward-only progression
//! `Light → Rotation → Tilt → Done`. It is `no_std` compatible (with `alloc`)
//! and never reads a clock or a device itself: backends push samples in and
//! pass the current [`Timestamp`](time::Timestamp) on every call.
//!
//! # Architecture
//!
//! ```text
//!   orientation events          render loop (once per frame)
//!          │                              │
//!          ▼                              ▼
//!   SampleQueue::on_orientation_sample   SessionDriver::tick()
//!          │                              │
//!          └──────────► drain ◄───────────┤ CameraFeed ──► BrightnessSampler
//!                         │               │
//!                         ▼               ▼
//!                  SessionState::apply_orientation / apply_brightness
//!                         │
//!                         ▼
//!        Snapshot ──► Instructions ──► InstructionPresenter::present()
//!            │
//!            └──► (attune_render) RingRenderer
//! ```
//!
//! **[`session`]**: The state machine. Owns the phase, the per-phase
//! records, freeze latches, completion time, and per-sensor blocked records.
//!
//! **[`sampler`]**: Camera frames and grid brightness averaging.
//!
//! **[`sample`]**: Orientation readings, heading source selection, and
//! sample validation.
//!
//! **[`queue`]**: Bounded drop-oldest queue between the orientation event
//! handler and the render loop.
//!
//! **[`driver`]**: One processing step per render tick.
//!
//! **[`presenter`]**: Instruction visibility derived from a snapshot.
//!
//! **[`permission`]**: Orientation permission outcome and the block it raises.
//!
//! **[`config`]**: Thresholds, debounce, watchdog and queue sizing.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types,
//! with a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Adds [`sync::SharedSession`] for sessions
//!   written from more than one OS thread.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

pub mod config;
pub mod driver;
pub mod error;
pub mod permission;
pub mod phase;
pub mod presenter;
pub mod queue;
pub mod sample;
pub mod sampler;
pub mod session;
#[cfg(feature = "std")]
pub mod sync;
pub mod time;
pub mod trace;
