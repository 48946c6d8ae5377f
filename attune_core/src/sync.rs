// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A session shared between OS threads.
//!
//! When orientation events arrive on their own thread, both that thread and
//! the render loop write to the session. [`SharedSession`] serializes every
//! access behind one mutex guarding the phase and all three state records.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::SessionConfig;
use crate::session::{SessionState, Snapshot};

/// Cloneable handle to a mutex-guarded [`SessionState`].
#[derive(Clone, Debug, Default)]
pub struct SharedSession {
    inner: Arc<Mutex<SessionState>>,
}

impl SharedSession {
    /// Wraps a fresh session.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionState::new(config))),
        }
    }

    /// Locks the session.
    ///
    /// A poisoned lock is recovered: every mutation leaves the session in a
    /// consistent state before it can panic.
    pub fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with the session locked.
    pub fn with<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        f(&mut self.lock())
    }

    /// Locks just long enough to copy out a snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }
}
