// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Orientation sample queue.
//!
//! Orientation events arrive whenever the platform fires them, which may be
//! many times between two render ticks. The event handler pushes into a
//! [`SampleQueue`]; the [`SessionDriver`](crate::driver::SessionDriver)
//! drains it in delivery order on each tick.

use alloc::collections::VecDeque;

use crate::sample::{OrientationReading, OrientationSample};
use crate::time::Timestamp;

/// Bounded FIFO queue with a drop-oldest overflow policy.
///
/// Once full, a push removes the oldest item before inserting the newest.
#[derive(Debug, Clone)]
pub struct BoundedQueue<T> {
    items: VecDeque<T>,
    capacity: usize,
    dropped_count: u64,
}

impl<T> BoundedQueue<T> {
    /// Creates an empty queue. A zero capacity is promoted to one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
            dropped_count: 0,
        }
    }

    /// Appends `item`, evicting the oldest entry when full.
    pub fn push(&mut self, item: T) {
        if self.items.len() == self.capacity {
            let _ = self.items.pop_front();
            self.dropped_count += 1;
        }
        self.items.push_back(item);
    }

    /// Removes the oldest entry.
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    /// Number of queued entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maximum number of entries held at once.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total entries evicted by overflow since creation.
    #[must_use]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count
    }
}

/// An orientation sample together with the time it was delivered.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimedSample {
    /// The resolved sample.
    pub sample: OrientationSample,
    /// Delivery time.
    pub at: Timestamp,
}

/// Queue of orientation samples awaiting the next tick.
pub type SampleQueue = BoundedQueue<TimedSample>;

impl SampleQueue {
    /// Resolves a raw platform reading and enqueues it.
    ///
    /// Readings with neither a heading nor a tilt carry nothing for the
    /// session and are not queued. Returns whether the reading was queued.
    pub fn on_orientation_sample(&mut self, reading: &OrientationReading, at: Timestamp) -> bool {
        let sample = reading.resolve();
        if sample.heading.is_none() && sample.beta.is_none() {
            return false;
        }
        self.push(TimedSample { sample, at });
        true
    }
}
