// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render loop on `requestAnimationFrame`.
//!
//! [`RafLoop`] hands the session a [`RafTick`] once per browser frame. The
//! callback returns [`ControlFlow`]: a finished session breaks out and the
//! loop stops re-arming, leaving the last drawn frame on the canvas.
//!
//! Frame timestamps are [`DOMHighResTimeStamp`][mdn] milliseconds, stored as
//! microsecond [`HostTime`] ticks.
//!
//! [mdn]: https://developer.mozilla.org/en-US/docs/Web/API/DOMHighResTimeStamp

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::ops::ControlFlow;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use attune_core::time::HostTime;

use crate::host_time_from_ms;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    pub(crate) fn performance_now() -> f64;

    #[wasm_bindgen(js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> i32;

    #[wasm_bindgen(js_name = "cancelAnimationFrame")]
    fn cancel_animation_frame(id: i32);
}

/// One animation frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RafTick {
    /// Frame time from the browser.
    pub now: HostTime,
    /// Frames delivered since the loop was created.
    pub frame_index: u64,
}

/// Frame bookkeeping for one loop, free of any JS handle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Pacer {
    running: bool,
    frames: u64,
    /// Request id of the frame we are waiting on.
    pending: Option<i32>,
}

impl Pacer {
    /// Turns a browser callback into a tick, or `None` once stopped.
    fn begin_frame(&mut self, timestamp_ms: f64) -> Option<RafTick> {
        self.pending = None;
        if !self.running {
            return None;
        }
        let tick = RafTick {
            now: host_time_from_ms(timestamp_ms),
            frame_index: self.frames,
        };
        self.frames += 1;
        Some(tick)
    }

    /// Applies the callback's verdict; returns whether to request another
    /// frame.
    fn end_frame(&mut self, flow: ControlFlow<()>) -> bool {
        if flow.is_break() {
            self.running = false;
        }
        self.running
    }

    /// Marks the loop stopped and yields the request to cancel, if any.
    fn halt(&mut self) -> Option<i32> {
        self.running = false;
        self.pending.take()
    }
}

type FrameCallback = Box<dyn FnMut(RafTick) -> ControlFlow<()>>;

struct Shared {
    pacer: RefCell<Pacer>,
    callback: RefCell<FrameCallback>,
    /// Built on first start; holds an `Rc` to this struct until dropped.
    closure: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl Shared {
    fn arm(&self) {
        if let Some(closure) = &*self.closure.borrow() {
            let id = request_animation_frame(closure.as_ref().unchecked_ref());
            self.pacer.borrow_mut().pending = Some(id);
        }
    }

    fn on_frame(&self, timestamp_ms: f64) {
        let Some(tick) = self.pacer.borrow_mut().begin_frame(timestamp_ms) else {
            return;
        };
        let flow = (self.callback.borrow_mut())(tick);
        if self.pacer.borrow_mut().end_frame(flow) {
            self.arm();
        }
    }
}

/// A render loop that runs until stopped, dropped, or told to break.
pub struct RafLoop {
    shared: Rc<Shared>,
}

impl RafLoop {
    /// Creates a stopped loop around `callback`.
    pub fn new(callback: impl FnMut(RafTick) -> ControlFlow<()> + 'static) -> Self {
        Self {
            shared: Rc::new(Shared {
                pacer: RefCell::new(Pacer::default()),
                callback: RefCell::new(Box::new(callback)),
                closure: RefCell::new(None),
            }),
        }
    }

    /// Requests the first frame. Does nothing while already running.
    pub fn start(&self) {
        {
            let mut pacer = self.shared.pacer.borrow_mut();
            if pacer.running {
                return;
            }
            pacer.running = true;
        }
        if self.shared.closure.borrow().is_none() {
            let shared = Rc::clone(&self.shared);
            let closure = Closure::wrap(
                Box::new(move |ms: f64| shared.on_frame(ms)) as Box<dyn FnMut(f64)>
            );
            *self.shared.closure.borrow_mut() = Some(closure);
        }
        self.shared.arm();
    }

    /// Stops the loop and cancels the pending frame.
    pub fn stop(&self) {
        if let Some(id) = self.shared.pacer.borrow_mut().halt() {
            cancel_animation_frame(id);
        }
    }

    /// Whether frames are still being requested.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shared.pacer.borrow().running
    }
}

impl Drop for RafLoop {
    fn drop(&mut self) {
        self.stop();
        self.shared.closure.borrow_mut().take();
    }
}

impl core::fmt::Debug for RafLoop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let pacer = *self.shared.pacer.borrow();
        f.debug_struct("RafLoop")
            .field("running", &pacer.running)
            .field("frames", &pacer.frames)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running() -> Pacer {
        Pacer {
            running: true,
            ..Pacer::default()
        }
    }

    #[test]
    fn frames_are_numbered_from_zero() {
        let mut p = running();
        let first = p.begin_frame(16.0).unwrap();
        let second = p.begin_frame(32.5).unwrap();
        assert_eq!(first.frame_index, 0, "first frame");
        assert_eq!(second.frame_index, 1, "second frame");
        assert_eq!(second.now, HostTime(32_500), "ms become µs");
    }

    #[test]
    fn break_stops_rearming() {
        let mut p = running();
        assert!(p.end_frame(ControlFlow::Continue(())), "keeps going");
        assert!(!p.end_frame(ControlFlow::Break(())), "session finished");
        assert_eq!(p.begin_frame(50.0), None, "no tick after a break");
    }

    #[test]
    fn halt_hands_back_the_pending_request() {
        let mut p = running();
        p.pending = Some(7);
        assert_eq!(p.halt(), Some(7), "cancel the queued frame");
        assert_eq!(p.halt(), None, "nothing left to cancel");
        assert!(!p.running, "stopped");
    }
}
