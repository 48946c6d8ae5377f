// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Device orientation events and the permission prompt.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;

use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{DeviceOrientationEvent, Window};

use attune_core::permission::Permission;
use attune_core::queue::SampleQueue;
use attune_core::sample::OrientationReading;

#[wasm_bindgen]
extern "C" {
    /// `DeviceOrientationEvent` as WebKit extends it.
    type CompassOrientationEvent;

    #[wasm_bindgen(method, getter, js_name = "webkitCompassHeading")]
    fn webkit_compass_heading(this: &CompassOrientationEvent) -> Option<f64>;
}

const EVENT: &str = "deviceorientation";

type OrientationClosure = Closure<dyn FnMut(DeviceOrientationEvent)>;

/// Pushes every `deviceorientation` event into a shared [`SampleQueue`].
///
/// The listener is removed when this value is dropped.
pub struct OrientationListener {
    window: Window,
    closure: OrientationClosure,
}

impl core::fmt::Debug for OrientationListener {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OrientationListener").finish_non_exhaustive()
    }
}

impl OrientationListener {
    /// Registers the listener on `window`.
    pub fn attach(window: &Window, queue: Rc<RefCell<SampleQueue>>) -> Result<Self, JsValue> {
        let closure = Closure::wrap(Box::new(move |event: DeviceOrientationEvent| {
            let reading = reading_from_event(&event);
            queue
                .borrow_mut()
                .on_orientation_sample(&reading, crate::timestamp());
        }) as Box<dyn FnMut(DeviceOrientationEvent)>);
        window.add_event_listener_with_callback(EVENT, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            window: window.clone(),
            closure,
        })
    }
}

impl Drop for OrientationListener {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback(EVENT, self.closure.as_ref().unchecked_ref());
    }
}

fn reading_from_event(event: &DeviceOrientationEvent) -> OrientationReading {
    let compass: &CompassOrientationEvent = event.unchecked_ref();
    OrientationReading {
        compass_heading: compass.webkit_compass_heading(),
        alpha: event.alpha(),
        absolute: event.absolute(),
        beta: event.beta(),
    }
}

/// Requests orientation access and reports the outcome to `on_result`.
///
/// Browsers without `DeviceOrientationEvent.requestPermission` report
/// [`Permission::NotRequired`] synchronously. Where the prompt exists it must
/// be called from a user gesture.
pub fn request_permission(on_result: impl FnOnce(Permission) + 'static) {
    let global = js_sys::global();
    let request = js_sys::Reflect::get(&global, &JsValue::from_str("DeviceOrientationEvent"))
        .ok()
        .filter(|ctor| !ctor.is_undefined())
        .and_then(|ctor| {
            let f = js_sys::Reflect::get(&ctor, &JsValue::from_str("requestPermission")).ok()?;
            Some((ctor, f.dyn_into::<js_sys::Function>().ok()?))
        });
    let Some((ctor, request)) = request else {
        on_result(Permission::NotRequired);
        return;
    };
    let promise = match request.call0(&ctor) {
        Ok(p) => match p.dyn_into::<js_sys::Promise>() {
            Ok(p) => p,
            Err(_) => {
                on_result(Permission::Denied);
                return;
            }
        },
        Err(_) => {
            on_result(Permission::Denied);
            return;
        }
    };

    let slot: Rc<RefCell<Option<Box<dyn FnOnce(Permission)>>>> =
        Rc::new(RefCell::new(Some(Box::new(on_result))));
    let granted_slot = Rc::clone(&slot);
    let on_granted: Closure<dyn FnMut(JsValue)> = Closure::once(move |value: JsValue| {
        let permission = value
            .as_string()
            .map_or(Permission::Denied, |s| Permission::from_response(&s));
        if let Some(cb) = granted_slot.borrow_mut().take() {
            cb(permission);
        }
    });
    let on_error: Closure<dyn FnMut(JsValue)> = Closure::once(move |_: JsValue| {
        if let Some(cb) = slot.borrow_mut().take() {
            cb(Permission::Denied);
        }
    });
    let _ = promise.then2(&on_granted, &on_error);
    on_granted.forget();
    on_error.forget();
}
