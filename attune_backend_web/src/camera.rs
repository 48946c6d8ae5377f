// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Camera frames from `getUserMedia`.
//!
//! The stream plays into an off-DOM `<video>`. Each call to
//! [`current_frame`](CameraFeed::current_frame) draws the current video frame
//! into a canvas the size of the sampling grid and reads the pixels back, so
//! the scaling is done by the browser.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::Cell;

use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, DomException, HtmlCanvasElement, HtmlVideoElement,
    MediaStream, MediaStreamConstraints, Navigator,
};

use attune_core::error::UnavailableCause;
use attune_core::sampler::{CameraFeed, Frame, FrameError};

/// `HTMLMediaElement.HAVE_CURRENT_DATA`.
const HAVE_CURRENT_DATA: u16 = 2;

/// Where the camera stream is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraStatus {
    /// [`VideoCamera::start`] has not been called.
    Idle,
    /// Waiting for the user or the device.
    Starting,
    /// The stream is attached to the video element.
    Live,
    /// The stream could not be opened.
    Failed(UnavailableCause),
}

/// Maps a `getUserMedia` rejection name to a cause.
#[must_use]
pub fn cause_for_error_name(name: &str) -> UnavailableCause {
    match name {
        "NotAllowedError" | "SecurityError" => UnavailableCause::PermissionDenied,
        "NotSupportedError" | "TypeError" => UnavailableCause::Unsupported,
        _ => UnavailableCause::NoDevice,
    }
}

/// Video constraint `{ facingMode: { exact: "environment" } }`.
///
/// Only the rear camera qualifies. A device without one rejects with
/// `OverconstrainedError`, which blocks the camera.
fn rear_camera() -> Result<JsValue, JsValue> {
    let facing = js_sys::Object::new();
    js_sys::Reflect::set(&facing, &"exact".into(), &"environment".into())?;
    let video = js_sys::Object::new();
    js_sys::Reflect::set(&video, &"facingMode".into(), &facing)?;
    Ok(video.into())
}

/// A [`CameraFeed`] backed by a `<video>` element and a sampling canvas.
pub struct VideoCamera {
    video: HtmlVideoElement,
    context: CanvasRenderingContext2d,
    width: u32,
    height: u32,
    status: Rc<Cell<CameraStatus>>,
    pixels: Vec<u8>,
}

impl core::fmt::Debug for VideoCamera {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VideoCamera")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("status", &self.status.get())
            .finish_non_exhaustive()
    }
}

impl VideoCamera {
    /// Creates the video element and a `width × height` sampling canvas.
    pub fn new(document: &Document, width: u32, height: u32) -> Result<Self, JsValue> {
        let video: HtmlVideoElement = document.create_element("video")?.unchecked_into();
        video.set_autoplay(true);
        video.set_muted(true);
        video.set_attribute("playsinline", "")?;

        let canvas: HtmlCanvasElement = document.create_element("canvas")?.unchecked_into();
        canvas.set_width(width);
        canvas.set_height(height);
        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d canvas context unavailable"))?
            .unchecked_into();

        Ok(Self {
            video,
            context,
            width,
            height,
            status: Rc::new(Cell::new(CameraStatus::Idle)),
            pixels: Vec::new(),
        })
    }

    /// Current stream status.
    #[must_use]
    pub fn status(&self) -> CameraStatus {
        self.status.get()
    }

    /// Asks for the camera and attaches the stream when it arrives.
    pub fn start(&self, navigator: &Navigator) {
        if self.status.get() != CameraStatus::Idle {
            return;
        }
        let Ok(devices) = navigator.media_devices() else {
            self.status
                .set(CameraStatus::Failed(UnavailableCause::Unsupported));
            return;
        };
        let Ok(video_constraint) = rear_camera() else {
            self.status
                .set(CameraStatus::Failed(UnavailableCause::Unsupported));
            return;
        };
        let constraints = MediaStreamConstraints::new();
        constraints.set_video(&video_constraint);
        constraints.set_audio(&JsValue::FALSE);
        let promise = match devices.get_user_media_with_constraints(&constraints) {
            Ok(p) => p,
            Err(_) => {
                self.status
                    .set(CameraStatus::Failed(UnavailableCause::Unsupported));
                return;
            }
        };
        self.status.set(CameraStatus::Starting);

        let status = Rc::clone(&self.status);
        let video = self.video.clone();
        let on_stream: Closure<dyn FnMut(JsValue)> = Closure::once(move |stream: JsValue| {
            let stream: MediaStream = stream.unchecked_into();
            video.set_src_object(Some(&stream));
            let _ = video.play();
            status.set(CameraStatus::Live);
        });
        let status = Rc::clone(&self.status);
        let on_error: Closure<dyn FnMut(JsValue)> = Closure::once(move |err: JsValue| {
            let cause = err
                .dyn_ref::<DomException>()
                .map_or(UnavailableCause::NoDevice, |e| {
                    cause_for_error_name(&e.name())
                });
            status.set(CameraStatus::Failed(cause));
        });
        let _ = promise.then2(&on_stream, &on_error);
        // Each runs at most once; the promise owns them from here.
        on_stream.forget();
        on_error.forget();
    }
}

impl CameraFeed for VideoCamera {
    fn current_frame(&mut self) -> Result<Frame<'_>, FrameError> {
        match self.status.get() {
            CameraStatus::Idle => return Err(FrameError::Unavailable(UnavailableCause::NoDevice)),
            CameraStatus::Starting => return Err(FrameError::Warming),
            CameraStatus::Failed(cause) => return Err(FrameError::Unavailable(cause)),
            CameraStatus::Live => {}
        }
        if self.video.ready_state() < HAVE_CURRENT_DATA {
            return Err(FrameError::Warming);
        }

        let (w, h) = (f64::from(self.width), f64::from(self.height));
        self.context
            .draw_image_with_html_video_element_and_dw_and_dh(&self.video, 0.0, 0.0, w, h)
            .map_err(|_| FrameError::Unavailable(UnavailableCause::NoDevice))?;
        let image = self
            .context
            .get_image_data(0.0, 0.0, w, h)
            .map_err(|_| FrameError::Unavailable(UnavailableCause::NoDevice))?;
        self.pixels = image.data().0;
        Frame::new(self.width, self.height, &self.pixels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_names_map_to_causes() {
        assert_eq!(
            cause_for_error_name("NotAllowedError"),
            UnavailableCause::PermissionDenied
        );
        assert_eq!(
            cause_for_error_name("NotFoundError"),
            UnavailableCause::NoDevice
        );
        assert_eq!(
            cause_for_error_name("NotSupportedError"),
            UnavailableCause::Unsupported
        );
    }

    #[test]
    fn missing_rear_camera_is_no_device() {
        assert_eq!(
            cause_for_error_name("OverconstrainedError"),
            UnavailableCause::NoDevice,
            "the environment-facing constraint cannot be met"
        );
    }
}
