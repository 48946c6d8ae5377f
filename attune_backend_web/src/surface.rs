// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canvas 2D drawing surface.

use alloc::format;
use alloc::string::String;
use core::f64::consts::TAU;

use kurbo::{Affine, Point, Rect};
use wasm_bindgen::JsCast as _;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use attune_render::{DisplaySurface, Gray};

/// CSS colour for a grey level.
#[must_use]
pub fn css_gray(gray: Gray) -> String {
    let v = gray.to_u8();
    format!("rgb({v}, {v}, {v})")
}

/// Draws render plans onto an `HtmlCanvasElement`.
pub struct CanvasSurface {
    context: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl core::fmt::Debug for CanvasSurface {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CanvasSurface")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl CanvasSurface {
    /// Wraps the 2D context of `canvas`.
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d canvas context unavailable"))?
            .unchecked_into();
        Ok(Self {
            context,
            width: f64::from(canvas.width()),
            height: f64::from(canvas.height()),
        })
    }

    fn set_transform(&self, transform: Affine) {
        let [a, b, c, d, e, f] = transform.as_coeffs();
        let _ = self.context.set_transform(a, b, c, d, e, f);
    }
}

impl DisplaySurface for CanvasSurface {
    fn clear(&mut self, background: Gray) {
        self.set_transform(Affine::IDENTITY);
        self.context.set_fill_style_str(&css_gray(background));
        self.context.fill_rect(0.0, 0.0, self.width, self.height);
    }

    fn stroke_ellipse(&mut self, transform: Affine, frame: Rect, stroke: Gray) {
        self.set_transform(transform);
        let center = frame.center();
        self.context.begin_path();
        let _ = self.context.ellipse(
            center.x,
            center.y,
            frame.width() / 2.0,
            frame.height() / 2.0,
            0.0,
            0.0,
            TAU,
        );
        self.context.set_stroke_style_str(&css_gray(stroke));
        self.context.stroke();
    }

    fn fill_text(&mut self, transform: Affine, text: &str, position: Point, size: f64, fill: Gray) {
        self.set_transform(transform);
        self.context.set_font(&format!("{size}px sans-serif"));
        self.context.set_text_align("center");
        self.context.set_text_baseline("middle");
        self.context.set_fill_style_str(&css_gray(fill));
        let _ = self.context.fill_text(text, position.x, position.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_levels_become_css() {
        assert_eq!(css_gray(Gray::BLACK), "rgb(0, 0, 0)");
        assert_eq!(css_gray(Gray::WHITE), "rgb(255, 255, 255)");
        assert_eq!(css_gray(Gray::new(0.5)), "rgb(128, 128, 128)");
    }
}
