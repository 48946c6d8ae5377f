// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A [`DisplaySurface`] that writes SVG markup.

use std::fmt::Write as _;

use attune_render::{DisplaySurface, Gray};
use kurbo::{Affine, Point, Rect};

/// Collects one frame as an SVG document.
#[derive(Debug)]
pub(crate) struct SvgSurface {
    size: f64,
    body: String,
}

impl SvgSurface {
    pub(crate) fn new(size: f64) -> Self {
        Self {
            size,
            body: String::new(),
        }
    }

    pub(crate) fn finish(self) -> String {
        format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{s}\" height=\"{s}\" viewBox=\"0 0 {s} {s}\">\n{}</svg>\n",
            self.body,
            s = self.size,
        )
    }
}

fn color(gray: Gray) -> String {
    let v = gray.to_u8();
    format!("rgb({v},{v},{v})")
}

fn matrix(transform: Affine) -> String {
    let [a, b, c, d, e, f] = transform.as_coeffs();
    format!("matrix({a} {b} {c} {d} {e} {f})")
}

impl DisplaySurface for SvgSurface {
    fn clear(&mut self, background: Gray) {
        self.body.clear();
        let _ = writeln!(
            self.body,
            "  <rect width=\"{s}\" height=\"{s}\" fill=\"{}\"/>",
            color(background),
            s = self.size,
        );
    }

    fn stroke_ellipse(&mut self, transform: Affine, frame: Rect, stroke: Gray) {
        let c = frame.center();
        let _ = writeln!(
            self.body,
            "  <ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" transform=\"{}\" fill=\"none\" stroke=\"{}\"/>",
            c.x,
            c.y,
            frame.width() / 2.0,
            frame.height() / 2.0,
            matrix(transform),
            color(stroke),
        );
    }

    fn fill_text(&mut self, transform: Affine, text: &str, position: Point, size: f64, fill: Gray) {
        let _ = writeln!(
            self.body,
            "  <text x=\"{}\" y=\"{}\" font-size=\"{size}\" text-anchor=\"middle\" dominant-baseline=\"middle\" transform=\"{}\" fill=\"{}\">{text}</text>",
            position.x,
            position.y,
            matrix(transform),
            color(fill),
        );
    }
}
