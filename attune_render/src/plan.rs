// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render plan: an ordered sequence of draw items for one frame.

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::{Affine, Ellipse, Point, Rect, Size};

/// A grey level from black (`0.0`) to white (`1.0`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gray(f64);

impl Gray {
    /// Black.
    pub const BLACK: Self = Self(0.0);
    /// White.
    pub const WHITE: Self = Self(1.0);

    /// Creates a grey level, clamped to `[0, 1]`. NaN becomes black.
    #[must_use]
    pub fn new(level: f64) -> Self {
        if level.is_nan() {
            return Self::BLACK;
        }
        Self(level.clamp(0.0, 1.0))
    }

    /// Linear interpolation from `a` to `b`; `t` is clamped to `[0, 1]`.
    #[must_use]
    pub fn lerp(a: Self, b: Self, t: f64) -> Self {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        Self(a.0 + (b.0 - a.0) * t)
    }

    /// The level in `[0, 1]`.
    #[must_use]
    pub const fn level(self) -> f64 {
        self.0
    }

    /// The level as an 8-bit channel value.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "level is clamped to [0, 1] so the product fits in u8"
    )]
    pub fn to_u8(self) -> u8 {
        (self.0 * 255.0 + 0.5) as u8
    }
}

/// A single draw command.
///
/// Geometry is expressed around the origin; `transform` places it on the
/// canvas.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderItem {
    /// An unfilled ellipse inscribed in `frame`.
    Ellipse {
        /// Bounding box, centered on the origin.
        frame: Rect,
        /// Local-to-canvas transform.
        transform: Affine,
        /// Stroke colour.
        stroke: Gray,
    },
    /// A line of text centered on `position`.
    Text {
        /// The string to draw.
        content: String,
        /// Anchor in local coordinates.
        position: Point,
        /// Font size in canvas units.
        size: f64,
        /// Local-to-canvas transform.
        transform: Affine,
        /// Fill colour.
        fill: Gray,
    },
}

impl RenderItem {
    /// The ellipse geometry, for ellipse items.
    #[must_use]
    pub fn ellipse(&self) -> Option<Ellipse> {
        match self {
            Self::Ellipse { frame, .. } => Some(Ellipse::from_rect(*frame)),
            Self::Text { .. } => None,
        }
    }
}

/// Accepts draw commands.
///
/// Implemented by platform backends (a 2D canvas on the web) and by test
/// recorders.
pub trait DisplaySurface {
    /// Clears the whole surface to `background`.
    fn clear(&mut self, background: Gray);

    /// Strokes the ellipse inscribed in `frame`, after applying `transform`.
    fn stroke_ellipse(&mut self, transform: Affine, frame: Rect, stroke: Gray);

    /// Fills `text` centered on `position`, after applying `transform`.
    fn fill_text(&mut self, transform: Affine, text: &str, position: Point, size: f64, fill: Gray);
}

/// An ordered list of draw commands for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderPlan {
    /// Canvas size.
    pub size: Size,
    /// Canvas background.
    pub background: Gray,
    /// Draw items in back-to-front order.
    pub items: Vec<RenderItem>,
}

impl RenderPlan {
    /// Creates an empty plan for a canvas of `size` on a black background.
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size,
            background: Gray::BLACK,
            items: Vec::new(),
        }
    }

    /// Clears the plan for reuse.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of ellipse items.
    #[must_use]
    pub fn ellipse_count(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i, RenderItem::Ellipse { .. }))
            .count()
    }

    /// The text item, if any.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.items.iter().find_map(|i| match i {
            RenderItem::Text { content, .. } => Some(content.as_str()),
            RenderItem::Ellipse { .. } => None,
        })
    }

    /// Replays the plan onto `surface`, clearing it first.
    pub fn draw_to(&self, surface: &mut dyn DisplaySurface) {
        surface.clear(self.background);
        for item in &self.items {
            match item {
                RenderItem::Ellipse {
                    frame,
                    transform,
                    stroke,
                } => surface.stroke_ellipse(*transform, *frame, *stroke),
                RenderItem::Text {
                    content,
                    position,
                    size,
                    transform,
                    fill,
                } => surface.fill_text(*transform, content, *position, *size, *fill),
            }
        }
    }
}
