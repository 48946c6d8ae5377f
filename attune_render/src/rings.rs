// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ring grid rendering.
//!
//! The instrument draws a boundary circle and two sets of concentric
//! ellipses on a square canvas: one set varies in width at full height, the
//! other varies in height at full width. How they look depends only on the
//! session [`Snapshot`]:
//!
//! | Phase | Stroke | Rotation | Collapse |
//! |---|---|---|---|
//! | light | grey from the light level | none | none |
//! | rotation | white | display angle | none |
//! | tilt, done | white | display angle (frozen) | `tilt / 90` |
//!
//! Once the session is complete the completion time is drawn centered on top.

use alloc::string::ToString as _;

use attune_core::phase::Phase;
use attune_core::session::Snapshot;
use kurbo::{Affine, Point, Rect, Size, Vec2};

use crate::plan::{Gray, RenderItem, RenderPlan};

/// Which axis of a ring varies across its set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Axis {
    Width,
    Height,
}

/// Maps a session snapshot to a [`RenderPlan`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingRenderer {
    /// Square canvas side.
    pub canvas: f64,
    /// Diameter of the boundary circle.
    pub boundary: f64,
    /// Largest ring extent; also the fixed extent along a ring's other axis.
    pub ring_extent: f64,
    /// Smallest ring extent.
    pub min_extent: f64,
    /// Extent step between neighbouring rings.
    pub step: f64,
    /// Tilt at which the rings are fully collapsed.
    pub full_tilt: f64,
    /// Light level at which the stroke starts brightening.
    pub light_floor: f64,
    /// Light level at which the stroke reaches white.
    pub light_ceiling: f64,
    /// Completion text size.
    pub text_size: f64,
}

impl RingRenderer {
    /// The 360-unit instrument.
    pub const DEFAULT: Self = Self {
        canvas: 360.0,
        boundary: 360.0,
        ring_extent: 345.0,
        min_extent: 15.0,
        step: 30.0,
        full_tilt: 90.0,
        light_floor: 30.0,
        light_ceiling: 50.0,
        text_size: 24.0,
    };

    /// Ring extents from largest to smallest.
    pub fn ring_extents(&self) -> impl Iterator<Item = f64> + use<> {
        let (min, step) = (self.min_extent, self.step.max(1.0));
        core::iter::successors(Some(self.ring_extent), move |e| Some(e - step))
            .take_while(move |e| *e >= min)
    }

    /// Number of rings in each set.
    #[must_use]
    pub fn rings_per_axis(&self) -> usize {
        self.ring_extents().count()
    }

    /// Stroke colour during the light phase.
    #[must_use]
    pub fn light_stroke(&self, level: f64) -> Gray {
        let span = self.light_ceiling - self.light_floor;
        let t = if span > 0.0 {
            (level - self.light_floor) / span
        } else if level >= self.light_ceiling {
            1.0
        } else {
            0.0
        };
        Gray::lerp(Gray::BLACK, Gray::WHITE, t)
    }

    /// Collapse factor for a tilt in degrees, `0` upright rings to `1` flat.
    #[must_use]
    pub fn collapse(&self, tilt: f64) -> f64 {
        if self.full_tilt <= 0.0 {
            return 1.0;
        }
        (tilt / self.full_tilt).clamp(0.0, 1.0)
    }

    fn center(&self) -> Affine {
        Affine::translate(Vec2::new(self.canvas / 2.0, self.canvas / 2.0))
    }

    fn centered(extent_x: f64, extent_y: f64) -> Rect {
        Rect::from_center_size(Point::ORIGIN, Size::new(extent_x, extent_y))
    }

    /// Builds a fresh plan for `snapshot`.
    #[must_use]
    pub fn plan(&self, snapshot: &Snapshot) -> RenderPlan {
        let mut plan = RenderPlan::new(Size::new(self.canvas, self.canvas));
        self.render(snapshot, &mut plan);
        plan
    }

    /// Replaces the contents of `plan` with the frame for `snapshot`.
    pub fn render(&self, snapshot: &Snapshot, plan: &mut RenderPlan) {
        plan.clear();
        plan.size = Size::new(self.canvas, self.canvas);
        plan.background = Gray::BLACK;

        let center = self.center();
        plan.items.push(RenderItem::Ellipse {
            frame: Self::centered(self.boundary, self.boundary),
            transform: center,
            stroke: Gray::WHITE,
        });

        let (stroke, angle, t) = match snapshot.phase {
            Phase::Light => (self.light_stroke(snapshot.light_level), 0.0, 0.0),
            Phase::Rotation => (Gray::WHITE, snapshot.display_angle, 0.0),
            Phase::Tilt | Phase::Done => (
                Gray::WHITE,
                snapshot.display_angle,
                self.collapse(snapshot.tilt),
            ),
        };
        let transform = center * Affine::rotate(angle);
        for axis in [Axis::Width, Axis::Height] {
            for extent in self.ring_extents() {
                let e = extent + (self.ring_extent - extent) * t;
                let frame = match axis {
                    Axis::Width => Self::centered(e, self.ring_extent),
                    Axis::Height => Self::centered(self.ring_extent, e),
                };
                plan.items.push(RenderItem::Ellipse {
                    frame,
                    transform,
                    stroke,
                });
            }
        }

        if let Some(done) = snapshot.completed_at {
            plan.items.push(RenderItem::Text {
                content: done.clock.to_string(),
                position: Point::ORIGIN,
                size: self.text_size,
                transform: center,
                fill: Gray::WHITE,
            });
        }
    }
}

impl Default for RingRenderer {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use attune_core::time::{ClockTime, HostTime, Timestamp};

    fn snapshot(phase: Phase) -> Snapshot {
        Snapshot {
            phase,
            ..Snapshot::default()
        }
    }

    fn ring_frames(plan: &RenderPlan) -> Vec<Rect> {
        plan.items
            .iter()
            .skip(1)
            .filter_map(|i| match i {
                RenderItem::Ellipse { frame, .. } => Some(*frame),
                RenderItem::Text { .. } => None,
            })
            .collect()
    }

    #[test]
    fn twelve_rings_per_axis_plus_boundary() {
        let r = RingRenderer::DEFAULT;
        let extents: Vec<f64> = r.ring_extents().collect();
        assert_eq!(extents.len(), 12);
        assert_eq!(extents.first(), Some(&345.0));
        assert_eq!(extents.last(), Some(&15.0));

        let plan = r.plan(&snapshot(Phase::Light));
        assert_eq!(plan.ellipse_count(), 25);
        assert_eq!(plan.text(), None);
    }

    #[test]
    fn boundary_is_first_white_and_unrotated() {
        let r = RingRenderer::DEFAULT;
        let mut s = snapshot(Phase::Rotation);
        s.display_angle = 1.0;
        let plan = r.plan(&s);
        let RenderItem::Ellipse {
            frame,
            transform,
            stroke,
        } = &plan.items[0]
        else {
            panic!("boundary must be an ellipse");
        };
        assert_eq!(frame.size(), Size::new(360.0, 360.0));
        assert_eq!(*transform, Affine::translate((180.0, 180.0)));
        assert_eq!(*stroke, Gray::WHITE);
    }

    #[test]
    fn rendering_is_idempotent() {
        let r = RingRenderer::DEFAULT;
        let s = Snapshot {
            phase: Phase::Tilt,
            display_angle: 0.0,
            tilt: 33.0,
            ..Snapshot::default()
        };
        assert_eq!(r.plan(&s), r.plan(&s));

        let mut reused = r.plan(&snapshot(Phase::Light));
        r.render(&s, &mut reused);
        assert_eq!(reused, r.plan(&s), "render replaces previous contents");
    }

    #[test]
    fn light_stroke_ramps_between_30_and_50() {
        let r = RingRenderer::DEFAULT;
        assert_eq!(r.light_stroke(0.0), Gray::BLACK);
        assert_eq!(r.light_stroke(30.0), Gray::BLACK);
        assert_eq!(r.light_stroke(40.0).level(), 0.5);
        assert_eq!(r.light_stroke(50.0), Gray::WHITE);
        assert_eq!(r.light_stroke(90.0), Gray::WHITE);

        let mut s = snapshot(Phase::Light);
        s.light_level = 40.0;
        let plan = r.plan(&s);
        let RenderItem::Ellipse { stroke, .. } = plan.items[1] else {
            panic!("ring must be an ellipse");
        };
        assert_eq!(stroke.level(), 0.5);
    }

    #[test]
    fn rotation_rotates_rings_about_center() {
        let r = RingRenderer::DEFAULT;
        let mut s = snapshot(Phase::Rotation);
        s.display_angle = -0.5;
        let plan = r.plan(&s);
        let expected = Affine::translate((180.0, 180.0)) * Affine::rotate(-0.5);
        for item in &plan.items[1..] {
            let RenderItem::Ellipse { transform, .. } = item else {
                panic!("rings only");
            };
            assert_eq!(*transform, expected);
        }
    }

    #[test]
    fn tilt_collapses_rings_toward_full_extent() {
        let r = RingRenderer::DEFAULT;
        let mut s = snapshot(Phase::Tilt);

        s.tilt = 0.0;
        let frames = ring_frames(&r.plan(&s));
        assert_eq!(frames[11].size(), Size::new(15.0, 345.0), "narrowest width ring");
        assert_eq!(frames[23].size(), Size::new(345.0, 15.0), "narrowest height ring");

        s.tilt = 45.0;
        let frames = ring_frames(&r.plan(&s));
        assert_eq!(frames[11].width(), 180.0);
        assert_eq!(frames[23].height(), 180.0);

        s.tilt = 90.0;
        let frames = ring_frames(&r.plan(&s));
        assert!(
            frames.iter().all(|f| f.size() == Size::new(345.0, 345.0)),
            "fully tilted rings are all full size"
        );
    }

    #[test]
    fn completion_text_only_once_completed() {
        let r = RingRenderer::DEFAULT;
        let mut s = snapshot(Phase::Tilt);
        s.tilt = 90.0;
        assert_eq!(r.plan(&s).text(), None);

        s.phase = Phase::Done;
        s.completed_at = Some(Timestamp::new(
            HostTime(5),
            ClockTime::new(7, 4, 9).unwrap(),
        ));
        let plan = r.plan(&s);
        assert_eq!(plan.text(), Some("07:04:09"));
        let Some(RenderItem::Text { size, transform, .. }) = plan.items.last() else {
            panic!("text is drawn last");
        };
        assert_eq!(*size, 24.0);
        assert_eq!(*transform, Affine::translate((180.0, 180.0)));
        assert_eq!(plan.ellipse_count(), 25, "rings stay visible");
    }
}
