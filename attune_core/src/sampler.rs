// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Camera brightness sampling.
//!
//! A [`CameraFeed`] hands out the current RGBA frame. [`BrightnessSampler`]
//! reads a fixed grid of pixels from it, averages each pixel's red, green and
//! blue channels with equal weight, and returns the mean over the grid.
//!
//! A feed that cannot produce a frame is an error, never a black frame: the
//! caller must be able to tell a dark room from a dead camera.

use core::fmt;

use crate::error::{Sensor, SensorUnavailable, UnavailableCause};

/// Bytes per RGBA pixel.
const CHANNELS: usize = 4;

/// Why a frame could not be read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameError {
    /// The feed is starting and has not produced its first frame yet.
    Warming,
    /// The feed has no frame to give (not started, stopped, or denied).
    Unavailable(UnavailableCause),
    /// The frame has zero width or height.
    Empty,
    /// `width * height * 4` does not fit in memory.
    TooLarge {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
    },
    /// The pixel buffer is shorter than `width * height * 4`.
    Truncated {
        /// Bytes required by the declared dimensions.
        expected: usize,
        /// Bytes actually present.
        actual: usize,
    },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warming => f.write_str("camera is starting"),
            Self::Unavailable(cause) => write!(f, "no camera frame: {}", cause.as_str()),
            Self::Empty => f.write_str("camera frame has no pixels"),
            Self::TooLarge { width, height } => {
                write!(f, "camera frame too large: {width}x{height}")
            }
            Self::Truncated { expected, actual } => {
                write!(f, "camera frame truncated: {actual} of {expected} bytes")
            }
        }
    }
}

impl core::error::Error for FrameError {}

impl From<FrameError> for SensorUnavailable {
    fn from(e: FrameError) -> Self {
        let cause = match e {
            FrameError::Unavailable(cause) => cause,
            FrameError::Warming
            | FrameError::Empty
            | FrameError::TooLarge { .. }
            | FrameError::Truncated { .. } => UnavailableCause::NoDevice,
        };
        Self::new(Sensor::Camera, cause)
    }
}

/// A borrowed RGBA8 pixel buffer.
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    width: u32,
    height: u32,
    rgba: &'a [u8],
}

impl<'a> Frame<'a> {
    /// Wraps `rgba` as a `width × height` frame.
    ///
    /// Extra trailing bytes are ignored.
    pub fn new(width: u32, height: u32, rgba: &'a [u8]) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::Empty);
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(CHANNELS))
            .ok_or(FrameError::TooLarge { width, height })?;
        if rgba.len() < expected {
            return Err(FrameError::Truncated {
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    /// Frame width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Sum of the red, green and blue channels at `(x, y)`.
    fn rgb_sum_at(&self, x: u32, y: u32) -> u32 {
        let i = (y as usize * self.width as usize + x as usize) * CHANNELS;
        u32::from(self.rgba[i]) + u32::from(self.rgba[i + 1]) + u32::from(self.rgba[i + 2])
    }
}

/// Source of camera frames.
pub trait CameraFeed {
    /// Returns the most recent frame.
    fn current_frame(&mut self) -> Result<Frame<'_>, FrameError>;
}

/// Averages a fixed grid of pixels into one brightness value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BrightnessSampler {
    grid_width: u32,
    grid_height: u32,
}

impl BrightnessSampler {
    /// Creates a sampler reading a `width × height` grid.
    ///
    /// Zero dimensions are promoted to one.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            grid_width: width.max(1),
            grid_height: height.max(1),
        }
    }

    /// Grid dimensions `(width, height)`.
    #[must_use]
    pub const fn grid(&self) -> (u32, u32) {
        (self.grid_width, self.grid_height)
    }

    /// Mean luminance of `frame` over the sampling grid, in `[0, 255]`.
    ///
    /// Grid points are spread evenly across the frame, so a frame of exactly
    /// the grid size is read pixel for pixel and a larger one is subsampled.
    /// A frame smaller than the grid is read in full.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "grid coordinates are below the frame dimensions, which are u32"
    )]
    pub fn mean_luminance(&self, frame: &Frame<'_>) -> f64 {
        let gw = self.grid_width.min(frame.width);
        let gh = self.grid_height.min(frame.height);
        let mut channel_sum: u64 = 0;
        for gy in 0..gh {
            let y = (u64::from(gy) * u64::from(frame.height) / u64::from(gh)) as u32;
            for gx in 0..gw {
                let x = (u64::from(gx) * u64::from(frame.width) / u64::from(gw)) as u32;
                channel_sum += u64::from(frame.rgb_sum_at(x, y));
            }
        }
        let count = u64::from(gw) * u64::from(gh);
        channel_sum as f64 / (3 * count) as f64
    }

    /// Pulls the current frame from `feed` and returns its mean luminance.
    ///
    /// Returns `Ok(None)` while the feed is warming up: there is no sample
    /// yet, and no failure either.
    pub fn sample_brightness(
        &self,
        feed: &mut dyn CameraFeed,
    ) -> Result<Option<f64>, SensorUnavailable> {
        match feed.current_frame() {
            Ok(frame) => Ok(Some(self.mean_luminance(&frame))),
            Err(FrameError::Warming) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for BrightnessSampler {
    fn default() -> Self {
        Self::new(64, 48)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    struct StaticFeed {
        width: u32,
        height: u32,
        pixels: Option<Vec<u8>>,
        warming: bool,
    }

    impl CameraFeed for StaticFeed {
        fn current_frame(&mut self) -> Result<Frame<'_>, FrameError> {
            if self.warming {
                return Err(FrameError::Warming);
            }
            match &self.pixels {
                Some(p) => Frame::new(self.width, self.height, p),
                None => Err(FrameError::Unavailable(UnavailableCause::NoDevice)),
            }
        }
    }

    fn uniform(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
        let mut out = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            out.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]);
        }
        out
    }

    #[test]
    fn uniform_frame_mean_is_channel_average() {
        let pixels = uniform(64, 48, [30, 60, 90]);
        let frame = Frame::new(64, 48, &pixels).unwrap();
        let mean = BrightnessSampler::default().mean_luminance(&frame);
        assert!((mean - 60.0).abs() < 1e-9, "got {mean}");
    }

    #[test]
    fn alpha_channel_is_ignored() {
        let mut pixels = uniform(2, 2, [255, 255, 255]);
        for px in pixels.chunks_mut(4) {
            px[3] = 0;
        }
        let frame = Frame::new(2, 2, &pixels).unwrap();
        let mean = BrightnessSampler::new(2, 2).mean_luminance(&frame);
        assert!((mean - 255.0).abs() < 1e-9, "got {mean}");
    }

    #[test]
    fn half_white_half_black() {
        // 2×1: one white pixel, one black pixel.
        let pixels = vec![255, 255, 255, 255, 0, 0, 0, 255];
        let frame = Frame::new(2, 1, &pixels).unwrap();
        let mean = BrightnessSampler::new(2, 1).mean_luminance(&frame);
        assert!((mean - 127.5).abs() < 1e-9, "got {mean}");
    }

    #[test]
    fn larger_frame_is_subsampled() {
        // 4×2 frame, left half white, right half black; 2×1 grid hits x=0 and x=2.
        let mut pixels = Vec::new();
        for _ in 0..2 {
            pixels.extend_from_slice(&[255, 255, 255, 255, 255, 255, 255, 255]);
            pixels.extend_from_slice(&[0, 0, 0, 255, 0, 0, 0, 255]);
        }
        let frame = Frame::new(4, 2, &pixels).unwrap();
        let mean = BrightnessSampler::new(2, 1).mean_luminance(&frame);
        assert!((mean - 127.5).abs() < 1e-9, "got {mean}");
    }

    #[test]
    fn missing_feed_is_an_error_not_zero() {
        let mut feed = StaticFeed {
            width: 64,
            height: 48,
            pixels: None,
            warming: false,
        };
        let err = BrightnessSampler::default()
            .sample_brightness(&mut feed)
            .unwrap_err();
        assert_eq!(err, SensorUnavailable::no_camera());
    }

    #[test]
    fn truncated_and_empty_frames_are_rejected() {
        assert_eq!(
            Frame::new(2, 2, &[0; 15]).unwrap_err(),
            FrameError::Truncated {
                expected: 16,
                actual: 15
            }
        );
        assert_eq!(Frame::new(0, 2, &[]).unwrap_err(), FrameError::Empty);
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        assert_eq!(
            Frame::new(u32::MAX, u32::MAX, &[0; 16]).unwrap_err(),
            FrameError::TooLarge {
                width: u32::MAX,
                height: u32::MAX
            },
            "byte count overflows instead of wrapping"
        );
        assert_eq!(
            SensorUnavailable::from(FrameError::TooLarge {
                width: 1,
                height: 1
            }),
            SensorUnavailable::no_camera(),
            "an unusable frame blocks the camera"
        );
    }

    #[test]
    fn feed_sample_reads_grid() {
        let mut feed = StaticFeed {
            width: 64,
            height: 48,
            pixels: Some(uniform(64, 48, [200, 200, 200])),
            warming: false,
        };
        let v = BrightnessSampler::default()
            .sample_brightness(&mut feed)
            .unwrap()
            .unwrap();
        assert!((v - 200.0).abs() < 1e-9, "got {v}");
    }

    #[test]
    fn warming_feed_yields_no_sample() {
        let mut feed = StaticFeed {
            width: 64,
            height: 48,
            pixels: None,
            warming: true,
        };
        assert_eq!(
            BrightnessSampler::default().sample_brightness(&mut feed),
            Ok(None)
        );
    }
}
