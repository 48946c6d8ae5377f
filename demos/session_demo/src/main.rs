// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted sensor session that exercises the driver, the renderer and the
//! tracing pipeline.
//!
//! A simulated user brightens the room, turns toward north and raises the
//! device while a 60 Hz loop ticks a [`SessionDriver`]. The camera warms up,
//! drops out for a moment, and the user pauses long enough to trip the
//! watchdog. Events go to both a
//! [`PrettyPrintSink`](attune_debug::pretty::PrettyPrintSink) on stdout and a
//! [`RecorderSink`](attune_debug::recorder::RecorderSink); afterwards the
//! recording is exported as `trace.json` and the last frame as `session.svg`.

mod svg;

use std::fs::{self, File};
use std::io::{self, BufWriter, Write as _};
use std::ops::Range;

use chrono::{Local, Timelike as _};

use attune_core::config::SessionConfig;
use attune_core::driver::SessionDriver;
use attune_core::error::UnavailableCause;
use attune_core::phase::Phase;
use attune_core::presenter::{InstructionBlock, InstructionPresenter, Instructions};
use attune_core::sample::OrientationReading;
use attune_core::sampler::{CameraFeed, Frame, FrameError};
use attune_core::time::{ClockTime, Duration, HostTime, Timebase, Timestamp};
use attune_core::trace::Tracer;
use attune_debug::Fanout;
use attune_debug::pretty::PrettyPrintSink;
use attune_debug::recorder::RecorderSink;
use attune_render::RingRenderer;

use crate::svg::SvgSurface;

const MAX_FRAMES: u64 = 900;
/// 16.6ms frame interval in nanoseconds (≈60 Hz).
const FRAME_NS: u64 = 16_666_667;
const WARMUP_FRAMES: u64 = 3;
const DEAD_CAMERA: Range<u64> = 20..35;
/// Frame (counted from the start of rotation) at which a burst of readings
/// overflows the queue.
const BURST_AT: u64 = 10;
/// Frames (counted from the start of tilt) during which the user holds still.
const PAUSE: Range<u64> = 10..160;

/// A camera looking at a room that slowly gets brighter.
struct ScriptedCamera {
    frame: u64,
    pixels: Vec<u8>,
}

impl CameraFeed for ScriptedCamera {
    fn current_frame(&mut self) -> Result<Frame<'_>, FrameError> {
        if self.frame < WARMUP_FRAMES {
            return Err(FrameError::Warming);
        }
        if DEAD_CAMERA.contains(&self.frame) {
            return Err(FrameError::Unavailable(UnavailableCause::NoDevice));
        }
        let v = u8::try_from(20 + self.frame * 3 / 2).unwrap_or(u8::MAX).min(200);
        self.pixels.clear();
        for _ in 0..16 {
            self.pixels.extend_from_slice(&[v, v, v, 255]);
        }
        Frame::new(4, 4, &self.pixels)
    }
}

/// Prints instruction changes.
struct PrintPresenter;

impl InstructionPresenter for PrintPresenter {
    fn present(&mut self, instructions: &Instructions) {
        let visible: Vec<&str> = InstructionBlock::ALL
            .into_iter()
            .filter(|b| instructions.is_visible(*b))
            .map(InstructionBlock::id)
            .collect();
        match instructions.blocked {
            Some(b) => println!("[ui]              show {visible:?}, status: {b}"),
            None => println!("[ui]              show {visible:?}"),
        }
    }
}

fn compass(heading: f64) -> OrientationReading {
    OrientationReading {
        compass_heading: Some(heading),
        ..OrientationReading::default()
    }
}

fn tilt(beta: f64) -> OrientationReading {
    OrientationReading {
        beta: Some(beta),
        ..OrientationReading::default()
    }
}

/// What the simulated user's device reports `since` frames into `phase`.
fn readings(phase: Phase, since: u64) -> Vec<OrientationReading> {
    match phase {
        Phase::Light | Phase::Done => Vec::new(),
        Phase::Rotation if since == 5 => vec![compass(f64::NAN)],
        Phase::Rotation if since == BURST_AT => (0..6_u32)
            .map(|i| compass(200.0 - 4.0 * (since as f64 + f64::from(i) / 6.0)))
            .collect(),
        Phase::Rotation => vec![compass((200.0 - 4.0 * since as f64).rem_euclid(360.0))],
        Phase::Tilt if PAUSE.contains(&since) => Vec::new(),
        Phase::Tilt if since < PAUSE.start => vec![tilt(2.5 * since as f64)],
        Phase::Tilt => vec![tilt(25.0 + 2.5 * (since - PAUSE.end) as f64)],
    }
}

fn main() -> io::Result<()> {
    let timebase = Timebase::NANOS;
    let start_clock = Local::now().num_seconds_from_midnight();
    let at = |frame: u64| {
        let ns = frame * FRAME_NS;
        let secs = u32::try_from(ns / 1_000_000_000).unwrap_or(0);
        Timestamp::new(
            HostTime(ns),
            ClockTime::from_seconds_since_midnight(start_clock + secs),
        )
    };

    // -- sinks -------------------------------------------------------------
    let mut sinks = Fanout {
        a: PrettyPrintSink::new(Box::new(io::stdout()), timebase),
        b: RecorderSink::new(),
    };

    // -- session -----------------------------------------------------------
    let mut config =
        SessionConfig::DEFAULT.with_stall_timeout(Duration::from_millis(2000, timebase));
    config.queue_capacity = 4;
    let mut driver = SessionDriver::new(config);
    let mut queue = driver.make_queue();
    let mut camera = ScriptedCamera {
        frame: 0,
        pixels: Vec::new(),
    };
    let mut presenter = PrintPresenter;
    let renderer = RingRenderer::DEFAULT;
    let mut plan = renderer.plan(&driver.snapshot());

    // -- simulated loop ----------------------------------------------------
    let mut phase_entered = (Phase::Light, 0);
    {
        let mut tracer = Tracer::new(&mut sinks);
        for frame in 0..MAX_FRAMES {
            let phase = driver.session().phase();
            if phase != phase_entered.0 {
                phase_entered = (phase, frame);
            }
            for reading in readings(phase, frame - phase_entered.1) {
                queue.on_orientation_sample(&reading, at(frame));
            }

            camera.frame = frame;
            driver.tick(&mut queue, &mut camera, &mut presenter, at(frame), &mut tracer);
            renderer.render(&driver.snapshot(), &mut plan);

            if driver.session().phase() == Phase::Done {
                break;
            }
        }
    }

    let snapshot = driver.snapshot();
    match snapshot.completed_at {
        Some(done) => println!("Completed at {}", done.clock),
        None => println!("Session did not complete in {MAX_FRAMES} frames"),
    }

    // -- last frame ---------------------------------------------------------
    let mut surface = SvgSurface::new(renderer.canvas);
    plan.draw_to(&mut surface);
    fs::write("session.svg", surface.finish())?;
    println!(
        "Wrote session.svg ({} ellipses{})",
        plan.ellipse_count(),
        plan.text().map(|t| format!(", \"{t}\"")).unwrap_or_default()
    );

    // -- export Chrome trace -----------------------------------------------
    let path = "trace.json";
    let mut writer = BufWriter::new(File::create(path)?);
    attune_debug::chrome::export(sinks.b.as_bytes(), timebase, &mut writer)?;
    writer.flush()?;
    println!("Wrote {path} ({} bytes recorded)", sinks.b.as_bytes().len());

    Ok(())
}
