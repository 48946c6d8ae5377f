// Copyright 2026 the Attune Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web example: the attune instrument running in a browser.
//!
//! Builds the page (a 360×360 canvas, the instruction blocks and a start
//! button), then on the first click opens the camera, asks for orientation
//! access and starts a [`RafLoop`] that ticks the [`SessionDriver`] and
//! redraws the rings every frame until the session completes.
//!
//! Build with: `wasm-pack build --target web demos/web_attune`
//!
//! Then serve `demos/web_attune/` over HTTPS (camera and orientation require a
//! secure context) and open `index.html` on a phone.
//!
//! [`RafLoop`]: attune_backend_web::RafLoop
//! [`SessionDriver`]: attune_core::driver::SessionDriver

#![no_std]
#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, reason = "this crate only runs in the browser")
)]

extern crate alloc;

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;
use core::ops::ControlFlow;

use wasm_bindgen::JsCast as _;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, HtmlCanvasElement, HtmlElement, Window};

use attune_backend_web::{
    CanvasSurface, DomInstructions, OrientationListener, RafLoop, RafTick, STATUS_ID, VideoCamera,
    clock_now, request_permission, timestamp,
};
use attune_core::config::SessionConfig;
use attune_core::driver::SessionDriver;
use attune_core::error::{Sensor, SensorUnavailable, UnavailableCause};
use attune_core::permission::Permission;
use attune_core::presenter::InstructionBlock;
use attune_core::queue::SampleQueue;
use attune_core::time::Timestamp;
use attune_core::trace::Tracer;
use attune_render::{RenderPlan, RingRenderer};

/// Instruction text per block, in page order.
const BLOCK_TEXT: [(InstructionBlock, &str); 4] = [
    (InstructionBlock::Light, "Find some light."),
    (InstructionBlock::Direction, "Turn until you face north."),
    (InstructionBlock::Angle, "Raise the device until it stands upright."),
    (InstructionBlock::Result, "Attuned."),
];

struct App {
    window: Window,
    driver: SessionDriver,
    queue: Rc<RefCell<SampleQueue>>,
    camera: VideoCamera,
    presenter: DomInstructions,
    renderer: RingRenderer,
    plan: RenderPlan,
    surface: CanvasSurface,
    orientation: Option<OrientationListener>,
}

/// Entry point for the web demo.
#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no body"))?;
    style(
        &body,
        "margin: 0; background: #000; color: #fff; font-family: sans-serif; text-align: center;",
    )?;

    let config = SessionConfig::DEFAULT;
    let renderer = RingRenderer::DEFAULT;

    let canvas: HtmlCanvasElement = document.create_element("canvas")?.unchecked_into();
    #[expect(
        clippy::cast_possible_truncation,
        reason = "the canvas side is a small positive constant"
    )]
    let side = renderer.canvas as u32;
    canvas.set_width(side);
    canvas.set_height(side);
    style(&canvas, "display: block; margin: 24px auto;")?;
    body.append_child(&canvas)?;

    build_instructions(&document, &body)?;
    let start = element(&document, "button")?;
    start.set_text_content(Some("Start"));
    body.append_child(&start)?;

    let driver = SessionDriver::new(config);
    let queue = Rc::new(RefCell::new(driver.make_queue()));
    let surface = CanvasSurface::new(&canvas)?;
    let plan = renderer.plan(&driver.snapshot());
    let state = Rc::new(RefCell::new(App {
        window: window.clone(),
        camera: VideoCamera::new(&document, config.frame_width, config.frame_height)?,
        presenter: DomInstructions::new(&document),
        driver,
        queue,
        renderer,
        plan,
        surface,
        orientation: None,
    }));

    // Draw the idle instrument before the session starts.
    {
        let mut app = state.borrow_mut();
        let app = &mut *app;
        app.plan.draw_to(&mut app.surface);
    }

    let tick_state = Rc::clone(&state);
    let raf = RafLoop::new(move |tick| on_tick(&tick_state, tick));

    let click_state = Rc::clone(&state);
    let on_click = Closure::wrap(Box::new(move |_event: Event| {
        {
            let app = click_state.borrow();
            app.camera.start(&app.window.navigator());
        }
        let permission_state = Rc::clone(&click_state);
        request_permission(move |permission| on_permission(&permission_state, permission));
        raf.start();
    }) as Box<dyn FnMut(_)>);
    start.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();

    Ok(())
}

fn on_tick(state: &Rc<RefCell<App>>, tick: RafTick) -> ControlFlow<()> {
    let mut app = state.borrow_mut();
    let app = &mut *app;
    let now = Timestamp::new(tick.now, clock_now());
    app.driver.tick(
        &mut app.queue.borrow_mut(),
        &mut app.camera,
        &mut app.presenter,
        now,
        &mut Tracer::none(),
    );
    let snapshot = app.driver.snapshot();
    app.renderer.render(&snapshot, &mut app.plan);
    app.plan.draw_to(&mut app.surface);
    if snapshot.is_complete() {
        // The finished rings and time stay on the canvas.
        ControlFlow::Break(())
    } else {
        ControlFlow::Continue(())
    }
}

fn on_permission(state: &Rc<RefCell<App>>, permission: Permission) {
    let mut app = state.borrow_mut();
    let app = &mut *app;
    let session = app.driver.session_mut();
    if let Err(unavailable) = permission.check() {
        session.report_unavailable(unavailable, timestamp(), &mut Tracer::none());
        return;
    }
    session.clear_unavailable(Sensor::Orientation, timestamp(), &mut Tracer::none());
    if app.orientation.is_some() {
        return;
    }
    match OrientationListener::attach(&app.window, Rc::clone(&app.queue)) {
        Ok(listener) => app.orientation = Some(listener),
        Err(_) => {
            session.report_unavailable(
                SensorUnavailable::new(Sensor::Orientation, UnavailableCause::Unsupported),
                timestamp(),
                &mut Tracer::none(),
            );
        }
    }
}

fn build_instructions(doc: &Document, host: &HtmlElement) -> Result<(), JsValue> {
    for (block, text) in BLOCK_TEXT {
        let el = element(doc, "p")?;
        el.set_id(block.id());
        el.set_text_content(Some(text));
        style(&el, "display: none; font-size: 20px;")?;
        host.append_child(&el)?;
    }

    let back = element(doc, "a")?;
    back.set_id(InstructionBlock::BackLink.id());
    back.set_attribute("href", "./")?;
    back.set_text_content(Some("Back"));
    style(&back, "display: none; color: #fff;")?;
    host.append_child(&back)?;

    let status = element(doc, "p")?;
    status.set_id(STATUS_ID);
    style(&status, "display: none; color: #f66;")?;
    host.append_child(&status)?;
    Ok(())
}

fn element(doc: &Document, tag: &str) -> Result<HtmlElement, JsValue> {
    Ok(doc.create_element(tag)?.unchecked_into())
}

fn style(el: &web_sys::Element, css: &str) -> Result<(), JsValue> {
    el.set_attribute("style", css)
}
