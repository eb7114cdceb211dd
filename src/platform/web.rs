//! Browser bindings: frame scheduler, canvas painter, clipboard

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

use crate::engine::{Scheduler, TickHandle};
use crate::render::{DrawCommand, Stroke};

/// Late-bound frame callback shared between the scheduler and its owner
pub type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// `requestAnimationFrame` scheduler
///
/// The frame callback usually needs the engine that owns this scheduler, so
/// it is installed into the slot after the engine exists.
pub struct RafScheduler {
    window: web_sys::Window,
    slot: FrameSlot,
}

impl RafScheduler {
    pub fn new(window: web_sys::Window) -> (Self, FrameSlot) {
        let slot: FrameSlot = Rc::new(RefCell::new(None));
        (
            Self {
                window,
                slot: slot.clone(),
            },
            slot,
        )
    }
}

impl Scheduler for RafScheduler {
    fn request_tick(&mut self) -> TickHandle {
        let slot = self.slot.borrow();
        let Some(callback) = slot.as_ref() else {
            log::error!("Frame requested before the frame callback was installed");
            return TickHandle(0);
        };
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(id) => TickHandle(id),
            Err(e) => {
                log::error!("requestAnimationFrame failed: {e:?}");
                TickHandle(0)
            }
        }
    }

    fn cancel_tick(&mut self, handle: TickHandle) {
        if let Err(e) = self.window.cancel_animation_frame(handle.0) {
            log::warn!("cancelAnimationFrame failed: {e:?}");
        }
    }
}

fn apply_stroke(ctx: &CanvasRenderingContext2d, stroke: Option<Stroke>) {
    if let Some(stroke) = stroke {
        ctx.set_stroke_style(&JsValue::from_str(stroke.color));
        ctx.set_line_width(f64::from(stroke.width));
        ctx.stroke();
    }
}

/// Paint a draw list onto a 2D canvas context
pub fn paint(ctx: &CanvasRenderingContext2d, cmds: &[DrawCommand]) {
    for cmd in cmds {
        match cmd {
            DrawCommand::Clear { color, size } => {
                ctx.set_fill_style(&JsValue::from_str(color));
                ctx.fill_rect(0.0, 0.0, f64::from(size.x), f64::from(size.y));
            }
            DrawCommand::Rect {
                pos,
                size,
                fill,
                stroke,
            } => {
                ctx.begin_path();
                ctx.rect(
                    f64::from(pos.x),
                    f64::from(pos.y),
                    f64::from(size.x),
                    f64::from(size.y),
                );
                ctx.set_fill_style(&JsValue::from_str(fill));
                ctx.fill();
                apply_stroke(ctx, *stroke);
            }
            DrawCommand::Circle {
                center,
                radius,
                fill,
                stroke,
            } => {
                ctx.begin_path();
                if let Err(e) = ctx.arc(
                    f64::from(center.x),
                    f64::from(center.y),
                    f64::from(*radius),
                    0.0,
                    TAU,
                ) {
                    log::warn!("arc failed: {e:?}");
                    continue;
                }
                ctx.set_fill_style(&JsValue::from_str(fill));
                ctx.fill();
                apply_stroke(ctx, *stroke);
            }
            DrawCommand::Text {
                pos,
                text,
                font,
                color,
            } => {
                ctx.set_font(font);
                ctx.set_fill_style(&JsValue::from_str(color));
                if let Err(e) = ctx.fill_text(text, f64::from(pos.x), f64::from(pos.y)) {
                    log::warn!("fill_text failed: {e:?}");
                }
            }
        }
    }
}

/// Copy text to the clipboard in the background
pub fn copy_to_clipboard(text: String) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let promise = window.navigator().clipboard().write_text(&text);
    wasm_bindgen_futures::spawn_local(async move {
        match wasm_bindgen_futures::JsFuture::from(promise).await {
            Ok(_) => log::info!("Share link copied"),
            Err(e) => log::warn!("Clipboard write failed: {e:?}"),
        }
    });
}

/// `origin + pathname` of the current page
pub fn page_base_url() -> String {
    web_sys::window()
        .map(|w| w.location())
        .and_then(|loc| Some(format!("{}{}", loc.origin().ok()?, loc.pathname().ok()?)))
        .unwrap_or_default()
}
