use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, PointerEvent, WheelEvent};

use crate::app::{CanvasSize, FrameStamp, PointerPos};
use crate::controller::MapController;
use crate::frame::FramePump;
use crate::hit::HitIndex;
use crate::render;

/// Backing-store scale, capped so 4K-and-up displays don't quadruple
/// the pixel work for flat polygon fills.
fn device_scale() -> f64 {
    web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0)
        .clamp(1.0, 2.0)
}

struct ResizeBinding {
    window: web_sys::Window,
    handler: Closure<dyn Fn()>,
}

impl ResizeBinding {
    fn close(self) {
        self.window
            .remove_event_listener_with_callback("resize", self.handler.as_ref().unchecked_ref())
            .ok();
    }
}

thread_local! {
    static RESIZE_BINDING: RefCell<Option<ResizeBinding>> = const { RefCell::new(None) };
}

/// Attach the window resize listener. Replaces any existing binding,
/// so exactly one listener is live at a time.
fn connect_resize(pump: Rc<FramePump>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let handler = Closure::<dyn Fn()>::new(move || pump.mark_dirty());
    if window
        .add_event_listener_with_callback("resize", handler.as_ref().unchecked_ref())
        .is_err()
    {
        return;
    }
    RESIZE_BINDING.with(|slot| {
        let mut slot = slot.borrow_mut();
        if let Some(old) = slot.take() {
            old.close();
        }
        *slot = Some(ResizeBinding { window, handler });
    });
}

// Reactive cleanups must be Send + Sync, so this captures nothing and
// drains the thread-local slot instead.
fn drop_resize_binding() {
    RESIZE_BINDING.with(|slot| {
        if let Some(binding) = slot.borrow_mut().take() {
            binding.close();
        }
    });
}

/// The map surface: a 2D canvas painting the style registry through
/// the camera, with drag/wheel gestures and hover tracking on top.
#[component]
pub fn MapCanvas() -> impl IntoView {
    let controller: RwSignal<MapController> = expect_context();
    let PointerPos(pointer_pos) = expect_context();
    let CanvasSize(canvas_size) = expect_context();
    let FrameStamp(frame_stamp) = expect_context();

    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();

    // Drag state
    let is_dragging = Rc::new(Cell::new(false));
    let last_x = Rc::new(Cell::new(0.0f64));
    let last_y = Rc::new(Cell::new(0.0f64));

    // Hover hit index over the county overlay
    let hit_index: Rc<RefCell<HitIndex>> = Rc::new(RefCell::new(HitIndex::default()));
    let index_for_move = hit_index.clone();

    // Cached Canvas 2D context (invalidated on canvas resize)
    let cached_ctx: Rc<RefCell<Option<CanvasRenderingContext2d>>> = Rc::new(RefCell::new(None));

    // Rebuild the hit index when the county overlay is replaced. The
    // version check keeps hover and camera updates from paying for a
    // rebuild.
    Effect::new({
        let index = hit_index.clone();
        let mut built_version = None;
        move || {
            let version = controller.with(|ctl| ctl.data_version());
            if built_version == Some(version) {
                return;
            }
            built_version = Some(version);
            controller.with_untracked(|ctl| {
                *index.borrow_mut() = match ctl.counties() {
                    Some(counties) => HitIndex::build(counties),
                    None => HitIndex::default(),
                };
            });
        }
    });

    let cached_ctx_render = cached_ctx.clone();
    let pump = Rc::new(FramePump::new(move || {
        let Some(canvas) = canvas_ref.get_untracked() else {
            return false;
        };
        let canvas: &HtmlCanvasElement = &canvas;

        // CSS size comes from the parent box; the backing store runs
        // at device scale.
        let Some(parent) = canvas.parent_element() else {
            return false;
        };
        let rect = parent.get_bounding_client_rect();
        let (css_w, css_h) = (rect.width(), rect.height());
        if css_w <= 0.0 || css_h <= 0.0 {
            return false;
        }

        let scale = device_scale();
        let want_w = (css_w * scale) as u32;
        let want_h = (css_h * scale) as u32;
        if canvas.width() != want_w || canvas.height() != want_h {
            canvas.set_width(want_w);
            canvas.set_height(want_h);
            // Canvas resize resets 2D context state — invalidate cache
            *cached_ctx_render.borrow_mut() = None;
        }

        let ctx = {
            let mut ctx_cache = cached_ctx_render.borrow_mut();
            if ctx_cache.is_none() {
                let Some(ctx) = canvas
                    .get_context("2d")
                    .ok()
                    .flatten()
                    .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
                else {
                    return false;
                };
                ctx.scale(scale, scale).ok();
                *ctx_cache = Some(ctx);
            }
            let Some(ctx) = ctx_cache.clone() else {
                return false;
            };
            ctx
        };

        let now = js_sys::Date::now();
        let animating = controller.with_untracked(|ctl| {
            let vp = ctl.camera().viewport(css_w, css_h, now);
            render::paint(&ctx, &vp, ctl.style(), ctl.hovered());
            ctl.camera().is_animating(now)
        });

        // Anchored overlays reproject off these after the frame lands.
        if canvas_size.get_untracked() != (css_w, css_h) {
            canvas_size.set((css_w, css_h));
        }
        frame_stamp.set(now);

        animating
    }));

    // Any controller change needs a repaint
    let pump_state = pump.clone();
    Effect::new(move || {
        controller.track();
        pump_state.mark_dirty();
    });

    // Window resizes too; the paint pass picks up the new box size
    Effect::new({
        let pump = pump.clone();
        move || {
            connect_resize(pump.clone());
            on_cleanup(drop_resize_binding);
        }
    });

    // --- Input handlers ---

    let on_wheel = move |e: WheelEvent| {
        e.prevent_default();
        let delta = e.delta_y();
        let x = e.offset_x() as f64;
        let y = e.offset_y() as f64;
        let (w, h) = canvas_size.get_untracked();
        let now = js_sys::Date::now();
        controller.update(|ctl| ctl.camera_mut().zoom_at(delta, x, y, w, h, now));
    };

    let on_pointer_down = {
        let is_dragging = is_dragging.clone();
        let last_x = last_x.clone();
        let last_y = last_y.clone();
        move |e: PointerEvent| {
            is_dragging.set(true);
            last_x.set(e.client_x() as f64);
            last_y.set(e.client_y() as f64);
            controller.update(|ctl| ctl.pointer_leave());

            if let Some(target) = e.target()
                && let Ok(el) = target.dyn_into::<web_sys::HtmlElement>()
            {
                el.set_pointer_capture(e.pointer_id()).ok();
                el.style().set_property("cursor", "grabbing").ok();
            }
        }
    };

    let on_pointer_move = {
        let is_dragging = is_dragging.clone();
        let last_x = last_x.clone();
        let last_y = last_y.clone();
        let index = index_for_move;
        move |e: PointerEvent| {
            if is_dragging.get() {
                let dx = e.client_x() as f64 - last_x.get();
                let dy = e.client_y() as f64 - last_y.get();
                last_x.set(e.client_x() as f64);
                last_y.set(e.client_y() as f64);
                let now = js_sys::Date::now();
                controller.update(|ctl| ctl.camera_mut().pan(dx, dy, now));
            } else {
                let local = canvas_ref
                    .get_untracked()
                    .map(|el| {
                        let rect = el.get_bounding_client_rect();
                        (
                            e.client_x() as f64 - rect.left(),
                            e.client_y() as f64 - rect.top(),
                        )
                    })
                    .unwrap_or((e.offset_x() as f64, e.offset_y() as f64));

                let now = js_sys::Date::now();
                let hit = controller.with_untracked(|ctl| {
                    let counties = ctl.counties()?;
                    let (w, h) = canvas_size.get_untracked();
                    let p = ctl.camera().viewport(w, h, now).screen_to_lnglat(local.0, local.1);
                    index.borrow().find_at(counties, p.lng, p.lat)
                });

                if hit != controller.with_untracked(|ctl| ctl.hovered()) {
                    controller.update(|ctl| match hit {
                        Some(id) => ctl.pointer_over(id),
                        None => ctl.pointer_leave(),
                    });
                }
                if hit.is_some() {
                    pointer_pos.set((e.client_x() as f64, e.client_y() as f64));
                }
            }
        }
    };

    let on_pointer_up = {
        let is_dragging = is_dragging.clone();
        move |e: PointerEvent| {
            is_dragging.set(false);
            if let Some(target) = e.target()
                && let Ok(el) = target.dyn_into::<web_sys::HtmlElement>()
            {
                el.style().set_property("cursor", "grab").ok();
            }
        }
    };

    let on_pointer_leave = move |_: PointerEvent| {
        if controller.with_untracked(|ctl| ctl.hovered().is_some()) {
            controller.update(|ctl| ctl.pointer_leave());
        }
    };

    view! {
        <canvas
            node_ref=canvas_ref
            on:wheel=on_wheel
            on:pointerdown=on_pointer_down
            on:pointermove=on_pointer_move
            on:pointerup=on_pointer_up
            on:pointerleave=on_pointer_leave
            style="position: absolute; inset: 0; width: 100%; height: 100%; touch-action: none; cursor: grab;"
        />
    }
}
