use gloo_timers::callback::Timeout;
use leptos::prelude::*;

use std::cell::RefCell;

struct KeydownBinding {
    window: web_sys::Window,
    _handler: wasm_bindgen::closure::Closure<dyn Fn(web_sys::KeyboardEvent)>,
}

thread_local! {
    static KEYDOWN_BINDING: RefCell<Option<KeydownBinding>> = const { RefCell::new(None) };
}

fn remove_loading_shell() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };
    if let Some(shell) = document.get_element_by_id("app-loading-shell") {
        shell.remove();
    }
}

/// Newtype wrappers to keep same-shaped signals distinct in Leptos context.
/// (`PointerPos` and `CanvasSize` are both `RwSignal<(f64, f64)>` — without
/// wrappers, `provide_context` overwrites one.)
#[derive(Clone, Copy)]
pub(crate) struct PointerPos(pub RwSignal<(f64, f64)>);
#[derive(Clone, Copy)]
pub(crate) struct CanvasSize(pub RwSignal<(f64, f64)>);
#[derive(Clone, Copy)]
pub(crate) struct FrameStamp(pub RwSignal<f64>);
#[derive(Clone, Copy)]
pub(crate) struct ShowLegend(pub RwSignal<bool>);

use gloo_storage::Storage;

#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct Settings {
    show_legend: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self { show_legend: true }
    }
}

use crate::channel;
use crate::config;
use crate::controller::MapController;
use crate::controls::NavControl;
use crate::data;
use crate::legend::Legend;
use crate::map::MapCanvas;
use crate::popup::{SearchOverlay, Tooltip};

/// Root application component. Provides global reactive signals via context.
#[component]
pub fn App() -> impl IntoView {
    // Global signals
    let controller: RwSignal<MapController> = RwSignal::new(MapController::default());
    let pointer_pos: RwSignal<(f64, f64)> = RwSignal::new((0.0, 0.0));
    let canvas_size: RwSignal<(f64, f64)> = RwSignal::new((0.0, 0.0));
    let frame_stamp: RwSignal<f64> = RwSignal::new(0.0);
    let saved: Settings =
        gloo_storage::LocalStorage::get("countymap_settings").unwrap_or_default();
    let show_legend: RwSignal<bool> = RwSignal::new(saved.show_legend);
    // The map stays hidden until the static documents have settled and one
    // short beat has passed, so the first visible frame is fully styled.
    let data_settled: RwSignal<bool> = RwSignal::new(false);
    let revealed: RwSignal<bool> = RwSignal::new(false);
    let reveal_timer_set: RwSignal<bool> = RwSignal::new(false);

    // Provide via context so children can access
    provide_context(controller);
    provide_context(PointerPos(pointer_pos));
    provide_context(CanvasSize(canvas_size));
    provide_context(FrameStamp(frame_stamp));
    provide_context(ShowLegend(show_legend));

    // Persist settings to localStorage on any change
    Effect::new(move || {
        let settings = Settings {
            show_legend: show_legend.get(),
        };
        let _ = gloo_storage::LocalStorage::set("countymap_settings", &settings);
    });

    // Listen for host commands on mount
    Effect::new(move || {
        channel::connect(controller);
        on_cleanup(|| {
            channel::disconnect();
        });
    });

    // Page-global clearMap() hook for the embedding document
    Effect::new(move || {
        channel::install_clear_map(controller);
        on_cleanup(|| {
            channel::remove_clear_map();
        });
    });

    // Kick off the static document fetches once on mount
    Effect::new(move || {
        data::load_static_documents(controller, data_settled);
    });

    // Reveal shortly after the documents settle, whether or not they loaded.
    Effect::new(move || {
        if !data_settled.get() || reveal_timer_set.get_untracked() {
            return;
        }
        reveal_timer_set.set(true);
        Timeout::new(config::REVEAL_DELAY_MS, move || {
            revealed.set(true);
            remove_loading_shell();
        })
        .forget();
    });

    // Global keyboard shortcuts
    Effect::new(move || {
        use wasm_bindgen::prelude::*;

        let Some(window) = web_sys::window() else {
            return;
        };

        KEYDOWN_BINDING.with(|slot| {
            if let Some(old) = slot.borrow_mut().take() {
                let _ = old.window.remove_event_listener_with_callback(
                    "keydown",
                    old._handler.as_ref().unchecked_ref(),
                );
            }
        });

        let handler =
            Closure::<dyn Fn(web_sys::KeyboardEvent)>::new(move |e: web_sys::KeyboardEvent| {
                let key = e.key();
                let target_tag = e
                    .target()
                    .and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok())
                    .map(|el| el.tag_name())
                    .unwrap_or_default();

                // Don't intercept when typing in an input
                if target_tag == "INPUT" || target_tag == "TEXTAREA" {
                    return;
                }

                let now = js_sys::Date::now();
                match key.as_str() {
                    "Escape" => {
                        controller.update(|ctl| {
                            ctl.dismiss_popup();
                            ctl.pointer_leave();
                        });
                    }
                    "r" | "0" => {
                        controller.update(|ctl| ctl.reset_view(now));
                    }
                    "ArrowLeft" => {
                        e.prevent_default();
                        controller.update(|ctl| ctl.camera_mut().pan(60.0, 0.0, now));
                    }
                    "ArrowRight" => {
                        e.prevent_default();
                        controller.update(|ctl| ctl.camera_mut().pan(-60.0, 0.0, now));
                    }
                    "ArrowUp" => {
                        e.prevent_default();
                        controller.update(|ctl| ctl.camera_mut().pan(0.0, 60.0, now));
                    }
                    "ArrowDown" => {
                        e.prevent_default();
                        controller.update(|ctl| ctl.camera_mut().pan(0.0, -60.0, now));
                    }
                    "+" | "=" => {
                        e.prevent_default();
                        controller.update(|ctl| ctl.camera_mut().zoom_step(1.0, now));
                    }
                    "-" => {
                        e.prevent_default();
                        controller.update(|ctl| ctl.camera_mut().zoom_step(-1.0, now));
                    }
                    _ => {}
                }
            });

        if window
            .add_event_listener_with_callback("keydown", handler.as_ref().unchecked_ref())
            .is_ok()
        {
            KEYDOWN_BINDING.with(|slot| {
                *slot.borrow_mut() = Some(KeydownBinding {
                    window: window.clone(),
                    _handler: handler,
                });
            });
        }
    });

    view! {
        <div style="width: 100%; height: 100%; position: relative;">
            <div
                style="width: 100%; height: 100%; position: relative; overflow: hidden; background: #dce8f0;"
                style:visibility=move || if revealed.get() { "visible" } else { "hidden" }
            >
                <MapCanvas />
                <NavControl />
                <Legend />
                <SearchOverlay />
            </div>
        </div>
        <Tooltip />
    }
}
