use leptos::prelude::*;
use wasm_bindgen::JsCast;

use crate::controller::MapController;

fn hover(e: web_sys::MouseEvent, color: &str) {
    if let Some(el) = e
        .target()
        .and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok())
    {
        el.style().set_property("background", color).ok();
    }
}

/// Zoom in/out buttons pinned to the top-right corner of the map.
#[component]
pub fn NavControl() -> impl IntoView {
    let controller: RwSignal<MapController> = expect_context();

    let step = move |direction: f64| {
        let now = js_sys::Date::now();
        controller.update(|ctl| ctl.camera_mut().zoom_step(direction, now));
    };

    let button_style = "display: block; width: 30px; height: 30px; border: none; \
                        background: #ffffff; cursor: pointer; font-size: 1.05rem; \
                        color: #38454f; padding: 0; line-height: 30px;";

    view! {
        <div style="position: absolute; top: 10px; right: 10px; z-index: 10; border-radius: 4px; overflow: hidden; border: 1px solid #cdd6de; box-shadow: 0 1px 6px rgba(20, 40, 60, 0.2);">
            <button
                title="Zoom in"
                style=button_style
                style:border-bottom="1px solid #dde4ea"
                on:click=move |_| step(1.0)
                on:mouseenter=move |e| hover(e, "#eef3f6")
                on:mouseleave=move |e| hover(e, "#ffffff")
            >
                "+"
            </button>
            <button
                title="Zoom out"
                style=button_style
                on:click=move |_| step(-1.0)
                on:mouseenter=move |e| hover(e, "#eef3f6")
                on:mouseleave=move |e| hover(e, "#ffffff")
            >
                "\u{2212}"
            </button>
        </div>
    }
}
