use leptos::prelude::*;
use wasm_bindgen::JsCast;

use crate::app::{CanvasSize, FrameStamp, PointerPos};
use crate::controller::MapController;
use crate::format::format_count;

/// Tooltip that follows the cursor while a county is hovered.
#[component]
pub fn Tooltip() -> impl IntoView {
    let controller: RwSignal<MapController> = expect_context();
    let PointerPos(pointer_pos) = expect_context();

    let info = Memo::new(move |_| {
        controller.with(|ctl| {
            ctl.hovered_feature()
                .map(|f| (f.county_name().to_string(), f.population()))
        })
    });

    view! {
        {move || {
            let Some((name, population)) = info.get() else {
                return view! { <div style="display:none;" /> }.into_any();
            };
            let (x, y) = pointer_pos.get();
            view! {
                <div
                    style:left=format!("{}px", x + 14.0)
                    style:top=format!("{}px", y - 10.0)
                    style="position: fixed; pointer-events: none; z-index: 100; background: #ffffff; border: 1px solid #d4dbe2; border-radius: 4px; box-shadow: 0 2px 10px rgba(20, 40, 60, 0.18); padding: 7px 10px; max-width: 240px;"
                >
                    <div style="font-size: 0.82rem; font-weight: 700; color: #24323e; line-height: 1.3;">
                        {name}
                    </div>
                    <div style="font-size: 0.72rem; color: #51616e; margin-top: 2px;">
                        "Population: " {format_count(population)}
                    </div>
                </div>
            }
            .into_any()
        }}
    }
}

/// Host-search popup anchored to its geographic position. Reprojected
/// whenever a frame lands, so it rides along with camera flights.
#[component]
pub fn SearchOverlay() -> impl IntoView {
    let controller: RwSignal<MapController> = expect_context();
    let CanvasSize(canvas_size) = expect_context();
    let FrameStamp(frame_stamp) = expect_context();

    let anchor = Memo::new(move |_| {
        // The stamp of the last painted frame doubles as the clock, so
        // the popup lands exactly where that frame put its anchor.
        let now = frame_stamp.get();
        let (w, h) = canvas_size.get();
        controller.with(|ctl| {
            let popup = ctl.search_popup()?;
            let (sx, sy) = ctl.camera().viewport(w, h, now).lnglat_to_screen(popup.at);
            Some((sx, sy, popup.html.clone()))
        })
    });

    view! {
        {move || {
            let Some((x, y, html)) = anchor.get() else {
                return view! { <div style="display:none;" /> }.into_any();
            };
            view! {
                <div
                    style:left=format!("{x}px")
                    style:top=format!("{}px", y - 12.0)
                    style="position: absolute; transform: translate(-50%, -100%); z-index: 50; background: #ffffff; border: 1px solid #cdd6de; border-radius: 5px; box-shadow: 0 3px 14px rgba(20, 40, 60, 0.25); min-width: 140px; max-width: 260px;"
                >
                    <button
                        title="Close popup"
                        style="position: absolute; top: 2px; right: 4px; border: none; background: transparent; cursor: pointer; color: #8795a1; font-size: 1rem; line-height: 1; padding: 2px;"
                        on:click=move |_| controller.update(|ctl| ctl.dismiss_popup())
                        on:mouseenter=move |e| {
                            if let Some(el) = e.target().and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok()) {
                                el.style().set_property("color", "#24323e").ok();
                            }
                        }
                        on:mouseleave=move |e| {
                            if let Some(el) = e.target().and_then(|t| t.dyn_into::<web_sys::HtmlElement>().ok()) {
                                el.style().set_property("color", "#8795a1").ok();
                            }
                        }
                    >
                        "\u{00D7}"
                    </button>
                    <div
                        style="padding: 10px 22px 10px 12px; font-size: 0.8rem; color: #24323e; line-height: 1.4;"
                        inner_html=html
                    />
                </div>
            }
            .into_any()
        }}
    }
}
