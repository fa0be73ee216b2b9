mod app;
mod camera;
mod channel;
mod config;
mod controller;
mod controls;
mod data;
mod format;
mod frame;
mod hit;
mod layers;
mod legend;
mod map;
mod popup;
mod render;

use leptos::mount::mount_to;
use std::any::Any;
use std::cell::RefCell;
use wasm_bindgen::JsCast;

thread_local! {
    static APP_MOUNT_HANDLE: RefCell<Option<Box<dyn Any>>> = RefCell::new(None);
}

fn main() {
    console_error_panic_hook::set_once();

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let target = document
        .get_element_by_id("app")
        .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
        .or_else(|| document.body());
    let Some(target) = target else {
        return;
    };

    APP_MOUNT_HANDLE.with(move |slot| {
        // Re-entry replaces the previous mount, so a stale reactive
        // tree can't keep running underneath the new one.
        slot.borrow_mut().take();
        let handle = mount_to(target, app::App);
        *slot.borrow_mut() = Some(Box::new(handle));
    });
}
