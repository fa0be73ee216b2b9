use std::cell::RefCell;

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::MessageEvent;

use countymap_shared::HostMessage;

use crate::controller::MapController;

struct ChannelBinding {
    window: web_sys::Window,
    on_message: Closure<dyn Fn(MessageEvent)>,
}

impl ChannelBinding {
    fn close(self) {
        self.window
            .remove_event_listener_with_callback(
                "message",
                self.on_message.as_ref().unchecked_ref(),
            )
            .ok();
    }
}

thread_local! {
    static CHANNEL_BINDING: RefCell<Option<ChannelBinding>> = const { RefCell::new(None) };
    static CLEAR_MAP_FN: RefCell<Option<Closure<dyn Fn()>>> = const { RefCell::new(None) };
}

/// Attach the host command listener to the window. Replaces any
/// existing binding, so exactly one listener is live at a time.
pub fn connect(controller: RwSignal<MapController>) {
    let Some(window) = web_sys::window() else {
        return;
    };

    let on_message = Closure::<dyn Fn(MessageEvent)>::new(move |e: MessageEvent| {
        match decode(&e.data()) {
            Some(Ok(msg)) => dispatch(controller, msg),
            Some(Err(err)) => {
                web_sys::console::warn_1(&format!("Dropping malformed host command: {err}").into());
            }
            // Unrelated window traffic; stay silent.
            None => {}
        }
    });
    window
        .add_event_listener_with_callback("message", on_message.as_ref().unchecked_ref())
        .ok();

    CHANNEL_BINDING.with(|slot| {
        let mut slot = slot.borrow_mut();
        if let Some(old) = slot.take() {
            old.close();
        }
        *slot = Some(ChannelBinding { window, on_message });
    });
}

pub fn disconnect() {
    CHANNEL_BINDING.with(|slot| {
        let mut slot = slot.borrow_mut();
        if let Some(binding) = slot.take() {
            binding.close();
        }
    });
}

/// Decode a posted envelope, accepting either a JSON string or a
/// structured clone. `None` means the event was not addressed to us;
/// `Some(Err)` means a recognized command carried a bad payload.
fn decode(data: &JsValue) -> Option<Result<HostMessage, String>> {
    if let Some(text) = data.as_string() {
        let value: serde_json::Value = serde_json::from_str(&text).ok()?;
        let name = value.get("type").and_then(|t| t.as_str())?;
        if !HostMessage::is_command(name) {
            return None;
        }
        Some(serde_json::from_value(value).map_err(|e| e.to_string()))
    } else {
        let name = js_sys::Reflect::get(data, &"type".into()).ok()?.as_string()?;
        if !HostMessage::is_command(&name) {
            return None;
        }
        Some(serde_wasm_bindgen::from_value(data.clone()).map_err(|e| e.to_string()))
    }
}

fn dispatch(controller: RwSignal<MapController>, msg: HostMessage) {
    match msg {
        HostMessage::UpdateCounties { counties } => {
            controller.update(|c| c.upsert_counties(counties));
        }
        HostMessage::UpdateSearch { lng, lat, popup } => {
            let now = js_sys::Date::now();
            controller.update(|c| c.show_search_result(lng, lat, popup, now));
        }
        HostMessage::ClearSearch => {
            let now = js_sys::Date::now();
            controller.update(|c| c.clear_search(now));
        }
    }
}

/// Publish the page-global `clearMap()` so host-side UI can clear the
/// search without a round trip through the message channel. Same path
/// as the `clearSearch` command.
pub fn install_clear_map(controller: RwSignal<MapController>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let f = Closure::<dyn Fn()>::new(move || {
        let now = js_sys::Date::now();
        controller.update(|c| c.clear_search(now));
    });
    if js_sys::Reflect::set(&window, &"clearMap".into(), f.as_ref()).unwrap_or(false) {
        CLEAR_MAP_FN.with(|slot| {
            *slot.borrow_mut() = Some(f);
        });
    }
}

pub fn remove_clear_map() {
    let removed = CLEAR_MAP_FN.with(|slot| slot.borrow_mut().take());
    if removed.is_some()
        && let Some(window) = web_sys::window()
    {
        let _ = js_sys::Reflect::delete_property(&window, &"clearMap".into());
    }
}
