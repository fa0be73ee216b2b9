use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use countymap_shared::county::FeatureCollection;

use crate::config::{COUNTIES_URL, MASK_URL};
use crate::controller::MapController;

/// Fetch a GeoJSON document from a page-relative URL.
pub async fn fetch_collection(url: &str) -> Result<FeatureCollection, String> {
    let resp = gloo_net::http::Request::get(url)
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;

    if !resp.ok() {
        return Err(format!("HTTP {}", resp.status()));
    }

    resp.json::<FeatureCollection>()
        .await
        .map_err(|e| format!("parse error: {e}"))
}

/// Load the startup documents: the background mask, then the county
/// overlay. Either failing is logged and skipped; the map still comes
/// up with whatever loaded, and `settled` flips once both attempts
/// finish so the reveal isn't held hostage by a bad document.
pub fn load_static_documents(controller: RwSignal<MapController>, settled: RwSignal<bool>) {
    spawn_local(async move {
        match fetch_collection(MASK_URL).await {
            Ok(mask) => controller.update(|c| c.set_mask(mask)),
            Err(e) => {
                web_sys::console::warn_1(&format!("Mask document unavailable ({MASK_URL}): {e}").into());
            }
        }

        match fetch_collection(COUNTIES_URL).await {
            Ok(counties) => controller.update(|c| c.upsert_counties(counties)),
            Err(e) => {
                web_sys::console::warn_1(
                    &format!("County document unavailable ({COUNTIES_URL}): {e}").into(),
                );
            }
        }

        settled.set(true);
    });
}
