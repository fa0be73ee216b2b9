//! Fixed map configuration. The view always boots to the same place;
//! only host commands and user gestures move it afterwards.

use countymap_shared::geo::{LngLat, LngLatBounds};

/// Home view, centered on the continental US.
pub const HOME_CENTER: LngLat = LngLat::new(-95.0, 40.0);
pub const HOME_ZOOM: f64 = 3.5;

/// Zoom applied when flying to a search result.
pub const SEARCH_ZOOM: f64 = 8.0;

/// Panning is confined to this box around the US.
pub const MAX_BOUNDS: LngLatBounds =
    LngLatBounds::new(LngLat::new(-130.0, 5.0), LngLat::new(-60.0, 60.0));

/// Reserved style names for the county overlay.
pub const COUNTIES_SOURCE: &str = "counties";
pub const COUNTIES_LAYER: &str = "counties-layer";

/// Reserved style names for the background mask.
pub const MASK_SOURCE: &str = "mask";
pub const MASK_LAYER: &str = "mask-layer";
pub const MASK_FILL_COLOR: &str = "#ffffff";

/// Static documents fetched at startup, relative to the page.
pub const MASK_URL: &str = "mask_polygon.geojson";
pub const COUNTIES_URL: &str = "countiesData.json";

/// Camera flight length for search and clear commands.
pub const FLY_DURATION_MS: f64 = 1_800.0;

/// The surface stays hidden this long after the startup documents
/// settle, so the first reveal shows a fully drawn frame.
pub const REVEAL_DELAY_MS: u32 = 240;
