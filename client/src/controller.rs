use countymap_shared::county::{Feature, FeatureCollection, FeatureId};
use countymap_shared::geo::LngLat;

use crate::camera::Camera;
use crate::config::{COUNTIES_SOURCE, MASK_SOURCE, SEARCH_ZOOM};
use crate::layers::{StyleRegistry, counties_fill, mask_fill};

/// Search result popup: HTML supplied by the host, anchored to a
/// geographic position.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPopup {
    pub at: LngLat,
    pub html: String,
}

/// Owns everything a host command or pointer event may change: the
/// style registry, the camera, the hover tracker, and the search
/// popup. All mutation goes through methods here, so at most one
/// county is hovered and the camera only moves when a command or
/// gesture says so.
#[derive(Debug, Clone, Default)]
pub struct MapController {
    style: StyleRegistry,
    camera: Camera,
    hovered: Option<FeatureId>,
    search: Option<SearchPopup>,
    data_version: u64,
}

impl MapController {
    /// Install the background mask document.
    pub fn set_mask(&mut self, data: FeatureCollection) {
        self.style.upsert_fill(MASK_SOURCE, data, mask_fill());
    }

    /// Replace the county overlay, creating source and layer on first
    /// use. A hovered county that survives the swap stays hovered; one
    /// that disappears resets the tracker so no stale id lingers.
    pub fn upsert_counties(&mut self, data: FeatureCollection) {
        if let Some(id) = self.hovered
            && !data.contains_id(id)
        {
            self.hovered = None;
        }
        self.style.upsert_fill(COUNTIES_SOURCE, data, counties_fill());
        self.data_version = self.data_version.wrapping_add(1);
    }

    /// Bumped on every county overlay replacement. Lets derived
    /// structures rebuild only when the data actually changed.
    pub fn data_version(&self) -> u64 {
        self.data_version
    }

    /// Pointer settled over a county. The single tracker slot means
    /// the old hover clears and the new one sets as one transition.
    pub fn pointer_over(&mut self, id: FeatureId) {
        self.hovered = Some(id);
    }

    /// Pointer left the county layer.
    pub fn pointer_leave(&mut self) {
        self.hovered = None;
    }

    pub fn hovered(&self) -> Option<FeatureId> {
        self.hovered
    }

    pub fn is_hovered(&self, id: FeatureId) -> bool {
        self.hovered == Some(id)
    }

    /// The hovered county's feature, when it exists in the current
    /// overlay.
    pub fn hovered_feature(&self) -> Option<&Feature> {
        self.counties()?.get(self.hovered?)
    }

    pub fn counties(&self) -> Option<&FeatureCollection> {
        self.style.source(COUNTIES_SOURCE).map(|s| &s.data)
    }

    /// Fly to a search hit and open its popup there. Any earlier popup
    /// is replaced.
    pub fn show_search_result(&mut self, lng: f64, lat: f64, html: String, now: f64) {
        let at = LngLat::new(lng, lat);
        self.camera.fly_to(at, SEARCH_ZOOM, now);
        self.search = Some(SearchPopup { at, html });
    }

    /// Drop the popup and fly back to the home view.
    pub fn clear_search(&mut self, now: f64) {
        self.search = None;
        self.camera.fly_home(now);
    }

    /// Fly back to the home view without touching the popup. Backs the
    /// recenter keyboard shortcut.
    pub fn reset_view(&mut self, now: f64) {
        self.camera.fly_home(now);
    }

    /// Close button on the popup itself. The camera stays put.
    pub fn dismiss_popup(&mut self) {
        self.search = None;
    }

    pub fn search_popup(&self) -> Option<&SearchPopup> {
        self.search.as_ref()
    }

    pub fn style(&self) -> &StyleRegistry {
        &self.style
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Gesture access for the render surface. Data and hover paths
    /// never touch this.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{COUNTIES_LAYER, FLY_DURATION_MS, HOME_CENTER, HOME_ZOOM, MASK_LAYER};
    use countymap_shared::county::{Geometry, Properties};

    fn county(id: u64, population: f64) -> Feature {
        Feature {
            id: Some(id),
            properties: Properties {
                county_name: Some(format!("County {id}")),
                population: Some(population),
            },
            geometry: Geometry::Polygon(vec![vec![
                [-100.0, 39.0],
                [-99.0, 39.0],
                [-99.0, 40.0],
                [-100.0, 40.0],
                [-100.0, 39.0],
            ]]),
        }
    }

    fn collection(ids: &[u64]) -> FeatureCollection {
        FeatureCollection {
            features: ids.iter().map(|&id| county(id, 20_000.0)).collect(),
        }
    }

    #[test]
    fn repeated_upserts_keep_one_source_and_layer() {
        let mut ctl = MapController::default();
        ctl.upsert_counties(collection(&[1, 2]));
        ctl.upsert_counties(collection(&[3]));
        assert_eq!(ctl.style().source_count(), 1);
        assert_eq!(ctl.style().layer_count(), 1);
        assert!(ctl.style().has_layer(COUNTIES_LAYER));
        assert!(ctl.counties().unwrap().contains_id(3));
    }

    #[test]
    fn data_version_tracks_overlay_replacements_only() {
        let mut ctl = MapController::default();
        let v0 = ctl.data_version();

        ctl.upsert_counties(collection(&[1]));
        let v1 = ctl.data_version();
        assert_ne!(v0, v1);

        ctl.pointer_over(1);
        ctl.pointer_leave();
        ctl.camera_mut().pan(10.0, 10.0, 0.0);
        ctl.set_mask(FeatureCollection::default());
        assert_eq!(ctl.data_version(), v1);

        ctl.upsert_counties(collection(&[1, 2]));
        assert_ne!(ctl.data_version(), v1);
    }

    #[test]
    fn mask_and_counties_are_separate_sources() {
        let mut ctl = MapController::default();
        ctl.set_mask(FeatureCollection::default());
        ctl.upsert_counties(collection(&[1]));
        assert_eq!(ctl.style().source_count(), 2);
        assert_eq!(ctl.style().layer_count(), 2);
    }

    #[test]
    fn counties_arriving_before_the_mask_still_paint_on_top() {
        let mut ctl = MapController::default();
        ctl.upsert_counties(collection(&[1]));
        ctl.set_mask(FeatureCollection::default());

        let order: Vec<&str> = ctl.style().paint_order().map(|(l, _)| l.id).collect();
        assert_eq!(order, vec![MASK_LAYER, COUNTIES_LAYER]);
    }

    #[test]
    fn mask_alone_leaves_counties_absent() {
        // The county fetch failing must not take the mask down with it.
        let mut ctl = MapController::default();
        ctl.set_mask(FeatureCollection::default());
        assert!(ctl.counties().is_none());
        assert!(ctl.hovered_feature().is_none());
        assert!(ctl.style().has_layer(MASK_LAYER));
        assert!(!ctl.style().has_layer(COUNTIES_LAYER));
    }

    #[test]
    fn hover_moves_as_one_transition() {
        let mut ctl = MapController::default();
        ctl.upsert_counties(collection(&[1, 2]));

        ctl.pointer_over(1);
        assert!(ctl.is_hovered(1));

        ctl.pointer_over(2);
        assert!(ctl.is_hovered(2));
        assert!(!ctl.is_hovered(1));
        assert_eq!(ctl.hovered(), Some(2));
    }

    #[test]
    fn pointer_leave_clears_the_tracker() {
        let mut ctl = MapController::default();
        ctl.upsert_counties(collection(&[1]));
        ctl.pointer_over(1);
        ctl.pointer_leave();
        assert_eq!(ctl.hovered(), None);
        assert!(!ctl.is_hovered(1));
    }

    #[test]
    fn hovered_feature_resolves_against_current_overlay() {
        let mut ctl = MapController::default();
        assert!(ctl.hovered_feature().is_none());

        ctl.upsert_counties(collection(&[7]));
        ctl.pointer_over(7);
        assert_eq!(ctl.hovered_feature().unwrap().county_name(), "County 7");
    }

    #[test]
    fn replacing_data_keeps_hover_only_when_id_survives() {
        let mut ctl = MapController::default();
        ctl.upsert_counties(collection(&[1, 2]));
        ctl.pointer_over(2);

        ctl.upsert_counties(collection(&[2, 3]));
        assert_eq!(ctl.hovered(), Some(2));

        ctl.upsert_counties(collection(&[4]));
        assert_eq!(ctl.hovered(), None);
    }

    #[test]
    fn data_and_hover_never_move_the_camera() {
        let mut ctl = MapController::default();
        let before = ctl.camera().position(0.0);

        ctl.set_mask(FeatureCollection::default());
        ctl.upsert_counties(collection(&[1, 2]));
        ctl.pointer_over(1);
        ctl.pointer_leave();

        assert_eq!(ctl.camera().position(0.0), before);
        assert!(!ctl.camera().is_animating(0.0));
    }

    #[test]
    fn search_flies_camera_and_opens_popup() {
        let mut ctl = MapController::default();
        ctl.show_search_result(-96.7, 40.8, "<b>Lancaster</b>".into(), 0.0);

        let popup = ctl.search_popup().unwrap();
        assert_eq!(popup.at, LngLat::new(-96.7, 40.8));
        assert_eq!(popup.html, "<b>Lancaster</b>");

        let (center, zoom) = ctl.camera().position(FLY_DURATION_MS);
        assert_eq!(center, LngLat::new(-96.7, 40.8));
        assert_eq!(zoom, SEARCH_ZOOM);
    }

    #[test]
    fn new_search_replaces_the_popup() {
        let mut ctl = MapController::default();
        ctl.show_search_result(-96.7, 40.8, "first".into(), 0.0);
        ctl.show_search_result(-104.9, 39.7, "second".into(), 10.0);

        let popup = ctl.search_popup().unwrap();
        assert_eq!(popup.html, "second");
        assert_eq!(popup.at, LngLat::new(-104.9, 39.7));
    }

    #[test]
    fn clear_search_drops_popup_and_flies_home() {
        let mut ctl = MapController::default();
        ctl.show_search_result(-96.7, 40.8, "hit".into(), 0.0);
        ctl.clear_search(FLY_DURATION_MS);

        assert!(ctl.search_popup().is_none());
        let (center, zoom) = ctl.camera().position(FLY_DURATION_MS * 2.0);
        assert_eq!(center, HOME_CENTER);
        assert_eq!(zoom, HOME_ZOOM);
    }

    #[test]
    fn clear_search_without_popup_still_flies_home() {
        let mut ctl = MapController::default();
        ctl.camera_mut().pan(300.0, 200.0, 0.0);
        ctl.clear_search(10.0);
        let (center, zoom) = ctl.camera().position(10.0 + FLY_DURATION_MS);
        assert_eq!(center, HOME_CENTER);
        assert_eq!(zoom, HOME_ZOOM);
    }

    #[test]
    fn reset_view_keeps_the_popup() {
        let mut ctl = MapController::default();
        ctl.show_search_result(-96.7, 40.8, "hit".into(), 0.0);
        ctl.reset_view(FLY_DURATION_MS);

        assert!(ctl.search_popup().is_some());
        let (center, zoom) = ctl.camera().position(FLY_DURATION_MS * 2.0);
        assert_eq!(center, HOME_CENTER);
        assert_eq!(zoom, HOME_ZOOM);
    }

    #[test]
    fn dismiss_popup_leaves_the_camera_alone() {
        let mut ctl = MapController::default();
        ctl.show_search_result(-96.7, 40.8, "hit".into(), 0.0);
        let during = ctl.camera().position(100.0);

        ctl.dismiss_popup();
        assert!(ctl.search_popup().is_none());
        assert_eq!(ctl.camera().position(100.0), during);
    }
}
