use countymap_shared::county::{FeatureCollection, FeatureId};

const GRID_COLS: usize = 50;
const GRID_ROWS: usize = 50;

/// A flat 2D grid over the county bounding box for cheap hover
/// hit-testing. Rebuilt whenever the county overlay is replaced, and
/// queried with the same collection it was built from. Features
/// without an id cannot hold hover state and are left out.
#[derive(Default)]
pub struct HitIndex {
    cells: Vec<Vec<usize>>,
    ids: Vec<FeatureId>,
    slots: Vec<usize>,
    wests: Vec<f64>,
    easts: Vec<f64>,
    souths: Vec<f64>,
    norths: Vec<f64>,
    min_lng: f64,
    min_lat: f64,
    cell_w: f64,
    cell_h: f64,
}

impl HitIndex {
    pub fn build(counties: &FeatureCollection) -> Self {
        let mut bounds: Option<(f64, f64, f64, f64)> = None;
        for feature in &counties.features {
            if feature.id.is_none() {
                continue;
            }
            if let Some((w, s, e, n)) = feature.geometry.bbox() {
                bounds = Some(match bounds {
                    None => (w, s, e, n),
                    Some((bw, bs, be, bn)) => (bw.min(w), bs.min(s), be.max(e), bn.max(n)),
                });
            }
        }
        let Some((mut min_lng, mut min_lat, mut max_lng, mut max_lat)) = bounds else {
            return Self::default();
        };

        // Pad so boundary points land inside the grid.
        min_lng -= 0.01;
        min_lat -= 0.01;
        max_lng += 0.01;
        max_lat += 0.01;

        let cell_w = (max_lng - min_lng) / GRID_COLS as f64;
        let cell_h = (max_lat - min_lat) / GRID_ROWS as f64;

        let mut index = Self {
            cells: vec![Vec::new(); GRID_COLS * GRID_ROWS],
            min_lng,
            min_lat,
            cell_w,
            cell_h,
            ..Self::default()
        };

        for (slot, feature) in counties.features.iter().enumerate() {
            let Some(id) = feature.id else {
                continue;
            };
            let Some((w, s, e, n)) = feature.geometry.bbox() else {
                continue;
            };

            let entry = index.ids.len();
            index.ids.push(id);
            index.slots.push(slot);
            index.wests.push(w);
            index.easts.push(e);
            index.souths.push(s);
            index.norths.push(n);

            let col_start = ((w - min_lng) / cell_w).floor().max(0.0) as usize;
            let col_end = ((e - min_lng) / cell_w).ceil().min(GRID_COLS as f64) as usize;
            let row_start = ((s - min_lat) / cell_h).floor().max(0.0) as usize;
            let row_end = ((n - min_lat) / cell_h).ceil().min(GRID_ROWS as f64) as usize;

            for row in row_start..row_end {
                for col in col_start..col_end {
                    index.cells[row * GRID_COLS + col].push(entry);
                }
            }
        }

        index
    }

    /// Find the county under a geographic position. Among overlapping
    /// counties the one drawn last wins, matching what the pointer
    /// visually rests on.
    pub fn find_at(&self, counties: &FeatureCollection, lng: f64, lat: f64) -> Option<FeatureId> {
        if self.cells.is_empty() {
            return None;
        }

        let col = ((lng - self.min_lng) / self.cell_w).floor() as isize;
        let row = ((lat - self.min_lat) / self.cell_h).floor() as isize;
        if col < 0 || row < 0 || col >= GRID_COLS as isize || row >= GRID_ROWS as isize {
            return None;
        }

        let cell = &self.cells[row as usize * GRID_COLS + col as usize];
        for &entry in cell.iter().rev() {
            if lng < self.wests[entry]
                || lng > self.easts[entry]
                || lat < self.souths[entry]
                || lat > self.norths[entry]
            {
                continue;
            }
            if let Some(feature) = counties.features.get(self.slots[entry])
                && feature.geometry.contains(lng, lat)
            {
                return Some(self.ids[entry]);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use countymap_shared::county::{Feature, Geometry, Properties};

    fn square(id: Option<u64>, w: f64, s: f64, e: f64, n: f64) -> Feature {
        Feature {
            id,
            properties: Properties::default(),
            geometry: Geometry::Polygon(vec![vec![[w, s], [e, s], [e, n], [w, n], [w, s]]]),
        }
    }

    #[test]
    fn empty_collection_finds_nothing() {
        let fc = FeatureCollection::default();
        let index = HitIndex::build(&fc);
        assert_eq!(index.find_at(&fc, -95.0, 40.0), None);
    }

    #[test]
    fn finds_the_county_under_the_point() {
        let fc = FeatureCollection {
            features: vec![
                square(Some(1), -100.0, 39.0, -99.0, 40.0),
                square(Some(2), -98.0, 39.0, -97.0, 40.0),
            ],
        };
        let index = HitIndex::build(&fc);
        assert_eq!(index.find_at(&fc, -99.5, 39.5), Some(1));
        assert_eq!(index.find_at(&fc, -97.5, 39.5), Some(2));
        assert_eq!(index.find_at(&fc, -98.5, 39.5), None);
        assert_eq!(index.find_at(&fc, -120.0, 50.0), None);
    }

    #[test]
    fn bbox_hit_still_requires_polygon_containment() {
        // A triangle occupying half its bounding box.
        let triangle = Feature {
            id: Some(1),
            properties: Properties::default(),
            geometry: Geometry::Polygon(vec![vec![
                [-100.0, 39.0],
                [-99.0, 39.0],
                [-100.0, 40.0],
                [-100.0, 39.0],
            ]]),
        };
        let fc = FeatureCollection { features: vec![triangle] };
        let index = HitIndex::build(&fc);
        assert_eq!(index.find_at(&fc, -99.8, 39.1), Some(1));
        assert_eq!(index.find_at(&fc, -99.1, 39.9), None);
    }

    #[test]
    fn topmost_wins_where_counties_overlap() {
        let fc = FeatureCollection {
            features: vec![
                square(Some(1), -100.0, 39.0, -98.0, 41.0),
                square(Some(2), -99.0, 40.0, -97.0, 42.0),
            ],
        };
        let index = HitIndex::build(&fc);
        assert_eq!(index.find_at(&fc, -98.5, 40.5), Some(2));
        assert_eq!(index.find_at(&fc, -99.5, 39.5), Some(1));
    }

    #[test]
    fn features_without_ids_are_skipped() {
        let fc = FeatureCollection {
            features: vec![
                square(None, -100.0, 39.0, -99.0, 40.0),
                square(Some(5), -99.0, 39.0, -98.0, 40.0),
            ],
        };
        let index = HitIndex::build(&fc);
        assert_eq!(index.find_at(&fc, -99.5, 39.5), None);
        assert_eq!(index.find_at(&fc, -98.5, 39.5), Some(5));
    }
}
