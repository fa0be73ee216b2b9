use serde::{Deserialize, Serialize};

use crate::geo::point_in_polygon;

/// Stable feature identifier carried in the `id` member of a GeoJSON
/// feature. Hover state is keyed on this.
pub type FeatureId = u64;

/// A GeoJSON `FeatureCollection`, reduced to the members this app
/// reads. Unknown members are ignored on parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn get(&self, id: FeatureId) -> Option<&Feature> {
        self.features.iter().find(|f| f.id == Some(id))
    }

    pub fn contains_id(&self, id: FeatureId) -> bool {
        self.get(id).is_some()
    }
}

/// One feature. County documents carry a numeric `id` plus name and
/// population properties; the mask document carries geometry only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<FeatureId>,
    #[serde(default)]
    pub properties: Properties,
    pub geometry: Geometry,
}

impl Feature {
    pub fn county_name(&self) -> &str {
        self.properties.county_name.as_deref().unwrap_or("")
    }

    pub fn population(&self) -> f64 {
        self.properties.population.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<f64>,
}

/// Polygonal GeoJSON geometry. Coordinates are `[lng, lat]` pairs,
/// rings ordered outer first with any holes following.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Polygon(Vec<Vec<[f64; 2]>>),
    MultiPolygon(Vec<Vec<Vec<[f64; 2]>>>),
}

impl Geometry {
    /// Iterate the member polygons, each a ring list.
    pub fn polygons(&self) -> std::slice::Iter<'_, Vec<Vec<[f64; 2]>>> {
        match self {
            Geometry::Polygon(rings) => std::slice::from_ref(rings).iter(),
            Geometry::MultiPolygon(polys) => polys.iter(),
        }
    }

    pub fn contains(&self, lng: f64, lat: f64) -> bool {
        self.polygons().any(|rings| point_in_polygon(lng, lat, rings))
    }

    /// Bounding box as `(min_lng, min_lat, max_lng, max_lat)`, `None`
    /// for empty geometry.
    pub fn bbox(&self) -> Option<(f64, f64, f64, f64)> {
        let mut acc: Option<(f64, f64, f64, f64)> = None;
        for rings in self.polygons() {
            for ring in rings {
                for &[lng, lat] in ring {
                    acc = Some(match acc {
                        None => (lng, lat, lng, lat),
                        Some((a, b, c, d)) => (a.min(lng), b.min(lat), c.max(lng), d.max(lat)),
                    });
                }
            }
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTIES_JSON: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": 1,
                "properties": {"county_name": "Adams", "population": 25000},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-100, 39], [-99, 39], [-99, 40], [-100, 40], [-100, 39]]]
                }
            },
            {
                "type": "Feature",
                "id": 2,
                "properties": {"county_name": "Butler", "population": 61000},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[-98, 39], [-97, 39], [-97, 40], [-98, 40], [-98, 39]]],
                        [[[-96.5, 39], [-96, 39], [-96, 39.5], [-96.5, 39.5], [-96.5, 39]]]
                    ]
                }
            }
        ]
    }"#;

    #[test]
    fn parses_county_collection() {
        let fc: FeatureCollection = serde_json::from_str(COUNTIES_JSON).unwrap();
        assert_eq!(fc.features.len(), 2);
        let adams = fc.get(1).unwrap();
        assert_eq!(adams.county_name(), "Adams");
        assert_eq!(adams.population(), 25000.0);
        assert!(fc.contains_id(2));
        assert!(!fc.contains_id(3));
    }

    #[test]
    fn parses_mask_document_without_properties() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-180, -85], [180, -85], [180, 85], [-180, 85], [-180, -85]]]
                }
            }]
        }"#;
        let fc: FeatureCollection = serde_json::from_str(json).unwrap();
        let f = &fc.features[0];
        assert_eq!(f.id, None);
        assert_eq!(f.county_name(), "");
        assert_eq!(f.population(), 0.0);
    }

    #[test]
    fn multipolygon_containment_checks_every_member() {
        let fc: FeatureCollection = serde_json::from_str(COUNTIES_JSON).unwrap();
        let butler = fc.get(2).unwrap();
        assert!(butler.geometry.contains(-97.5, 39.5));
        assert!(butler.geometry.contains(-96.25, 39.25));
        assert!(!butler.geometry.contains(-96.75, 39.25));
    }

    #[test]
    fn bbox_spans_all_members() {
        let fc: FeatureCollection = serde_json::from_str(COUNTIES_JSON).unwrap();
        let bbox = fc.get(2).unwrap().geometry.bbox().unwrap();
        assert_eq!(bbox, (-98.0, 39.0, -96.0, 40.0));
    }

    #[test]
    fn geometry_serializes_with_geojson_tag() {
        let g = Geometry::Polygon(vec![vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 0.0]]]);
        let v = serde_json::to_value(&g).unwrap();
        assert_eq!(v["type"], "Polygon");
        assert!(v["coordinates"].is_array());
    }
}
