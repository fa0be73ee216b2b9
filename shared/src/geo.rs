use serde::{Deserialize, Serialize};

/// A geographic position in degrees. Longitude first, matching GeoJSON
/// coordinate order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

/// An axis-aligned geographic box, south-west and north-east corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LngLatBounds {
    pub sw: LngLat,
    pub ne: LngLat,
}

impl LngLatBounds {
    pub const fn new(sw: LngLat, ne: LngLat) -> Self {
        Self { sw, ne }
    }

    pub fn contains(&self, p: LngLat) -> bool {
        p.lng >= self.sw.lng && p.lng <= self.ne.lng && p.lat >= self.sw.lat && p.lat <= self.ne.lat
    }

    /// Clamp a position into the box, component-wise.
    pub fn clamp(&self, p: LngLat) -> LngLat {
        LngLat {
            lng: p.lng.clamp(self.sw.lng, self.ne.lng),
            lat: p.lat.clamp(self.sw.lat, self.ne.lat),
        }
    }
}

/// Web-mercator projection into the unit square. (0, 0) is the
/// north-west corner of the world, (1, 1) the south-east.
pub fn project(p: LngLat) -> (f64, f64) {
    let x = (p.lng + 180.0) / 360.0;
    let lat_rad = p.lat.to_radians();
    let y = (1.0 - lat_rad.tan().asinh() / std::f64::consts::PI) / 2.0;
    (x, y)
}

/// Inverse of [`project`].
pub fn unproject(x: f64, y: f64) -> LngLat {
    let lng = x * 360.0 - 180.0;
    let lat = (std::f64::consts::PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees();
    LngLat { lng, lat }
}

/// Even-odd ray cast against a single linear ring. The ring may be
/// open or closed; a degenerate ring never contains anything.
pub fn point_in_ring(lng: f64, lat: f64, ring: &[[f64; 2]]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let [xi, yi] = ring[i];
        let [xj, yj] = ring[j];
        if (yi > lat) != (yj > lat) && lng < (xj - xi) * (lat - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Even-odd containment for a polygon given as outer ring plus holes.
pub fn point_in_polygon(lng: f64, lat: f64, rings: &[Vec<[f64; 2]>]) -> bool {
    let mut crossings = 0;
    for ring in rings {
        if point_in_ring(lng, lat, ring) {
            crossings += 1;
        }
    }
    crossings % 2 == 1
}
