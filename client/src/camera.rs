use countymap_shared::geo::{self, LngLat};

use crate::config::{FLY_DURATION_MS, HOME_CENTER, HOME_ZOOM, MAX_BOUNDS};

/// Pixel size of the mercator world at zoom zero.
const TILE_SIZE: f64 = 512.0;
const MIN_ZOOM: f64 = 3.0;
const MAX_ZOOM: f64 = 14.0;
const WHEEL_SENSITIVITY: f64 = 0.0025;
const ZOOM_STEP_MS: f64 = 300.0;

/// Camera manages the center/zoom view state. It only moves through
/// explicit calls: host-driven flights, the nav buttons, and pointer
/// gestures on the surface. Flights are evaluated from the clock, so
/// reading a position never mutates anything.
#[derive(Debug, Clone)]
pub struct Camera {
    center: LngLat,
    zoom: f64,
    flight: Option<Flight>,
}

#[derive(Debug, Clone)]
struct Flight {
    from: (f64, f64),
    to: (f64, f64),
    from_zoom: f64,
    to_zoom: f64,
    start_time: f64,
    duration: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            center: HOME_CENTER,
            zoom: HOME_ZOOM,
            flight: None,
        }
    }
}

impl Camera {
    /// Current center and zoom, eased along an in-progress flight.
    pub fn position(&self, now: f64) -> (LngLat, f64) {
        if let Some(f) = &self.flight {
            let elapsed = now - f.start_time;
            if elapsed < f.duration {
                let t = cubic_ease_out(elapsed / f.duration);
                let x = f.from.0 + (f.to.0 - f.from.0) * t;
                let y = f.from.1 + (f.to.1 - f.from.1) * t;
                let zoom = f.from_zoom + (f.to_zoom - f.from_zoom) * t;
                return (geo::unproject(x, y), zoom);
            }
        }
        (self.center, self.zoom)
    }

    pub fn is_animating(&self, now: f64) -> bool {
        self.flight
            .as_ref()
            .is_some_and(|f| now - f.start_time < f.duration)
    }

    /// Screen transform for a canvas of the given CSS-pixel size.
    pub fn viewport(&self, width: f64, height: f64, now: f64) -> Viewport {
        let (center, zoom) = self.position(now);
        let (cx, cy) = geo::project(center);
        Viewport {
            center_x: cx,
            center_y: cy,
            world: world_size(zoom),
            width,
            height,
        }
    }

    /// Start an eased flight to the target. The center interpolates in
    /// projected space so the path stays straight on screen.
    pub fn fly_to(&mut self, target: LngLat, zoom: f64, now: f64) {
        self.start_flight(target, zoom, now, FLY_DURATION_MS);
    }

    pub fn fly_home(&mut self, now: f64) {
        self.fly_to(HOME_CENTER, HOME_ZOOM, now);
    }

    /// Animated single-step zoom for the nav buttons. The center stays
    /// put, so the step reads as a straight zoom.
    pub fn zoom_step(&mut self, delta_zoom: f64, now: f64) {
        let (center, zoom) = self.position(now);
        self.start_flight(center, zoom + delta_zoom, now, ZOOM_STEP_MS);
    }

    /// Pan by a screen-space pointer delta. Interrupts any flight.
    pub fn pan(&mut self, dx: f64, dy: f64, now: f64) {
        self.interrupt(now);
        let world = world_size(self.zoom);
        let (x, y) = geo::project(self.center);
        self.center = MAX_BOUNDS.clamp(geo::unproject(x - dx / world, y - dy / world));
    }

    /// Zoom toward a focus point (screen coordinates). Interrupts any
    /// flight.
    pub fn zoom_at(&mut self, delta: f64, sx: f64, sy: f64, width: f64, height: f64, now: f64) {
        self.interrupt(now);
        let old_world = world_size(self.zoom);
        let (cx, cy) = geo::project(self.center);
        let anchor_x = cx + (sx - width / 2.0) / old_world;
        let anchor_y = cy + (sy - height / 2.0) / old_world;

        self.zoom = (self.zoom - delta * WHEEL_SENSITIVITY).clamp(MIN_ZOOM, MAX_ZOOM);

        // Move the center so the point under the cursor stays fixed.
        let new_world = world_size(self.zoom);
        let new_cx = anchor_x - (sx - width / 2.0) / new_world;
        let new_cy = anchor_y - (sy - height / 2.0) / new_world;
        self.center = MAX_BOUNDS.clamp(geo::unproject(new_cx, new_cy));
    }

    fn start_flight(&mut self, target: LngLat, zoom: f64, now: f64, duration: f64) {
        let (center, current_zoom) = self.position(now);
        let target = MAX_BOUNDS.clamp(target);
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.flight = Some(Flight {
            from: geo::project(center),
            to: geo::project(target),
            from_zoom: current_zoom,
            to_zoom: zoom,
            start_time: now,
            duration,
        });
        self.center = target;
        self.zoom = zoom;
    }

    /// Fold the animated position into plain state and drop the
    /// flight. Gestures call this first so they act on what the user
    /// sees.
    fn interrupt(&mut self, now: f64) {
        if self.flight.is_some() {
            let (center, zoom) = self.position(now);
            self.center = center;
            self.zoom = zoom;
            self.flight = None;
        }
    }
}

fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * zoom.exp2()
}

/// Cubic ease-out: decelerating to zero velocity.
fn cubic_ease_out(t: f64) -> f64 {
    let t = t - 1.0;
    t * t * t + 1.0
}

/// A frozen screen transform: projected world coordinates to CSS
/// pixels on a canvas of the captured size.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    center_x: f64,
    center_y: f64,
    world: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Convert projected world coordinates to screen coordinates.
    pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
        (
            (wx - self.center_x) * self.world + self.width / 2.0,
            (wy - self.center_y) * self.world + self.height / 2.0,
        )
    }

    /// Convert screen coordinates to projected world coordinates.
    pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
        (
            (sx - self.width / 2.0) / self.world + self.center_x,
            (sy - self.height / 2.0) / self.world + self.center_y,
        )
    }

    pub fn lnglat_to_screen(&self, p: LngLat) -> (f64, f64) {
        let (x, y) = geo::project(p);
        self.world_to_screen(x, y)
    }

    pub fn screen_to_lnglat(&self, sx: f64, sy: f64) -> LngLat {
        let (x, y) = self.screen_to_world(sx, sy);
        geo::unproject(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn boots_at_home_view() {
        let cam = Camera::default();
        let (center, zoom) = cam.position(0.0);
        assert_eq!(center, HOME_CENTER);
        assert_eq!(zoom, HOME_ZOOM);
        assert!(!cam.is_animating(0.0));
    }

    #[test]
    fn viewport_roundtrips_screen_coordinates() {
        let cam = Camera::default();
        let vp = cam.viewport(800.0, 600.0, 0.0);
        let p = vp.screen_to_lnglat(123.0, 456.0);
        let (sx, sy) = vp.lnglat_to_screen(p);
        assert!(close(sx, 123.0));
        assert!(close(sy, 456.0));

        // The center projects to the middle of the canvas.
        let (cx, cy) = vp.lnglat_to_screen(HOME_CENTER);
        assert!(close(cx, 400.0));
        assert!(close(cy, 300.0));
    }

    #[test]
    fn pan_moves_center_against_the_drag() {
        let mut cam = Camera::default();
        cam.pan(50.0, 0.0, 0.0);
        let (center, _) = cam.position(0.0);
        assert!(center.lng < HOME_CENTER.lng);
        assert!(close(center.lat, HOME_CENTER.lat));
    }

    #[test]
    fn pan_clamps_to_max_bounds() {
        let mut cam = Camera::default();
        for _ in 0..200 {
            cam.pan(5_000.0, -5_000.0, 0.0);
        }
        let (center, _) = cam.position(0.0);
        assert_eq!(center, MAX_BOUNDS.clamp(center));
        assert!(close(center.lng, MAX_BOUNDS.sw.lng));
        assert!(close(center.lat, MAX_BOUNDS.sw.lat));
    }

    #[test]
    fn zoom_at_keeps_focus_fixed() {
        let mut cam = Camera::default();
        let before = cam.viewport(800.0, 600.0, 0.0).screen_to_lnglat(200.0, 150.0);
        cam.zoom_at(-400.0, 200.0, 150.0, 800.0, 600.0, 0.0);
        let after_vp = cam.viewport(800.0, 600.0, 0.0);
        let after = after_vp.screen_to_lnglat(200.0, 150.0);
        assert!(close(before.lng, after.lng));
        assert!(close(before.lat, after.lat));

        let (_, zoom) = cam.position(0.0);
        assert!(zoom > HOME_ZOOM);
    }

    #[test]
    fn zoom_clamps_to_limits() {
        let mut cam = Camera::default();
        cam.zoom_at(1.0e9, 400.0, 300.0, 800.0, 600.0, 0.0);
        assert!(close(cam.position(0.0).1, MIN_ZOOM));
        cam.zoom_at(-1.0e9, 400.0, 300.0, 800.0, 600.0, 0.0);
        assert!(close(cam.position(0.0).1, MAX_ZOOM));
    }

    #[test]
    fn fly_to_eases_between_endpoints() {
        let mut cam = Camera::default();
        let target = LngLat::new(-96.7, 40.8);
        cam.fly_to(target, 8.0, 1_000.0);

        let (start, start_zoom) = cam.position(1_000.0);
        assert!(close(start.lng, HOME_CENTER.lng));
        assert!(close(start.lat, HOME_CENTER.lat));
        assert!(close(start_zoom, HOME_ZOOM));
        assert!(cam.is_animating(1_000.0));

        let (mid, mid_zoom) = cam.position(1_000.0 + FLY_DURATION_MS / 2.0);
        assert!(mid.lng > HOME_CENTER.lng.min(target.lng) && mid.lng < HOME_CENTER.lng.max(target.lng));
        assert!(mid_zoom > HOME_ZOOM && mid_zoom < 8.0);

        let done = 1_000.0 + FLY_DURATION_MS;
        let (end, end_zoom) = cam.position(done);
        assert_eq!(end, target);
        assert_eq!(end_zoom, 8.0);
        assert!(!cam.is_animating(done));
    }

    #[test]
    fn fly_home_returns_to_the_boot_view() {
        let mut cam = Camera::default();
        cam.fly_to(LngLat::new(-96.7, 40.8), 8.0, 0.0);
        cam.fly_home(10_000.0);
        let (center, zoom) = cam.position(10_000.0 + FLY_DURATION_MS);
        assert_eq!(center, HOME_CENTER);
        assert_eq!(zoom, HOME_ZOOM);
    }

    #[test]
    fn gesture_interrupts_flight() {
        let mut cam = Camera::default();
        cam.fly_to(LngLat::new(-96.7, 40.8), 8.0, 0.0);
        let mid = FLY_DURATION_MS / 2.0;
        let (frozen, frozen_zoom) = cam.position(mid);

        cam.pan(0.0, 0.0, mid);
        assert!(!cam.is_animating(mid));
        let (center, zoom) = cam.position(FLY_DURATION_MS * 2.0);
        assert!(close(center.lng, frozen.lng));
        assert!(close(center.lat, frozen.lat));
        assert!(close(zoom, frozen_zoom));
    }

    #[test]
    fn zoom_step_animates_to_the_next_level() {
        let mut cam = Camera::default();
        cam.zoom_step(1.0, 0.0);
        assert!(cam.is_animating(100.0));
        let (center, zoom) = cam.position(ZOOM_STEP_MS);
        assert_eq!(center, HOME_CENTER);
        assert!(close(zoom, HOME_ZOOM + 1.0));
    }
}
