use web_sys::{CanvasRenderingContext2d, CanvasWindingRule};

use countymap_shared::LngLat;
use countymap_shared::colors::hex_with_alpha;
use countymap_shared::county::{Feature, FeatureId};

use crate::camera::Viewport;
use crate::layers::{FillLayer, FillPaint, StyleRegistry};

/// Backdrop behind every layer, a flat water tone.
const BACKGROUND: &str = "#dce8f0";
/// Screen-space cull margin in CSS pixels.
const CULL_MARGIN: f64 = 32.0;

/// CSS fill style for one feature of a layer.
pub fn fill_css(paint: &FillPaint, feature: &Feature, hovered: bool) -> String {
    hex_with_alpha(paint.color_for(feature), paint.opacity_for(hovered))
}

/// Paint the whole frame: backdrop, then every layer in paint order.
pub fn paint(
    ctx: &CanvasRenderingContext2d,
    vp: &Viewport,
    style: &StyleRegistry,
    hovered: Option<FeatureId>,
) {
    ctx.set_fill_style_str(BACKGROUND);
    ctx.fill_rect(0.0, 0.0, vp.width, vp.height);

    for (layer, source) in style.paint_order() {
        paint_fill_layer(ctx, vp, layer, &source.data.features, hovered);
    }
}

fn paint_fill_layer(
    ctx: &CanvasRenderingContext2d,
    vp: &Viewport,
    layer: &FillLayer,
    features: &[Feature],
    hovered: Option<FeatureId>,
) {
    for feature in features {
        if offscreen(vp, feature) {
            continue;
        }
        let is_hovered = feature.id.is_some() && feature.id == hovered;
        ctx.set_fill_style_str(&fill_css(&layer.paint, feature, is_hovered));
        trace_feature(ctx, vp, feature);
        // Even-odd keeps holes open regardless of ring winding.
        ctx.fill_with_canvas_winding_rule(CanvasWindingRule::Evenodd);
    }
}

/// True when the feature's bounding box misses the canvas entirely.
fn offscreen(vp: &Viewport, feature: &Feature) -> bool {
    let Some((w, s, e, n)) = feature.geometry.bbox() else {
        return true;
    };
    // North edge has the smaller projected y.
    let (left, top) = vp.lnglat_to_screen(LngLat::new(w, n));
    let (right, bottom) = vp.lnglat_to_screen(LngLat::new(e, s));
    right < -CULL_MARGIN
        || bottom < -CULL_MARGIN
        || left > vp.width + CULL_MARGIN
        || top > vp.height + CULL_MARGIN
}

fn trace_feature(ctx: &CanvasRenderingContext2d, vp: &Viewport, feature: &Feature) {
    ctx.begin_path();
    for rings in feature.geometry.polygons() {
        for ring in rings {
            let mut first = true;
            for &[lng, lat] in ring {
                let (sx, sy) = vp.lnglat_to_screen(LngLat::new(lng, lat));
                if first {
                    ctx.move_to(sx, sy);
                    first = false;
                } else {
                    ctx.line_to(sx, sy);
                }
            }
            ctx.close_path();
        }
    }
}
