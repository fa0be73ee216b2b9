use countymap_shared::county::{Feature, FeatureCollection};
use countymap_shared::scale;

use crate::config::{COUNTIES_LAYER, COUNTIES_SOURCE, MASK_FILL_COLOR, MASK_LAYER, MASK_SOURCE};

/// How a fill layer colors its features.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FillColor {
    /// One color for every feature.
    Constant(&'static str),
    /// Step scale over the population property.
    PopulationSteps,
}

/// How a fill layer picks per-feature opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FillOpacity {
    Constant(f64),
    /// The hovered feature paints opaque, everything else dimmed.
    HoverCase,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillPaint {
    pub color: FillColor,
    pub opacity: FillOpacity,
}

impl FillPaint {
    pub fn color_for(&self, feature: &Feature) -> &'static str {
        match self.color {
            FillColor::Constant(c) => c,
            FillColor::PopulationSteps => scale::band_color(feature.population()),
        }
    }

    pub fn opacity_for(&self, hovered: bool) -> f64 {
        match self.opacity {
            FillOpacity::Constant(o) => o,
            FillOpacity::HoverCase => scale::fill_opacity(hovered),
        }
    }
}

/// A named GeoJSON source holding feature data.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonSource {
    pub id: &'static str,
    pub data: FeatureCollection,
}

/// A fill layer drawing one source. Lower `rank` paints earlier, which
/// puts it beneath higher ranks no matter when each layer is created.
#[derive(Debug, Clone, PartialEq)]
pub struct FillLayer {
    pub id: &'static str,
    pub source: &'static str,
    pub rank: u8,
    pub paint: FillPaint,
}

/// The county overlay layer: stepped fill, hover-raised opacity.
pub fn counties_fill() -> FillLayer {
    FillLayer {
        id: COUNTIES_LAYER,
        source: COUNTIES_SOURCE,
        rank: 1,
        paint: FillPaint {
            color: FillColor::PopulationSteps,
            opacity: FillOpacity::HoverCase,
        },
    }
}

/// The background mask layer: solid white over everything outside the
/// mapped area. Always beneath the counties.
pub fn mask_fill() -> FillLayer {
    FillLayer {
        id: MASK_LAYER,
        source: MASK_SOURCE,
        rank: 0,
        paint: FillPaint {
            color: FillColor::Constant(MASK_FILL_COLOR),
            opacity: FillOpacity::Constant(1.0),
        },
    }
}

/// Sources and layers by name. Layers paint in rank order, lowest
/// underneath; a layer's data arriving late never lifts it above one
/// that should cover it.
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
    sources: Vec<GeoJsonSource>,
    layers: Vec<FillLayer>,
}

impl StyleRegistry {
    /// Replace a source's data in place when the name already exists,
    /// otherwise create the source and its fill layer as one step. The
    /// layer argument is only consulted on creation, so repeated calls
    /// never stack duplicate layers. New layers splice in at their
    /// rank position.
    pub fn upsert_fill(&mut self, source_id: &'static str, data: FeatureCollection, layer: FillLayer) {
        if let Some(existing) = self.sources.iter_mut().find(|s| s.id == source_id) {
            existing.data = data;
        } else {
            self.sources.push(GeoJsonSource { id: source_id, data });
            let at = self
                .layers
                .iter()
                .position(|l| l.rank > layer.rank)
                .unwrap_or(self.layers.len());
            self.layers.insert(at, layer);
        }
    }

    pub fn source(&self, id: &str) -> Option<&GeoJsonSource> {
        self.sources.iter().find(|s| s.id == id)
    }

    pub fn has_layer(&self, id: &str) -> bool {
        self.layers.iter().any(|l| l.id == id)
    }

    /// Layers paired with their sources, in paint order.
    pub fn paint_order(&self) -> impl Iterator<Item = (&FillLayer, &GeoJsonSource)> {
        self.layers
            .iter()
            .filter_map(|l| self.source(l.source).map(|s| (l, s)))
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}
