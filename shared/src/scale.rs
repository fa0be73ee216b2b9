//! Population choropleth scale: a step classification over county
//! population plus the hover opacity rule.

/// Step thresholds. A population lands in band `i` when it is at least
/// `POPULATION_STEPS[i - 1]` and below `POPULATION_STEPS[i]`.
pub const POPULATION_STEPS: [f64; 3] = [10_000.0, 30_000.0, 50_000.0];

/// Fill colors for the four bands, lightest first.
pub const BAND_COLORS: [&str; 4] = ["#d0f3d0", "#a1e9a1", "#99EA85", "#66c456"];

pub const HOVER_OPACITY: f64 = 1.0;
pub const BASE_OPACITY: f64 = 0.6;

/// Band index for a population, 0 through `POPULATION_STEPS.len()`.
/// Thresholds are inclusive lower bounds.
pub fn band_index(population: f64) -> usize {
    POPULATION_STEPS.iter().filter(|&&step| population >= step).count()
}

pub fn band_color(population: f64) -> &'static str {
    BAND_COLORS[band_index(population)]
}

/// Half-open population range of a band, `None` for an unbounded end.
/// Indexes past the last band have no bounds at all.
pub fn band_range(index: usize) -> (Option<f64>, Option<f64>) {
    let lower = index
        .checked_sub(1)
        .and_then(|i| POPULATION_STEPS.get(i))
        .copied();
    let upper = POPULATION_STEPS.get(index).copied();
    (lower, upper)
}

pub fn fill_opacity(hovered: bool) -> f64 {
    if hovered { HOVER_OPACITY } else { BASE_OPACITY }
}
