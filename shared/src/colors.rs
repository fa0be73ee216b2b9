//! Color helpers for turning palette entries into canvas fill styles.

/// Parse a `#rrggbb` string into components. Shorthand and named
/// colors are not accepted.
pub fn parse_hex(s: &str) -> Option<(u8, u8, u8)> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

pub fn rgba_css(r: u8, g: u8, b: u8, alpha: f64) -> String {
    format!("rgba({r}, {g}, {b}, {alpha})")
}

/// CSS color for a hex palette entry at the given opacity. An
/// unparseable entry is passed through untouched, which renders
/// opaque.
pub fn hex_with_alpha(hex: &str, alpha: f64) -> String {
    match parse_hex(hex) {
        Some((r, g, b)) => rgba_css(r, g, b, alpha),
        None => hex.to_string(),
    }
}
