/// Format a population count with thousands separators. Fractional
/// input is rounded; counties ship whole numbers anyway.
pub fn format_count(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::format_count;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_count(0.0), "0");
        assert_eq!(format_count(999.0), "999");
        assert_eq!(format_count(1_000.0), "1,000");
        assert_eq!(format_count(25_000.0), "25,000");
        assert_eq!(format_count(1_234_567.0), "1,234,567");
    }

    #[test]
    fn rounds_fractions() {
        assert_eq!(format_count(999.6), "1,000");
        assert_eq!(format_count(12_499.4), "12,499");
    }

    #[test]
    fn keeps_sign() {
        assert_eq!(format_count(-1_234.0), "-1,234");
    }
}
