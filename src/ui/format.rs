//! Metric-card number formatting.

use crate::data::aggregate::NOT_AVAILABLE;

/// `1_234_567` → `"1.23M"`.
pub fn millions(value: f64) -> String {
    format!("{:.2}M", value / 1e6)
}

/// `0.0425` → `"4.25%"`.
pub fn percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

/// Like [`percent`], with `"N/A"` for an undefined ratio.
pub fn percent_or_na(ratio: Option<f64>) -> String {
    ratio.map(percent).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Rounded to a whole number with thousands separators: `"12,345"`.
pub fn thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0.0 {
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

/// Short axis/bar label: `"12.3k"`, `"4.5M"`.
pub fn compact(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.1}k", value / 1e3)
    } else {
        format!("{value:.0}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_formats() {
        assert_eq!(millions(1_234_567.0), "1.23M");
        assert_eq!(millions(0.0), "0.00M");
        assert_eq!(percent(0.0425), "4.25%");
        assert_eq!(percent_or_na(None), "N/A");
        assert_eq!(percent_or_na(Some(1.5)), "150.00%");
    }

    #[test]
    fn thousands_separators() {
        assert_eq!(thousands(0.0), "0");
        assert_eq!(thousands(999.4), "999");
        assert_eq!(thousands(1000.0), "1,000");
        assert_eq!(thousands(1_234_567.6), "1,234,568");
        assert_eq!(thousands(-12_345.0), "-12,345");
    }

    #[test]
    fn compact_labels() {
        assert_eq!(compact(950.0), "950");
        assert_eq!(compact(12_300.0), "12.3k");
        assert_eq!(compact(4_500_000.0), "4.5M");
    }
}
