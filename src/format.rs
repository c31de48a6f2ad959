//! Display formatting for counters, table cells and map popups.
//!
//! Nothing here fails: absent values fall back to a zero representation.

use num_format::{Locale, ToFormattedString};

/// Abbreviation thresholds, largest first.
const UNITS: [(f64, &str); 4] = [(1.0e12, "t"), (1.0e9, "b"), (1.0e6, "m"), (1.0e3, "k")];

/// One-decimal abbreviated magnitude, e.g. `1500 → "1.5k"`, `42 → "42.0"`.
/// Absent input formats as `"0.0"`.
pub fn format_magnitude(value: Option<i64>) -> String {
    match value {
        Some(v) => abbreviate(v as f64),
        None => "0.0".to_string(),
    }
}

/// Signed abbreviated delta for "today" figures: `"+1.5k"`, or `"+0"` when the
/// value is absent or zero. Negative corrections keep their own sign.
pub fn format_delta(value: Option<i64>) -> String {
    match value {
        Some(v) if v > 0 => format!("+{}", abbreviate(v as f64)),
        Some(v) if v < 0 => abbreviate(v as f64),
        _ => "+0".to_string(),
    }
}

/// Full count with thousands separators, e.g. `1234567 → "1,234,567"`.
pub fn format_count(value: i64) -> String {
    value.to_formatted_string(&Locale::en)
}

fn abbreviate(v: f64) -> String {
    let abs = v.abs();
    let mut idx = UNITS.iter().position(|(scale, _)| abs >= *scale);
    let scaled = |i: Option<usize>| match i {
        Some(i) => v / UNITS[i].0,
        None => v,
    };
    // 999_960 rounds to "1000.0k"; show it as "1.0m" instead.
    let rounded = (scaled(idx) * 10.0).round() / 10.0;
    if rounded.abs() >= 1000.0 {
        idx = match idx {
            None => Some(UNITS.len() - 1),
            Some(0) => Some(0),
            Some(i) => Some(i - 1),
        };
    }
    let suffix = idx.map(|i| UNITS[i].1).unwrap_or("");
    format!("{:.1}{}", scaled(idx), suffix)
}
