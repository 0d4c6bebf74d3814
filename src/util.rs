// Parsing and formatting helpers.
//
// Cell parsing is kept here so the loader can assume typed values, and the
// formatting used by previews and the KPI sheet lives in one place.
use chrono::NaiveDateTime;
use num_format::{Locale, ToFormattedString};

/// Parse a numeric CSV cell into `f64`.
///
/// - Surrounding whitespace is ignored; an empty cell is `None`.
/// - Commas are rejected outright: `4,5` is ambiguous between a decimal
///   comma and a thousands separator.
/// - Exponents (`4e0`) are accepted; `NaN` and infinities are not.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() || s.contains(',') {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus locale-aware thousands separators (`1,234.50`).
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

/// Render a list of scores the way the KPI sheet shows them: `[5, 4.5]`.
pub fn format_scores(v: &[f64]) -> String {
    let inner: Vec<String> = v.iter().map(|s| s.to_string()).collect();
    format!("[{}]", inner.join(", "))
}

/// ISO-8601 with microseconds, no offset (the clock is read in UTC).
pub fn format_timestamp(t: &NaiveDateTime) -> String {
    t.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}
