// Utility helpers for parsing and basic statistics.
//
// This module centralizes the forgiving text parsing and every guarded
// division, so the analyzers can assume typed values and never see NaN.
use chrono::{NaiveDate, NaiveDateTime};
use num_format::{Locale, ToFormattedString};

/// Parse a non-negative integer, being forgiving about formatting issues
/// common in exports (thousands separators, whitespace, `12.0`).
///
/// Negative, fractional-garbage or alphabetic values yield `None` so a bad
/// cell degrades to "no data" instead of poisoning a sum.
pub fn parse_u64_safe(s: Option<&str>) -> Option<u64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    if let Ok(v) = s.parse::<u64>() {
        return Some(v);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Some(v.round() as u64),
        _ => None,
    }
}

pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    // Dates are local calendar dates in `YYYY-MM-DD`; a trailing time part is ignored.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let day = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

pub fn parse_datetime_safe(s: Option<&str>) -> Option<NaiveDateTime> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

pub fn parse_flag(s: Option<&str>) -> bool {
    matches!(
        s.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "y")
    )
}

/// Round to 2 decimals, half away from zero.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// `num / den` rounded to 2 decimals, `None` on a zero denominator.
pub fn ratio(num: f64, den: f64) -> Option<f64> {
    if den == 0.0 {
        return None;
    }
    let v = num / den;
    v.is_finite().then(|| round2(v))
}

/// `num / den` as a percentage rounded to 2 decimals, `None` on a zero
/// denominator.
pub fn percent(num: u64, den: u64) -> Option<f64> {
    if den == 0 {
        return None;
    }
    Some(round2(num as f64 / den as f64 * 100.0))
}

/// Nearest-rank percentile over an ascending slice: index
/// `ceil(p * n) - 1`, clamped to `[0, n - 1]`.
pub fn percentile_nearest_rank(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let n = sorted.len();
    let rank = (p * n as f64).ceil() as i64 - 1;
    let idx = rank.clamp(0, n as i64 - 1) as usize;
    Some(round2(sorted[idx]))
}

/// Population standard deviation of `values`; `None` unless at least two
/// entries are non-zero.
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    if values.iter().filter(|v| **v != 0.0).count() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some(round2(variance.sqrt()))
}

/// Relative growth in percent, `None` when there is no non-zero baseline.
pub fn growth(current: f64, previous: f64) -> Option<f64> {
    if previous == 0.0 {
        return None;
    }
    let v = (current - previous) / previous * 100.0;
    v.is_finite().then(|| round2(v))
}

pub fn month_label(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| chrono::Month::try_from(m).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_default()
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals with locale-aware thousands separators (`1,234,567.89`).
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: u64 = int_part.parse().unwrap_or(0);
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

/// Renders an optional rate for console tables; absent values show as `-`.
pub fn format_opt(n: Option<f64>, decimals: usize) -> String {
    n.map(|v| format_number(v, decimals))
        .unwrap_or_else(|| "-".to_string())
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_u64_tolerates_separators_and_rejects_garbage() {
        assert_eq!(parse_u64_safe(Some(" 1,234 ")), Some(1234));
        assert_eq!(parse_u64_safe(Some("12.0")), Some(12));
        assert_eq!(parse_u64_safe(Some("-3")), None);
        assert_eq!(parse_u64_safe(Some("n/a")), None);
        assert_eq!(parse_u64_safe(Some("")), None);
        assert_eq!(parse_u64_safe(None), None);
    }

    #[test]
    fn parse_datetime_accepts_common_layouts() {
        let a = parse_datetime_safe(Some("2024-03-01 10:15")).unwrap();
        let b = parse_datetime_safe(Some("2024-03-01T10:15:00")).unwrap();
        assert_eq!(a, b);
        assert!(parse_datetime_safe(Some("01/03/2024")).is_none());
    }

    #[test]
    fn parse_date_ignores_time_suffix() {
        let d = parse_date_safe(Some("2024-12-31T23:00:00")).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn zero_denominators_yield_none() {
        assert_eq!(percent(5, 0), None);
        assert_eq!(ratio(1.0, 0.0), None);
        assert_eq!(growth(10.0, 0.0), None);
    }

    #[test]
    fn percent_rounds_to_two_decimals() {
        assert_eq!(percent(1, 3), Some(33.33));
        assert_eq!(percent(2, 3), Some(66.67));
    }

    #[test]
    fn nearest_rank_percentiles() {
        let v: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        assert_eq!(percentile_nearest_rank(&v, 0.5), Some(5.0));
        assert_eq!(percentile_nearest_rank(&v, 0.9), Some(9.0));
        assert_eq!(percentile_nearest_rank(&v, 0.95), Some(10.0));
        assert_eq!(percentile_nearest_rank(&[7.0], 0.5), Some(7.0));
        assert_eq!(percentile_nearest_rank(&[], 0.5), None);
    }

    #[test]
    fn std_dev_needs_two_non_zero_entries() {
        assert_eq!(population_std_dev(&[0.0, 5.0, 0.0]), None);
        assert_eq!(population_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), Some(2.0));
    }

    #[test]
    fn growth_sign_follows_direction() {
        assert_eq!(growth(120.0, 100.0), Some(20.0));
        assert_eq!(growth(50.0, 100.0), Some(-50.0));
    }

    #[test]
    fn month_labels() {
        assert_eq!(month_label(1), "January");
        assert_eq!(month_label(12), "December");
        assert_eq!(month_label(13), "");
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-42.5, 1), "-42.5");
        assert_eq!(format_opt(None, 2), "-");
        assert_eq!(format_int(9855u64), "9,855");
    }
}
