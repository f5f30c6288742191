//! Presentation formatting
//!
//! pt-BR renderings of amounts, ratios and timestamps shown next to
//! anomalies and reports.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_DISPLAY: &str = "%d/%m/%Y %H:%M";
const DATE_DISPLAY: &str = "%d/%m/%Y";

/// Format an amount as Brazilian reais, e.g. `R$ 1.500,00`
pub fn format_currency(amount: f64) -> String {
    let rounded = (amount * 100.0).round() / 100.0;
    let negative = rounded < 0.0;
    let fixed = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let sign = if negative { "-" } else { "" };
    format!("{}R$ {},{}", sign, group_thousands(int_part), frac_part)
}

/// Format a 0–1 ratio as a percentage with one decimal, e.g. `87,5%`
pub fn format_percentage(ratio: f64) -> String {
    let fixed = format!("{:.1}", ratio * 100.0);
    format!("{}%", fixed.replace('.', ","))
}

/// Format a backend timestamp as `dd/mm/yyyy HH:MM`
///
/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS[.f]`, `YYYY-MM-DD HH:MM:SS`
/// and plain dates. Anything else is returned unchanged.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(DATETIME_DISPLAY).to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return dt.format(DATETIME_DISPLAY).to_string();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format(DATE_DISPLAY).to_string();
    }
    raw.to_string()
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("1000"), "1.000");
        assert_eq!(group_thousands("1234567"), "1.234.567");
    }

    #[test]
    fn test_negative_zero_has_no_sign() {
        assert_eq!(format_currency(-0.001), "R$ 0,00");
    }
}
