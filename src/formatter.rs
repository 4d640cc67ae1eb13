//! Display formatting helpers.
//!
//! Rupiah amounts and the Indonesian "medium date, short time" timestamp
//! printed on every task document.

use chrono::{DateTime, Datelike, TimeZone, Timelike};

const CURRENCY_PREFIX: &str = "Rp";
const THOUSANDS_SEPARATOR: char = '.';

/// Abbreviated month names for the id-ID locale.
const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

/// Format an amount as Indonesian Rupiah (e.g. `Rp150.000`).
///
/// Whole units only: the amount is rounded half away from zero. Negative
/// amounts keep their sign in front of the currency prefix.
pub fn format_currency(amount: f64) -> String {
    if amount.is_nan() {
        return format!("{CURRENCY_PREFIX}NaN");
    }
    if amount.is_infinite() {
        let sign = if amount < 0.0 { "-" } else { "" };
        return format!("{sign}{CURRENCY_PREFIX}∞");
    }

    let rounded = amount.round();
    // -0.4 rounds to -0, which prints without a sign.
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    format!("{sign}{CURRENCY_PREFIX}{}", group_thousands(&digits))
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(THOUSANDS_SEPARATOR);
        }
        out.push(ch);
    }
    out
}

/// Format a timestamp the way the id-ID locale prints a medium date with a
/// short time, e.g. `19 Okt 2026, 09.41`.
pub fn format_generated_at<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    let month = MONTHS_SHORT[(at.month0() as usize).min(MONTHS_SHORT.len() - 1)];
    format!(
        "{} {} {}, {:02}.{:02}",
        at.day(),
        month,
        at.year(),
        at.hour(),
        at.minute()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_format_currency_zero() {
        assert_eq!(format_currency(0.0), "Rp0");
    }

    #[test]
    fn test_format_currency_groups_thousands() {
        assert_eq!(format_currency(999.0), "Rp999");
        assert_eq!(format_currency(1000.0), "Rp1.000");
        assert_eq!(format_currency(150000.0), "Rp150.000");
        assert_eq!(format_currency(1234567.0), "Rp1.234.567");
    }

    #[test]
    fn test_format_currency_rounds_to_whole_rupiah() {
        assert_eq!(format_currency(1499.5), "Rp1.500");
        assert_eq!(format_currency(1499.4), "Rp1.499");
        assert_eq!(format_currency(0.4), "Rp0");
        assert_eq!(format_currency(-0.4), "Rp0");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(-25000.0), "-Rp25.000");
    }

    #[test]
    fn test_format_currency_non_finite() {
        assert_eq!(format_currency(f64::NAN), "RpNaN");
        assert_eq!(format_currency(f64::INFINITY), "Rp∞");
        assert_eq!(format_currency(f64::NEG_INFINITY), "-Rp∞");
    }

    #[test]
    fn test_format_currency_more_groups_for_larger_amounts() {
        let groups = |s: String| s.matches(THOUSANDS_SEPARATOR).count();
        let amounts = [1.0, 1_000.0, 1_000_000.0, 1_000_000_000.0, 1e12];
        for pair in amounts.windows(2) {
            assert!(groups(format_currency(pair[0])) < groups(format_currency(pair[1])));
        }
    }

    #[test]
    fn test_format_generated_at() {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 9, 5, 0).unwrap();
        assert_eq!(format_generated_at(&at), "19 Okt 2026, 09.05");

        let wib = FixedOffset::east_opt(7 * 3600).unwrap();
        let at = wib.with_ymd_and_hms(2025, 8, 1, 23, 59, 0).unwrap();
        assert_eq!(format_generated_at(&at), "1 Agu 2025, 23.59");
    }
}
