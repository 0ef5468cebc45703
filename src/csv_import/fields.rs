//! Lenient converters for loosely formatted CSV cells.
//!
//! Every converter substitutes a default instead of failing: a cell that
//! does not parse never aborts the row.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::duration::WorkDuration;

/// Ordered header names accepted for one logical field. The first header
/// present with a non-empty value wins.
pub type Aliases = &'static [&'static str];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Thousands separators, currency markers and padding.
const AMOUNT_NOISE: &[char] = &[',', '円', '¥', '￥', ' ', '\u{3000}'];

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Blank or unparseable amounts become zero.
pub fn parse_decimal(raw: &str) -> Decimal {
    let cleaned: String = raw.chars().filter(|c| !AMOUNT_NOISE.contains(c)).collect();
    if cleaned.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(&cleaned).unwrap_or(Decimal::ZERO)
}

pub fn parse_int_or(raw: &str, default: i32) -> i32 {
    let s = raw.trim();
    if s.is_empty() {
        return default;
    }
    s.parse().unwrap_or(default)
}

pub fn parse_int(raw: &str) -> i32 {
    parse_int_or(raw, 0)
}

/// Canonical `H:MM`, or `None` for blanks, `-` and garbage.
pub fn parse_duration(raw: &str) -> Option<String> {
    WorkDuration::normalize(raw)
}

pub fn non_empty(raw: &str) -> Option<String> {
    let s = raw.trim();
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn amounts_drop_separators_and_currency() {
        assert_eq!(parse_decimal("12,345"), dec!(12345.00));
        assert_eq!(parse_decimal("1,200円"), dec!(1200));
        assert_eq!(parse_decimal("￥3,000"), dec!(3000));
        assert_eq!(parse_decimal("-450.50"), dec!(-450.50));
    }

    #[test]
    fn blank_or_garbage_amounts_are_zero() {
        assert_eq!(parse_decimal(""), dec!(0.00));
        assert_eq!(parse_decimal("   "), Decimal::ZERO);
        assert_eq!(parse_decimal("n/a"), Decimal::ZERO);
    }

    #[test]
    fn dates_accept_dash_and_slash() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 31);
        assert_eq!(parse_date("2025-01-31"), expected);
        assert_eq!(parse_date(" 2025/01/31 "), expected);
        assert_eq!(parse_date("31.01.2025"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn integers_fall_back_to_default() {
        assert_eq!(parse_int("20"), 20);
        assert_eq!(parse_int("twenty"), 0);
        assert_eq!(parse_int_or("", 1), 1);
        assert_eq!(parse_int_or("x", 1), 1);
    }

    #[test]
    fn durations_are_canonicalized() {
        assert_eq!(parse_duration("142:02:00").as_deref(), Some("142:02"));
        assert_eq!(parse_duration("-"), None);
        assert_eq!(parse_duration("soon"), None);
    }
}
