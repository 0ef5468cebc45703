use std::fmt;
use std::str::FromStr;

use derive_more::Display;
use once_cell::sync::Lazy;
use regex::Regex;

/// Worked time as exported by the attendance system.
///
/// Stored with second precision but rendered as `H:MM`; the hour
/// component is unbounded, so a monthly total of `142:02` stays 142 hours
/// rather than wrapping at a day boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct WorkDuration {
    seconds: u64,
}

#[derive(Debug, Display, PartialEq, Eq)]
#[display(fmt = "invalid duration: {:?}", _0)]
pub struct ParseDurationError(String);

impl std::error::Error for ParseDurationError {}

static DAYS_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(\d+)\s*days?\s+(.+)$").expect("valid days regex"));
static HOURS_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*(?:hours?|hrs?|h)").expect("valid hours regex"));
static MINUTES_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*(?:minutes?|mins?|m)").expect("valid minutes regex"));
static SECONDS_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*(?:seconds?|secs?|s)").expect("valid seconds regex"));

impl WorkDuration {
    /// `None` when the total does not fit in a `u64` of seconds.
    pub fn from_hms(hours: u64, minutes: u64, seconds: u64) -> Option<Self> {
        let seconds = hours
            .checked_mul(3600)?
            .checked_add(minutes.checked_mul(60)?)?
            .checked_add(seconds)?;
        Some(Self { seconds })
    }

    pub fn hours(&self) -> u64 {
        self.seconds / 3600
    }

    pub fn minutes(&self) -> u64 {
        (self.seconds % 3600) / 60
    }

    pub fn total_minutes(&self) -> u64 {
        self.seconds / 60
    }

    pub fn as_hours(&self) -> f64 {
        self.seconds as f64 / 3600.0
    }

    /// Lenient parse used at the CSV boundary: blanks, `-` and anything
    /// unparseable become `None`.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "-" {
            return None;
        }
        trimmed.parse().ok()
    }

    /// Re-render any accepted representation in canonical `H:MM` form.
    pub fn normalize(raw: &str) -> Option<String> {
        Self::parse_lenient(raw).map(|d| d.to_string())
    }

    fn parse_clock(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        if parts.len() < 2 || parts.len() > 3 {
            return None;
        }
        let number = |p: &str| -> Option<u64> {
            if p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            p.parse().ok()
        };
        let hours = number(parts[0])?;
        let minutes = number(parts[1])?;
        let seconds = match parts.get(2) {
            Some(p) => number(p)?,
            None => 0,
        };
        if minutes >= 60 || seconds >= 60 {
            return None;
        }
        Self::from_hms(hours, minutes, seconds)
    }

    fn parse_text(s: &str) -> Option<Self> {
        // outer None: the unit is present but its number does not fit
        let capture = |re: &Regex| -> Option<Option<u64>> {
            match re.captures(s).and_then(|c| c.get(1)) {
                Some(m) => m.as_str().parse().ok().map(Some),
                None => Some(None),
            }
        };
        let hours = capture(&HOURS_TEXT)?;
        let minutes = capture(&MINUTES_TEXT)?;
        let seconds = capture(&SECONDS_TEXT)?;
        if hours.is_none() && minutes.is_none() && seconds.is_none() {
            return None;
        }
        Self::from_hms(
            hours.unwrap_or(0),
            minutes.unwrap_or(0),
            seconds.unwrap_or(0),
        )
    }
}

impl FromStr for WorkDuration {
    type Err = ParseDurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let err = || ParseDurationError(s.to_string());

        // "5 days 22:02:00" style interval text
        if let Some(caps) = DAYS_PREFIX.captures(trimmed) {
            let days: u64 = caps[1].parse().map_err(|_| err())?;
            let rest = Self::parse_clock(&caps[2]).ok_or_else(err)?;
            let seconds = days
                .checked_mul(86_400)
                .and_then(|s| s.checked_add(rest.seconds))
                .ok_or_else(err)?;
            return Ok(Self { seconds });
        }

        if trimmed.contains(':') {
            return Self::parse_clock(trimmed).ok_or_else(err);
        }

        if let Ok(hours) = trimmed.parse::<f64>() {
            if !hours.is_finite() || hours < 0.0 || hours * 3600.0 >= u64::MAX as f64 {
                return Err(err());
            }
            return Ok(Self {
                seconds: (hours * 3600.0).round() as u64,
            });
        }

        Self::parse_text(trimmed).ok_or_else(err)
    }
}

impl fmt::Display for WorkDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hours(), self.minutes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_forms_exceed_a_day() {
        let d: WorkDuration = "142:02".parse().unwrap();
        assert_eq!(d.hours(), 142);
        assert_eq!(d.minutes(), 2);
        assert!((d.as_hours() - 142.033_333).abs() < 1e-5);

        let with_seconds: WorkDuration = "142:02:00".parse().unwrap();
        assert_eq!(with_seconds, d);
    }

    #[test]
    fn decimal_hours_and_interval_text() {
        let d: WorkDuration = "7.5".parse().unwrap();
        assert_eq!(d.to_string(), "7:30");

        let text: WorkDuration = "142 hours 2 minutes".parse().unwrap();
        assert_eq!(text.to_string(), "142:02");

        let days: WorkDuration = "5 days 22:02:00".parse().unwrap();
        assert_eq!(days.to_string(), "142:02");
    }

    #[test]
    fn rejects_negative_and_malformed() {
        assert!("-1:00".parse::<WorkDuration>().is_err());
        assert!("8:75".parse::<WorkDuration>().is_err());
        assert!("abc".parse::<WorkDuration>().is_err());
        assert!("1:2:3:4".parse::<WorkDuration>().is_err());
    }

    #[test]
    fn lenient_parse_treats_placeholders_as_missing() {
        assert_eq!(WorkDuration::parse_lenient(""), None);
        assert_eq!(WorkDuration::parse_lenient(" - "), None);
        assert_eq!(WorkDuration::normalize("08:05:59").as_deref(), Some("8:05"));
    }

    #[test]
    fn total_minutes_truncates_seconds() {
        let d = WorkDuration::from_hms(1, 1, 59).unwrap();
        assert_eq!(d.total_minutes(), 61);
    }

    #[test]
    fn compact_text_keeps_every_unit() {
        assert_eq!(WorkDuration::normalize("1h30m").as_deref(), Some("1:30"));
        assert_eq!(WorkDuration::normalize("2h15m30s").as_deref(), Some("2:15"));
        assert_eq!(WorkDuration::normalize("3 hrs 5 mins").as_deref(), Some("3:05"));
    }

    #[test]
    fn oversized_values_are_rejected_not_wrapped() {
        assert!("18446744073709551615:00".parse::<WorkDuration>().is_err());
        assert!("999999999999999 days 1:00".parse::<WorkDuration>().is_err());
        assert!("99999999999999999999 hours".parse::<WorkDuration>().is_err());
        assert!("99999999999999999999 hours 5 minutes".parse::<WorkDuration>().is_err());
        assert!("1e300".parse::<WorkDuration>().is_err());
        assert_eq!(WorkDuration::parse_lenient("18446744073709551615:00"), None);
        assert_eq!(WorkDuration::from_hms(u64::MAX, 0, 0), None);
    }
}
