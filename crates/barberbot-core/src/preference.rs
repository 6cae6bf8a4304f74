//! Time-of-day preferences used to narrow availability.
//!
//! The three named buckets partition a day with no gaps: `morning` is
//! everything before 12:00, `afternoon` is 12:00 up to (not including)
//! 17:00, `evening` is 17:00 onwards. Boundaries belong to the later bucket.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveTime, Timelike, Utc};

use crate::time::local_time;
use crate::validate::ValidationError;

const NOON: u32 = 12;
const EVENING_START: u32 = 17;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimePreference {
    #[default]
    Any,
    Morning,
    Afternoon,
    Evening,
    /// At or after the given local time.
    After(NaiveTime),
    /// Strictly before the given local time.
    Before(NaiveTime),
}

impl TimePreference {
    /// Whether a local wall-clock time satisfies the preference.
    pub fn matches(&self, local: NaiveTime) -> bool {
        let hour = local.hour();
        match self {
            Self::Any => true,
            Self::Morning => hour < NOON,
            Self::Afternoon => (NOON..EVENING_START).contains(&hour),
            Self::Evening => hour >= EVENING_START,
            Self::After(t) => local >= *t,
            Self::Before(t) => local < *t,
        }
    }

    /// Checks an instant against the preference in the given local offset.
    pub fn matches_instant(&self, instant: DateTime<Utc>, offset: &FixedOffset) -> bool {
        self.matches(local_time(instant, offset))
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }
}

impl fmt::Display for TimePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Morning => f.write_str("morning"),
            Self::Afternoon => f.write_str("afternoon"),
            Self::Evening => f.write_str("evening"),
            Self::After(t) => write!(f, "after {}", t.format("%H:%M")),
            Self::Before(t) => write!(f, "before {}", t.format("%H:%M")),
        }
    }
}

impl FromStr for TimePreference {
    type Err = ValidationError;

    /// Accepts `any`, `morning`, `afternoon`, `evening`, `after <time>` and
    /// `before <time>`, where `<time>` is `15:00`, `3pm` or `3:30 pm`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let invalid = || {
            ValidationError::new(
                "time preference",
                format!("'{}' is not morning, afternoon, evening, after HH:MM or before HH:MM", s.trim()),
            )
        };

        match normalized.as_str() {
            "" | "any" => return Ok(Self::Any),
            "morning" => return Ok(Self::Morning),
            "afternoon" => return Ok(Self::Afternoon),
            "evening" => return Ok(Self::Evening),
            _ => {}
        }

        if let Some(rest) = normalized.strip_prefix("after") {
            return parse_clock(rest).map(Self::After).ok_or_else(invalid);
        }
        if let Some(rest) = normalized.strip_prefix("before") {
            return parse_clock(rest).map(Self::Before).ok_or_else(invalid);
        }
        Err(invalid())
    }
}

/// Parses `15:00`, `9`, `3pm`, `3:30 pm` into a time of day.
fn parse_clock(raw: &str) -> Option<NaiveTime> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    let (body, pm) = if let Some(body) = compact.strip_suffix("am") {
        (body, Some(false))
    } else if let Some(body) = compact.strip_suffix("pm") {
        (body, Some(true))
    } else {
        (compact.as_str(), None)
    };

    let (hour, minute) = match body.split_once(':') {
        Some((h, m)) => (h.parse::<u32>().ok()?, m.parse::<u32>().ok()?),
        None => (body.parse::<u32>().ok()?, 0),
    };

    let hour = match pm {
        Some(pm) => {
            if !(1..=12).contains(&hour) {
                return None;
            }
            hour % 12 + if pm { 12 } else { 0 }
        }
        None => hour,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn buckets_partition_the_day() {
        let buckets = [
            TimePreference::Morning,
            TimePreference::Afternoon,
            TimePreference::Evening,
        ];
        for minute_of_day in 0..(24 * 60) {
            let time = t(minute_of_day / 60, minute_of_day % 60);
            let hits = buckets.iter().filter(|b| b.matches(time)).count();
            assert_eq!(hits, 1, "{time} matched {hits} buckets");
        }
    }

    #[test]
    fn boundaries_belong_to_later_bucket() {
        assert!(!TimePreference::Morning.matches(t(12, 0)));
        assert!(TimePreference::Afternoon.matches(t(12, 0)));
        assert!(TimePreference::Morning.matches(t(11, 59)));
        assert!(!TimePreference::Afternoon.matches(t(17, 0)));
        assert!(TimePreference::Evening.matches(t(17, 0)));
        assert!(TimePreference::Afternoon.matches(t(16, 59)));
    }

    #[test]
    fn after_and_before() {
        let after = TimePreference::After(t(15, 0));
        assert!(after.matches(t(15, 0)));
        assert!(!after.matches(t(14, 59)));

        let before = TimePreference::Before(t(10, 30));
        assert!(before.matches(t(10, 29)));
        assert!(!before.matches(t(10, 30)));
    }

    #[test]
    fn parse_named_buckets() {
        assert_eq!("Morning".parse::<TimePreference>().unwrap(), TimePreference::Morning);
        assert_eq!(" evening ".parse::<TimePreference>().unwrap(), TimePreference::Evening);
        assert_eq!("".parse::<TimePreference>().unwrap(), TimePreference::Any);
        assert_eq!("any".parse::<TimePreference>().unwrap(), TimePreference::Any);
    }

    #[test]
    fn parse_clock_forms() {
        assert_eq!("after 3pm".parse::<TimePreference>().unwrap(), TimePreference::After(t(15, 0)));
        assert_eq!("after 15:00".parse::<TimePreference>().unwrap(), TimePreference::After(t(15, 0)));
        assert_eq!("before 9:30 am".parse::<TimePreference>().unwrap(), TimePreference::Before(t(9, 30)));
        assert_eq!("before 12am".parse::<TimePreference>().unwrap(), TimePreference::Before(t(0, 0)));
        assert_eq!("after 12pm".parse::<TimePreference>().unwrap(), TimePreference::After(t(12, 0)));
    }

    #[test]
    fn parse_rejects_garbage() {
        for raw in ["lunchtime", "after", "after 25:00", "before 13pm", "after noonish"] {
            let err = raw.parse::<TimePreference>().unwrap_err();
            assert_eq!(err.field, "time preference", "{raw}");
        }
    }

    #[test]
    fn display_roundtrips() {
        for pref in [
            TimePreference::Any,
            TimePreference::Afternoon,
            TimePreference::After(t(15, 30)),
            TimePreference::Before(t(8, 0)),
        ] {
            assert_eq!(pref.to_string().parse::<TimePreference>().unwrap(), pref);
        }
    }
}
