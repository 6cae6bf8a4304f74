//! Time normalization for booking slots.
//!
//! The upstream platforms speak two dialects: Reservanto sends and expects
//! epoch seconds, Reservio sends and expects ISO-8601 strings with an
//! explicit offset. Internally every instant is a [`DateTime<Utc>`];
//! presentation and query windows use the business's fixed local offset.
//!
//! No DST handling is done. The target region's offset is treated as
//! constant over the short windows a booking conversation looks at.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

/// Default local offset in seconds east of UTC (Europe/Prague, winter time).
pub const DEFAULT_UTC_OFFSET_SECS: i32 = 3600;

/// ISO-8601 layout used for outbound query parameters and booking payloads.
const ISO_WITH_OFFSET: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Returns the default fixed local offset.
pub fn default_offset() -> FixedOffset {
    FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECS).expect("valid offset")
}

/// Builds a fixed offset from seconds east of UTC.
///
/// Returns `None` when the value is outside +/-24h.
pub fn offset_from_secs(secs: i32) -> Option<FixedOffset> {
    FixedOffset::east_opt(secs)
}

/// Converts platform epoch seconds to a UTC instant.
pub fn from_epoch_seconds(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

/// Parses an ISO-8601/RFC 3339 string carrying an offset into a UTC instant.
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw.trim()).map(|dt| dt.with_timezone(&Utc))
}

/// Formats an instant as ISO-8601 in the given local offset,
/// e.g. `2025-10-07T14:00:00+01:00`.
pub fn to_local_iso(dt: DateTime<Utc>, offset: &FixedOffset) -> String {
    dt.with_timezone(offset).format(ISO_WITH_OFFSET).to_string()
}

/// Formats an instant as a short clock label, e.g. `9:00 AM`.
pub fn display_time(dt: DateTime<Utc>, offset: &FixedOffset) -> String {
    dt.with_timezone(offset).format("%-I:%M %p").to_string()
}

/// Returns the wall-clock time of an instant in the given offset.
pub fn local_time(dt: DateTime<Utc>, offset: &FixedOffset) -> NaiveTime {
    dt.with_timezone(offset).time()
}

/// Returns the local calendar date of an instant in the given offset.
pub fn local_date(dt: DateTime<Utc>, offset: &FixedOffset) -> NaiveDate {
    dt.with_timezone(offset).date_naive()
}

/// Coarse request timestamp (seconds since epoch) attached to outbound calls.
pub fn request_timestamp(now: DateTime<Utc>) -> i64 {
    now.timestamp()
}

/// A closed query window over one local calendar day.
///
/// Runs from `00:00:00` to `23:59:59` local time, both inclusive, which is
/// the shape both platforms accept for availability queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    /// First instant of the window (inclusive).
    pub start: DateTime<Utc>,
    /// Last instant of the window (inclusive).
    pub end: DateTime<Utc>,
    /// Offset used to encode the window for the upstream.
    pub offset: FixedOffset,
}

impl TimeWindow {
    /// Creates a window for a single local day.
    pub fn for_date(date: NaiveDate, offset: FixedOffset) -> Self {
        let start = offset
            .from_local_datetime(&date.and_time(NaiveTime::MIN))
            .single()
            .expect("fixed offsets are never ambiguous")
            .with_timezone(&Utc);
        let last = NaiveTime::from_hms_opt(23, 59, 59).expect("valid time");
        let end = offset
            .from_local_datetime(&date.and_time(last))
            .single()
            .expect("fixed offsets are never ambiguous")
            .with_timezone(&Utc);
        Self { start, end, offset }
    }

    /// The local date this window covers.
    pub fn date(&self) -> NaiveDate {
        local_date(self.start, &self.offset)
    }

    /// Window start as ISO-8601 with the local offset.
    pub fn start_iso(&self) -> String {
        to_local_iso(self.start, &self.offset)
    }

    /// Window end as ISO-8601 with the local offset.
    pub fn end_iso(&self) -> String {
        to_local_iso(self.end, &self.offset)
    }

    /// Window start as epoch seconds.
    pub fn start_epoch(&self) -> i64 {
        self.start.timestamp()
    }

    /// Window end as epoch seconds.
    pub fn end_epoch(&self) -> i64 {
        self.end.timestamp()
    }

    /// Checks whether an instant falls inside the window (both ends inclusive).
    pub fn contains(&self, dt: DateTime<Utc>) -> bool {
        self.start <= dt && dt <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_window_uses_local_midnight() {
        let window = TimeWindow::for_date(date(2025, 10, 7), default_offset());
        assert_eq!(window.start, utc(2025, 10, 6, 23, 0, 0));
        assert_eq!(window.end, utc(2025, 10, 7, 22, 59, 59));
        assert_eq!(window.start_iso(), "2025-10-07T00:00:00+01:00");
        assert_eq!(window.end_iso(), "2025-10-07T23:59:59+01:00");
        assert_eq!(window.date(), date(2025, 10, 7));
    }

    #[test]
    fn day_window_epoch_bounds() {
        let window = TimeWindow::for_date(date(1970, 1, 2), offset_from_secs(0).unwrap());
        assert_eq!(window.start_epoch(), 86_400);
        assert_eq!(window.end_epoch(), 2 * 86_400 - 1);
    }

    #[test]
    fn window_contains_is_inclusive() {
        let window = TimeWindow::for_date(date(2025, 10, 7), default_offset());
        assert!(window.contains(window.start));
        assert!(window.contains(window.end));
        assert!(!window.contains(window.end + chrono::Duration::seconds(1)));
    }

    #[test]
    fn epoch_seconds_to_instant() {
        assert_eq!(from_epoch_seconds(0), Some(utc(1970, 1, 1, 0, 0, 0)));
        assert_eq!(
            from_epoch_seconds(1_759_842_000),
            Some(utc(2025, 10, 7, 13, 0, 0))
        );
    }

    #[test]
    fn iso_with_offset_to_instant() {
        let parsed = parse_instant("2025-10-07T14:00:00+01:00").unwrap();
        assert_eq!(parsed, utc(2025, 10, 7, 13, 0, 0));

        let zulu = parse_instant("2025-10-07T13:00:00Z").unwrap();
        assert_eq!(zulu, parsed);

        assert!(parse_instant("7th October").is_err());
    }

    #[test]
    fn display_labels() {
        let offset = default_offset();
        assert_eq!(display_time(utc(2025, 10, 7, 8, 0, 0), &offset), "9:00 AM");
        assert_eq!(display_time(utc(2025, 10, 7, 11, 0, 0), &offset), "12:00 PM");
        assert_eq!(display_time(utc(2025, 10, 7, 14, 30, 0), &offset), "3:30 PM");
        assert_eq!(display_time(utc(2025, 10, 6, 23, 5, 0), &offset), "12:05 AM");
    }

    #[test]
    fn local_iso_roundtrip_keeps_instant() {
        let offset = default_offset();
        let instant = utc(2025, 10, 7, 13, 0, 0);
        let iso = to_local_iso(instant, &offset);
        assert_eq!(iso, "2025-10-07T14:00:00+01:00");
        assert_eq!(parse_instant(&iso).unwrap(), instant);
    }

    #[test]
    fn local_components() {
        let offset = default_offset();
        let instant = utc(2025, 10, 7, 23, 30, 0);
        assert_eq!(local_date(instant, &offset), date(2025, 10, 8));
        assert_eq!(
            local_time(instant, &offset),
            NaiveTime::from_hms_opt(0, 30, 0).unwrap()
        );
    }
}
