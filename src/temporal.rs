use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// Club wall-clock used when no `SCHEDULE_TIMEZONE` is configured.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Los_Angeles;

pub const NO_DATE: &str = "No date";
pub const NO_TIME: &str = "No time";
pub const NO_DATES_SET: &str = "No dates set";

// Naive layouts accepted for timestamps without offset information.
const NAIVE_PATTERNS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a strict `YYYY-MM-DD` string into a calendar date.
///
/// No time-of-day or offset is involved, so the day can never shift
/// across a UTC boundary.
pub fn parse_calendar_date(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    let bytes = s.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Short weekday, month and day, e.g. "Mon, Mar 3".
pub fn format_date(date: NaiveDate) -> String {
    date.format("%a, %b %-d").to_string()
}

/// "Saturday, March 1, 2025".
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// 12-hour clock with suffix, e.g. "6:30 PM".
pub fn format_time(instant: NaiveDateTime) -> String {
    instant.format("%-I:%M %p").to_string()
}

/// 12-hour clock without the AM/PM suffix, e.g. "6:30".
pub fn format_time_no_suffix(instant: NaiveDateTime) -> String {
    instant.format("%-I:%M").to_string()
}

/// True iff both instants are present and fall in the same half of the day.
pub fn same_period(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> bool {
    match (start, end) {
        (Some(a), Some(b)) => (a.hour() < 12) == (b.hour() < 12),
        _ => false,
    }
}

/// Date text for a raw `YYYY-MM-DD` value, or "No date".
pub fn display_date(raw: Option<&str>) -> String {
    parse_calendar_date(raw).map(format_date).unwrap_or_else(|| NO_DATE.to_string())
}

/// Single date when `end` is absent or the same day, otherwise "{start} - {end}".
pub fn format_date_range(start: Option<&str>, end: Option<&str>) -> String {
    let Some(start) = parse_calendar_date(start) else {
        return NO_DATES_SET.to_string();
    };
    match parse_calendar_date(end) {
        Some(end) if end != start => format!("{} - {}", format_date(start), format_date(end)),
        _ => format_date(start),
    }
}

/// The authoritative local wall-clock frame.
///
/// Every timestamp used for display, ordering or "not in the past" checks
/// goes through one of these so the same source value always lands on the
/// same local day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalFrame {
    tz: Tz,
}

impl Default for LocalFrame {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEZONE)
    }
}

impl LocalFrame {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Parse an ISO-8601-like timestamp into local wall-clock time.
    ///
    /// A trailing `Z` or an explicit offset is converted into the frame's
    /// zone. A timestamp with no offset is already local and is returned
    /// as written. A bare date is read as local midnight.
    pub fn parse_instant(&self, s: Option<&str>) -> Option<NaiveDateTime> {
        let s = s?.trim();
        if s.is_empty() {
            return None;
        }
        if let Some(utc) = s.strip_suffix('Z').or_else(|| s.strip_suffix('z')) {
            let naive = parse_naive(utc)?;
            return Some(self.from_utc(Utc.from_utc_datetime(&naive)));
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.with_timezone(&self.tz).naive_local());
        }
        parse_naive(s)
    }

    /// Local wall-clock reading of a UTC instant.
    pub fn from_utc(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.tz).naive_local()
    }

    /// The local calendar day containing `now`.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        self.from_utc(now).date()
    }

    /// Time text for a raw timestamp, or "No time".
    pub fn display_time(&self, raw: Option<&str>) -> String {
        self.parse_instant(raw).map(format_time).unwrap_or_else(|| NO_TIME.to_string())
    }
}

fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    for pat in NAIVE_PATTERNS.iter() {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, pat) {
            return Some(dt);
        }
    }
    parse_calendar_date(Some(s))?.and_hms_opt(0, 0, 0)
}
