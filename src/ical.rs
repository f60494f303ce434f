use chrono::{DateTime, Datelike, NaiveDate, Utc};
use icalendar::{Calendar, Component, EventLike, Property, ValueType};
use tracing::{info, instrument};

use crate::format::TBD;
use crate::model::location::Location;
use crate::model::tournament::Tournament;
use crate::temporal::parse_calendar_date;

pub const PRODID: &str = "-//Savage U//Tournament Schedule//EN";
pub const UID_DOMAIN: &str = "savageu.com";
pub const CALENDAR_MIME_TYPE: &str = "text/calendar";
pub const DEFAULT_CALENDAR_NAME: &str = "Tournaments";

/// One all-day entry derived from a tournament.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    /// (year, month, day)
    pub start: (i32, u32, u32),
    pub duration_days: i64,
    pub location: String,
    pub description: String,
}

impl CalendarEvent {
    /// `None` when the tournament has no readable start date.
    pub fn from_tournament(tournament: &Tournament) -> Option<Self> {
        let start = parse_calendar_date(tournament.start_date.as_deref())?;
        let end = parse_calendar_date(tournament.end_date.as_deref());
        let venue = tournament.location.as_ref();

        let location = venue
            .and_then(|l| l.display_address().or_else(|| l.display_name()))
            .unwrap_or(TBD)
            .to_string();

        let mut description = format!("Location: {}", venue.and_then(Location::display_name).unwrap_or(TBD));
        if let Some(notes) = tournament.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            description.push_str("\nNotes: ");
            description.push_str(&notes.replace("\r\n", "\n"));
        }

        Some(Self {
            id: tournament.id.clone(),
            title: tournament.title.clone(),
            start: (start.year(), start.month(), start.day()),
            duration_days: duration_days(start, end),
            location,
            description,
        })
    }

    pub fn uid(&self) -> String {
        format!("{}@{}", self.id, UID_DOMAIN)
    }
}

/// Inclusive day count: 1 for a single day, `end - start + 1` otherwise.
/// An end before the start is treated as single-day.
pub fn duration_days(start: NaiveDate, end: Option<NaiveDate>) -> i64 {
    match end {
        Some(end) if end > start => (end - start).num_days() + 1,
        _ => 1,
    }
}

/// Whether an export would contain at least one event.
pub fn can_export(tournaments: &[Tournament]) -> bool {
    tournaments.iter().any(|t| parse_calendar_date(t.start_date.as_deref()).is_some())
}

pub fn calendar_filename(schedule_title: Option<&str>) -> String {
    match non_blank(schedule_title) {
        Some(title) => format!("{}-tournaments.ics", title),
        None => "tournaments.ics".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarExport {
    pub filename: String,
    pub document: String,
}

/// Build the ICS document for a tournament list.
///
/// `generated_at` is stamped into every DTSTAMP; everything else depends
/// only on the input list.
#[instrument(level = "info", skip(tournaments), fields(tournaments = tournaments.len()))]
pub fn build_calendar(
    tournaments: &[Tournament],
    schedule_title: Option<&str>,
    generated_at: DateTime<Utc>,
) -> CalendarExport {
    let events: Vec<CalendarEvent> = tournaments.iter().filter_map(CalendarEvent::from_tournament).collect();
    let title = non_blank(schedule_title);
    let dtstamp = generated_at.format("%Y%m%dT%H%M%SZ").to_string();

    let mut cal = Calendar::empty();
    cal.append_property(Property::new("VERSION", "2.0"));
    cal.append_property(Property::new("PRODID", PRODID));
    cal.append_property(Property::new("CALSCALE", "GREGORIAN"));
    cal.append_property(Property::new("METHOD", "PUBLISH"));
    cal.append_property(Property::new("X-WR-CALNAME", title.unwrap_or(DEFAULT_CALENDAR_NAME)));
    cal.append_property(Property::new("X-WR-TIMEZONE", "UTC"));

    for event in &events {
        let (year, month, day) = event.start;
        let mut ics_event = icalendar::Event::new();
        ics_event.uid(&event.uid());
        ics_event.add_property("DTSTAMP", &dtstamp);

        let mut dtstart = Property::new("DTSTART", format!("{:04}{:02}{:02}", year, month, day));
        dtstart.append_parameter(ValueType::Date);
        ics_event.append_property(dtstart);

        ics_event.add_property("DURATION", format!("P{}D", event.duration_days));
        ics_event.summary(&event.title);
        ics_event.location(&event.location);
        ics_event.description(&event.description);
        cal.push(ics_event.done());
    }
    let document = cal.done().to_string();

    info!(events = events.len(), bytes = document.len(), "Built tournament calendar");
    CalendarExport { filename: calendar_filename(title), document }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
