use serde::{Deserialize, Serialize};
use url::Url;

use crate::model::game::Game;
use crate::model::location::Location;
use crate::model::practice::Practice;
use crate::model::team::Team;
use crate::model::tournament::Tournament;
use crate::temporal::{
    display_date, format_date, format_date_range, format_time, format_time_no_suffix, same_period, LocalFrame, NO_DATE,
    NO_TIME,
};

pub const TBD: &str = "TBD";

/// Upper-case the first character: "baseball" -> "Baseball".
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn format_sport(sport: Option<&str>) -> String {
    sport.map(capitalize).unwrap_or_default()
}

pub fn status_class(status: &str) -> String {
    format!("status status--{}", status)
}

/// "in_progress" -> "in progress"; missing status reads as "upcoming".
pub fn status_label(status: Option<&str>) -> String {
    match status.filter(|s| !s.is_empty()) {
        Some(s) => s.replace('_', " "),
        None => "upcoming".to_string(),
    }
}

/// Heading for a team page, e.g. "Savages Baseball".
pub fn page_title(team_name: Option<&str>, sport: Option<&str>) -> String {
    [team_name.map(str::to_string), Some(format_sport(sport))]
        .into_iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .collect::<Vec<String>>()
        .join(" ")
}

/// "6:30 - 8:00 PM" when both ends share a period, else "11:00 AM - 1:00 PM".
pub fn practice_time_range(frame: &LocalFrame, start: Option<&str>, end: Option<&str>) -> String {
    let start = frame.parse_instant(start);
    let end = frame.parse_instant(end);
    let start_text = match start {
        Some(s) if same_period(start, end) => format_time_no_suffix(s),
        Some(s) => format_time(s),
        None => NO_TIME.to_string(),
    };
    match end {
        Some(e) => format!("{} - {}", start_text, format_time(e)),
        None => start_text,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeCard {
    pub id: String,
    pub title: String,
    pub status_label: String,
    pub status_class: String,
    /// "Mon, Mar 3, 6:30 - 8:00 PM, @ Central Park"
    pub summary: String,
    pub location: Option<Location>,
    pub notes: Option<String>,
}

impl PracticeCard {
    pub fn new(practice: &Practice, frame: &LocalFrame) -> Self {
        let status = practice.status.as_deref().unwrap_or("scheduled");
        let date = frame
            .parse_instant(practice.start_time.as_deref())
            .map(|i| format_date(i.date()))
            .unwrap_or_else(|| NO_DATE.to_string());
        let mut summary = format!(
            "{}, {}",
            date,
            practice_time_range(frame, practice.start_time.as_deref(), practice.end_time.as_deref())
        );
        if let Some(name) = practice.location.as_ref().and_then(Location::display_name) {
            summary.push_str(", @ ");
            summary.push_str(name);
        }
        Self {
            id: practice.id.clone(),
            title: practice.title.clone().unwrap_or_default(),
            status_label: capitalize(status),
            status_class: status_class(status),
            summary,
            location: practice.location.clone(),
            notes: practice.notes.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameCard {
    pub id: String,
    /// "vs Wildcats"
    pub matchup: String,
    pub date: String,
    pub time: String,
    pub field: Option<String>,
    pub location: Option<Location>,
}

impl GameCard {
    pub fn new(game: &Game, frame: &LocalFrame) -> Self {
        Self {
            id: game.id.clone(),
            matchup: format!("vs {}", game.opponent.as_deref().unwrap_or(TBD)),
            date: display_date(game.date.as_deref()),
            time: frame.display_time(game.start_time.as_deref()),
            field: game.field_number.map(|n| format!("Field {}", n)),
            location: game.location.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentCard {
    pub id: String,
    pub title: String,
    pub status_label: String,
    pub status_class: String,
    pub dates: String,
    /// Venue name, or "TBD".
    pub location_label: String,
    /// Venue details; withheld while the location is TBD.
    pub location: Option<Location>,
    pub notes: Option<String>,
    pub website: Option<String>,
    pub games: Vec<GameCard>,
}

impl TournamentCard {
    pub fn new(tournament: &Tournament, frame: &LocalFrame) -> Self {
        let location = if tournament.location_tbd { None } else { tournament.location.clone() };
        let location_label = location
            .as_ref()
            .and_then(Location::display_name)
            .unwrap_or(TBD)
            .to_string();
        let status = tournament.status.as_deref().unwrap_or("upcoming");
        Self {
            id: tournament.id.clone(),
            title: tournament.title.clone(),
            status_label: status_label(tournament.status.as_deref()),
            status_class: status_class(status),
            dates: format_date_range(tournament.start_date.as_deref(), tournament.end_date.as_deref()),
            location_label,
            location,
            notes: tournament.notes.clone(),
            website: tournament.website.clone(),
            games: tournament.games.iter().map(|g| GameCard::new(g, frame)).collect(),
        }
    }
}

/// Percent-encoded `/{sport}/{name}` address of a team page.
pub fn team_path(sport: &str, team_name: &str) -> String {
    let Ok(mut url) = Url::parse("http://localhost/") else {
        return String::from("/");
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.clear().push(&sport.to_lowercase()).push(team_name);
    }
    url.path().to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamCard {
    pub id: String,
    pub name: String,
    pub sport: String,
    pub image_url: Option<String>,
    /// Path-style address, e.g. "/baseball/14U%20Gold".
    pub path: String,
}

impl TeamCard {
    pub fn new(team: &Team) -> Self {
        let sport = team.sport.clone().unwrap_or_default();
        Self {
            id: team.id.clone(),
            name: team.name.clone(),
            sport: format_sport(Some(sport.as_str())),
            image_url: team.image_url().map(str::to_string),
            path: team_path(&sport, &team.name),
        }
    }
}
