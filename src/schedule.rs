use chrono::{NaiveDate, NaiveDateTime};
use tracing::{info, instrument, warn};

use crate::gateway::{fetch, QueryGateway};
use crate::model::game::Game;
use crate::model::practice::Practice;
use crate::model::scope::ScheduleScope;
use crate::model::team::Team;
use crate::model::tournament::{Tournament, TournamentDocument};
use crate::query::Query;
use crate::temporal::{parse_calendar_date, LocalFrame};

/// Tournaments split into the featured (next) one and the rest, plus
/// standalone games.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TournamentSchedule {
    pub featured: Option<Tournament>,
    pub upcoming: Vec<Tournament>,
    pub standalone_games: Vec<Game>,
}

impl TournamentSchedule {
    /// Order and split a fetched document.
    pub fn from_document(doc: TournamentDocument, frame: &LocalFrame) -> Self {
        let mut tournaments = doc.tournaments;
        let standalone_games = partition_games(&mut tournaments, doc.standalone_games, frame);
        sort_tournaments(&mut tournaments);

        let mut rest = tournaments.into_iter();
        let featured = rest.next();
        Self { featured, upcoming: rest.collect(), standalone_games }
    }

    pub fn is_empty(&self) -> bool {
        self.featured.is_none() && self.standalone_games.is_empty()
    }

    /// All tournaments in chronological order, featured first.
    pub fn tournaments(&self) -> impl Iterator<Item = &Tournament> {
        self.featured.iter().chain(self.upcoming.iter())
    }
}

/// Start of a game: its timestamp, or local midnight of its date.
pub fn game_start(game: &Game, frame: &LocalFrame) -> Option<NaiveDateTime> {
    frame
        .parse_instant(game.start_time.as_deref())
        .or_else(|| parse_calendar_date(game.date.as_deref())?.and_hms_opt(0, 0, 0))
}

/// Ascending by start instant; practices without a readable start go last.
pub fn sort_practices(practices: &mut [Practice], frame: &LocalFrame) {
    practices.sort_by_cached_key(|p| none_last(frame.parse_instant(p.start_time.as_deref())));
}

/// Ascending by start date; undated tournaments go last.
pub fn sort_tournaments(tournaments: &mut [Tournament]) {
    tournaments.sort_by_cached_key(|t| none_last(parse_calendar_date(t.start_date.as_deref())));
}

pub fn sort_games(games: &mut [Game], frame: &LocalFrame) {
    games.sort_by_cached_key(|g| none_last(game_start(g, frame)));
}

/// Drop practices whose start falls on a local day before `today`.
/// Practices without a readable start are kept.
pub fn retain_upcoming_practices(practices: &mut Vec<Practice>, today: NaiveDate, frame: &LocalFrame) {
    practices.retain(|p| {
        frame
            .parse_instant(p.start_time.as_deref())
            .is_none_or(|start| start.date() >= today)
    });
}

/// Baseball teams first, then by name ignoring case.
///
/// Names compare by their Unicode lowercase form, code point by code point.
/// That matches dictionary order for the club's ASCII team names but is not
/// a locale collation: accented initials sort after `z`. Names equal up to
/// case keep a stable order by their original spelling.
pub fn sort_teams(teams: &mut [Team]) {
    let is_baseball = |t: &Team| t.sport.as_deref().is_some_and(|s| s.trim().eq_ignore_ascii_case("baseball"));
    teams.sort_by_cached_key(|t| (!is_baseball(t), t.name.to_lowercase(), t.name.clone()));
}

/// Attach games that name a listed tournament to it and return the
/// standalone ones. Games whose tournament is not listed are dropped.
/// Every game list ends up sorted by start.
pub fn partition_games(tournaments: &mut [Tournament], games: Vec<Game>, frame: &LocalFrame) -> Vec<Game> {
    let mut standalone = Vec::new();
    for game in games {
        let Some(parent_id) = game.tournament.as_ref().map(|r| r.id.clone()) else {
            standalone.push(game);
            continue;
        };
        match tournaments.iter_mut().find(|t| t.id == parent_id) {
            Some(parent) => {
                if !parent.games.iter().any(|g| g.id == game.id) {
                    parent.games.push(game);
                }
            }
            None => warn!(game_id = %game.id, tournament_id = %parent_id, "Dropping game for unlisted tournament"),
        }
    }
    for t in tournaments.iter_mut() {
        sort_games(&mut t.games, frame);
    }
    sort_games(&mut standalone, frame);
    standalone
}

// Key wrapper that puts `None` after every `Some`.
fn none_last<T: Ord>(key: Option<T>) -> (bool, Option<T>) {
    (key.is_none(), key)
}

#[instrument(level = "info", skip(gateway, frame))]
pub fn load_practices(
    gateway: &dyn QueryGateway,
    scope: &ScheduleScope,
    today: NaiveDate,
    frame: &LocalFrame,
) -> Result<Vec<Practice>, String> {
    let mut practices: Vec<Practice> = fetch(gateway, &Query::practices(scope, today))?.unwrap_or_default();
    retain_upcoming_practices(&mut practices, today, frame);
    sort_practices(&mut practices, frame);
    info!(count = practices.len(), "Loaded practices");
    Ok(practices)
}

#[instrument(level = "info", skip(gateway, frame))]
pub fn load_tournaments(
    gateway: &dyn QueryGateway,
    scope: &ScheduleScope,
    today: NaiveDate,
    frame: &LocalFrame,
) -> Result<TournamentSchedule, String> {
    let doc: TournamentDocument = fetch(gateway, &Query::tournaments(scope, today))?.unwrap_or_default();
    let schedule = TournamentSchedule::from_document(doc, frame);
    info!(
        tournaments = schedule.tournaments().count(),
        standalone_games = schedule.standalone_games.len(),
        "Loaded tournaments"
    );
    Ok(schedule)
}

#[instrument(level = "info", skip(gateway))]
pub fn load_teams(gateway: &dyn QueryGateway) -> Result<Vec<Team>, String> {
    let mut teams: Vec<Team> = fetch(gateway, &Query::teams())?.unwrap_or_default();
    sort_teams(&mut teams);
    Ok(teams)
}

/// Team document matching a path-style (name, sport) address, if any.
#[instrument(level = "info", skip(gateway))]
pub fn find_team(gateway: &dyn QueryGateway, team_name: &str, sport: &str) -> Result<Option<Team>, String> {
    fetch(gateway, &Query::team_by_name(team_name, sport))
}
