use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use lambda_runtime::{Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

use crate::config::Config;
use crate::delivery::{export_tournaments, Attachment, Capture};
use crate::format::{page_title, GameCard, PracticeCard, TeamCard, TournamentCard};
use crate::gateway::QueryGateway;
use crate::model::scope::{Resolution, ScheduleScope};
use crate::model::tournament::Tournament;
use crate::sanity::SanityClient;
use crate::schedule::{find_team, load_practices, load_teams, load_tournaments, TournamentSchedule};
use crate::temporal::{parse_calendar_date, LocalFrame};
use crate::view::ViewState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Practices,
    Tournaments,
    Teams,
    Export,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub sport: Option<String>,
    #[serde(default)]
    pub views: Vec<View>,
    /// Calendar name and filename prefix for exports; defaults to the page title.
    #[serde(default)]
    pub schedule_title: Option<String>,
    /// `YYYY-MM-DD` override for the cutoff day.
    #[serde(default)]
    pub today: Option<String>,
}

impl Request {
    pub fn scope(&self) -> ScheduleScope {
        ScheduleScope {
            team_id: self.team_id.clone(),
            team_name: self.team_name.clone(),
            sport: self.sport.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentListing {
    pub featured: Option<TournamentCard>,
    pub upcoming: Vec<TournamentCard>,
    pub standalone_games: Vec<GameCard>,
}

impl TournamentListing {
    pub fn new(schedule: &TournamentSchedule, frame: &LocalFrame) -> Self {
        Self {
            featured: schedule.featured.as_ref().map(|t| TournamentCard::new(t, frame)),
            upcoming: schedule.upcoming.iter().map(|t| TournamentCard::new(t, frame)).collect(),
            standalone_games: schedule.standalone_games.iter().map(|g| GameCard::new(g, frame)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub title: Option<String>,
    /// Scope the views were actually queried with.
    pub scope: ScheduleScope,
    pub today: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub practices: Option<ViewState<Vec<PracticeCard>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tournaments: Option<ViewState<TournamentListing>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teams: Option<ViewState<Vec<TeamCard>>>,
    /// Absent when export was not requested or no tournament is eligible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export: Option<Attachment>,
}

/// Shared dependencies for every invocation.
pub struct Backend {
    pub gateway: Arc<dyn QueryGateway>,
    pub frame: LocalFrame,
}

impl Backend {
    pub fn new(gateway: Arc<dyn QueryGateway>, frame: LocalFrame) -> Self {
        Self { gateway, frame }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(SanityClient::new(config.sanity.clone())), config.frame)
    }
}

#[instrument(skip(event, backend))]
pub async fn handler(event: LambdaEvent<Request>, backend: Arc<Backend>) -> Result<Response, Error> {
    let payload = event.payload;
    match respond(payload, backend, Utc::now()).await {
        Ok(response) => Ok(response),
        Err(e) => {
            error!(error = %e, "Rejected request");
            Err(Error::from(e))
        }
    }
}

/// Serve one request at a fixed `now`. Only a malformed request fails;
/// query failures are reported per view.
pub async fn respond(request: Request, backend: Arc<Backend>, now: DateTime<Utc>) -> Result<Response, String> {
    let today = match request.today.as_deref() {
        Some(raw) => parse_calendar_date(Some(raw)).ok_or_else(|| format!("Invalid today override: {}", raw))?,
        None => backend.frame.today(now),
    };

    // Default to the team schedule page: practices and tournaments.
    let requested = if request.views.is_empty() {
        vec![View::Practices, View::Tournaments]
    } else {
        request.views.clone()
    };
    let mut views: Vec<View> = Vec::with_capacity(requested.len());
    for v in requested {
        if !views.contains(&v) {
            views.push(v);
        }
    }

    let (scope, page) = resolve_scope(request.scope(), &backend).await;
    info!(?scope, %today, ?views, "Serving schedule request");

    let practices_task = views.contains(&View::Practices).then(|| {
        let (backend, scope) = (backend.clone(), scope.clone());
        tokio::task::spawn_blocking(move || load_practices(&*backend.gateway, &scope, today, &backend.frame))
    });
    let tournaments_task = (views.contains(&View::Tournaments) || views.contains(&View::Export)).then(|| {
        let (backend, scope) = (backend.clone(), scope.clone());
        tokio::task::spawn_blocking(move || load_tournaments(&*backend.gateway, &scope, today, &backend.frame))
    });
    let teams_task = views.contains(&View::Teams).then(|| {
        let backend = backend.clone();
        tokio::task::spawn_blocking(move || load_teams(&*backend.gateway))
    });

    let frame = backend.frame;
    let practices = join("practices", practices_task).await.map(|result| {
        ViewState::from_result(result, Vec::is_empty)
            .map(|list| list.iter().map(|p| PracticeCard::new(p, &frame)).collect::<Vec<PracticeCard>>())
    });
    let teams = join("teams", teams_task)
        .await
        .map(|result| {
            ViewState::from_result(result, Vec::is_empty)
                .map(|list| list.iter().map(TeamCard::new).collect::<Vec<TeamCard>>())
        });

    let schedule_title = request
        .schedule_title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .or_else(|| page.clone());

    let mut export = None;
    let mut tournaments = None;
    if let Some(result) = join("tournaments", tournaments_task).await {
        if views.contains(&View::Export) {
            export = match &result {
                Ok(schedule) => export_attachment(schedule, schedule_title.as_deref(), now),
                Err(e) => {
                    warn!(error = %e, "Skipping export, tournaments unavailable");
                    None
                }
            };
        }
        if views.contains(&View::Tournaments) {
            tournaments = Some(
                ViewState::from_result(result, TournamentSchedule::is_empty)
                    .map(|schedule| TournamentListing::new(&schedule, &frame)),
            );
        }
    }

    Ok(Response { title: page, scope, today, practices, tournaments, teams, export })
}

/// Turn a (name, sport) address into an identifier scope when a matching
/// team exists; otherwise keep querying by name and sport.
async fn resolve_scope(scope: ScheduleScope, backend: &Arc<Backend>) -> (ScheduleScope, Option<String>) {
    let address = match scope.resolution() {
        Resolution::Named { team_name: Some(name), sport: Some(sport) } => Some((name.to_string(), sport.to_string())),
        Resolution::Named { team_name, sport } => {
            let title = Some(page_title(team_name, sport)).filter(|t| !t.is_empty());
            return (scope.clone(), title);
        }
        _ => None,
    };
    let Some((team_name, sport)) = address else {
        return (scope, None);
    };

    let backend = backend.clone();
    let (name, sp) = (team_name.clone(), sport.clone());
    let lookup = tokio::task::spawn_blocking(move || find_team(&*backend.gateway, &name, &sp)).await;
    let fallback_title = Some(page_title(Some(team_name.as_str()), Some(sport.as_str())));

    match lookup {
        Ok(Ok(Some(team))) => {
            info!(team_id = %team.id, team_name = %team.name, "Resolved team from address");
            let title = page_title(Some(team.name.as_str()), team.sport.as_deref().or(Some(sport.as_str())));
            (ScheduleScope::team(team.id), Some(title))
        }
        Ok(Ok(None)) => {
            warn!(%team_name, %sport, "No team document for address, filtering by name and sport");
            (scope, fallback_title)
        }
        Ok(Err(e)) => {
            error!(error = %e, "Team lookup failed, filtering by name and sport");
            (scope, fallback_title)
        }
        Err(e) => {
            error!(error = %e, "Team lookup task join error");
            (scope, fallback_title)
        }
    }
}

fn export_attachment(schedule: &TournamentSchedule, title: Option<&str>, now: DateTime<Utc>) -> Option<Attachment> {
    let list: Vec<Tournament> = schedule.tournaments().cloned().collect();
    let mut capture = Capture::default();
    match export_tournaments(&mut capture, &list, title, now) {
        Ok(true) => capture.files.pop(),
        Ok(false) => None,
        Err(e) => {
            error!(error = %e, "Failed to export tournaments");
            None
        }
    }
}

async fn join<T>(view: &'static str, task: Option<JoinHandle<Result<T, String>>>) -> Option<Result<T, String>> {
    let handle = task?;
    Some(match handle.await {
        Ok(result) => {
            if let Err(e) = &result {
                error!(view, error = %e, "View query failed");
            }
            result
        }
        Err(e) => Err(format!("{} task join error: {}", view, e)),
    })
}
