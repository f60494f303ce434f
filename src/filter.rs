use std::collections::BTreeMap;
use std::fmt;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::model::scope::{Resolution, ScheduleScope};

pub const PARAM_TODAY: &str = "today";
pub const PARAM_SINCE: &str = "since";
pub const PARAM_TEAM_ID: &str = "teamId";
pub const PARAM_TEAM_NAME: &str = "teamName";
pub const PARAM_SPORT: &str = "sport";

/// Content-store document types the schedule reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Practice,
    Tournament,
    Game,
    Team,
}

impl RecordKind {
    pub fn type_name(self) -> &'static str {
        match self {
            RecordKind::Practice => "practice",
            RecordKind::Tournament => "tournament",
            RecordKind::Game => "game",
            RecordKind::Team => "team",
        }
    }
}

/// One typed predicate term. Values are always referenced through a
/// named parameter, never inlined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    /// `_type == "<kind>"`
    TypeIs(RecordKind),
    /// `$param in <relation>[]._ref`
    ParamInRefs { param: &'static str, relation: &'static str },
    /// `<reference>._ref == $param`
    RefEquals { reference: &'static str, param: &'static str },
    /// `<field> == $param`
    FieldEquals { field: &'static str, param: &'static str },
    /// `<field> >= $param`
    OnOrAfter { field: &'static str, param: &'static str },
    /// `(!defined(<field>) || <field> >= $param)`
    UndefinedOrOnOrAfter { field: &'static str, param: &'static str },
    /// `!defined(<field>)`
    Undefined { field: &'static str },
    /// `references(^._id)`: the record points at the enclosing document.
    ReferencesParent,
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Clause::TypeIs(kind) => write!(f, "_type == \"{}\"", kind.type_name()),
            Clause::ParamInRefs { param, relation } => write!(f, "${} in {}[]._ref", param, relation),
            Clause::RefEquals { reference, param } => write!(f, "{}._ref == ${}", reference, param),
            Clause::FieldEquals { field, param } => write!(f, "{} == ${}", field, param),
            Clause::OnOrAfter { field, param } => write!(f, "{} >= ${}", field, param),
            Clause::UndefinedOrOnOrAfter { field, param } => {
                write!(f, "(!defined({}) || {} >= ${})", field, field, param)
            }
            Clause::Undefined { field } => write!(f, "!defined({})", field),
            Clause::ReferencesParent => f.write_str("references(^._id)"),
        }
    }
}

/// Conjunction of clauses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub clauses: Vec<Clause>,
}

impl Filter {
    pub fn of(kind: RecordKind) -> Self {
        Self { clauses: vec![Clause::TypeIs(kind)] }
    }

    pub fn and(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn contains(&self, clause: &Clause) -> bool {
        self.clauses.contains(clause)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(" && ")?;
            }
            write!(f, "{}", clause)?;
        }
        Ok(())
    }
}

/// Parameter bindings, keyed by name without the `$` sigil.
pub type Params = BTreeMap<String, String>;

/// Output of [`build_scope_filter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeFilter {
    pub filter: Filter,
    pub params: Params,
    /// Tournaments only: predicate for the games nested under each one.
    pub games: Option<Filter>,
}

/// Compose the predicate and bindings for one record kind under a scope.
///
/// `today` is supplied by the caller so the result is a pure function of
/// its inputs.
///
/// Practice start times may carry a UTC marker, so the store compares them
/// against the day before `today`; the exact local-day cutoff is applied
/// after fetching (see `schedule::retain_upcoming_practices`).
pub fn build_scope_filter(scope: &ScheduleScope, today: NaiveDate, kind: RecordKind) -> ScopeFilter {
    let mut params = Params::new();
    match kind {
        RecordKind::Practice => {
            let since = today.checked_sub_days(Days::new(1)).unwrap_or(today);
            params.insert(PARAM_SINCE.to_string(), since.format("%Y-%m-%d").to_string());
        }
        RecordKind::Team => {}
        RecordKind::Game | RecordKind::Tournament => {
            params.insert(PARAM_TODAY.to_string(), today.format("%Y-%m-%d").to_string());
        }
    }

    let mut filter = Filter::of(kind);
    for clause in team_clauses(scope, kind, &mut params) {
        filter = filter.and(clause);
    }

    let mut games = None;
    match kind {
        RecordKind::Practice => {
            filter = filter.and(Clause::OnOrAfter { field: "startTime", param: PARAM_SINCE });
        }
        RecordKind::Game => {
            filter = filter
                .and(Clause::OnOrAfter { field: "date", param: PARAM_TODAY })
                .and(Clause::Undefined { field: "tournament" });
        }
        RecordKind::Tournament => {
            filter = filter.and(Clause::UndefinedOrOnOrAfter { field: "endDate", param: PARAM_TODAY });
            let mut nested = Filter::of(RecordKind::Game)
                .and(Clause::ReferencesParent)
                .and(Clause::OnOrAfter { field: "date", param: PARAM_TODAY });
            // Bindings are already recorded by the outer pass.
            for clause in team_clauses(scope, RecordKind::Game, &mut Params::new()) {
                nested = nested.and(clause);
            }
            games = Some(nested);
        }
        RecordKind::Team => {}
    }

    ScopeFilter { filter, params, games }
}

fn team_clauses(scope: &ScheduleScope, kind: RecordKind, params: &mut Params) -> Vec<Clause> {
    let mut clauses = Vec::new();
    match scope.resolution() {
        Resolution::Team(id) => {
            params.insert(PARAM_TEAM_ID.to_string(), id.to_string());
            clauses.push(match kind {
                RecordKind::Game => Clause::RefEquals { reference: "team", param: PARAM_TEAM_ID },
                _ => Clause::ParamInRefs { param: PARAM_TEAM_ID, relation: "teams" },
            });
        }
        Resolution::Named { team_name, sport } => {
            if let Some(name) = team_name {
                params.insert(PARAM_TEAM_NAME.to_string(), name.to_string());
                clauses.push(Clause::FieldEquals { field: "teamName", param: PARAM_TEAM_NAME });
            }
            if let Some(sport) = sport {
                params.insert(PARAM_SPORT.to_string(), sport.to_string());
                clauses.push(Clause::FieldEquals { field: "sport", param: PARAM_SPORT });
            }
        }
        Resolution::All => {}
    }
    clauses
}
