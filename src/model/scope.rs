use serde::{Deserialize, Serialize};

/// Which team's records a query returns.
///
/// Blank strings are treated as unset, since the name/sport pair usually
/// comes straight from a path-style address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleScope {
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub sport: Option<String>,
}

/// The single active resolution mode of a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    Team(&'a str),
    Named { team_name: Option<&'a str>, sport: Option<&'a str> },
    All,
}

impl ScheduleScope {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn team(team_id: impl Into<String>) -> Self {
        Self { team_id: Some(team_id.into()), ..Self::default() }
    }

    pub fn named(team_name: Option<&str>, sport: Option<&str>) -> Self {
        Self {
            team_id: None,
            team_name: team_name.map(str::to_string),
            sport: sport.map(str::to_string),
        }
    }

    /// Identifier wins over name/sport when both are supplied.
    pub fn resolution(&self) -> Resolution<'_> {
        if let Some(id) = present(&self.team_id) {
            return Resolution::Team(id);
        }
        match (present(&self.team_name), present(&self.sport)) {
            (None, None) => Resolution::All,
            (team_name, sport) => Resolution::Named { team_name, sport },
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
