use serde::{Deserialize, Serialize};

use crate::model::game::Game;
use crate::model::location::Location;
use crate::model::null_as_default;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    pub start_date: Option<String>,
    /// Absent for single-day tournaments.
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location_tbd: bool,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub website: Option<String>,
    pub location: Option<Location>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub games: Vec<Game>,
}

/// Shape returned by the combined tournaments + standalone games query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tournaments: Vec<Tournament>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub standalone_games: Vec<Game>,
}
