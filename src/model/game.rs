use serde::{Deserialize, Serialize};

use crate::model::location::Location;
use crate::model::Reference;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    #[serde(rename = "_id")]
    pub id: String,
    pub opponent: Option<String>,
    /// Date-only (`YYYY-MM-DD`) day of the game.
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub field_number: Option<u32>,
    pub location: Option<Location>,
    /// Parent tournament; `None` for standalone games.
    pub tournament: Option<Reference>,
}

impl Game {
    pub fn is_standalone(&self) -> bool {
        self.tournament.is_none()
    }
}
