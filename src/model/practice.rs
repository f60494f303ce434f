use serde::{Deserialize, Serialize};

use crate::model::location::Location;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Practice {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<Location>,
    pub notes: Option<String>,
    // Opaque to the schedule logic; only used for display classes.
    pub status: Option<String>,
}
