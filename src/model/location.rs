use serde::{Deserialize, Serialize};

/// Venue projection shared by practices, tournaments and games.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub name: Option<String>,
    pub address: Option<String>,
    pub map_url: Option<String>,
    pub parking_info: Option<String>,
    pub notes: Option<String>,
}

impl Location {
    /// Name to show, when the venue has a non-empty one.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn display_address(&self) -> Option<&str> {
        self.address.as_deref().filter(|s| !s.trim().is_empty())
    }
}
