use serde::{Deserialize, Deserializer};

pub mod game;
pub mod location;
pub mod practice;
pub mod scope;
pub mod team;
pub mod tournament;

/// The content store returns `null` for empty sub-queries and unset arrays;
/// treat those the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reference to another document (`{"_ref": "..."}`).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "_ref")]
    pub id: String,
}
