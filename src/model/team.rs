use serde::{Deserialize, Serialize};

use crate::model::null_as_default;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    pub sport: Option<String>,
    pub image: Option<TeamImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamImage {
    pub asset: Option<ImageAsset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAsset {
    pub url: Option<String>,
}

impl Team {
    pub fn image_url(&self) -> Option<&str> {
        self.image.as_ref()?.asset.as_ref()?.url.as_deref()
    }
}
