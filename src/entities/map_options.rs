use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylesVisibility {
    pub traffic_flow: bool,
    pub traffic_incidents: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapOptions {
    #[serde(skip)]
    pub api_key: String,
    pub center: Coordinates,
    pub zoom: u8,
    pub language: String,
    pub styles_visibility: StylesVisibility,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    Fullscreen,
    Navigation,
}
