use geojson::GeoJson;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Source {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: GeoJson,
}

impl Source {
    pub fn geojson(data: GeoJson) -> Self {
        Self {
            kind: "geojson".into(),
            data,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinePaint {
    #[serde(rename = "line-color")]
    pub line_color: String,
    #[serde(rename = "line-width")]
    pub line_width: f64,
}

/// A layer as handed to the map surface; its source is registered under the
/// layer's id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub source: Source,
    pub paint: LinePaint,
}

impl Layer {
    pub fn line(id: &str, data: GeoJson, paint: LinePaint) -> Self {
        Self {
            id: id.into(),
            kind: "line".into(),
            source: Source::geojson(data),
            paint,
        }
    }
}
