use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::Coordinates;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Origin,
    Destination,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    pub html: String,
    pub class_name: String,
    /// Pixel offset applied when the popup is anchored below the marker.
    pub offset_bottom: [f64; 2],
    pub open: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: Uuid,
    pub kind: MarkerKind,
    pub position: Coordinates,
    pub draggable: bool,
    pub class_name: String,
    pub popup: Option<Popup>,
}

impl Marker {
    pub fn origin(position: Coordinates) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: MarkerKind::Origin,
            position,
            draggable: true,
            class_name: "marker".into(),
            popup: Some(Popup {
                html: "This is you!".into(),
                class_name: "popup".into(),
                offset_bottom: [0.0, -40.0],
                open: true,
            }),
        }
    }

    pub fn destination(position: Coordinates) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: MarkerKind::Destination,
            position,
            draggable: false,
            class_name: "marker-delivery".into(),
            popup: None,
        }
    }
}
