use geo_types::LineString;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject};
use serde::{Deserialize, Serialize};

use crate::entities::Coordinates;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub length_in_meters: f64,
    pub travel_time_in_seconds: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub points: Vec<Coordinates>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub summary: RouteSummary,
    pub legs: Vec<Leg>,
}

impl Route {
    pub fn line_string(&self) -> LineString<f64> {
        self.legs
            .iter()
            .flat_map(|leg| leg.points.iter().copied())
            .map(geo_types::Coord::from)
            .collect()
    }

    /// One LineString feature carrying the route summary as properties.
    pub fn to_geojson(&self) -> GeoJson {
        let line = self.line_string();

        let mut properties = JsonObject::new();
        properties.insert(
            "lengthInMeters".into(),
            self.summary.length_in_meters.into(),
        );
        properties.insert(
            "travelTimeInSeconds".into(),
            self.summary.travel_time_in_seconds.into(),
        );

        let feature = Feature {
            bbox: None,
            geometry: Some(Geometry::new(geojson::Value::from(&line))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        };

        GeoJson::FeatureCollection(FeatureCollection {
            bbox: None,
            features: vec![feature],
            foreign_members: None,
        })
    }
}

#[test]
fn geojson_concatenates_legs() {
    let route = Route {
        summary: RouteSummary {
            length_in_meters: 1200.0,
            travel_time_in_seconds: 90.0,
        },
        legs: vec![
            Leg {
                points: vec![Coordinates::new(15.6, 46.5), Coordinates::new(15.7, 46.6)],
            },
            Leg {
                points: vec![Coordinates::new(15.8, 46.5)],
            },
        ],
    };

    let GeoJson::FeatureCollection(collection) = route.to_geojson() else {
        panic!("expected a feature collection");
    };
    assert_eq!(collection.features.len(), 1);

    let geometry = collection.features[0].geometry.clone().unwrap();
    match geometry.value {
        geojson::Value::LineString(points) => {
            assert_eq!(
                points,
                vec![vec![15.6, 46.5], vec![15.7, 46.6], vec![15.8, 46.5]]
            );
        }
        other => panic!("unexpected geometry {:?}", other),
    }
}
