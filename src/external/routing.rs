use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    entities::{Coordinates, Route, RouteSummary},
    error::Error,
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

/// Request shape for a single matrix origin or destination.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatrixPoint {
    pub point: LatLng,
}

impl From<&Coordinates> for MatrixPoint {
    fn from(c: &Coordinates) -> Self {
        Self {
            point: LatLng {
                latitude: c.latitude,
                longitude: c.longitude,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellResponse {
    pub route_summary: Option<RouteSummary>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixCell {
    pub status_code: u16,
    pub response: Option<CellResponse>,
}

impl MatrixCell {
    pub fn travel_time(&self) -> Option<f64> {
        if self.status_code != 200 {
            return None;
        }

        self.response
            .as_ref()?
            .route_summary
            .as_ref()
            .map(|summary| summary.travel_time_in_seconds)
    }
}

/// Row `i` belongs to origin `i`, column `j` to destination `j`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub matrix: Vec<Vec<MatrixCell>>,
}

#[async_trait]
pub trait RoutingService {
    async fn matrix_routing(
        &self,
        origins: &[Coordinates],
        destinations: &[Coordinates],
    ) -> Result<Matrix, Error>;

    /// `locations` holds the stops in driving order, origin first.
    async fn calculate_route(&self, locations: &[Coordinates]) -> Result<Route, Error>;
}

pub type DynRouting = Arc<dyn RoutingService + Send + Sync>;

#[test]
fn matrix_cells_deserialize_from_service_shape() {
    let body = serde_json::json!({
        "formatVersion": "0.0.1",
        "matrix": [[
            {
                "statusCode": 200,
                "response": {
                    "routeSummary": {
                        "lengthInMeters": 8214,
                        "travelTimeInSeconds": 612,
                        "trafficDelayInSeconds": 0
                    }
                }
            },
            {
                "statusCode": 400,
                "response": { "errorText": "Engine error" }
            }
        ]]
    });

    let matrix: Matrix = serde_json::from_value(body).unwrap();

    assert_eq!(matrix.matrix[0][0].travel_time(), Some(612.0));
    assert_eq!(matrix.matrix[0][1].travel_time(), None);
}
