use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    entities::{Coordinates, Leg, Route, RouteSummary},
    error::{invalid_input_error, upstream_error, Error},
    external::routing::{LatLng, Matrix, MatrixPoint, RoutingService},
};

pub const MATRIX_SYNC_API_PATH: &str = "/routing/1/matrix/sync/json";
pub const CALCULATE_ROUTE_API_PATH: &str = "/routing/1/calculateRoute";

#[derive(Clone, Debug)]
pub struct TomTomClientParams {
    pub api_key: String,
    pub api_base: String,
}

#[derive(Clone, Debug, Serialize)]
struct MatrixRequestBody {
    origins: Vec<MatrixPoint>,
    destinations: Vec<MatrixPoint>,
}

#[derive(Clone, Debug, Deserialize)]
struct RouteLeg {
    points: Vec<LatLng>,
}

#[derive(Clone, Debug, Deserialize)]
struct CalculatedRoute {
    summary: RouteSummary,
    legs: Vec<RouteLeg>,
}

#[derive(Clone, Debug, Deserialize)]
struct CalculateRouteResponse {
    routes: Vec<CalculatedRoute>,
}

impl From<CalculatedRoute> for Route {
    fn from(route: CalculatedRoute) -> Self {
        Route {
            summary: route.summary,
            legs: route
                .legs
                .into_iter()
                .map(|leg| Leg {
                    points: leg
                        .points
                        .into_iter()
                        .map(|p| Coordinates::new(p.longitude, p.latitude))
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Joins stops as `lat,lon:lat,lon:...` for the calculateRoute path.
pub fn locations_path(locations: &[Coordinates]) -> String {
    locations
        .iter()
        .map(|&c| String::from(c))
        .collect::<Vec<String>>()
        .join(":")
}

pub struct TomTomClient {
    params: TomTomClientParams,
    client: reqwest::Client,
}

impl TomTomClient {
    pub fn new(params: TomTomClientParams) -> Self {
        Self {
            params,
            client: reqwest::Client::new(),
        }
    }

    fn check_status(res: &reqwest::Response) -> Result<(), Error> {
        let status_code = res.status().as_u16();

        if (400..500).contains(&status_code) {
            return Err(invalid_input_error());
        } else if status_code != 200 {
            return Err(upstream_error());
        }

        Ok(())
    }
}

#[async_trait]
impl RoutingService for TomTomClient {
    #[tracing::instrument(skip(self))]
    async fn matrix_routing(
        &self,
        origins: &[Coordinates],
        destinations: &[Coordinates],
    ) -> Result<Matrix, Error> {
        let url = format!("{}{}", self.params.api_base, MATRIX_SYNC_API_PATH);

        let body = MatrixRequestBody {
            origins: origins.iter().map(MatrixPoint::from).collect(),
            destinations: destinations.iter().map(MatrixPoint::from).collect(),
        };

        let res = self
            .client
            .post(url)
            .query(&[("key", &self.params.api_key)])
            .json(&body)
            .send()
            .await?;

        Self::check_status(&res)?;

        let matrix: Matrix = res.json().await?;

        tracing::debug!("received {} matrix rows", matrix.matrix.len());

        Ok(matrix)
    }

    #[tracing::instrument(skip(self))]
    async fn calculate_route(&self, locations: &[Coordinates]) -> Result<Route, Error> {
        let url = format!(
            "{}{}/{}/json",
            self.params.api_base,
            CALCULATE_ROUTE_API_PATH,
            locations_path(locations)
        );

        let res = self
            .client
            .get(url)
            .query(&[("key", &self.params.api_key)])
            .send()
            .await?;

        Self::check_status(&res)?;

        let data: CalculateRouteResponse = res.json().await?;

        data.routes
            .into_iter()
            .next()
            .map(Route::from)
            .ok_or_else(upstream_error)
    }
}

#[test]
fn locations_path_joins_stops_in_order() {
    let path = locations_path(&[
        Coordinates::new(15.645881, 46.55465),
        Coordinates::new(15.7, 46.6),
    ]);

    assert_eq!(path, "46.55465,15.645881:46.6,15.7");
}

#[test]
fn calculated_route_converts_points_to_coordinates() {
    let body = serde_json::json!({
        "formatVersion": "0.0.12",
        "routes": [{
            "summary": { "lengthInMeters": 5032, "travelTimeInSeconds": 441 },
            "legs": [{
                "summary": { "lengthInMeters": 5032, "travelTimeInSeconds": 441 },
                "points": [
                    { "latitude": 46.55465, "longitude": 15.645881 },
                    { "latitude": 46.6, "longitude": 15.7 }
                ]
            }]
        }]
    });

    let data: CalculateRouteResponse = serde_json::from_value(body).unwrap();
    let route = Route::from(data.routes.into_iter().next().unwrap());

    assert_eq!(route.summary.travel_time_in_seconds, 441.0);
    assert_eq!(
        route.legs[0].points,
        vec![
            Coordinates::new(15.645881, 46.55465),
            Coordinates::new(15.7, 46.6)
        ]
    );
}
