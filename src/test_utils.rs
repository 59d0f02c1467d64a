use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::{
    entities::{Coordinates, Leg, MapOptions, Route, RouteSummary, StylesVisibility},
    error::{upstream_error, Error},
    external::routing::{CellResponse, Matrix, MatrixCell, RoutingService},
};

pub fn map_options() -> MapOptions {
    MapOptions {
        api_key: "test-key".into(),
        center: Coordinates::new(15.645881, 46.55465),
        zoom: 13,
        language: "en-GB".into(),
        styles_visibility: StylesVisibility {
            traffic_flow: true,
            traffic_incidents: true,
        },
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MatrixMode {
    Answer,
    Reject,
    /// Row 0 is returned one cell short.
    Truncate,
    /// Never resolves.
    Hang,
}

/// Routing service answering from a fixed travel-time table. Unknown
/// destinations cost their planar distance from the origin.
pub struct ScriptedRouting {
    travel_times: Mutex<Vec<(Coordinates, f64)>>,
    mode: Mutex<MatrixMode>,
    gates: Mutex<VecDeque<Arc<Notify>>>,
    pub matrix_calls: Mutex<Vec<Vec<Coordinates>>>,
    pub route_calls: Mutex<Vec<Vec<Coordinates>>>,
}

impl ScriptedRouting {
    pub fn new() -> Self {
        Self {
            travel_times: Mutex::new(Vec::new()),
            mode: Mutex::new(MatrixMode::Answer),
            gates: Mutex::new(VecDeque::new()),
            matrix_calls: Mutex::new(Vec::new()),
            route_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_travel_time(self, destination: Coordinates, seconds: f64) -> Self {
        self.travel_times
            .lock()
            .unwrap()
            .push((destination, seconds));
        self
    }

    pub fn set_mode(&self, mode: MatrixMode) {
        *self.mode.lock().unwrap() = mode;
    }

    /// The next matrix call waits until the returned gate is notified.
    pub fn gate_next_matrix_call(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates.lock().unwrap().push_back(gate.clone());
        gate
    }

    pub fn last_route_call(&self) -> Option<Vec<Coordinates>> {
        self.route_calls.lock().unwrap().last().cloned()
    }

    fn travel_time(&self, origin: &Coordinates, destination: &Coordinates) -> f64 {
        let known = self
            .travel_times
            .lock()
            .unwrap()
            .iter()
            .find(|(c, _)| c == destination)
            .map(|(_, t)| *t);

        known.unwrap_or_else(|| {
            let dx = destination.longitude - origin.longitude;
            let dy = destination.latitude - origin.latitude;
            (dx * dx + dy * dy).sqrt() * 10_000.0
        })
    }
}

fn answered(seconds: f64) -> MatrixCell {
    MatrixCell {
        status_code: 200,
        response: Some(CellResponse {
            route_summary: Some(RouteSummary {
                length_in_meters: seconds * 10.0,
                travel_time_in_seconds: seconds,
            }),
        }),
    }
}

#[async_trait]
impl RoutingService for ScriptedRouting {
    async fn matrix_routing(
        &self,
        origins: &[Coordinates],
        destinations: &[Coordinates],
    ) -> Result<Matrix, Error> {
        self.matrix_calls
            .lock()
            .unwrap()
            .push(destinations.to_vec());

        let gate = self.gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mode = *self.mode.lock().unwrap();
        match mode {
            MatrixMode::Reject => return Err(upstream_error()),
            MatrixMode::Hang => std::future::pending::<()>().await,
            _ => (),
        }

        let matrix = origins
            .iter()
            .map(|origin| {
                let mut row: Vec<MatrixCell> = destinations
                    .iter()
                    .map(|d| answered(self.travel_time(origin, d)))
                    .collect();

                if mode == MatrixMode::Truncate {
                    row.pop();
                }

                row
            })
            .collect();

        Ok(Matrix { matrix })
    }

    async fn calculate_route(&self, locations: &[Coordinates]) -> Result<Route, Error> {
        self.route_calls.lock().unwrap().push(locations.to_vec());

        Ok(Route {
            summary: RouteSummary {
                length_in_meters: 1000.0 * locations.len() as f64,
                travel_time_in_seconds: 60.0 * locations.len() as f64,
            },
            legs: vec![Leg {
                points: locations.to_vec(),
            }],
        })
    }
}
