use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::{
    engine::{
        helpers::with_timeout,
        markers::{place_destination_marker, place_origin_marker},
        renderer::{clear, render},
        sequencer::sequence,
    },
    entities::{parse_component, Control, Coordinates, Recomputation, Route, Session},
    error::{invalid_input_error, not_found_error, Error},
    external::DynRouting,
    surface::{MapSurface, MapView},
};

struct State {
    session: Session,
    surface: Box<dyn MapSurface>,
    in_flight: Option<JoinHandle<()>>,
}

/// Owns one session's origin, destinations and map surface. Every mutation
/// starts a recomputation; only the newest one may touch the route layer.
pub struct Controller {
    state: Mutex<State>,
    routing: DynRouting,
    request_timeout: Duration,
}

impl Controller {
    #[tracing::instrument(name = "Controller::mount", skip_all)]
    pub fn mount(
        mut surface: Box<dyn MapSurface>,
        routing: DynRouting,
        request_timeout: Duration,
    ) -> Arc<Self> {
        surface.add_control(Control::Fullscreen);
        surface.add_control(Control::Navigation);

        let origin = surface.options().center;
        let origin_marker_id = place_origin_marker(surface.as_mut(), origin);
        let session = Session::new(origin, origin_marker_id);

        tracing::info!("mounted session {}", session.id);

        Arc::new(Self {
            state: Mutex::new(State {
                session,
                surface,
                in_flight: None,
            }),
            routing,
            request_timeout,
        })
    }

    pub async fn session(&self) -> Session {
        self.state.lock().await.session.clone()
    }

    pub async fn view(&self) -> MapView {
        self.state.lock().await.surface.view()
    }

    #[tracing::instrument(skip(self))]
    pub async fn click(self: &Arc<Self>, at: Coordinates) -> Result<Session, Error> {
        let at = at.validate()?;

        let mut state = self.state.lock().await;
        state.session.add_destination(at);
        place_destination_marker(state.surface.as_mut(), at);
        self.start_recomputation(&mut state);

        Ok(state.session.clone())
    }

    #[tracing::instrument(skip(self))]
    pub async fn drag_end(
        self: &Arc<Self>,
        marker_id: Uuid,
        at: Coordinates,
    ) -> Result<Session, Error> {
        let at = at.validate()?;

        let mut state = self.state.lock().await;
        let draggable = state
            .surface
            .marker(marker_id)
            .map(|marker| marker.draggable)
            .ok_or_else(not_found_error)?;

        if !draggable || marker_id != state.session.origin_marker_id {
            return Err(invalid_input_error());
        }

        state.surface.move_marker(marker_id, at)?;
        state.session.move_origin(at);
        self.start_recomputation(&mut state);

        Ok(state.session.clone())
    }

    /// Applies the free-text longitude/latitude fields to the origin. Either
    /// may be omitted; text that does not parse to an in-range coordinate
    /// leaves everything untouched.
    #[tracing::instrument(skip(self))]
    pub async fn edit_origin(
        self: &Arc<Self>,
        longitude: Option<&str>,
        latitude: Option<&str>,
    ) -> Result<Session, Error> {
        if longitude.is_none() && latitude.is_none() {
            return Err(invalid_input_error());
        }

        let longitude = longitude.map(parse_component).transpose()?;
        let latitude = latitude.map(parse_component).transpose()?;

        let mut state = self.state.lock().await;

        let mut origin = state.session.origin;
        if let Some(longitude) = longitude {
            origin = origin.with_longitude(longitude);
        }
        if let Some(latitude) = latitude {
            origin = origin.with_latitude(latitude);
        }
        let origin = origin.validate()?;

        let marker_id = state.session.origin_marker_id;
        state.surface.move_marker(marker_id, origin)?;
        state.surface.set_center(origin);
        state.session.move_origin(origin);
        self.start_recomputation(&mut state);

        Ok(state.session.clone())
    }

    /// Waits until no recomputation is in flight.
    pub async fn settle(&self) {
        loop {
            let handle = self.state.lock().await.in_flight.take();

            match handle {
                Some(handle) => {
                    // an aborted task is a superseded one
                    let _ = handle.await;
                }
                None => return,
            }
        }
    }

    pub async fn unmount(&self) {
        let mut state = self.state.lock().await;

        if let Some(handle) = state.in_flight.take() {
            handle.abort();
        }

        tracing::info!("unmounted session {}", state.session.id);
    }

    fn start_recomputation(self: &Arc<Self>, state: &mut State) {
        let run = state.session.begin_recomputation();

        if let Some(previous) = state.in_flight.take() {
            previous.abort();
        }

        let controller = Arc::clone(self);
        state.in_flight = Some(tokio::spawn(async move {
            controller.recompute(run).await;
        }));
    }

    #[tracing::instrument(skip(self, run), fields(generation = run.generation))]
    async fn recompute(self: Arc<Self>, run: Recomputation) {
        let result = self.compute_route(&run).await;

        let mut state = self.state.lock().await;
        if !state.session.is_current(run.generation) {
            tracing::debug!("discarding result of superseded recomputation");
            return;
        }

        let applied = match result {
            Ok(Some(route)) => render(state.surface.as_mut(), route.to_geojson()),
            Ok(None) => clear(state.surface.as_mut()),
            Err(err) => Err(err),
        };

        let transition = match applied {
            Ok(()) => state.session.complete(run.generation),
            Err(err) => {
                tracing::warn!("recomputation failed: {}", err);
                state.session.fail(run.generation, err.message)
            }
        };

        if let Err(err) = transition {
            tracing::error!("could not record recomputation outcome: {}", err);
        }
    }

    async fn compute_route(&self, run: &Recomputation) -> Result<Option<Route>, Error> {
        if run.destinations.is_empty() {
            return Ok(None);
        }

        let ordered = with_timeout(
            self.request_timeout,
            sequence(self.routing.as_ref(), run.origin, &run.destinations),
        )
        .await?;

        let mut stops = Vec::with_capacity(ordered.len() + 1);
        stops.push(run.origin);
        stops.extend(ordered);

        let route = with_timeout(self.request_timeout, self.routing.calculate_route(&stops)).await?;

        Ok(Some(route))
    }
}

#[cfg(test)]
fn mount_with(routing: Arc<crate::test_utils::ScriptedRouting>) -> Arc<Controller> {
    use crate::surface::InMemorySurface;
    use crate::test_utils::map_options;

    Controller::mount(
        Box::new(InMemorySurface::new(map_options())),
        routing,
        Duration::from_millis(200),
    )
}

#[cfg(test)]
fn route_points(view: &MapView) -> Vec<Vec<f64>> {
    use geojson::{GeoJson, Value};

    assert_eq!(view.layers.len(), 1, "expected exactly one route layer");

    match &view.layers[0].source.data {
        GeoJson::FeatureCollection(collection) => {
            match &collection.features[0].geometry.as_ref().unwrap().value {
                Value::LineString(points) => points.clone(),
                other => panic!("unexpected geometry {:?}", other),
            }
        }
        other => panic!("unexpected source data {:?}", other),
    }
}

#[tokio::test]
async fn click_places_marker_and_draws_route() {
    use crate::entities::{MarkerKind, SessionStatus};
    use crate::test_utils::ScriptedRouting;

    let routing = Arc::new(ScriptedRouting::new());
    let controller = mount_with(routing.clone());

    let session = controller.click(Coordinates::new(15.7, 46.6)).await.unwrap();
    assert_eq!(session.status.name(), "recomputing");

    controller.settle().await;

    let view = controller.view().await;
    let destinations = view
        .markers
        .iter()
        .filter(|m| m.kind == MarkerKind::Destination)
        .count();
    assert_eq!(destinations, 1);
    assert_eq!(
        route_points(&view),
        vec![vec![15.645881, 46.55465], vec![15.7, 46.6]]
    );
    assert_eq!(controller.session().await.status, SessionStatus::Idle);
}

#[tokio::test]
async fn late_result_of_superseded_click_is_discarded() {
    use crate::test_utils::ScriptedRouting;

    let first = Coordinates::new(15.7, 46.6);
    let second = Coordinates::new(15.8, 46.5);
    let routing = Arc::new(
        ScriptedRouting::new()
            .with_travel_time(first, 300.0)
            .with_travel_time(second, 100.0),
    );
    let controller = mount_with(routing.clone());

    let gate = routing.gate_next_matrix_call();
    controller.click(first).await.unwrap();
    tokio::task::yield_now().await;

    controller.click(second).await.unwrap();
    controller.settle().await;

    // release the first recomputation only after the second has drawn
    gate.notify_one();
    tokio::time::sleep(Duration::from_millis(20)).await;
    controller.settle().await;

    let view = controller.view().await;
    assert_eq!(
        route_points(&view),
        vec![vec![15.645881, 46.55465], vec![15.8, 46.5], vec![15.7, 46.6]]
    );
    assert_eq!(controller.session().await.generation, 2);
}

#[tokio::test]
async fn dragging_origin_reroutes_from_new_position() {
    use crate::test_utils::ScriptedRouting;

    let routing = Arc::new(ScriptedRouting::new());
    let controller = mount_with(routing.clone());

    controller.click(Coordinates::new(15.7, 46.6)).await.unwrap();
    controller.settle().await;

    let marker_id = controller.session().await.origin_marker_id;
    let dragged = Coordinates::new(15.62, 46.53);
    let session = controller.drag_end(marker_id, dragged).await.unwrap();
    assert_eq!(session.origin, dragged);

    controller.settle().await;

    let stops = routing.last_route_call().unwrap();
    assert_eq!(stops[0], dragged);

    let view = controller.view().await;
    let origin_marker = view.markers.iter().find(|m| m.id == marker_id).unwrap();
    assert_eq!(origin_marker.position, dragged);
}

#[tokio::test]
async fn dragging_a_destination_marker_is_rejected() {
    use crate::entities::MarkerKind;
    use crate::test_utils::ScriptedRouting;

    let controller = mount_with(Arc::new(ScriptedRouting::new()));
    controller.click(Coordinates::new(15.7, 46.6)).await.unwrap();
    controller.settle().await;

    let view = controller.view().await;
    let delivery = view
        .markers
        .iter()
        .find(|m| m.kind == MarkerKind::Destination)
        .unwrap();

    let err = controller
        .drag_end(delivery.id, Coordinates::new(15.0, 46.0))
        .await
        .unwrap_err();
    assert_eq!(err.code, 101);

    let err = controller
        .drag_end(Uuid::new_v4(), Coordinates::new(15.0, 46.0))
        .await
        .unwrap_err();
    assert_eq!(err.code, 102);
}

#[tokio::test]
async fn rejected_matrix_keeps_route_and_destinations() {
    use crate::test_utils::{MatrixMode, ScriptedRouting};

    let routing = Arc::new(ScriptedRouting::new());
    let controller = mount_with(routing.clone());

    controller.click(Coordinates::new(15.7, 46.6)).await.unwrap();
    controller.settle().await;
    let before = controller.view().await.layers;

    routing.set_mode(MatrixMode::Reject);
    let clicked = Coordinates::new(15.8, 46.5);
    controller.click(clicked).await.unwrap();
    controller.settle().await;

    let session = controller.session().await;
    assert_eq!(session.status.name(), "failed");
    assert!(session.destinations.contains(&clicked));

    let view = controller.view().await;
    assert_eq!(view.layers, before);
    assert_eq!(view.markers.len(), 3);
}

#[tokio::test]
async fn rejected_first_matrix_adds_no_layer() {
    use crate::test_utils::{MatrixMode, ScriptedRouting};

    let routing = Arc::new(ScriptedRouting::new());
    routing.set_mode(MatrixMode::Reject);
    let controller = mount_with(routing.clone());

    controller.click(Coordinates::new(15.7, 46.6)).await.unwrap();
    controller.settle().await;

    assert!(controller.view().await.layers.is_empty());
    assert!(routing.route_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn hung_matrix_call_times_out() {
    use crate::entities::SessionStatus;
    use crate::test_utils::{MatrixMode, ScriptedRouting};

    let routing = Arc::new(ScriptedRouting::new());
    routing.set_mode(MatrixMode::Hang);
    let controller = mount_with(routing);

    controller.click(Coordinates::new(15.7, 46.6)).await.unwrap();
    controller.settle().await;

    match controller.session().await.status {
        SessionStatus::Failed { reason, .. } => {
            assert_eq!(reason, "upstream request timed out")
        }
        other => panic!("unexpected status {:?}", other),
    }
}

#[tokio::test]
async fn editing_origin_text_moves_and_recenters() {
    use crate::test_utils::ScriptedRouting;

    let routing = Arc::new(ScriptedRouting::new());
    let controller = mount_with(routing.clone());

    let err = controller
        .edit_origin(Some("fifteen"), None)
        .await
        .unwrap_err();
    assert_eq!(err.code, 101);

    let err = controller.edit_origin(None, Some("95")).await.unwrap_err();
    assert_eq!(err.code, 101);
    assert_eq!(
        controller.session().await.origin,
        Coordinates::new(15.645881, 46.55465)
    );

    let session = controller.edit_origin(Some("16.1"), None).await.unwrap();
    assert_eq!(session.origin, Coordinates::new(16.1, 46.55465));

    controller.settle().await;

    let view = controller.view().await;
    assert_eq!(view.options.center, Coordinates::new(16.1, 46.55465));
    // no destinations yet, so nothing was requested or drawn
    assert!(routing.matrix_calls.lock().unwrap().is_empty());
    assert!(view.layers.is_empty());
}

#[tokio::test]
async fn out_of_range_click_is_rejected() {
    use crate::test_utils::ScriptedRouting;

    let controller = mount_with(Arc::new(ScriptedRouting::new()));

    let err = controller
        .click(Coordinates::new(200.0, 46.6))
        .await
        .unwrap_err();

    assert_eq!(err.code, 101);
    assert!(controller.session().await.destinations.is_empty());
    assert_eq!(controller.view().await.markers.len(), 1);
}
