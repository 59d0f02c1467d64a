use crate::{
    entities::Coordinates,
    error::{malformed_matrix_error, Error},
    external::routing::RoutingService,
};

struct TravelEstimate {
    destination: Coordinates,
    driving_time: f64,
}

/// Orders `destinations` by driving time from `origin`, using one batched
/// matrix call. Equal driving times keep their insertion order.
#[tracing::instrument(skip(routing, destinations), fields(count = destinations.len()))]
pub async fn sequence(
    routing: &(dyn RoutingService + Send + Sync),
    origin: Coordinates,
    destinations: &[Coordinates],
) -> Result<Vec<Coordinates>, Error> {
    if destinations.is_empty() {
        return Ok(Vec::new());
    }

    let result = routing
        .matrix_routing(std::slice::from_ref(&origin), destinations)
        .await?;

    let row = result.matrix.first().ok_or_else(malformed_matrix_error)?;
    if row.len() != destinations.len() {
        return Err(malformed_matrix_error());
    }

    let mut estimates = destinations
        .iter()
        .zip(row)
        .map(|(&destination, cell)| {
            let driving_time = cell.travel_time().ok_or_else(malformed_matrix_error)?;
            Ok(TravelEstimate {
                destination,
                driving_time,
            })
        })
        .collect::<Result<Vec<TravelEstimate>, Error>>()?;

    estimates.sort_by(|a, b| a.driving_time.total_cmp(&b.driving_time));

    Ok(estimates.into_iter().map(|e| e.destination).collect())
}

#[cfg(test)]
fn origin() -> Coordinates {
    Coordinates::new(15.645881, 46.55465)
}

#[test]
fn sorts_by_travel_time_and_keeps_every_destination() {
    use crate::test_utils::ScriptedRouting;
    use tokio_test::block_on;

    let a = Coordinates::new(15.7, 46.6);
    let b = Coordinates::new(15.8, 46.5);
    let c = Coordinates::new(15.65, 46.56);
    let routing = ScriptedRouting::new()
        .with_travel_time(a, 600.0)
        .with_travel_time(b, 900.0)
        .with_travel_time(c, 120.0);

    let sorted = block_on(sequence(&routing, origin(), &[a, b, c])).unwrap();

    assert_eq!(sorted, vec![c, a, b]);
    assert_eq!(routing.matrix_calls.lock().unwrap().len(), 1);
}

#[test]
fn equal_travel_times_keep_insertion_order() {
    use crate::test_utils::ScriptedRouting;
    use tokio_test::block_on;

    let a = Coordinates::new(15.7, 46.6);
    let b = Coordinates::new(15.8, 46.5);
    let c = Coordinates::new(15.9, 46.4);
    let routing = ScriptedRouting::new()
        .with_travel_time(a, 300.0)
        .with_travel_time(b, 300.0)
        .with_travel_time(c, 100.0);

    let sorted = block_on(sequence(&routing, origin(), &[a, b, c])).unwrap();

    assert_eq!(sorted, vec![c, a, b]);
}

#[test]
fn duplicate_destinations_survive_sorting() {
    use crate::test_utils::ScriptedRouting;
    use tokio_test::block_on;

    let a = Coordinates::new(15.7, 46.6);
    let b = Coordinates::new(15.66, 46.56);
    let routing = ScriptedRouting::new();

    let sorted = block_on(sequence(&routing, origin(), &[a, b, a])).unwrap();

    assert_eq!(sorted, vec![b, a, a]);
}

#[test]
fn empty_destinations_skip_the_remote_call() {
    use crate::test_utils::ScriptedRouting;
    use tokio_test::block_on;

    let routing = ScriptedRouting::new();

    let sorted = block_on(sequence(&routing, origin(), &[])).unwrap();

    assert!(sorted.is_empty());
    assert!(routing.matrix_calls.lock().unwrap().is_empty());
}

#[test]
fn rejected_or_short_matrix_fails() {
    use crate::test_utils::{MatrixMode, ScriptedRouting};
    use tokio_test::block_on;

    let destinations = [Coordinates::new(15.7, 46.6), Coordinates::new(15.8, 46.5)];
    let routing = ScriptedRouting::new();

    routing.set_mode(MatrixMode::Reject);
    let err = block_on(sequence(&routing, origin(), &destinations)).unwrap_err();
    assert_eq!(err.code, 4);

    routing.set_mode(MatrixMode::Truncate);
    let err = block_on(sequence(&routing, origin(), &destinations)).unwrap_err();
    assert_eq!(err.code, 7);
}
