use geojson::GeoJson;

use crate::{
    entities::{Layer, LinePaint},
    error::Error,
    surface::MapSurface,
};

pub const ROUTE_LAYER_ID: &str = "route";

fn route_paint() -> LinePaint {
    LinePaint {
        line_color: "red".into(),
        line_width: 6.0,
    }
}

/// Swaps the route layer for one drawn from `geometry`. The surface has no
/// atomic replace, so the old layer and its source go first.
#[tracing::instrument(skip_all)]
pub fn render(surface: &mut dyn MapSurface, geometry: GeoJson) -> Result<(), Error> {
    clear(surface)?;
    surface.add_layer(Layer::line(ROUTE_LAYER_ID, geometry, route_paint()))
}

pub fn clear(surface: &mut dyn MapSurface) -> Result<(), Error> {
    if surface.get_layer(ROUTE_LAYER_ID).is_some() {
        surface.remove_layer(ROUTE_LAYER_ID)?;
        surface.remove_source(ROUTE_LAYER_ID)?;
    }

    Ok(())
}

#[cfg(test)]
fn route_between(stops: &[crate::entities::Coordinates]) -> GeoJson {
    use crate::entities::{Leg, Route, RouteSummary};

    Route {
        summary: RouteSummary {
            length_in_meters: 1000.0,
            travel_time_in_seconds: 60.0,
        },
        legs: vec![Leg {
            points: stops.to_vec(),
        }],
    }
    .to_geojson()
}

#[test]
fn rendering_twice_leaves_one_route_layer() {
    use crate::entities::Coordinates;
    use crate::surface::InMemorySurface;
    use crate::test_utils::map_options;

    let mut surface = InMemorySurface::new(map_options());
    let first = route_between(&[Coordinates::new(15.6, 46.5), Coordinates::new(15.7, 46.6)]);
    let second = route_between(&[Coordinates::new(15.6, 46.5), Coordinates::new(15.8, 46.5)]);

    render(&mut surface, first).unwrap();
    render(&mut surface, second.clone()).unwrap();

    let view = surface.view();
    assert_eq!(view.layers.len(), 1);
    assert_eq!(view.layers[0].id, ROUTE_LAYER_ID);
    assert_eq!(view.layers[0].source.data, second);
    assert_eq!(surface.source(ROUTE_LAYER_ID).unwrap().data, second);
}

#[test]
fn rendering_same_geometry_twice_matches_once() {
    use crate::entities::Coordinates;
    use crate::surface::InMemorySurface;
    use crate::test_utils::map_options;

    let geometry = route_between(&[Coordinates::new(15.6, 46.5), Coordinates::new(15.7, 46.6)]);

    let mut once = InMemorySurface::new(map_options());
    render(&mut once, geometry.clone()).unwrap();

    let mut twice = InMemorySurface::new(map_options());
    render(&mut twice, geometry.clone()).unwrap();
    render(&mut twice, geometry).unwrap();

    assert_eq!(once.view().layers, twice.view().layers);
}

#[test]
fn clear_removes_layer_and_source() {
    use crate::entities::Coordinates;
    use crate::surface::InMemorySurface;
    use crate::test_utils::map_options;

    let mut surface = InMemorySurface::new(map_options());
    clear(&mut surface).unwrap();

    render(
        &mut surface,
        route_between(&[Coordinates::new(15.6, 46.5), Coordinates::new(15.7, 46.6)]),
    )
    .unwrap();
    clear(&mut surface).unwrap();

    assert!(surface.get_layer(ROUTE_LAYER_ID).is_none());
    assert!(surface.source(ROUTE_LAYER_ID).is_none());
}
