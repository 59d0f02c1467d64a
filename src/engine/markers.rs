use uuid::Uuid;

use crate::{
    entities::{Coordinates, Marker},
    surface::MapSurface,
};

/// Draggable pin with its "This is you!" popup open.
pub fn place_origin_marker(surface: &mut dyn MapSurface, at: Coordinates) -> Uuid {
    surface.add_marker(Marker::origin(at))
}

pub fn place_destination_marker(surface: &mut dyn MapSurface, at: Coordinates) -> Uuid {
    surface.add_marker(Marker::destination(at))
}

#[test]
fn only_the_origin_marker_is_draggable() {
    use crate::surface::InMemorySurface;
    use crate::test_utils::map_options;

    let mut surface = InMemorySurface::new(map_options());
    let origin = place_origin_marker(&mut surface, Coordinates::new(15.645881, 46.55465));
    let delivery = place_destination_marker(&mut surface, Coordinates::new(15.7, 46.6));

    let origin = surface.marker(origin).unwrap();
    assert!(origin.draggable);
    assert_eq!(origin.class_name, "marker");
    assert!(origin.popup.as_ref().unwrap().open);

    let delivery = surface.marker(delivery).unwrap();
    assert!(!delivery.draggable);
    assert_eq!(delivery.class_name, "marker-delivery");
    assert!(delivery.popup.is_none());
}
