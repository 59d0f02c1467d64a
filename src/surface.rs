use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    entities::{Control, Coordinates, Layer, MapOptions, Marker, Source},
    error::{duplicate_layer_error, invalid_state_error, not_found_error, Error},
};

/// Everything the browser needs to draw the map as it currently stands.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MapView {
    pub options: MapOptions,
    pub controls: Vec<Control>,
    pub markers: Vec<Marker>,
    pub layers: Vec<Layer>,
}

/// The mutable map the controller draws on. Layers and sources are separate
/// registries: removing a layer leaves its source in place, and adding a
/// layer whose id is taken by either one fails.
pub trait MapSurface: Send {
    fn options(&self) -> &MapOptions;
    fn set_center(&mut self, center: Coordinates);
    fn add_control(&mut self, control: Control);

    fn add_marker(&mut self, marker: Marker) -> Uuid;
    fn marker(&self, id: Uuid) -> Option<&Marker>;
    fn move_marker(&mut self, id: Uuid, position: Coordinates) -> Result<(), Error>;

    fn get_layer(&self, id: &str) -> Option<&Layer>;
    fn add_layer(&mut self, layer: Layer) -> Result<(), Error>;
    fn remove_layer(&mut self, id: &str) -> Result<(), Error>;
    fn remove_source(&mut self, id: &str) -> Result<(), Error>;

    fn view(&self) -> MapView;
}

pub struct InMemorySurface {
    options: MapOptions,
    controls: Vec<Control>,
    markers: Vec<Marker>,
    layers: BTreeMap<String, Layer>,
    sources: BTreeMap<String, Source>,
}

impl InMemorySurface {
    pub fn new(options: MapOptions) -> Self {
        Self {
            options,
            controls: Vec::new(),
            markers: Vec::new(),
            layers: BTreeMap::new(),
            sources: BTreeMap::new(),
        }
    }

    pub fn source(&self, id: &str) -> Option<&Source> {
        self.sources.get(id)
    }
}

impl MapSurface for InMemorySurface {
    fn options(&self) -> &MapOptions {
        &self.options
    }

    fn set_center(&mut self, center: Coordinates) {
        self.options.center = center;
    }

    fn add_control(&mut self, control: Control) {
        self.controls.push(control);
    }

    fn add_marker(&mut self, marker: Marker) -> Uuid {
        let id = marker.id;
        self.markers.push(marker);
        id
    }

    fn marker(&self, id: Uuid) -> Option<&Marker> {
        self.markers.iter().find(|m| m.id == id)
    }

    fn move_marker(&mut self, id: Uuid, position: Coordinates) -> Result<(), Error> {
        let marker = self
            .markers
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(not_found_error)?;

        marker.position = position;
        Ok(())
    }

    fn get_layer(&self, id: &str) -> Option<&Layer> {
        self.layers.get(id)
    }

    fn add_layer(&mut self, layer: Layer) -> Result<(), Error> {
        if self.layers.contains_key(&layer.id) || self.sources.contains_key(&layer.id) {
            return Err(duplicate_layer_error(&layer.id));
        }

        self.sources.insert(layer.id.clone(), layer.source.clone());
        self.layers.insert(layer.id.clone(), layer);
        Ok(())
    }

    fn remove_layer(&mut self, id: &str) -> Result<(), Error> {
        self.layers.remove(id).map(|_| ()).ok_or_else(not_found_error)
    }

    fn remove_source(&mut self, id: &str) -> Result<(), Error> {
        if self.layers.contains_key(id) {
            // still referenced
            return Err(invalid_state_error());
        }

        self.sources.remove(id).map(|_| ()).ok_or_else(not_found_error)
    }

    fn view(&self) -> MapView {
        MapView {
            options: self.options.clone(),
            controls: self.controls.clone(),
            markers: self.markers.clone(),
            layers: self.layers.values().cloned().collect(),
        }
    }
}

#[test]
fn adding_a_taken_layer_id_fails() {
    use crate::entities::LinePaint;
    use geojson::{FeatureCollection, GeoJson};

    let mut surface = InMemorySurface::new(crate::test_utils::map_options());
    let data = GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        features: vec![],
        foreign_members: None,
    });
    let paint = LinePaint {
        line_color: "red".into(),
        line_width: 6.0,
    };

    surface
        .add_layer(Layer::line("route", data.clone(), paint.clone()))
        .unwrap();
    assert!(surface
        .add_layer(Layer::line("route", data.clone(), paint.clone()))
        .is_err());

    // layer gone but source left behind still blocks the id
    surface.remove_layer("route").unwrap();
    assert!(surface
        .add_layer(Layer::line("route", data.clone(), paint.clone()))
        .is_err());

    surface.remove_source("route").unwrap();
    assert!(surface.add_layer(Layer::line("route", data, paint)).is_ok());
}

#[test]
fn source_cannot_be_removed_under_its_layer() {
    use crate::entities::LinePaint;
    use geojson::{FeatureCollection, GeoJson};

    let mut surface = InMemorySurface::new(crate::test_utils::map_options());
    let data = GeoJson::FeatureCollection(FeatureCollection {
        bbox: None,
        features: vec![],
        foreign_members: None,
    });
    surface
        .add_layer(Layer::line(
            "route",
            data,
            LinePaint {
                line_color: "red".into(),
                line_width: 6.0,
            },
        ))
        .unwrap();

    assert!(surface.remove_source("route").is_err());
    assert!(surface.source("route").is_some());
}
