use geo_types::{Coord, Point};
use serde::{Deserialize, Serialize};

use crate::error::{invalid_input_error, Error};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Rejects non-finite values and anything outside -180..180 / -90..90.
    pub fn validate(self) -> Result<Self, Error> {
        let in_bounds = self.longitude.is_finite()
            && self.latitude.is_finite()
            && (-180.0..=180.0).contains(&self.longitude)
            && (-90.0..=90.0).contains(&self.latitude);

        if !in_bounds {
            return Err(invalid_input_error());
        }

        Ok(self)
    }

    pub fn with_longitude(self, longitude: f64) -> Self {
        Self { longitude, ..self }
    }

    pub fn with_latitude(self, latitude: f64) -> Self {
        Self { latitude, ..self }
    }
}

/// Parses a free-text coordinate component as typed into the origin fields.
pub fn parse_component(text: &str) -> Result<f64, Error> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| invalid_input_error())
}

impl From<Coordinates> for Coord<f64> {
    fn from(c: Coordinates) -> Self {
        Coord {
            x: c.longitude,
            y: c.latitude,
        }
    }
}

impl From<Coordinates> for Point<f64> {
    fn from(c: Coordinates) -> Self {
        Point::new(c.longitude, c.latitude)
    }
}

// "lat,lon", the order the routing service expects in paths
impl From<Coordinates> for String {
    fn from(c: Coordinates) -> Self {
        format!("{},{}", c.latitude, c.longitude)
    }
}

#[test]
fn validate_rejects_out_of_range() {
    assert!(Coordinates::new(15.645881, 46.55465).validate().is_ok());
    assert!(Coordinates::new(180.0, -90.0).validate().is_ok());
    assert!(Coordinates::new(180.5, 0.0).validate().is_err());
    assert!(Coordinates::new(0.0, 91.0).validate().is_err());
    assert!(Coordinates::new(f64::NAN, 0.0).validate().is_err());
}

#[test]
fn parse_component_handles_free_text() {
    assert_eq!(parse_component(" 15.7 ").unwrap(), 15.7);
    assert_eq!(parse_component("-3").unwrap(), -3.0);
    assert!(parse_component("east").is_err());
    assert!(parse_component("").is_err());
}

#[test]
fn path_string_is_lat_first() {
    let s: String = Coordinates::new(15.7, 46.6).into();
    assert_eq!(s, "46.6,15.7");
}
