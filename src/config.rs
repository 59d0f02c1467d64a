use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::{
    entities::{Coordinates, MapOptions, StylesVisibility},
    error::{config_error, Error},
};

pub const DEFAULT_API_BASE: &str = "https://api.tomtom.com";
pub const DEFAULT_ORIGIN: Coordinates = Coordinates {
    longitude: 15.645881,
    latitude: 46.55465,
};

#[derive(Clone, Debug)]
pub struct Config {
    pub api_key: String,
    pub api_base: String,
    pub addr: SocketAddr,
    pub request_timeout: Duration,
    pub default_origin: Coordinates,
    pub map_language: String,
    pub map_zoom: u8,
}

fn var_or<T>(name: &str, default: T) -> Result<T, Error>
where
    T: FromStr,
    T::Err: std::fmt::Debug,
{
    match env::var(name) {
        Ok(value) => value.parse::<T>().map_err(config_error),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(err) => Err(err.into()),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Error> {
        let api_key = env::var("TOMTOM_API_KEY")?;
        let api_base = var_or("TOMTOM_API_BASE", DEFAULT_API_BASE.to_string())?;
        let addr = var_or("COURIER_ADDR", SocketAddr::from(([127, 0, 0, 1], 3000)))?;
        let timeout_ms = var_or("COURIER_REQUEST_TIMEOUT_MS", 10_000u64)?;

        let default_origin = Coordinates::new(
            var_or("COURIER_ORIGIN_LONGITUDE", DEFAULT_ORIGIN.longitude)?,
            var_or("COURIER_ORIGIN_LATITUDE", DEFAULT_ORIGIN.latitude)?,
        )
        .validate()?;

        Ok(Self {
            api_key,
            api_base,
            addr,
            request_timeout: Duration::from_millis(timeout_ms),
            default_origin,
            map_language: var_or("COURIER_MAP_LANGUAGE", "en-GB".to_string())?,
            map_zoom: var_or("COURIER_MAP_ZOOM", 13u8)?,
        })
    }

    pub fn map_options(&self, center: Coordinates) -> MapOptions {
        MapOptions {
            api_key: self.api_key.clone(),
            center,
            zoom: self.map_zoom,
            language: self.map_language.clone(),
            styles_visibility: StylesVisibility {
                traffic_flow: true,
                traffic_incidents: true,
            },
        }
    }
}

#[test]
fn unset_optional_vars_fall_back_to_defaults() {
    let zoom: u8 = var_or("COURIER_TEST_UNSET_ZOOM", 13u8).unwrap();
    assert_eq!(zoom, 13);

    env::set_var("COURIER_TEST_BAD_TIMEOUT", "soon");
    assert_eq!(
        var_or("COURIER_TEST_BAD_TIMEOUT", 1u64).unwrap_err().code,
        2
    );
}
