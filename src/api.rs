use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::{Coordinates, Session},
    error::Error,
    surface::MapView,
};

#[async_trait]
pub trait SessionAPI {
    async fn create_session(&self, origin: Option<Coordinates>) -> Result<Session, Error>;
    async fn find_session(&self, id: Uuid) -> Result<Session, Error>;
    async fn delete_session(&self, id: Uuid) -> Result<(), Error>;
    async fn find_map(&self, id: Uuid) -> Result<MapView, Error>;
}

#[async_trait]
pub trait InteractionAPI {
    async fn add_destination(&self, id: Uuid, coordinates: Coordinates) -> Result<Session, Error>;
    async fn drag_marker(
        &self,
        id: Uuid,
        marker_id: Uuid,
        coordinates: Coordinates,
    ) -> Result<Session, Error>;
    async fn edit_origin(
        &self,
        id: Uuid,
        longitude: Option<String>,
        latitude: Option<String>,
    ) -> Result<Session, Error>;
}

pub trait API: SessionAPI + InteractionAPI {}

pub type DynAPI = Arc<dyn API + Send + Sync>;
