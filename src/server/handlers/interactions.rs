use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::{DynAPI, InteractionAPI};
use crate::entities::{Coordinates, Session};
use crate::error::Error;

#[derive(Serialize, Deserialize)]
pub struct CoordinatesParams {
    coordinates: Coordinates,
}

/// Raw contents of the longitude/latitude text fields.
#[derive(Serialize, Deserialize)]
pub struct EditOriginParams {
    longitude: Option<String>,
    latitude: Option<String>,
}

pub async fn click(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
    Json(params): Json<CoordinatesParams>,
) -> Result<Json<Session>, Error> {
    let session = api.add_destination(id, params.coordinates).await?;

    Ok(session.into())
}

pub async fn drag_end(
    Extension(api): Extension<DynAPI>,
    Path((id, marker_id)): Path<(Uuid, Uuid)>,
    Json(params): Json<CoordinatesParams>,
) -> Result<Json<Session>, Error> {
    let session = api.drag_marker(id, marker_id, params.coordinates).await?;

    Ok(session.into())
}

pub async fn edit_origin(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
    Json(params): Json<EditOriginParams>,
) -> Result<Json<Session>, Error> {
    let session = api
        .edit_origin(id, params.longitude, params.latitude)
        .await?;

    Ok(session.into())
}
