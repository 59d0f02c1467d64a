use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::{DynAPI, SessionAPI};
use crate::entities::{Coordinates, Session};
use crate::error::Error;
use crate::surface::MapView;

#[derive(Serialize, Deserialize)]
pub struct CreateParams {
    origin: Option<Coordinates>,
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<CreateParams>,
) -> Result<Json<Session>, Error> {
    let session = api.create_session(params.origin).await?;

    Ok(session.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<Session>, Error> {
    let session = api.find_session(id).await?;

    Ok(session.into())
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<()>, Error> {
    api.delete_session(id).await?;

    Ok(().into())
}

pub async fn find_map(
    Extension(api): Extension<DynAPI>,
    Path(id): Path<Uuid>,
) -> Result<Json<MapView>, Error> {
    let view = api.find_map(id).await?;

    Ok(view.into())
}
