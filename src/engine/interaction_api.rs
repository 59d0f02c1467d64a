use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    api::InteractionAPI,
    entities::{Coordinates, Session},
    error::Error,
};

#[async_trait]
impl InteractionAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn add_destination(&self, id: Uuid, coordinates: Coordinates) -> Result<Session, Error> {
        self.controller(id).await?.click(coordinates).await
    }

    #[tracing::instrument(skip(self))]
    async fn drag_marker(
        &self,
        id: Uuid,
        marker_id: Uuid,
        coordinates: Coordinates,
    ) -> Result<Session, Error> {
        self.controller(id)
            .await?
            .drag_end(marker_id, coordinates)
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn edit_origin(
        &self,
        id: Uuid,
        longitude: Option<String>,
        latitude: Option<String>,
    ) -> Result<Session, Error> {
        self.controller(id)
            .await?
            .edit_origin(longitude.as_deref(), latitude.as_deref())
            .await
    }
}

#[tokio::test]
async fn clicks_are_routed_to_their_own_session() {
    use super::test_engine;
    use crate::api::SessionAPI;
    use crate::test_utils::ScriptedRouting;
    use std::sync::Arc;

    let routing = Arc::new(ScriptedRouting::new());
    let engine = test_engine(routing.clone());

    let a = engine.create_session(None).await.unwrap();
    let b = engine.create_session(None).await.unwrap();

    engine
        .add_destination(a.id, Coordinates::new(15.7, 46.6))
        .await
        .unwrap();
    engine
        .add_destination(a.id, Coordinates::new(15.8, 46.5))
        .await
        .unwrap();
    engine
        .add_destination(b.id, Coordinates::new(15.6, 46.5))
        .await
        .unwrap();

    assert_eq!(engine.find_session(a.id).await.unwrap().destinations.len(), 2);
    assert_eq!(engine.find_session(b.id).await.unwrap().destinations.len(), 1);

    let err = engine
        .add_destination(Uuid::new_v4(), Coordinates::new(15.6, 46.5))
        .await
        .unwrap_err();
    assert_eq!(err.code, 102);
}

#[tokio::test]
async fn origin_edits_and_drags_go_through_the_session() {
    use super::test_engine;
    use crate::api::SessionAPI;
    use crate::test_utils::ScriptedRouting;
    use std::sync::Arc;

    let engine = test_engine(Arc::new(ScriptedRouting::new()));
    let session = engine.create_session(None).await.unwrap();

    let edited = engine
        .edit_origin(session.id, None, Some("46.6".into()))
        .await
        .unwrap();
    assert_eq!(edited.origin, Coordinates::new(15.645881, 46.6));

    let dragged = engine
        .drag_marker(
            session.id,
            session.origin_marker_id,
            Coordinates::new(15.5, 46.4),
        )
        .await
        .unwrap();
    assert_eq!(dragged.origin, Coordinates::new(15.5, 46.4));
    assert_eq!(dragged.generation, 2);
}
