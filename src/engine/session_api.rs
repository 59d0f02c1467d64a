use super::{Controller, Engine};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    api::SessionAPI,
    entities::{Coordinates, Session},
    error::{not_found_error, Error},
    surface::{InMemorySurface, MapView},
};

#[async_trait]
impl SessionAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_session(&self, origin: Option<Coordinates>) -> Result<Session, Error> {
        let center = match origin {
            Some(origin) => origin.validate()?,
            None => self.config.default_origin,
        };

        let surface = InMemorySurface::new(self.config.map_options(center));
        let controller = Controller::mount(
            Box::new(surface),
            self.routing.clone(),
            self.config.request_timeout,
        );

        let session = controller.session().await;
        self.sessions.write().await.insert(session.id, controller);

        Ok(session)
    }

    #[tracing::instrument(skip(self))]
    async fn find_session(&self, id: Uuid) -> Result<Session, Error> {
        Ok(self.controller(id).await?.session().await)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_session(&self, id: Uuid) -> Result<(), Error> {
        let controller = self
            .sessions
            .write()
            .await
            .remove(&id)
            .ok_or_else(not_found_error)?;

        controller.unmount().await;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn find_map(&self, id: Uuid) -> Result<MapView, Error> {
        Ok(self.controller(id).await?.view().await)
    }
}

#[test]
fn sessions_mount_at_requested_or_default_origin() {
    use super::test_engine;
    use crate::entities::{Control, MarkerKind};
    use crate::test_utils::ScriptedRouting;
    use std::sync::Arc;
    use tokio_test::block_on;

    let engine = test_engine(Arc::new(ScriptedRouting::new()));

    let session = block_on(engine.create_session(None)).unwrap();
    assert_eq!(session.origin, Coordinates::new(15.645881, 46.55465));
    assert!(session.destinations.is_empty());

    let view = block_on(engine.find_map(session.id)).unwrap();
    assert_eq!(view.controls, vec![Control::Fullscreen, Control::Navigation]);
    assert_eq!(view.options.zoom, 13);
    assert_eq!(view.markers.len(), 1);
    assert_eq!(view.markers[0].kind, MarkerKind::Origin);
    assert_eq!(view.markers[0].id, session.origin_marker_id);

    let elsewhere = Coordinates::new(2.35, 48.85);
    let session = block_on(engine.create_session(Some(elsewhere))).unwrap();
    assert_eq!(session.origin, elsewhere);

    assert!(block_on(engine.create_session(Some(Coordinates::new(0.0, 120.0)))).is_err());
}

#[test]
fn deleted_sessions_are_gone() {
    use super::test_engine;
    use crate::test_utils::ScriptedRouting;
    use std::sync::Arc;
    use tokio_test::block_on;

    let engine = test_engine(Arc::new(ScriptedRouting::new()));
    let session = block_on(engine.create_session(None)).unwrap();

    block_on(engine.delete_session(session.id)).unwrap();

    assert_eq!(block_on(engine.find_session(session.id)).unwrap_err().code, 102);
    assert_eq!(block_on(engine.delete_session(session.id)).unwrap_err().code, 102);
}
