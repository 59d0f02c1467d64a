mod controller;
mod helpers;
mod interaction_api;
mod markers;
mod renderer;
mod sequencer;
mod session_api;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

pub use controller::Controller;
pub use renderer::ROUTE_LAYER_ID;
pub use sequencer::sequence;

use crate::{
    api::API,
    config::Config,
    error::{not_found_error, Error},
    external::DynRouting,
};

pub struct Engine {
    config: Config,
    routing: DynRouting,
    sessions: RwLock<HashMap<Uuid, Arc<Controller>>>,
}

impl Engine {
    #[tracing::instrument(name = "Engine::new", skip_all)]
    pub fn new(config: Config, routing: DynRouting) -> Self {
        tracing::info!(
            "request timeout {:?}, default origin {:?}",
            config.request_timeout,
            config.default_origin
        );

        Self {
            config,
            routing,
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl Engine {
    async fn controller(&self, id: Uuid) -> Result<Arc<Controller>, Error> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(not_found_error)
    }
}

impl API for Engine {}

#[cfg(test)]
pub(crate) fn test_engine(routing: Arc<crate::test_utils::ScriptedRouting>) -> Engine {
    use std::time::Duration;

    let config = Config {
        api_key: "test-key".into(),
        api_base: "http://127.0.0.1:9".into(),
        addr: std::net::SocketAddr::from(([127, 0, 0, 1], 0)),
        request_timeout: Duration::from_millis(200),
        default_origin: crate::config::DEFAULT_ORIGIN,
        map_language: "en-GB".into(),
        map_zoom: 13,
    };

    Engine::new(config, routing)
}
