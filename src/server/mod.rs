mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, patch, post},
    Router,
};

use crate::api::{DynAPI, API};
use crate::server::handlers::{interactions, sessions};

pub fn router(api: DynAPI) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/sessions", post(sessions::create))
        .route(
            "/sessions/:id",
            get(sessions::find).delete(sessions::delete),
        )
        .route("/sessions/:id/map", get(sessions::find_map))
        .route("/sessions/:id/clicks", post(interactions::click))
        .route(
            "/sessions/:id/markers/:marker_id/dragend",
            patch(interactions::drag_end),
        )
        .route("/sessions/:id/origin", patch(interactions::edit_origin))
        .layer(Extension(api))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, addr: SocketAddr) {
    let api = Arc::new(api) as DynAPI;

    let app = router(api);

    tracing::info!("listening on {}", addr);

    if let Err(err) = axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
    {
        tracing::error!("server error: {}", err);
    }
}

async fn root() -> &'static str {
    "courier"
}

#[tokio::test]
async fn session_lifecycle_over_http() {
    use crate::engine::{test_engine, ROUTE_LAYER_ID};
    use crate::entities::Session;
    use crate::surface::MapView;
    use crate::test_utils::ScriptedRouting;
    use serde_json::{json, Value};
    use std::time::Duration;

    let api = Arc::new(test_engine(Arc::new(ScriptedRouting::new()))) as DynAPI;
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let server = axum::Server::from_tcp(listener)
        .unwrap()
        .serve(router(api).into_make_service());
    tokio::spawn(server);

    let client = reqwest::Client::new();

    let session: Session = client
        .post(format!("{}/sessions", base))
        .json(&json!({}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let clicked: Session = client
        .post(format!("{}/sessions/{}/clicks", base, session.id))
        .json(&json!({ "coordinates": { "longitude": 15.7, "latitude": 46.6 } }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(clicked.destinations.len(), 1);

    let mut settled = false;
    for _ in 0..50 {
        let current: Session = client
            .get(format!("{}/sessions/{}", base, session.id))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        if current.status.name() == "idle" {
            settled = true;
            break;
        }

        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(settled);

    let view: MapView = client
        .get(format!("{}/sessions/{}/map", base, session.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(view.layers.len(), 1);
    assert_eq!(view.layers[0].id, ROUTE_LAYER_ID);
    assert_eq!(view.markers.len(), 2);

    let res = client
        .patch(format!("{}/sessions/{}/origin", base, session.id))
        .json(&json!({ "longitude": "not a number" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], 101);

    let res = client
        .delete(format!("{}/sessions/{}", base, session.id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 200);

    let res = client
        .get(format!("{}/sessions/{}", base, session.id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 404);
}
