use std::sync::Arc;

use courier::config::Config;
use courier::engine::Engine;
use courier::external::{TomTomClient, TomTomClientParams};
use courier::server::serve;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    let routing = Arc::new(TomTomClient::new(TomTomClientParams {
        api_key: config.api_key.clone(),
        api_base: config.api_base.clone(),
    }));

    let addr = config.addr;
    let engine = Engine::new(config, routing);

    serve(engine, addr).await;
}
