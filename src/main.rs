use std::sync::Arc;

mod config;
mod error;
mod handler;
mod http;
mod logger;
mod model;
mod sentiment;
mod server;
mod store;

use sentiment::VaderScorer;
use store::ReviewStore;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Create the Tokio runtime, sized by the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    // A store that cannot be seeded is fatal; nothing is served
    let store = ReviewStore::from_csv_path(&cfg.data.reviews_path)?;
    logger::log_store_seeded(
        &cfg.data.reviews_path,
        store.count().await,
        store.location_count(),
    );

    let listener = server::bind_listener(addr, cfg.performance.backlog)?;
    logger::log_server_start(&addr, &cfg);

    let state = Arc::new(config::AppState::new(
        cfg,
        store,
        Box::new(VaderScorer::new()),
    ));
    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    // Use LocalSet for spawn_local support
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::run_server(listener, state, signals))
        .await
}
