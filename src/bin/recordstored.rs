use std::sync::Arc;

use config::{Config, FileFormat};
use recordstore::{
    api::{
        records::{RecordApiState, record_routes},
        routes::build_router,
    },
    cache::{DEFAULT_FLUSH_THRESHOLD, RecordCache},
    storage::file::FileStorage,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, signal::ctrl_c};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
#[serde(default)]
struct RecordStoreConfig {
    data_file: String,
    port: u16,
    flush_threshold: u64,
}

impl Default for RecordStoreConfig {
    fn default() -> Self {
        Self {
            data_file: "data/records.jsonl".to_owned(),
            port: 8080,
            flush_threshold: DEFAULT_FLUSH_THRESHOLD,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .init();
}

#[tokio::main]
async fn main() {
    init_tracing();
    tracing::info!("starting recordstore");

    let config = Config::builder()
        .add_source(config::File::new("recordstore.toml", FileFormat::Toml).required(false))
        .add_source(config::Environment::with_prefix("RECORDSTORE").separator("_"))
        .build()
        .expect("failed to load config");
    let config: RecordStoreConfig = config
        .try_deserialize()
        .expect("failed to deserialize config");

    let toml_config = toml::to_string_pretty(&config).expect("failed to serialize config");
    tracing::info!("loaded configuration:\n{toml_config}");

    let cache = match RecordCache::open(
        FileStorage::new(&config.data_file),
        config.flush_threshold,
    )
    .await
    {
        Ok(cache) => cache,
        Err(err) => {
            // lenient startup: an unreadable backing file is logged and the
            // service starts with an empty record set
            tracing::warn!(culprit = ?err, "failed to load persisted records; starting empty");
            RecordCache::new(FileStorage::new(&config.data_file), config.flush_threshold)
        }
    };
    tracing::info!(records = cache.len().await, "record cache ready");

    let state = Arc::new(RecordApiState::new(cache));
    let router = build_router(state.clone(), record_routes());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("failed to bind listen address");
    tracing::info!("listening on {addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            ctrl_c().await.expect("failed to listen for shutdown signal");
            tracing::info!("received SIGINT, shutting down");
        })
        .await
        .expect("server error");

    // everything written since the last threshold flush only exists in
    // memory until this final snapshot lands
    if let Err(err) = state.cache().flush().await {
        tracing::error!(culprit = ?err, "failed to flush records during shutdown");
    }
    tracing::info!("shutdown complete");
}
