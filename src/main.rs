//! Exploding Kittens Back binary entrypoint wiring the REST routes to the card store.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[cfg(feature = "redis-store")]
use exploding_kittens_back::dao::card_store::redis::RedisCardStore;
use exploding_kittens_back::{
    config::{AppConfig, StoreBackend},
    dao::card_store::{CardStore, memory::MemoryCardStore},
    routes,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let store = connect_store(&config).await?;
    let port = config.port;

    let app_state = AppState::new(store, config);
    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    info!("server stopped");
    Ok(())
}

/// Open the configured store once; every request shares the returned handle.
async fn connect_store(config: &AppConfig) -> anyhow::Result<Arc<dyn CardStore>> {
    match config.store_backend {
        StoreBackend::Memory => {
            warn!("using the in-memory store; deck and scores are lost on restart");
            Ok(Arc::new(MemoryCardStore::new()))
        }
        #[cfg(feature = "redis-store")]
        StoreBackend::Redis => {
            let redis = config.redis_config();
            info!(url = %redis.redacted_url(), "connecting to Redis");
            let store = RedisCardStore::connect(redis)
                .await
                .context("connecting to Redis")?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "redis-store"))]
        StoreBackend::Redis => {
            anyhow::bail!("built without the `redis-store` feature; set STORE_BACKEND=memory")
        }
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
