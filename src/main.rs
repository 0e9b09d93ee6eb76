use std::sync::Arc;

use mimalloc::MiMalloc;
use roll_call::service::attendance::today;
use roll_call::service::recognizer::SimulatedRecognizer;
use roll_call::{AppState, AttendanceStore, app_router, db::seed};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = &roll_call::config::CONFIG;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.basic.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.basic.database_url,
        listen_addr = %cfg.basic.listen_addr,
        loglevel = %cfg.basic.loglevel,
        seed = cfg.demo.seed,
    );

    let store = AttendanceStore::connect(&cfg.basic.database_url).await?;
    store.init_schema().await?;

    if cfg.demo.seed && seed::seed_demo(&store, today()).await? {
        info!("demo accounts: instructor professor/password, student student1/password");
    }

    let recognizer = Arc::new(SimulatedRecognizer::demo(cfg.recognizer_delay()));
    let state = AppState::new(store, recognizer, cfg);
    let app = app_router(state);

    let listener = TcpListener::bind(cfg.basic.listen_addr.as_str()).await?;
    info!("HTTP server listening on {}", cfg.basic.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutdown signal received");
}
