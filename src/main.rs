use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use faq_chatbot::config::Config;
use faq_chatbot::routes::create_router;
use faq_chatbot::state::AppState;
use faq_chatbot::store::{SqliteStore, Store, seed};
use faq_chatbot::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("invalid configuration")?;
    init_tracing(config.json_logs);

    let store = SqliteStore::open(&config.database_path).context("failed to open database")?;
    let store: Arc<dyn Store> = Arc::new(store);
    seed::seed_if_empty(store.as_ref())
        .await
        .context("failed to seed sample FAQs")?;

    let state = Arc::new(AppState::from_config(&config, store));
    let app = create_router(state, &config.public_dir);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, "FAQ chatbot listening");
    info!("chat widget: http://localhost:{}/", config.port);
    info!("admin dashboard: http://localhost:{}/admin", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped, database connection closed");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down gracefully");
}
