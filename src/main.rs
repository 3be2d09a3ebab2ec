use anyhow::Context;
use cabin_sense::appstate::AppState;
use cabin_sense::http;
use tracing::*;
use tracing_subscriber::FmtSubscriber;

/// Control panel convention: loopback only, fixed port
const BIND_ADDR: &str = "127.0.0.1:5005";

/// Application & Tokio executor entrypoint
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        // all spans/events with a level higher than TRACE (e.g, debug, info, warn, etc.)
        // will be written to stdout.
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("setting default tracing subscriber failed")?;

    // Initialize application state
    let state = AppState::new();

    // Set up the Axum router
    let app = http::router(state);

    // Start serving webrequests
    info!("Axum router & shared state initialised");
    info!("Listening on http://{BIND_ADDR}");
    let listener = tokio::net::TcpListener::bind(BIND_ADDR)
        .await
        .with_context(|| format!("unable to bind {BIND_ADDR}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
