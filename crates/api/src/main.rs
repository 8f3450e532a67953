use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voxrelay_api::{build_router, state::AppState};
use voxrelay_config::Settings;
use voxrelay_transcription::RecognizerBackend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::load()?;
    let recognizer = build_recognizer(&settings)?;
    info!(backend = recognizer.name(), "Recognizer backend ready");

    let state = AppState::new(recognizer, &settings);
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "voxrelay listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Resolves on Ctrl-C (SIGINT); in-flight requests drain before exit.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(%e, "Failed to install Ctrl-C handler; running until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(feature = "remote-riva")]
fn build_recognizer(settings: &Settings) -> anyhow::Result<Arc<dyn RecognizerBackend>> {
    use voxrelay_transcription::asr::remote_riva::RemoteRivaBackend;
    Ok(Arc::new(RemoteRivaBackend::new(&settings.riva.endpoint)))
}

#[cfg(not(feature = "remote-riva"))]
fn build_recognizer(_settings: &Settings) -> anyhow::Result<Arc<dyn RecognizerBackend>> {
    anyhow::bail!("Built without a recognizer backend; rebuild with --features remote-riva")
}
