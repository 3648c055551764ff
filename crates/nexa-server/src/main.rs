use anyhow::Context;
use nexa_server::config::ServerConfig;
use nexa_server::{build_app, build_router, telemetry};
use tokio::net::TcpListener;

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                (Err(err), _) | (_, Err(err)) => {
                    tracing::warn!(error = %err, "signal handlers unavailable; using ctrl-c");
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env().context("invalid configuration")?;
    telemetry::init_tracing(config.log_json).context("failed to install tracing subscriber")?;

    let app = build_app(&config).context("failed to build app")?;
    let router = build_router(app);

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!(addr = %config.bind, "nexa-server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            wait_for_shutdown_signal().await;
            tracing::info!("shutdown signal received");
        })
        .await
        .context("server error")?;
    Ok(())
}
