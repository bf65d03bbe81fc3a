use std::net::SocketAddr;
use tokio::{fs, signal};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};
use wellness_widget::{AppConfig, AppState, JsonStore, Scheduler, router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = AppConfig::from_env();
    fs::create_dir_all(&config.data_dir).await?;
    info!("storing data in {}", config.data_dir.display());

    let state = AppState::load(JsonStore::new(config.data_dir.clone()), &config).await;
    let scheduler = Scheduler::spawn(state.clone(), config.tick_interval, config.rollover_poll);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let served = axum::serve(listener, router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    scheduler.shutdown();
    state.flush().await;
    info!("state flushed, shutting down");
    served?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!("failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
