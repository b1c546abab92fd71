use std::net::SocketAddr;

use tokio::signal;
use tracing_subscriber::EnvFilter;

use ticketdesk::config::Config;
use ticketdesk::db;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(&config.log_level)
        }))
        .init();

    let pool = ticketdesk::connect(&config).await?;

    if std::env::args().nth(1).as_deref() == Some("reset") {
        db::setup::reset(&pool, config.seed_demo).await?;
        tracing::info!("Database reset");
        pool.close().await;
        return Ok(());
    }

    tracing::info!("Starting ticketdesk");
    db::setup::auto_setup(&pool, config.seed_demo).await?;

    let addr = SocketAddr::new(config.host, config.port);
    let app = ticketdesk::build_app(pool.clone(), config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Connection pool closed");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
