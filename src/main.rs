use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

use exploreo::cli::{self, Cli};
use exploreo::config::Config;
use exploreo::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging before the config is read so its messages are kept.
    // RUST_LOG wins, then --log-level, then the config file's level.
    let env_filter = EnvFilter::try_from_default_env().ok();
    let pinned = env_filter.is_some() || cli.log_level.is_some();
    let initial = env_filter.unwrap_or_else(|| {
        EnvFilter::new(cli.log_level.as_deref().unwrap_or("info"))
    });
    let (filter, reload_handle) = reload::Layer::new(initial);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::load(&cli.config)?;

    if !pinned {
        if let Err(e) = reload_handle.reload(EnvFilter::new(&config.logging.level)) {
            tracing::warn!("Failed to apply configured log level: {}", e);
        }
    }

    if !cli.is_serve() {
        return cli::run_command(&cli).await;
    }

    serve(config).await
}

async fn serve(config: Config) -> Result<()> {
    tracing::info!("Starting Exploreo v{}", env!("CARGO_PKG_VERSION"));

    // Initialize database
    let db = exploreo::db::init(&config.database).await?;

    // Ensure the configured admin account exists
    exploreo::auth::ensure_admin_user(&db, &config.auth)
        .await
        .context("Failed to create admin account")?;

    if let Err(e) = exploreo::auth::purge_expired_sessions(&db).await {
        tracing::warn!("Failed to purge expired sessions: {}", e);
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, db.clone()));
    let app = exploreo::api::create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}
