// Main entry point for Sentinel Shield

use anyhow::Context;
use secrecy::ExposeSecret;
use sentinel_shield::api::{create_router, AppState};
use sentinel_shield::config::Config;
use sentinel_shield::core::crypto::CommandCipher;
use sentinel_shield::core::token::TokenCodec;
use sentinel_shield::engine::threat_intel::LocalThreatDatabase;
use sentinel_shield::state::pg_store::PgStore;

use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load and validate configuration first (before any logging)
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    // 2. Initialize tracing subscriber; must happen exactly once
    init_tracing(&config)?;

    info!("Starting Sentinel Shield");
    info!(
        bind_address = %config.bind_address,
        port = config.port,
        "Configuration loaded"
    );

    // 3. Key material
    let token_codec = Arc::new(
        TokenCodec::new(config.jwt_secret.expose_secret())
            .context("Failed to initialize token codec")?,
    );
    let cipher = Arc::new(
        CommandCipher::from_hex_key(config.encryption_key.expose_secret())
            .context("Failed to initialize command cipher")?,
    );
    info!("Token codec and command cipher initialized");

    // 4. Database pool and schema
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(config.database_url.expose_secret())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to connect to database");
            e
        })?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to apply database migrations")?;
    info!("Database pool initialized");

    let store = Arc::new(PgStore::new(pool));

    // 5. Threat intelligence
    let threat_intel = Arc::new(LocalThreatDatabase::with_known_signatures());
    info!(signatures = threat_intel.len(), "Threat database loaded");

    // 6. Create AppState
    let app_state = AppState {
        token_codec,
        cipher,
        users: store.clone(),
        devices: store.clone(),
        commands: store.clone(),
        scans: store.clone(),
        telemetry: store.clone(),
        vpn: store.clone(),
        threat_intel,
        health: store,
        config: Arc::new(config),
    };

    // 7. Create router
    let router = create_router(&app_state).with_state(app_state.clone());

    // 8. Start HTTP server
    let addr = format!("{}:{}", app_state.config.bind_address, app_state.config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        error!(error = %e, addr = %addr, "Failed to bind to address");
        e
    })?;

    info!(addr = %addr, "Server listening");

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!(error = %e, "Server error");
            e
        })?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing subscriber based on configuration
///
/// `RUST_LOG` takes precedence over `LOG_LEVEL`.
fn init_tracing(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.to_lowercase()))
        .context("Invalid log filter")?;

    let subscriber = fmt()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_env_filter(filter);

    if config.log_format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            info!("SIGTERM received, starting graceful shutdown");
        },
    }
}
