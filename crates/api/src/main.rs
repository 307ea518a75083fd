use std::net::SocketAddr;
use std::sync::Arc;

use estate_core::clock::{Clock, SystemClock};
use estate_db::{Ledger, MemoryLedger, PgLedger};
use estate_storage::S3Client;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use estate_api::config::ServerConfig;
use estate_api::router::build_app_router;
use estate_api::state::{build_signer, AppState};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "estate_api=debug,estate_storage=info,tower_http=debug".into());
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|f| f == "json");
    let registry = tracing_subscriber::registry().with(filter);
    if json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Ledger ---
    let ledger: Arc<dyn Ledger> = match &config.database_url {
        Some(url) => {
            let pool = estate_db::create_pool(url)
                .await
                .expect("Failed to connect to database");
            estate_db::run_migrations(&pool)
                .await
                .expect("Failed to run database migrations");
            tracing::info!("Postgres ledger ready");
            Arc::new(PgLedger::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using an empty in-memory ledger");
            Arc::new(MemoryLedger::new())
        }
    };

    // --- Object store ---
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let s3 = S3Client::new(build_signer(&config), Arc::clone(&clock))
        .expect("Failed to build object-store HTTP client");
    tracing::info!(bucket = %config.storage.bucket, region = %config.storage.region, "Object store configured");

    // --- App state ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let state = AppState::new(config.clone(), ledger, Arc::new(s3), clock);
    let app = build_app_router(state, &config);

    // --- Start server ---
    tracing::info!(%addr, "Starting server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
