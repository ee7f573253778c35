use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catnote_api::{router, AppState, ServerConfig};
use catnote_core::CategoryLocks;
use catnote_db::{seed, Database, PoolConfig};
use catnote_jobs::{NotesCleanupJob, WorkerBuilder, WorkerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "catnote_api=debug,catnote_jobs=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // Optionally create a file appender with daily rotation
    let _file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("catnote-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(log_ansi.unwrap_or(false));
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    let config = ServerConfig::from_env();

    let db = match config.database_url.as_deref() {
        Some(url) => {
            info!("Connecting to database...");
            let db = Database::connect_with_config(url, PoolConfig::from_env()).await?;
            info!("Running database migrations...");
            db.migrate().await?;
            db
        }
        None => {
            info!("DATABASE_URL not set, keeping data in memory");
            Database::in_memory()
        }
    };
    info!(backend = db.backend(), "Store ready");

    if config.seed_on_startup {
        seed::seed_default(db.notes.as_ref()).await?;
    }

    let locks = CategoryLocks::new();

    let worker_config = WorkerConfig::from_env();
    let worker_handle = if worker_config.enabled {
        info!("Starting job worker...");
        let handle = WorkerBuilder::new(&db)
            .with_config(worker_config)
            .with_handler(NotesCleanupJob::new(db.notes.clone(), locks.clone()))
            .build()
            .await
            .start();
        Some(handle)
    } else {
        info!("Job worker disabled");
        None
    };

    let app = router(AppState::new(db, locks));

    let addr = config.bind_addr()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = worker_handle {
        handle.shutdown().await?;
    }
    info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
