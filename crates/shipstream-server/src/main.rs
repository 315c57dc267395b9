//! # Shipstream Server
//!
//! Main entry point: wires the ledger, dispatch queue, status cache, and
//! reconciliation sweep behind the REST API.

use shipstream_config::ConfigLoader;
use shipstream_core::{ShipstreamError, ShipstreamResult};
use shipstream_jobs::RedisDispatchQueue;
use shipstream_repository::{create_pool, PgJobLedger};
use shipstream_rest::{create_router, AppState};
use shipstream_service::{
    JobService, JobServiceImpl, ReconciliationSweep, RedisStatusCache, StatusCache,
};
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    init_logging();

    info!("Starting Shipstream Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run().await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> ShipstreamResult<()> {
    let config_loader = ConfigLoader::from_default_location()?;
    let config = config_loader.get().await;

    info!("Environment: {}", config.app.environment);

    // Ledger (source of truth)
    let db_pool = create_pool(&config.database).await?;
    if config.database.run_migrations {
        db_pool.run_migrations().await?;
    }
    let ledger = Arc::new(PgJobLedger::new(db_pool.clone()));

    // Redis pool shared by the dispatch queue and the status cache
    let redis_pool = Arc::new(
        shipstream_jobs::redis::create_pool(&config.redis)
            .await
            .map_err(ShipstreamError::from)?,
    );

    let queue = Arc::new(RedisDispatchQueue::new(
        redis_pool.as_ref().clone(),
        &config.redis,
        &config.queue,
    ));

    let cache: Arc<dyn StatusCache> = if config.cache.enabled {
        Arc::new(RedisStatusCache::with_ttl(
            redis_pool.clone(),
            config.cache.ttl(),
        ))
    } else {
        warn!("Status cache disabled; fast status path reads the ledger");
        Arc::new(RedisStatusCache::disabled())
    };

    let job_service: Arc<dyn JobService> = Arc::new(JobServiceImpl::new(
        ledger.clone(),
        queue.clone(),
        cache,
    ));

    // Reconciliation sweep
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweep_handle = if config.reconciler.enabled {
        let sweep = ReconciliationSweep::new(
            ledger.clone(),
            queue.clone(),
            config.reconciler.clone(),
        );
        Some(tokio::spawn(async move { sweep.run(shutdown_rx).await }))
    } else {
        warn!("Reconciliation sweep disabled; dropped messages will not be recovered");
        None
    };

    // REST server
    let state = AppState::new(job_service, queue, Some(db_pool.clone()));
    let router = create_router(state, &config.server, &config.admin);

    let addr = config.server.addr();
    info!("Starting REST server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ShipstreamError::internal(format!("Failed to bind: {}", e)))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ShipstreamError::internal(format!("Server error: {}", e)))?;

    // Stop the sweep, then release the pool.
    if let Some(handle) = sweep_handle {
        let _ = shutdown_tx.send(true);
        let _ = handle.await;
    }
    db_pool.close().await;

    info!("Server shutdown complete");
    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,shipstream=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
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
        () = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        () = terminate => info!("Received SIGTERM, shutting down..."),
    }
}
