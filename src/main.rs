//! Workshop progress service entry point.

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use workshop_progress::adapters::artifact::{HttpArtifactGenerator, MockArtifactGenerator};
use workshop_progress::adapters::auth::JwtSessionValidator;
use workshop_progress::adapters::http::middleware::AuthState;
use workshop_progress::adapters::http::router::{api_router, ApiHandlers, RouterConfig, ServicePorts};
use workshop_progress::adapters::postgres::{
    PostgresCheckpointRepository, PostgresLearnerRepository, PostgresProgressRepository,
    PostgresStepDataRepository,
};
use workshop_progress::adapters::TombstoneSweeper;
use workshop_progress::application::handlers::cleanup::ReclaimTombstonesHandler;
use workshop_progress::config::{AppConfig, ConfigError, ValidationError};
use workshop_progress::domain::foundation::DomainError;
use workshop_progress::domain::workshop::CatalogError;
use workshop_progress::ports::ArtifactGenerator;

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("Workshop catalog: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migrations: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Artifact generator: {0}")]
    Artifact(#[from] DomainError),

    #[error("Server: {0}")]
    Io(#[from] std::io::Error),
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone()));

    if config.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn artifact_generator(config: &AppConfig) -> Result<Arc<dyn ArtifactGenerator>, StartupError> {
    match config.artifact.http_config() {
        Some(http) => {
            tracing::info!(endpoint = %http.endpoint, "Using HTTP artifact generator");
            Ok(Arc::new(HttpArtifactGenerator::new(http)?))
        }
        None => {
            tracing::warn!("No artifact endpoint configured; using mock generator");
            Ok(Arc::new(MockArtifactGenerator::new()))
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("Received terminate signal, shutting down"),
    }
}

async fn run(config: AppConfig) -> Result<(), StartupError> {
    config.validate()?;

    let catalog = Arc::new(config.workshops.load_catalog()?);
    tracing::info!(
        version = catalog.version(),
        tracks = catalog.tracks().count(),
        "Workshop catalog loaded"
    );

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let steps = Arc::new(PostgresStepDataRepository::new(pool.clone()));
    let ports = ServicePorts {
        progress: Arc::new(PostgresProgressRepository::new(pool.clone())),
        steps: steps.clone(),
        learners: Arc::new(PostgresLearnerRepository::new(pool.clone())),
        checkpoints: Arc::new(PostgresCheckpointRepository::new(pool.clone())),
        artifacts: artifact_generator(&config)?,
    };

    let validator: AuthState = Arc::new(JwtSessionValidator::new(config.auth.jwt_config()));
    let router_config = RouterConfig {
        request_timeout: config.server.request_timeout(),
        cors_origins: config.server.cors_origins_list(),
    };
    let app = api_router(ApiHandlers::wire(catalog, &ports), validator, &router_config);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let sweeper_task = if config.cleanup.enabled {
        let sweeper = TombstoneSweeper::new(
            ReclaimTombstonesHandler::new(steps),
            config.cleanup.sweeper_config(),
        );
        Some(tokio::spawn(async move { sweeper.run(shutdown_rx).await }))
    } else {
        tracing::info!("Tombstone sweeper disabled");
        None
    };

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let _ = shutdown_tx.send(true);
    if let Some(task) = sweeper_task {
        if let Err(e) = task.await {
            tracing::error!(error = %e, "Tombstone sweeper task failed");
        }
    }
    pool.close().await;
    tracing::info!("Shutdown complete");
    Ok(())
}

#[tokio::main]
async fn main() {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    init_tracing(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Service terminated");
        std::process::exit(1);
    }
}
